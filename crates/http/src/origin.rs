//! Cross-origin allow-list shared by the CORS layer and the origin guard.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, request::Parts, HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use bookstore_kernel::settings::CorsSettings;

use crate::error::AppError;

const HTTPS_SCHEME: &str = "https://";

/// Which `Origin` header values may talk to the API.
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    exact: Vec<String>,
    https_suffixes: Vec<String>,
}

impl OriginPolicy {
    pub fn new(exact: Vec<String>, https_suffixes: Vec<String>) -> Self {
        Self {
            exact,
            https_suffixes,
        }
    }

    pub fn from_settings(settings: &CorsSettings) -> Self {
        Self::new(
            settings.allowed_origins.clone(),
            settings.allowed_origin_suffixes.clone(),
        )
    }

    /// Exact entries match verbatim; suffix entries only match `https://`
    /// origins with a non-empty host in front of the suffix.
    pub fn allows(&self, origin: &str) -> bool {
        if self.exact.iter().any(|allowed| allowed == origin) {
            return true;
        }

        let Some(host) = origin.strip_prefix(HTTPS_SCHEME) else {
            return false;
        };

        self.https_suffixes.iter().any(|suffix| {
            host.strip_suffix(suffix.as_str())
                .is_some_and(|label| !label.is_empty() && !label.contains('/'))
        })
    }

    fn allows_header(&self, origin: &HeaderValue) -> bool {
        origin.to_str().map(|o| self.allows(o)).unwrap_or(false)
    }

    /// CORS layer answering preflights for allowed origins.
    pub fn cors_layer(self: &Arc<Self>) -> CorsLayer {
        let policy = Arc::clone(self);
        CorsLayer::new()
            .allow_origin(AllowOrigin::predicate(
                move |origin: &HeaderValue, _parts: &Parts| policy.allows_header(origin),
            ))
            .allow_credentials(true)
            .allow_methods([
                Method::GET,
                Method::HEAD,
                Method::PUT,
                Method::PATCH,
                Method::POST,
                Method::DELETE,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    }
}

/// Middleware refusing requests whose `Origin` is not on the allow-list.
/// Requests without an `Origin` header (curl, server to server) pass.
pub async fn reject_unlisted_origins(
    State(policy): State<Arc<OriginPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(origin) = request.headers().get(header::ORIGIN) {
        if !policy.allows_header(origin) {
            tracing::warn!(origin = ?origin, "origin rejected");
            return AppError::forbidden("Not allowed by CORS").into_response();
        }
    }

    next.run(request).await
}
