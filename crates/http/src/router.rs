//! Router builder for the bookstore HTTP server

use axum::{
    error_handling::HandleErrorLayer,
    extract::Request,
    http::HeaderValue,
    middleware,
    routing::{get, MethodRouter},
    BoxError, Json, Router,
};
use std::{sync::Arc, time::Duration};
use tower::{timeout::error::Elapsed, timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use uuid::{Timestamp, Uuid};

use bookstore_kernel::ModuleRegistry;

use crate::error::AppError;
use crate::origin::{reject_unlisted_origins, OriginPolicy};

/// Builder for constructing the main HTTP router.
///
/// Layers only wrap routes that already exist, so mount everything before
/// calling the `with_*` middleware methods.
pub struct RouterBuilder {
    router: Router,
}

impl RouterBuilder {
    /// Create a new router builder
    pub fn new() -> Self {
        Self {
            router: Router::new(),
        }
    }

    /// Add a route to the router
    pub fn route(mut self, path: &str, route: MethodRouter) -> Self {
        self.router = self.router.route(path, route);
        self
    }

    /// Mount a module's router under `/api/{module_name}`
    pub fn mount_module(mut self, module_name: &str, module_router: Router) -> Self {
        let api_path = format!("/api/{}", module_name);
        self.router = self.router.nest(&api_path, module_router);
        self
    }

    /// Serve the OpenAPI document merged from every module's fragment
    pub fn with_openapi(mut self, registry: &ModuleRegistry) -> Self {
        let document = merged_openapi(registry);

        // Round-trip through utoipa's model so malformed fragments are caught here
        let document = match serde_json::from_value::<utoipa::openapi::OpenApi>(document.clone()) {
            Ok(typed) => serde_json::to_value(typed).unwrap_or(document),
            Err(err) => {
                tracing::warn!(error = %err, "module OpenAPI fragments do not form a valid document");
                document
            }
        };

        self.router = self.router.route(
            "/docs/openapi.json",
            get(move || async move { Json(document.clone()) }),
        );
        self
    }

    /// Add tracing middleware
    pub fn with_tracing(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
        );
        self
    }

    /// Add CORS handling plus the guard rejecting unlisted origins
    pub fn with_origin_policy(mut self, policy: OriginPolicy) -> Self {
        let policy = Arc::new(policy);
        self.router = self
            .router
            .layer(policy.cors_layer())
            .layer(middleware::from_fn_with_state(
                policy,
                reject_unlisted_origins,
            ));
        self
    }

    /// Add request ID middleware; the id is echoed on the response
    pub fn with_request_id(mut self) -> Self {
        self.router = self
            .router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7));
        self
    }

    /// Add timeout middleware; expiry answers 408 with a `{message}` body
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.router = self.router.layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(timeout_error))
                .layer(TimeoutLayer::new(Duration::from_millis(timeout_ms))),
        );
        self
    }

    /// Build the final router
    pub fn build(self) -> Router {
        self.router
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn merged_openapi(registry: &ModuleRegistry) -> serde_json::Value {
    let mut spec = serde_json::json!({
        "openapi": "3.1.0",
        "info": {
            "title": "Bookstore API",
            "version": "1.0.0",
            "description": "Book inventory service"
        },
        "paths": {},
        "components": {
            "schemas": {}
        }
    });

    spec["components"]["schemas"]["ErrorResponse"] = serde_json::json!({
        "type": "object",
        "properties": {
            "message": {
                "type": "string"
            }
        },
        "required": ["message"]
    });

    spec["paths"]["/healthz"] = serde_json::json!({
        "get": {
            "summary": "Health check",
            "responses": {
                "200": {
                    "description": "OK",
                    "content": {
                        "text/plain": {
                            "schema": {
                                "type": "string"
                            }
                        }
                    }
                }
            }
        }
    });

    for module in registry.modules() {
        let Some(module_spec) = module.openapi() else {
            continue;
        };

        if let Some(paths) = module_spec.get("paths").and_then(|p| p.as_object()) {
            for (path, path_item) in paths {
                // "/" is the module root itself
                let prefixed_path = match path.as_str() {
                    "/" => format!("/api/{}", module.name()),
                    other => format!("/api/{}{}", module.name(), other),
                };
                spec["paths"][prefixed_path] = path_item.clone();
            }
        }

        if let Some(schemas) = module_spec
            .get("components")
            .and_then(|c| c.get("schemas"))
            .and_then(|s| s.as_object())
        {
            for (schema_name, schema_def) in schemas {
                spec["components"]["schemas"][schema_name] = schema_def.clone();
            }
        }
    }

    spec
}

async fn timeout_error(err: BoxError) -> AppError {
    if err.is::<Elapsed>() {
        AppError::timeout("Request timed out")
    } else {
        AppError::Internal(anyhow::anyhow!("{err}"))
    }
}

/// Time-ordered request ids
#[derive(Clone)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let timestamp = Timestamp::now(uuid::NoContext);
        let request_id = Uuid::new_v7(timestamp)
            .to_string()
            .parse::<HeaderValue>()
            .ok()?;
        Some(RequestId::new(request_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use bookstore_kernel::settings::CorsSettings;
    use tower::ServiceExt;

    fn guarded_router() -> Router {
        RouterBuilder::new()
            .route("/ping", get(|| async { "pong" }))
            .with_origin_policy(OriginPolicy::from_settings(&CorsSettings::default()))
            .with_request_id()
            .build()
    }

    fn get_with_origin(origin: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(Method::GET).uri("/ping");
        if let Some(origin) = origin {
            builder = builder.header(header::ORIGIN, origin);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn requests_without_origin_pass() {
        let response = guarded_router()
            .oneshot(get_with_origin(None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn allowed_origin_gets_cors_headers() {
        let response = guarded_router()
            .oneshot(get_with_origin(Some("http://localhost:3000")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("http://localhost:3000")
        );
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
                .and_then(|v| v.to_str().ok()),
            Some("true")
        );
    }

    #[tokio::test]
    async fn unlisted_origin_is_forbidden() {
        let response = guarded_router()
            .oneshot(get_with_origin(Some("https://evil.example.com")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let bytes = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Not allowed by CORS");
    }

    #[tokio::test]
    async fn preflight_from_allowed_origin_is_answered() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/ping")
            .header(header::ORIGIN, "https://demo-3000.app.github.dev")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
            .body(Body::empty())
            .unwrap();

        let response = guarded_router().oneshot(request).await.unwrap();
        assert!(response.status().is_success());
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("https://demo-3000.app.github.dev")
        );
    }

    #[tokio::test]
    async fn expired_requests_get_a_json_timeout() {
        let router = RouterBuilder::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_millis(500)).await;
                    "late"
                }),
            )
            .route("/fast", get(|| async { "quick" }))
            .with_timeout(50)
            .build();

        let response = router
            .clone()
            .oneshot(Request::builder().uri("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
        let bytes = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Request timed out");

        let response = router
            .oneshot(Request::builder().uri("/fast").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn module_routes_are_nested_under_api() {
        let module_router = Router::new().route("/", get(|| async { "module root" }));
        let router = RouterBuilder::new()
            .mount_module("books", module_router)
            .build();

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/books")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let registry = ModuleRegistry::new();
        let router = RouterBuilder::new().with_openapi(&registry).build();

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(doc["paths"].get("/healthz").is_some());
    }
}
