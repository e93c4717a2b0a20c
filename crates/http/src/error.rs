//! Error handling for the bookstore HTTP layer

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Body of every error response
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub message: String,
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{message}")]
    Validation {
        fields: Vec<String>,
        message: String,
    },

    #[error("{message}")]
    BadRequest { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Forbidden { message: String },

    #[error("{message}")]
    Timeout { message: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a validation error naming the offending fields
    pub fn validation(fields: Vec<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            fields,
            message: message.into(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Create a request timeout error
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Status code this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::Timeout { .. } => StatusCode::REQUEST_TIMEOUT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();
        let status = self.status();

        match &self {
            AppError::Validation { fields, .. } => tracing::warn!(
                error_id = %error_id,
                status_code = %status.as_u16(),
                fields = ?fields,
                "request rejected by validation"
            ),
            AppError::Internal(e) => tracing::error!(
                error_id = %error_id,
                status_code = %status.as_u16(),
                error = ?e,
                "request failed"
            ),
            other => tracing::info!(
                error_id = %error_id,
                status_code = %status.as_u16(),
                message = %other,
                "request error"
            ),
        }

        // Only the message text leaves the process; no chain, no codes.
        let body = ErrorBody {
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(response: Response) -> ErrorBody {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_validation_error() {
        let error = AppError::validation(vec!["price".to_string()], "price must not be negative");

        match error {
            AppError::Validation { fields, message } => {
                assert_eq!(fields, vec!["price"]);
                assert_eq!(message, "price must not be negative");
            }
            _ => panic!("Expected Validation error"),
        }
    }

    #[tokio::test]
    async fn test_not_found_response() {
        let response = AppError::not_found("Book not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_of(response).await,
            ErrorBody {
                message: "Book not found".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_validation_maps_to_bad_request() {
        let response =
            AppError::validation(vec!["stock".to_string()], "stock bad").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_of(response).await.message, "stock bad");
    }

    #[tokio::test]
    async fn test_timeout_response() {
        let response = AppError::timeout("Request timed out").into_response();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(body_of(response).await.message, "Request timed out");
    }

    #[tokio::test]
    async fn test_internal_error_exposes_message_only() {
        let internal = anyhow::anyhow!("disk unavailable").context("reading books");
        let response = AppError::Internal(internal).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(response).await.message, "reading books");
    }
}
