//! Error types for eqx-web

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API result type
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// No valid session (401)
    #[error("Unauthenticated")]
    Unauthenticated,

    /// Required form fields missing (422); carries the empty field names
    #[error("Validation failed: {0:?}")]
    Validation(Vec<&'static str>),

    /// Profile store unreachable (503)
    #[error("Profile store unavailable: {0}")]
    StoreUnavailable(String),

    /// Profile store rejected the write (502)
    #[error("Profile store rejected write: {0}")]
    WriteRejected(String),

    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Conflict (409) - e.g., email already registered
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<eqx_common::Error> for ApiError {
    fn from(err: eqx_common::Error) -> Self {
        use eqx_common::Error;
        match err {
            Error::StoreUnavailable(msg) => ApiError::StoreUnavailable(msg),
            Error::WriteRejected(msg) => ApiError::WriteRejected(msg),
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHENTICATED",
                "No valid session".to_string(),
            ),
            ApiError::Validation(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_FAILED",
                format!("Required fields are empty: {}", fields.join(", ")),
            ),
            ApiError::StoreUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE", msg.clone())
            }
            ApiError::WriteRejected(msg) => {
                (StatusCode::BAD_GATEWAY, "WRITE_REJECTED", msg.clone())
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
            ApiError::Other(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_gateway_statuses() {
        let unavailable: ApiError =
            eqx_common::Error::StoreUnavailable("pool closed".to_string()).into();
        assert!(matches!(unavailable, ApiError::StoreUnavailable(_)));

        let rejected: ApiError =
            eqx_common::Error::WriteRejected("constraint".to_string()).into();
        assert!(matches!(rejected, ApiError::WriteRejected(_)));
    }

    #[test]
    fn validation_lists_offending_fields() {
        let response = ApiError::Validation(vec!["address", "ssn"]).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
