//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::CommandError;
use student_store::StoreError;
use thiserror::Error;

/// API-level error type that maps to HTTP responses.
///
/// Every failure renders as `{"error": message}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A command was rejected or failed.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// A query could not read the store.
    #[error("Storage failure: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Command(CommandError::Validation(_) | CommandError::NotFound(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Command(CommandError::Storage(_)) | ApiError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            tracing::error!(error = %message, "internal server error");
        }

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_failures_are_bad_requests() {
        let err = ApiError::from(CommandError::NotFound("No student found for Id 3".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "No student found for Id 3");

        let err = ApiError::from(CommandError::Validation("Name is required".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_storage_failures_are_server_errors() {
        let err = ApiError::from(CommandError::Storage("Storage failure: down".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = ApiError::from(StoreError::CommitRejected("down".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
