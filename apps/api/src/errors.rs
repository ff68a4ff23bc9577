use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::models::RequestError;
use crate::analysis::tracker::Superseded;
use crate::extract::ExtractError;
use crate::session::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Superseded(#[from] Superseded),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<RequestError> for AppError {
    fn from(e: RequestError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::Extract(e) => {
                let (status, code) = match e {
                    ExtractError::UnsupportedType(_) => {
                        (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_FILE_TYPE")
                    }
                    ExtractError::Read | ExtractError::Pdf(_) => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "FILE_READ_ERROR")
                    }
                };
                (status, code, e.to_string())
            }
            AppError::Superseded(e) => (
                StatusCode::CONFLICT,
                "SUPERSEDED",
                format!("A newer request replaced this one ({e})"),
            ),
            AppError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A session storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
            (
                AppError::Extract(ExtractError::UnsupportedType("image/png".into())),
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ),
            (AppError::Extract(ExtractError::Read), StatusCode::UNPROCESSABLE_ENTITY),
            (
                AppError::Superseded(Superseded { current: 3 }),
                StatusCode::CONFLICT,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_request_error_becomes_validation() {
        let err: AppError = RequestError::MissingJobRole("AI Mock Interview Questions").into();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("job role")));
    }
}
