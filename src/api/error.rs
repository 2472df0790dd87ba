// API errors with structured JSON bodies.
//
// Only the read path surfaces errors; `/moderate` always answers with a verdict.

use crate::core::audit::AuditError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Database not configured")]
    DatabaseNotConfigured,
    #[error("Failed to fetch logs: {0}")]
    LogReadFailed(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::DatabaseNotConfigured => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_NOT_CONFIGURED",
                "Database not configured".to_string(),
            ),
            ApiError::LogReadFailed(detail) => {
                tracing::warn!(detail, "Failed to fetch logs");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LOG_READ_FAILED",
                    "Failed to fetch logs".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<AuditError> for ApiError {
    fn from(err: AuditError) -> Self {
        match err {
            AuditError::NotConfigured => ApiError::DatabaseNotConfigured,
            AuditError::StorageError(e) => ApiError::LogReadFailed(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_not_configured_returns_500_with_code() {
        let response = ApiError::from(AuditError::NotConfigured).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "DATABASE_NOT_CONFIGURED");
    }

    #[tokio::test]
    async fn test_storage_failure_hides_details() {
        let response =
            ApiError::from(AuditError::StorageError("no such table: x".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["message"], "Failed to fetch logs");
    }
}
