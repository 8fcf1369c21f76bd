use crate::error::AppError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Where unauthenticated callers are sent.
pub const SIGN_IN_PATH: &str = "/login";

/// API-specific error wrapper that converts AppError into HTTP responses.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Database(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::Storage(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Storage error: {}", msg),
            ),
            AppError::Catalog(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Catalog error: {}", msg),
            ),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {self}");
        }

        let body = match self {
            AppError::Unauthenticated(_) => serde_json::json!({
                "error": message,
                "redirect": SIGN_IN_PATH,
            }),
            _ => serde_json::json!({
                "error": message
            }),
        };

        (status, axum::Json(body)).into_response()
    }
}
