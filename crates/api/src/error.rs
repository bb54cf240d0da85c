use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use biogrid_core::error::CoreError;
use biogrid_core::gateway::GatewayError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and [`GatewayError`] for domain errors and adds
/// HTTP-specific variants. Implements [`IntoResponse`] to produce consistent
/// JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `biogrid_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A layout store failure surfaced through the gateway.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Gateway errors ---
            AppError::Gateway(err) => match err {
                GatewayError::Unavailable(msg) => {
                    tracing::error!(error = %msg, "Layout store unavailable");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "STORE_UNAVAILABLE",
                        "The layout store is unavailable".to_string(),
                    )
                }
                GatewayError::Rejected(msg) => {
                    tracing::warn!(error = %msg, "Layout write rejected");
                    (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        "The layout store rejected the write".to_string(),
                    )
                }
                GatewayError::Corrupt(msg) => {
                    tracing::error!(error = %msg, "Stored layout is corrupt");
                    internal()
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}
