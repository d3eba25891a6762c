use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Request-level failures. Validation and model errors never reach this
/// type; they are rendered into the page instead.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, msg) = match self {
            AppError::Internal(s) => (StatusCode::INTERNAL_SERVER_ERROR, s),
        };
        (code, msg).into_response()
    }
}

impl From<minijinja::Error> for AppError {
    fn from(err: minijinja::Error) -> Self {
        tracing::error!("Template rendering failed: {err:#}");
        AppError::Internal("Failed to render page".to_string())
    }
}
