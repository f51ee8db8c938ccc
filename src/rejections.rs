use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    Input(&'static str),
    Validation(String),
    Unauthorized,
    Forbidden,
    NotFound(&'static str),
    Internal(&'static str),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Input(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            AppError::Input(msg) | AppError::NotFound(msg) | AppError::Internal(msg) => msg,
            AppError::Validation(msg) => msg,
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message(), self.status())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.status();
        if code.is_server_error() {
            tracing::error!("request failed: {self}");
        } else {
            tracing::warn!("request rejected: {self}");
        }

        (code, Json(json!({ "error": self.message() }))).into_response()
    }
}

/// Maps lower-layer errors onto [`AppError`] at the handler boundary,
/// logging the underlying cause.
pub trait ResultExt<T> {
    fn reject(self, msg: &'static str) -> Result<T, AppError>;
    fn reject_input(self, msg: &'static str) -> Result<T, AppError>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn reject(self, msg: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            tracing::error!("{msg}: {e}");
            AppError::Internal(msg)
        })
    }

    fn reject_input(self, msg: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            tracing::warn!("{msg}: {e}");
            AppError::Input(msg)
        })
    }
}
