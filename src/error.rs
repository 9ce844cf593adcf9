use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Dataset unavailable: {0}")]
    DatasetUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Index {index} out of range for catalog of {len} movies")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Metadata fetch failed: {0}")]
    FetchFailed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::DatasetUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::FetchFailed(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::IndexOutOfRange { .. } | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
