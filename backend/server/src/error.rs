use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid container ID format: {0}")]
    InvalidIdentifier(String),

    #[error("Invalid search type")]
    InvalidSearchMode(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Request must be JSON")]
    MalformedPayload,

    #[error("Missing required fields")]
    MissingFields(Vec<&'static str>),

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    InternalError(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::InvalidIdentifier { .. }
            | AppError::InvalidSearchMode { .. }
            | AppError::MalformedPayload
            | AppError::MissingFields { .. }
            | AppError::InvalidDate { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Database { .. } | AppError::InternalError { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = match &self {
            AppError::MissingFields(missing) => {
                json!({ "error": self.to_string(), "missing": missing })
            }
            AppError::Database(_) | AppError::InternalError(_) => {
                error!("{self}");
                json!({ "error": "Internal server error" })
            }
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
