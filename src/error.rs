use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Publish blocked by {} violation(s)", .0.len())]
    PublishBlocked(Vec<String>),

    #[error("Internal server error")]
    InternalServerError,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, violations) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not Found".to_string(), Vec::new()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, Vec::new()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg, Vec::new()),
            AppError::UploadFailed(msg) => (StatusCode::BAD_GATEWAY, msg, Vec::new()),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg, Vec::new()),
            AppError::PublishBlocked(violations) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Fix these before publishing".to_string(),
                violations,
            ),
            AppError::Database(e) => {
                error!("database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                    Vec::new(),
                )
            }
            AppError::Serialize(e) => {
                error!("serialization error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Serialization error occurred".to_string(),
                    Vec::new(),
                )
            }
            AppError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                Vec::new(),
            ),
        };

        let body = Json(ErrorResponse {
            error: status.to_string(),
            message: error_message,
            violations,
        });

        (status, body).into_response()
    }
}
