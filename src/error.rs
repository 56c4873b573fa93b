use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::SqlErr;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            Self::Database(e) => match e.sql_err() {
                // Duplicate names, or a second active batch/settings row
                Some(SqlErr::UniqueConstraintViolation(detail)) => {
                    tracing::warn!(%detail, "Unique constraint violation");
                    (
                        StatusCode::CONFLICT,
                        "Resource conflicts with an existing record".to_string(),
                    )
                }
                Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                    tracing::warn!(%detail, "Foreign key violation");
                    (
                        StatusCode::BAD_REQUEST,
                        "Referenced record does not exist".to_string(),
                    )
                }
                _ => {
                    tracing::error!("Database error: {e:?}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Database error".to_string(),
                    )
                }
            },
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
