use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::schema::Issue;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("validation failed with {} issue(s)", .0.len())]
    Validation(Vec<Issue>),
    #[error("Movie not found")]
    NotFound,
    #[error("Not allowed by CORS")]
    CorsRejected,
    #[error("{0}")]
    BadRequest(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(issues) => (StatusCode::BAD_REQUEST, json!({ "message": issues })),
            AppError::NotFound => (StatusCode::NOT_FOUND, json!({ "message": "Movie not found" })),
            AppError::CorsRejected => (StatusCode::FORBIDDEN, json!({ "message": "Not allowed by CORS" })),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "message": msg })),
        };
        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
