//! Error types for the rental API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rental_core::BookingError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Car not found: {0}")]
    CarNotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        match &err {
            BookingError::UnknownCar(id) => ApiError::CarNotFound(id.clone()),
            BookingError::MissingUser => ApiError::InvalidRequest(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::CarNotFound(id) => (StatusCode::NOT_FOUND, format!("Car not found: {}", id)),
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
