// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! HTTP error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::PhotosiftError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Malformed request, rejected before anything moves (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Organizer failure
    #[error(transparent)]
    Organizer(#[from] PhotosiftError),
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            ApiError::Organizer(PhotosiftError::InvalidCategory(category)) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                format!("invalid category {:?}", category),
            ),
            ApiError::Organizer(ref err @ PhotosiftError::NotPending(_)) => {
                (StatusCode::BAD_REQUEST, "NOT_PENDING", err.to_string())
            }
            ApiError::Organizer(ref err @ PhotosiftError::FileSystem(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR", err.to_string())
            }
            ApiError::Organizer(ref err) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", err.to_string())
            }
        };

        if status.is_server_error() {
            error!("{}: {}", error_code, message);
        }

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
