// Boundary error types
//
// Provider failures never reach this module: the fallback orchestrator
// absorbs them. Only validation and unexpected internal failures become
// HTTP errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::fallback::ResponseEnvelope;

/// Validation failure for a user-supplied topic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopicError {
    #[error("No topic provided")]
    Empty,
}

/// Errors returned by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, empty, or unparseable topic. No model work is attempted.
    #[error(transparent)]
    InvalidTopic(#[from] TopicError),

    #[error("Request body too large")]
    PayloadTooLarge,

    /// Orchestration blew up. The body still carries displayable copy.
    #[error("Internal server error: {message}")]
    Internal {
        message: String,
        fallback: Box<ResponseEnvelope>,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidTopic(e) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response(),
            ApiError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(serde_json::json!({ "error": "Request body too large" })),
            )
                .into_response(),
            ApiError::Internal { message, fallback } => {
                let mut body = *fallback;
                body.error = Some(message);
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}
