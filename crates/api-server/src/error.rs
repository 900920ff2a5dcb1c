//! HTTP mapping for the core error taxonomy.

use crate::models::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mailcast_core::error::MailcastError;

/// Wrapper that renders a `MailcastError` as a JSON error response with
/// the matching status code.
#[derive(Debug)]
pub struct ApiError(pub MailcastError);

impl From<MailcastError> for ApiError {
    fn from(err: MailcastError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            MailcastError::Validation(_) => (StatusCode::BAD_REQUEST, "validation"),
            MailcastError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            MailcastError::InvalidState { .. } => (StatusCode::CONFLICT, "invalid_state"),
            MailcastError::NoRecipients => (StatusCode::BAD_REQUEST, "no_recipients"),
            MailcastError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            MailcastError::TransportUnavailable(_) => (StatusCode::BAD_GATEWAY, "transport_unavailable"),
            MailcastError::Transport(_)
            | MailcastError::Tracking(_)
            | MailcastError::Config(_)
            | MailcastError::Serialization(_)
            | MailcastError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };

        let body = ErrorResponse {
            error: code.to_string(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
