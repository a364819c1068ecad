//! API error types with IntoResponse
//!
//! Every failure leaves the server as `{"error": <category>, "details": <message>}`.
//! Server-side failures keep the raw message in `details`, which is what
//! the dashboard shows in its error toasts.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use teamdesk_core::ValidationError;

use crate::chat::ChatError;
use crate::db::DbError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Bad input (400)
    Validation(ValidationError),

    /// Unknown id (404)
    NotFound { resource: &'static str, id: String },

    /// Unique value already taken (409)
    Conflict { resource: &'static str, detail: String },

    /// Mock login rejected (401)
    Unauthorized { reason: String },

    /// Request outlived the configured timeout (408)
    Timeout,

    /// Database failure (500, logged)
    Database(DbError),

    /// Model call failed (500, logged)
    Chat(ChatError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Timeout => StatusCode::REQUEST_TIMEOUT,
            Self::Database(_) | Self::Chat(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::NotFound { resource, id } => format!("{} '{}' not found", resource, id),
            Self::Conflict { resource, detail } => {
                format!("{} already exists: {}", resource, detail)
            }
            Self::Unauthorized { reason } => reason.clone(),
            Self::Timeout => "request timed out".to_string(),
            Self::Database(e) => e.to_string(),
            Self::Chat(e) => e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let details = self.details();

        match &self {
            Self::Database(_) => tracing::error!(error = %details, "Database error"),
            Self::Chat(_) => tracing::error!(error = %details, "Chat model error"),
            Self::Timeout => tracing::warn!("Request timed out"),
            _ => tracing::debug!(status = status.as_u16(), %details, "Request rejected"),
        }

        let category = status.canonical_reason().unwrap_or("Error");
        (status, Json(json!({ "error": category, "details": details }))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::Conflict { resource, detail } => Self::Conflict { resource, detail },
            _ => Self::Database(e),
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(e: ChatError) -> Self {
        Self::Chat(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(ValidationError::Malformed {
            reason: rejection.body_text(),
        })
    }
}
