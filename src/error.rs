//! Error types for Athena
//!
//! Every failure a client can observe is rendered as `{ "error": ..., "details"?: ... }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// Message shown when the completion provider fails without a usable explanation
pub const GENERIC_UPSTREAM_MESSAGE: &str = "Athena encountered an unknown error in the Grid.";

/// Message shown when a client has used up its daily quota
pub const QUOTA_EXCEEDED_MESSAGE: &str =
    "Daily message limit reached. Athena will be available again tomorrow.";

/// Rejections produced while validating the inbound message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No message provided.")]
    Missing,

    #[error("Message must be a string.")]
    NotAString,

    #[error("Message must not be empty.")]
    Empty,

    #[error("Request body must be a JSON object.")]
    MalformedBody,
}

/// Failure of a single completion call
#[derive(Debug, Clone, Error)]
pub enum UpstreamError {
    /// The provider answered with a structured error body
    #[error("Provider error {status}: {message}")]
    Classified {
        status: StatusCode,
        message: String,
        error_type: Option<String>,
        code: Option<String>,
    },

    /// Transport failure, timeout, or a response we could not interpret
    #[error("Unclassified upstream failure: {reason}")]
    Unclassified { reason: String },
}

impl UpstreamError {
    /// Status surfaced to the client
    pub fn status(&self) -> StatusCode {
        match self {
            UpstreamError::Classified { status, .. } => *status,
            UpstreamError::Unclassified { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable user-facing message
    pub fn user_message(&self) -> String {
        match self {
            UpstreamError::Classified { message, .. } if !message.trim().is_empty() => {
                message.clone()
            }
            _ => GENERIC_UPSTREAM_MESSAGE.to_string(),
        }
    }

    /// Label used for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Classified { .. } => "classified",
            UpstreamError::Unclassified { .. } => "unclassified",
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            UpstreamError::Classified {
                status,
                message,
                error_type,
                code,
            } => Some(json!({
                "status": status.as_u16(),
                "message": message,
                "type": error_type,
                "code": code,
            })),
            UpstreamError::Unclassified { .. } => None,
        }
    }
}

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Only POST requests allowed.")]
    MethodNotAllowed,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Quota exceeded: {used}/{limit}")]
    QuotaExceeded { limit: u32, used: u32 },

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::QuotaExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Upstream(e) => e.status(),
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::MethodNotAllowed | AppError::Validation(_) => ErrorResponse {
                error: self.to_string(),
                details: None,
            },
            AppError::QuotaExceeded { .. } => ErrorResponse {
                error: QUOTA_EXCEEDED_MESSAGE.to_string(),
                details: None,
            },
            AppError::Upstream(e) => ErrorResponse {
                error: e.user_message(),
                details: e.details(),
            },
            AppError::Internal(_) => ErrorResponse {
                error: GENERIC_UPSTREAM_MESSAGE.to_string(),
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
