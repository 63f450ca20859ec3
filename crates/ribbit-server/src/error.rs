//! Error handling for the REST API server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

use ribbit_core::error::RibbitError;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    // Common error constructors
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, "TRANSPORT_ERROR", message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.status, self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.message,
                details: self.details,
            },
        };

        (self.status, Json(body)).into_response()
    }
}

// Convert from ribbit-core errors
impl From<RibbitError> for ApiError {
    fn from(err: RibbitError) -> Self {
        let details = serde_json::json!({
            "code": err.code().as_str(),
            "retryable": err.is_retryable(),
            "suggestion": err.suggestion(),
        });

        let api = match &err {
            RibbitError::Configuration(msg) => ApiError::bad_request(msg.clone()),
            RibbitError::Transport { message, .. } => ApiError::bad_gateway(message.clone()),
            RibbitError::Validation { message, .. } => ApiError::validation(message.clone()),
            RibbitError::Storage { message, .. } => {
                ApiError::internal(format!("Storage error: {}", message))
            }
            RibbitError::Composition { message, .. } => {
                ApiError::internal(format!("Composition error: {}", message))
            }
            RibbitError::Scheduler(msg) => ApiError::internal(format!("Scheduler error: {}", msg)),
            RibbitError::Serialization(e) => {
                ApiError::internal(format!("Serialization error: {}", e))
            }
            RibbitError::Io(e) => ApiError::internal(format!("IO error: {}", e)),
            RibbitError::Internal(msg) => ApiError::internal(msg.clone()),
        };

        api.with_details(details)
    }
}

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
