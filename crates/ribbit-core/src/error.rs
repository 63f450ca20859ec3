//! Error types for ribbit operations.
//!
//! This module provides the error hierarchy shared by every ribbit crate, with
//! structured error codes and suggestions for resolution.

use thiserror::Error;

/// Result type alias for ribbit operations.
pub type RibbitResult<T> = Result<T, RibbitError>;

/// Main error type for all ribbit operations.
#[derive(Error, Debug)]
pub enum RibbitError {
    /// Required configuration (e.g. transport credentials) is missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Delivery attempt failed (network, remote rejection).
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        code: ErrorCode,
        status: Option<u16>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Persistent state store operation failed.
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Digest content could not be composed.
    #[error("Composition error: {message}")]
    Composition { message: String, code: ErrorCode },

    /// Input validation failed.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        code: ErrorCode,
        suggestion: Option<String>,
    },

    /// Scheduler lifecycle error.
    #[error("Scheduler error: {0}")]
    Scheduler(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Configuration (CFG_xxx)
    CfgMissingCredentials,
    CfgInvalidFile,

    // Transport (TRN_xxx)
    TrnConnectionFailed,
    TrnRejected,
    TrnTimeout,

    // Storage (STO_xxx)
    StoReadFailed,
    StoWriteFailed,

    // Composition (CMP_xxx)
    CmpRenderFailed,

    // Validation (VAL_xxx)
    ValInvalidInput,

    // Scheduler (SCH_xxx)
    SchLifecycle,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::CfgMissingCredentials => "CFG_001",
            ErrorCode::CfgInvalidFile => "CFG_002",
            ErrorCode::TrnConnectionFailed => "TRN_001",
            ErrorCode::TrnRejected => "TRN_002",
            ErrorCode::TrnTimeout => "TRN_003",
            ErrorCode::StoReadFailed => "STO_001",
            ErrorCode::StoWriteFailed => "STO_002",
            ErrorCode::CmpRenderFailed => "CMP_001",
            ErrorCode::ValInvalidInput => "VAL_001",
            ErrorCode::SchLifecycle => "SCH_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl RibbitError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a transport error for a failed connection.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            code: ErrorCode::TrnConnectionFailed,
            status: None,
            source: None,
        }
    }

    /// Create a transport error for a request that timed out.
    pub fn transport_timeout(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            code: ErrorCode::TrnTimeout,
            status: None,
            source: None,
        }
    }

    /// Create a transport error for a remote rejection with an HTTP status.
    pub fn transport_rejected(status: u16, body: impl Into<String>) -> Self {
        Self::Transport {
            message: format!("HTTP {}: {}", status, body.into()),
            code: ErrorCode::TrnRejected,
            status: Some(status),
            source: None,
        }
    }

    /// Create a storage read error.
    pub fn storage_read(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            code: ErrorCode::StoReadFailed,
            source: None,
        }
    }

    /// Create a storage write error.
    pub fn storage_write(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            code: ErrorCode::StoWriteFailed,
            source: None,
        }
    }

    /// Create a composition error.
    pub fn composition(message: impl Into<String>) -> Self {
        Self::Composition {
            message: message.into(),
            code: ErrorCode::CmpRenderFailed,
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            suggestion: None,
        }
    }

    /// Create a validation error with suggestion.
    pub fn validation_with_suggestion(
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            suggestion: Some(suggestion.into()),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Configuration(_) => ErrorCode::CfgMissingCredentials,
            Self::Transport { code, .. } => *code,
            Self::Storage { code, .. } => *code,
            Self::Composition { code, .. } => *code,
            Self::Validation { code, .. } => *code,
            Self::Scheduler(_) => ErrorCode::SchLifecycle,
            _ => ErrorCode::Internal,
        }
    }

    /// Whether a later evaluation may succeed where this one failed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Storage { .. })
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Configuration(_) => {
                Some("Set the EmailJS service id, template id and public key")
            }
            Self::Transport { .. } => Some("The digest stays pending and is retried on the next check"),
            Self::Storage { .. } => Some("Please check the state store path and permissions"),
            Self::Validation { suggestion, .. } => suggestion.as_deref(),
            _ => None,
        }
    }
}
