//! Storage error helpers.

use ribbit_core::error::{ErrorCode, RibbitError};

pub(crate) fn read_error(
    message: impl Into<String>,
    source: impl std::error::Error + Send + Sync + 'static,
) -> RibbitError {
    RibbitError::Storage {
        message: message.into(),
        code: ErrorCode::StoReadFailed,
        source: Some(Box::new(source)),
    }
}

pub(crate) fn write_error(
    message: impl Into<String>,
    source: impl std::error::Error + Send + Sync + 'static,
) -> RibbitError {
    RibbitError::Storage {
        message: message.into(),
        code: ErrorCode::StoWriteFailed,
        source: Some(Box::new(source)),
    }
}
