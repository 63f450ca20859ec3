//! Store key validation.

use ribbit_core::error::{RibbitError, RibbitResult};

/// Keys are restricted to ASCII letters, digits, `_` and `-` so they are
/// safe as file names.
pub(crate) fn validate_key(key: &str) -> RibbitResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if valid {
        Ok(())
    } else {
        Err(RibbitError::validation_with_suggestion(
            format!("Invalid store key: {:?}", key),
            "Use letters, digits, '_' or '-'",
        ))
    }
}
