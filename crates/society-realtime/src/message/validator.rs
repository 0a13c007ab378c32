//! Inbound frame validation rules.

use society_core::error::AppError;

/// Maximum allowed frame size in bytes.
pub const MAX_MESSAGE_SIZE: usize = 65_536;

/// Reject oversized or blank frames before parsing.
pub fn validate_inbound(raw: &str) -> Result<(), AppError> {
    if raw.len() > MAX_MESSAGE_SIZE {
        return Err(AppError::validation(format!(
            "Message exceeds maximum size of {MAX_MESSAGE_SIZE} bytes"
        )));
    }

    if raw.trim().is_empty() {
        return Err(AppError::validation("Empty message"));
    }

    Ok(())
}
