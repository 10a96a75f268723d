//! Identifier parsing at API boundaries.
//! Supplier and driver ids are register codes assigned by the factory; ledger rows use backend integers.

use crate::error::{CoreError, CoreResult};

/// Backend-assigned id of an advance, loan or payment row.
pub type RecordId = i64;

/// Parse a ledger record id (e.g. from a command-line argument).
pub fn parse_record_id(s: &str) -> CoreResult<RecordId> {
    s.trim()
        .parse::<RecordId>()
        .map_err(|e| CoreError::validation(format!("Invalid record id '{}': {}", s, e)))
}

/// Register codes are free-form but must not be blank or contain path separators.
pub fn parse_register_id(s: &str, name: &str) -> CoreResult<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(CoreError::validation(format!("{} is required", name)));
    }
    if trimmed.contains('/') {
        return Err(CoreError::validation(format!("Invalid {}: {}", name, s)));
    }
    Ok(trimmed.to_string())
}
