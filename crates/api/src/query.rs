//! Shared query-parameter parsing helpers.
//!
//! These return plain message strings; JSON handlers wrap them with
//! `AppError::BadRequest`, HTML handlers render them into message
//! pages.

use chrono::{DateTime, Utc};
use keepsake_core::types::Timestamp;

/// Parse a boolean query parameter accepting `true/false`, `1/0` and
/// `yes/no`.
pub fn parse_bool_param(value: Option<&str>, default: bool, name: &str) -> Result<bool, String> {
    let Some(raw) = value else {
        return Ok(default);
    };

    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(format!(
            "Invalid '{name}' value. Use one of: true/false, 1/0, yes/no"
        )),
    }
}

/// Parse an RFC 3339 datetime that must carry an explicit offset,
/// normalized to UTC.
pub fn parse_offset_datetime(value: &str, name: &str) -> Result<Timestamp, String> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| format!("'{name}' must be an RFC 3339 datetime with timezone"))
}
