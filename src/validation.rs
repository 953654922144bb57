//! Input checks applied by the shell before anything reaches the store. Every
//! helper takes the field label so the resulting [`StoreError::Validation`]
//! can point at the offending input.

use chrono::NaiveDate;

use crate::error::{Result, StoreError};

/// Accepted calendar date layout.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date. Shorter forms such as `2024-5-1` are refused
/// even though chrono would accept them.
pub fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    let well_shaped = raw.len() == 10
        && raw.bytes().enumerate().all(|(idx, byte)| match idx {
            4 | 7 => byte == b'-',
            _ => byte.is_ascii_digit(),
        });
    if !well_shaped {
        return Err(invalid(field, "expected a date in YYYY-MM-DD form"));
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| invalid(field, format!("{raw} is not a calendar date")))
}

/// Trim a required text value, refusing blanks.
pub fn require_text(field: &'static str, raw: &str) -> Result<String> {
    let value = raw.trim();
    if value.is_empty() {
        Err(invalid(field, "is required"))
    } else {
        Ok(value.to_string())
    }
}

/// Trim an optional text value; blanks become `None`.
pub fn optional_text(raw: &str) -> Option<String> {
    let value = raw.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Parse a required integer (ids, scores).
pub fn parse_integer(field: &'static str, raw: &str) -> Result<i64> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(invalid(field, "is required"));
    }
    value
        .parse::<i64>()
        .map_err(|_| invalid(field, "must be a whole number"))
}

/// Parse an optional integer; blanks become `None`.
pub fn parse_optional_integer(field: &'static str, raw: &str) -> Result<Option<i64>> {
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        parse_integer(field, raw).map(Some)
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> StoreError {
    StoreError::Validation {
        field,
        reason: reason.into(),
    }
}
