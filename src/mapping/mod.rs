//! Translation between table rows and the in-memory model.
//!
//! One module per table. Each has a row type for reads, a row type for
//! inserts, and where updates exist a changes type that only serializes the
//! columns being touched.

pub mod appointments;
pub mod contacts;
pub mod profiles;
pub mod symptoms;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use matri_postgrest::PostgrestError;
use thiserror::Error;

/// A row came back in a shape the model cannot represent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed {table} row {id}: {message}")]
pub struct RowError {
    pub table: &'static str,
    pub id: String,
    pub message: String,
}

impl RowError {
    pub(crate) fn new<M: Into<String>>(table: &'static str, id: &str, message: M) -> Self {
        Self {
            table,
            id: id.to_string(),
            message: message.into(),
        }
    }
}

impl From<RowError> for PostgrestError {
    fn from(err: RowError) -> Self {
        PostgrestError::DeserializationError(err.to_string())
    }
}

/// Timestamps as PostgREST renders them. Values without an offset are UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339()
}

pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

pub fn format_day(value: NaiveDate) -> String {
    value.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_with_and_without_offset() {
        let expected = Utc.with_ymd_and_hms(2026, 6, 10, 12, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2026-06-10T12:30:00+00:00"), Some(expected));
        assert_eq!(parse_timestamp("2026-06-10T14:30:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2026-06-10T12:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2026-06-10 12:30:00.000"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn formatted_timestamps_parse_back() {
        let value = Utc.with_ymd_and_hms(2026, 1, 31, 23, 59, 59).unwrap();
        assert_eq!(parse_timestamp(&format_timestamp(value)), Some(value));
    }
}
