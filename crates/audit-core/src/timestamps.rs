use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use tracing::warn;

use crate::error::{AuditError, Result};

/// Naive patterns tried after RFC 3339. All are interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a reporting timestamp from a region file into a UTC instant.
///
/// Accepts RFC 3339 (`Z` suffix or explicit offset) and the naive
/// `YYYY-MM-DDTHH:MM:SS` layout Edison feeds use, with or without
/// fractional seconds.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(AuditError::TimestampParse(raw.to_string()));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    warn!("could not parse timestamp string \"{}\"", raw);
    Err(AuditError::TimestampParse(raw.to_string()))
}
