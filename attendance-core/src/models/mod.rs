mod check_in;
mod session;
mod student;

pub use check_in::CheckInRecord;
pub use session::{Section, Session, SessionStatus};
pub use student::{SectionGroup, Student};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Parse a wire timestamp that may or may not carry a timezone.
///
/// The backend serializes `LocalDateTime` values without an offset
/// (`2025-09-28T10:15:30`), while other deployments emit RFC 3339. Naive
/// timestamps are taken as UTC.
pub(crate) fn parse_wire_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Deserialize a timestamp from either RFC 3339 or a naive ISO string.
pub(crate) fn deserialize_datetime_lenient<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_wire_datetime(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognized timestamp '{}'", raw)))
}
