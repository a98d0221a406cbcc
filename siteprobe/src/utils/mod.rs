//! UUID and timestamp helpers.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A UTC timestamp.
pub type Timestamp = DateTime<Utc>;

/// Generates a new UUID v4.
#[must_use]
pub fn generate_uuid() -> Uuid {
    Uuid::new_v4()
}

/// Returns the current UTC time as an ISO 8601 string with microseconds.
#[must_use]
pub fn iso_timestamp() -> String {
    format_timestamp(&Utc::now())
}

/// Formats a timestamp as ISO 8601 with microseconds and a `+00:00` offset.
#[must_use]
pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.6f+00:00").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_generate_uuid_is_valid() {
        let id = generate_uuid();
        assert_eq!(id.get_version_num(), 4);
        assert_ne!(id, generate_uuid());
    }

    #[test]
    fn test_iso_timestamp_format() {
        let ts = iso_timestamp();
        assert!(ts.contains('T'));
        assert!(ts.ends_with("+00:00"));
    }

    #[test]
    fn test_format_timestamp_microseconds() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 5).unwrap();
        assert_eq!(format_timestamp(&ts), "2024-03-01T12:30:05.000000+00:00");
    }
}
