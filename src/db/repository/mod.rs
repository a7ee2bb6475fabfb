//! Entity-scoped database operations.
//!
//! Every query that touches clinic data filters by `tenant_id`.

mod appointment;
mod monthly_payment;
mod patient;
mod tenant;

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use super::DatabaseError;

pub use appointment::*;
pub use monthly_payment::*;
pub use patient::*;
pub use tenant::*;

/// Timestamps are stored as RFC 3339 UTC with a fixed nine-digit fraction,
/// so nothing is lost and text comparison orders them chronologically.
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| DatabaseError::InvalidValue {
            field: field.into(),
            value: raw.into(),
        })
}

/// Constraint failures (duplicate key, unknown tenant) become
/// `ConstraintViolation` naming the entity; anything else stays a SQLite error.
pub(crate) fn constraint_error(entity: &str, err: rusqlite::Error) -> DatabaseError {
    match err.sqlite_error_code() {
        Some(rusqlite::ErrorCode::ConstraintViolation) => {
            DatabaseError::ConstraintViolation(format!("{entity}: {err}"))
        }
        _ => DatabaseError::Sqlite(err),
    }
}

pub(crate) fn parse_uuid(field: &str, raw: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(raw).map_err(|_| DatabaseError::InvalidValue {
        field: field.into(),
        value: raw.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_format_is_lexically_ordered() {
        let early = Utc.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2025, 6, 10, 10, 0, 0).unwrap();
        assert_eq!(format_timestamp(&early), "2025-06-10T09:00:00.000000000Z");
        assert!(format_timestamp(&early) < format_timestamp(&late));
    }

    #[test]
    fn sub_second_precision_is_kept_and_ordered() {
        let base = Utc.with_ymd_and_hms(2025, 6, 10, 10, 0, 0).unwrap();
        let quarter = base + chrono::Duration::milliseconds(250);
        let later = base + chrono::Duration::seconds(1);
        assert_eq!(parse_timestamp("start_time", &format_timestamp(&quarter)).unwrap(), quarter);
        assert_eq!(format_timestamp(&quarter).len(), format_timestamp(&later).len());
        assert!(format_timestamp(&base) < format_timestamp(&quarter));
        assert!(format_timestamp(&quarter) < format_timestamp(&later));
    }

    #[test]
    fn timestamp_round_trips() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 31, 23, 59, 59).unwrap();
        assert_eq!(parse_timestamp("start_time", &format_timestamp(&ts)).unwrap(), ts);
    }

    #[test]
    fn malformed_values_are_reported_with_field() {
        let err = parse_timestamp("start_time", "yesterday").unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidValue { ref field, .. } if field == "start_time"));
        assert!(parse_uuid("id", "not-a-uuid").is_err());
    }
}
