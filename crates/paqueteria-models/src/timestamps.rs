//! Timestamps as written to the store.
//!
//! Two encodings are in use: store timestamps ([`Timestamp`]) for record
//! bookkeeping (`createdAt`, `updatedAt`) and ISO 8601 text for the dates
//! of an order's life cycle, which the app reads as strings.

use chrono::{DateTime, SecondsFormat, Utc};

/// A timestamp field value.
///
/// `ServerAssigned` asks the store to stamp the write with its own clock
/// (Firestore's `REQUEST_TIME` transform). `At` is a literal instant, e.g. a
/// `createdAt` carried over from an earlier write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Timestamp {
    ServerAssigned,
    At(DateTime<Utc>),
}

impl Timestamp {
    pub fn is_server_assigned(&self) -> bool {
        matches!(self, Timestamp::ServerAssigned)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(at: DateTime<Utc>) -> Self {
        Timestamp::At(at)
    }
}

/// Text form of an order date: RFC 3339 with microseconds, in UTC.
pub fn format_order_date(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parses an order date written by [`format_order_date`].
pub fn parse_order_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|at| at.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_order_date_text() {
        let at = Utc.with_ymd_and_hms(2025, 6, 15, 10, 0, 0).unwrap();
        assert_eq!(format_order_date(at), "2025-06-15T10:00:00.000000Z");
        assert_eq!(parse_order_date(&format_order_date(at)), Some(at));
        assert_eq!(parse_order_date("yesterday"), None);
    }
}
