//! Identity and creation-time assignment for new entities.

use chrono::{DateTime, ParseError, SecondsFormat, SubsecRound, Utc};
use uuid::Uuid;

/// Source of identifiers and creation timestamps.
///
/// Uniqueness is assumed, never checked against the store.
pub trait IdentitySource: Send + Sync {
    fn new_id(&self) -> Uuid;

    fn now(&self) -> DateTime<Utc>;
}

/// Random, time-ordered UUIDv7 identifiers and the system clock.
///
/// Ids generated by one process sort in creation order, so children read
/// back from a partition come out in the order they were added.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemIdentity;

impl IdentitySource for SystemIdentity {
    fn new_id(&self) -> Uuid {
        Uuid::now_v7()
    }

    fn now(&self) -> DateTime<Utc> {
        // Stored timestamps carry microseconds; truncate so a stamped entity
        // equals its decoded copy.
        Utc::now().trunc_subsecs(6)
    }
}

/// Format a timestamp as fixed-width RFC 3339 UTC, e.g.
/// `2024-01-15T10:30:00.000000Z`. Fixed width keeps the text sortable.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse an RFC 3339 timestamp into UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}
