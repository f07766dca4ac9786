//! RFC3339 instant handling and temporal-value scoping.
//!
//! Mirrors the ingest rule from the graph repository contract: date-only
//! strings (`YYYY-MM-DD`) are accepted and normalized to midnight UTC;
//! an empty string denotes absence ("open" for `EndTime`, "live" for
//! `Terminated`).

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EntityError;
use crate::payload::Payload;

/// Parses an RFC3339 instant or a bare `YYYY-MM-DD` date, normalizing the
/// latter to midnight UTC. An empty string parses to `None`.
pub fn parse_instant(field: &str, raw: &str) -> Result<Option<DateTime<Utc>>, EntityError> {
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0).expect("midnight is always valid");
        return Ok(Some(Utc.from_utc_datetime(&midnight)));
    }
    Err(EntityError::invalid(
        field,
        format!("'{raw}' is not an RFC3339 instant or a YYYY-MM-DD date"),
    ))
}

/// Serializes an instant back to RFC3339, or the empty string for `None`.
pub fn format_instant(instant: Option<DateTime<Utc>>) -> String {
    instant.map(|dt| dt.to_rfc3339()).unwrap_or_default()
}

/// Returns true if `start <= at` and (`end` is empty or `at <= end`).
///
/// This is the "active-at" predicate used for relationship temporal
/// filtering and for attribute version selection.
pub fn covers(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>, at: DateTime<Utc>) -> bool {
    let start_ok = start.map(|s| s <= at).unwrap_or(true);
    let end_ok = end.map(|e| at <= e).unwrap_or(true);
    start_ok && end_ok
}

/// Returns true if `start <= end` whenever both are present (Invariant 4).
pub fn valid_range(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> bool {
    match (start, end) {
        (Some(s), Some(e)) => s <= e,
        _ => true,
    }
}

/// A temporally-scoped opaque value: `(StartTime, EndTime, Payload)`.
///
/// Empty `end_time` means the value is still open/current.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemporalValue {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub payload: Payload,
}

impl TemporalValue {
    pub fn new(
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
        payload: Payload,
    ) -> Result<Self, EntityError> {
        if !valid_range(start_time, end_time) {
            return Err(EntityError::invalid(
                "EndTime",
                "must not precede StartTime",
            ));
        }
        Ok(Self {
            start_time,
            end_time,
            payload,
        })
    }

    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        covers(self.start_time, self.end_time, at)
    }
}
