//! # Temporal Types — UTC Timestamps for Audit History
//!
//! Defines `Timestamp`, the single time type of the custody core. All
//! manufacture, expiry, and history timestamps flow through it.
//!
//! ## Determinism Invariant
//!
//! History entries must re-encode byte-identically on replay, so every
//! timestamp is normalized at construction: converted to UTC and truncated
//! to seconds precision. Two replicas parsing the same RFC 3339 input, or
//! reading the same transaction timestamp, always hold the same value and
//! render the same `YYYY-MM-DDTHH:MM:SSZ` string.
//!
//! Inputs with explicit offsets (`+05:00`, `-04:00`) are accepted and
//! converted — date comparisons are calendar-time aware, not string-based.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CustodyError;

/// A UTC timestamp truncated to seconds precision.
///
/// # Construction
///
/// - [`Timestamp::parse()`] — from an RFC 3339 string, any offset, normalized to UTC.
/// - [`Timestamp::from_epoch_secs()`] — from a substrate-supplied epoch value.
/// - [`Timestamp::from_utc()`] — from a `DateTime<Utc>`, truncating sub-seconds.
/// - [`Timestamp::now()`] — current wall-clock UTC; test/substrate use only,
///   never inside a state-machine operation (those take the transaction's
///   logical timestamp).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current wall-clock UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// From a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse an RFC 3339 timestamp, converting any offset to UTC.
    ///
    /// # Errors
    ///
    /// Returns [`CustodyError::InvalidDate`] if the input is not valid
    /// RFC 3339.
    pub fn parse(s: &str) -> Result<Self, CustodyError> {
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| CustodyError::InvalidDate {
            value: s.to_string(),
            detail: e.to_string(),
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// From a Unix epoch timestamp in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`CustodyError::InvalidDate`] if the value is outside the
    /// representable range.
    pub fn from_epoch_secs(secs: i64) -> Result<Self, CustodyError> {
        let dt = DateTime::from_timestamp(secs, 0).ok_or_else(|| CustodyError::InvalidDate {
            value: secs.to_string(),
            detail: "out-of-range Unix timestamp".to_string(),
        })?;
        Ok(Self(dt))
    }

    /// The inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Unix epoch seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Render as ISO 8601 with Z suffix (e.g., `2026-01-10T10:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}
