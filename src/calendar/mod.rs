//! Explicit calendar used to turn record timestamps into calendar dates.
//!
//! Bucketing never consults the host timezone. Timestamps that carry an
//! offset are converted into the configured offset before the date is
//! taken; timestamps without one are read as wall-clock time already in that
//! calendar, so the time-of-day component can never move a record to a
//! different day.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{BucketKey, Granularity};

const MAX_OFFSET_MINUTES: i32 = 24 * 60 - 1;

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("UTC offset of {0} minutes is out of range")]
    InvalidOffset(i32),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("cannot read `{raw}` as a calendar date")]
pub struct DateParseError {
    pub raw: String,
}

/// Calendar every bucket key is computed in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "CalendarSettings", into = "CalendarSettings")]
pub struct CalendarConfig {
    offset: FixedOffset,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct CalendarSettings {
    utc_offset_minutes: i32,
}

impl CalendarConfig {
    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    pub fn with_offset_minutes(minutes: i32) -> Result<Self, CalendarError> {
        if minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(CalendarError::InvalidOffset(minutes));
        }
        FixedOffset::east_opt(minutes * 60)
            .map(|offset| Self { offset })
            .ok_or(CalendarError::InvalidOffset(minutes))
    }

    pub fn offset_minutes(&self) -> i32 {
        self.offset.local_minus_utc() / 60
    }

    /// Reads a record timestamp as a date in this calendar.
    pub fn local_date(&self, raw: &str) -> Result<NaiveDate, DateParseError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DateParseError { raw: raw.into() });
        }
        if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(stamp.with_timezone(&self.offset).date_naive());
        }
        for format in OFFSET_FORMATS {
            if let Ok(stamp) = DateTime::parse_from_str(trimmed, format) {
                return Ok(stamp.with_timezone(&self.offset).date_naive());
            }
        }
        for format in NAIVE_DATETIME_FORMATS {
            if let Ok(stamp) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(stamp.date());
            }
        }
        NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| DateParseError {
            raw: raw.into(),
        })
    }

    pub fn bucket_key(
        &self,
        raw: &str,
        granularity: Granularity,
    ) -> Result<BucketKey, DateParseError> {
        self.local_date(raw)
            .map(|date| BucketKey::for_date(date, granularity))
    }

    /// Current date in this calendar.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.offset).date_naive()
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self::utc()
    }
}

impl TryFrom<CalendarSettings> for CalendarConfig {
    type Error = CalendarError;

    fn try_from(value: CalendarSettings) -> Result<Self, Self::Error> {
        Self::with_offset_minutes(value.utc_offset_minutes)
    }
}

impl From<CalendarConfig> for CalendarSettings {
    fn from(value: CalendarConfig) -> Self {
        Self {
            utc_offset_minutes: value.offset_minutes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn time_of_day_never_changes_the_day() {
        let calendar = CalendarConfig::utc();
        for raw in [
            "2024-03-05",
            "2024-03-05T00:00:00",
            "2024-03-05 23:59:59.999",
            "2024-03-05T12:30",
        ] {
            assert_eq!(calendar.local_date(raw).unwrap(), date(2024, 3, 5), "{raw}");
        }
    }

    #[test]
    fn offset_timestamps_convert_into_configured_calendar() {
        let utc = CalendarConfig::utc();
        let tokyo = CalendarConfig::with_offset_minutes(9 * 60).unwrap();
        let raw = "2024-03-05T20:00:00Z";
        assert_eq!(utc.local_date(raw).unwrap(), date(2024, 3, 5));
        assert_eq!(tokyo.local_date(raw).unwrap(), date(2024, 3, 6));
        assert_eq!(
            utc.local_date("2024-03-05 23:30:00+00").unwrap(),
            date(2024, 3, 5)
        );
    }

    #[test]
    fn unreadable_values_are_errors() {
        let calendar = CalendarConfig::utc();
        for raw in ["", "yesterday", "2023-02-29", "2024-13-01", "05/03/2024"] {
            assert!(calendar.local_date(raw).is_err(), "{raw}");
        }
    }

    #[test]
    fn rejects_offsets_beyond_a_day() {
        assert_eq!(
            CalendarConfig::with_offset_minutes(24 * 60),
            Err(CalendarError::InvalidOffset(24 * 60))
        );
        assert_eq!(
            CalendarConfig::with_offset_minutes(-330).unwrap().offset_minutes(),
            -330
        );
    }
}
