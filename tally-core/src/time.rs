//! Date utilities: strict ISO calendar dates, timezone-aware "today", and the
//! date shapes a provider may hand back.

use anyhow::Result;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("static pattern"));

/// Parse a `YYYY-MM-DD` string into a real calendar date.
///
/// Rejects other layouts and impossible dates such as `2024-02-30`.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if !ISO_DATE.is_match(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Parse an IANA timezone name like "America/Chicago".
pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
}

/// Today's calendar date in `tz`.
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Year that monthly buckets default to when none is given.
pub fn current_year(tz: Tz) -> i32 {
    today_in(tz).year()
}

/// Calendar date of a UTC instant as seen in `tz`.
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Provider-native timestamp: whole seconds plus nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderTimestamp {
    pub seconds: i64,
    #[serde(default)]
    pub nanoseconds: u32,
}

impl ProviderTimestamp {
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self {
            seconds: dt.timestamp(),
            nanoseconds: dt.timestamp_subsec_nanos(),
        }
    }

    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.seconds, self.nanoseconds)
    }
}

/// A date as it may arrive from the provider: either a calendar date string
/// or a provider timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateInput {
    Calendar(String),
    Timestamp(ProviderTimestamp),
}

impl DateInput {
    /// Resolve to a canonical calendar date. Timestamps are read in `tz`.
    pub fn resolve(&self, tz: Tz) -> Option<NaiveDate> {
        match self {
            DateInput::Calendar(s) => parse_iso_date(s).or_else(|| {
                // Provider strings sometimes carry a time component.
                DateTime::parse_from_rfc3339(s.trim())
                    .ok()
                    .map(|dt| local_date(dt.with_timezone(&Utc), tz))
            }),
            DateInput::Timestamp(ts) => ts.to_datetime().map(|dt| local_date(dt, tz)),
        }
    }
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        DateInput::Calendar(date.format("%Y-%m-%d").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_iso_date("2024-01-01"), NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(parse_iso_date(" 2024-12-31 "), NaiveDate::from_ymd_opt(2024, 12, 31));
        assert_eq!(parse_iso_date("2024-02-30"), None);
        assert_eq!(parse_iso_date("2024-1-1"), None);
        assert_eq!(parse_iso_date("01/02/2024"), None);
        assert_eq!(parse_iso_date(""), None);
    }

    #[test]
    fn test_timestamp_resolves_in_timezone() {
        // 2026-02-21 03:00 UTC is still the 20th in Chicago (CST, UTC-6)
        let instant = Utc.with_ymd_and_hms(2026, 2, 21, 3, 0, 0).unwrap();
        let input = DateInput::Timestamp(ProviderTimestamp::from_datetime(instant));
        let tz = parse_timezone("America/Chicago").unwrap();
        assert_eq!(input.resolve(tz), NaiveDate::from_ymd_opt(2026, 2, 20));
        assert_eq!(input.resolve(chrono_tz::UTC), NaiveDate::from_ymd_opt(2026, 2, 21));
    }

    #[test]
    fn test_date_input_deserializes_both_shapes() {
        let cal: DateInput = serde_json::from_str(r#""2024-05-06""#).unwrap();
        assert_eq!(cal.resolve(chrono_tz::UTC), NaiveDate::from_ymd_opt(2024, 5, 6));

        let ts: DateInput = serde_json::from_str(r#"{"seconds":1704067200,"nanoseconds":0}"#).unwrap();
        assert_eq!(ts.resolve(chrono_tz::UTC), NaiveDate::from_ymd_opt(2024, 1, 1));

        let rfc: DateInput = serde_json::from_str(r#""2024-05-06T10:00:00Z""#).unwrap();
        assert_eq!(rfc.resolve(chrono_tz::UTC), NaiveDate::from_ymd_opt(2024, 5, 6));

        let junk: DateInput = serde_json::from_str(r#""yesterday""#).unwrap();
        assert_eq!(junk.resolve(chrono_tz::UTC), None);
    }

    #[test]
    fn test_current_year_follows_timezone() {
        let tz = parse_timezone("Pacific/Kiritimati").unwrap();
        assert_eq!(current_year(tz), today_in(tz).year());
        assert_eq!(current_year(chrono_tz::UTC), Utc::now().year());
    }

    #[test]
    fn test_invalid_timezone() {
        assert!(parse_timezone("Mars/Olympus").is_err());
    }
}
