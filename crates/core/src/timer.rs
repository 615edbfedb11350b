//! Elapsed-time calendar math for the timer service.

use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use serde::Serialize;

use crate::types::Timestamp;

/// Elapsed wall-clock breakdown since the timer start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Elapsed {
    pub years: i32,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

/// Shift a timestamp forward by whole calendar years.
///
/// A Feb 29 anniversary clamps to Feb 28 in non-leap years.
pub fn add_years(value: Timestamp, years: i32) -> Timestamp {
    let target = value.year() + years;
    match value.with_year(target) {
        Some(shifted) => shifted,
        None => value
            .with_day(28)
            .and_then(|clamped| clamped.with_year(target))
            .unwrap_or(value),
    }
}

/// Split the time since `start` into whole anniversary years plus a
/// day/hour/minute/second remainder, alongside the raw total seconds.
pub fn elapsed_since(start: Timestamp, now: Timestamp) -> (Elapsed, i64) {
    let mut years = 0;
    while add_years(start, years + 1) <= now {
        years += 1;
    }

    let anchor = add_years(start, years);
    let remainder = now - anchor;
    let days = remainder.num_days();
    let seconds_in_day = remainder.num_seconds() - days * 86_400;

    let elapsed = Elapsed {
        years,
        days,
        hours: seconds_in_day / 3_600,
        minutes: (seconds_in_day % 3_600) / 60,
        seconds: seconds_in_day % 60,
    };

    let total_seconds = (now - start).num_seconds();
    (elapsed, total_seconds)
}

/// Format a timestamp as ISO-8601 UTC with milliseconds and a literal
/// `Z` suffix, e.g. `2025-03-06T18:00:00.000Z`.
pub fn to_iso_millis(value: Timestamp) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse the fixed timer start instant.
pub fn parse_start(raw: &str) -> Option<Timestamp> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn add_years_plain() {
        assert_eq!(
            add_years(utc(2025, 3, 6, 18, 0, 0), 2),
            utc(2027, 3, 6, 18, 0, 0)
        );
    }

    #[test]
    fn add_years_clamps_leap_day() {
        assert_eq!(
            add_years(utc(2024, 2, 29, 12, 0, 0), 1),
            utc(2025, 2, 28, 12, 0, 0)
        );
    }

    #[test]
    fn elapsed_before_first_anniversary() {
        let start = utc(2025, 3, 6, 18, 0, 0);
        let now = utc(2025, 3, 8, 19, 30, 45);
        let (elapsed, total) = elapsed_since(start, now);

        assert_eq!(
            elapsed,
            Elapsed {
                years: 0,
                days: 2,
                hours: 1,
                minutes: 30,
                seconds: 45,
            }
        );
        assert_eq!(total, 2 * 86_400 + 3_600 + 30 * 60 + 45);
    }

    #[test]
    fn elapsed_counts_whole_years() {
        let start = utc(2025, 3, 6, 18, 0, 0);
        let now = utc(2027, 3, 7, 18, 0, 0);
        let (elapsed, _) = elapsed_since(start, now);

        assert_eq!(elapsed.years, 2);
        assert_eq!(elapsed.days, 1);
        assert_eq!(elapsed.hours, 0);
    }

    #[test]
    fn elapsed_on_exact_anniversary() {
        let start = utc(2025, 3, 6, 18, 0, 0);
        let now = utc(2026, 3, 6, 18, 0, 0);
        let (elapsed, _) = elapsed_since(start, now);

        assert_eq!(elapsed.years, 1);
        assert_eq!(elapsed.days, 0);
        assert_eq!(elapsed.seconds, 0);
    }

    #[test]
    fn iso_millis_format() {
        assert_eq!(
            to_iso_millis(utc(2025, 3, 6, 18, 0, 0)),
            "2025-03-06T18:00:00.000Z"
        );
    }

    #[test]
    fn parse_start_requires_offset() {
        assert!(parse_start("2025-03-06T18:00:00Z").is_some());
        assert!(parse_start("2025-03-06T18:00:00").is_none());
    }
}
