// SPDX-License-Identifier: MIT

//! Date-window computation for agenda queries.

use anyhow::anyhow;
use chrono::{DateTime, Duration, LocalResult, Months, NaiveTime, TimeZone};
use chrono_tz::Tz;

use crate::error::AppError;

/// Bounds of an agenda query, milliseconds since epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start_ms: i64,
    pub end_ms: i64,
}

/// Compute the rolling one-month window anchored at `now`.
///
/// Start is today at 00:00:00 in `now`'s timezone, end is start plus one
/// calendar month (day-of-month clamped at month end, so Jan 31 maps to
/// Feb 28/29).
pub fn month_window(now: DateTime<Tz>) -> Result<DateWindow, AppError> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);

    let start = match now.timezone().from_local_datetime(&midnight) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
        // Midnight can be skipped entirely by a DST jump; take the first
        // valid instant after it.
        LocalResult::None => now
            .timezone()
            .from_local_datetime(&(midnight + Duration::hours(1)))
            .earliest()
            .ok_or_else(|| anyhow!("no valid local time near {midnight}"))?,
    };

    let end = start
        .checked_add_months(Months::new(1))
        .ok_or_else(|| anyhow!("date window end out of range"))?;

    Ok(DateWindow {
        start_ms: start.timestamp_millis(),
        end_ms: end.timestamp_millis(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY_MS: i64 = 24 * 60 * 60 * 1000;

    #[test]
    fn test_window_is_ordered_and_about_one_month() {
        let tz = chrono_tz::Europe::Paris;
        let now = tz.with_ymd_and_hms(2024, 3, 12, 15, 30, 45).unwrap();

        let window = month_window(now).unwrap();

        assert!(window.start_ms < window.end_ms);
        let span = window.end_ms - window.start_ms;
        assert!(span >= 28 * DAY_MS, "span {span} shorter than 28 days");
        assert!(span <= 31 * DAY_MS, "span {span} longer than 31 days");
    }

    #[test]
    fn test_window_starts_at_local_midnight() {
        let tz = chrono_tz::Europe::Paris;
        let now = tz.with_ymd_and_hms(2024, 7, 3, 9, 0, 0).unwrap();

        let window = month_window(now).unwrap();

        let start = tz.timestamp_millis_opt(window.start_ms).unwrap();
        assert_eq!(
            start,
            tz.with_ymd_and_hms(2024, 7, 3, 0, 0, 0).unwrap(),
            "window must start at local midnight of the anchor day"
        );
    }

    #[test]
    fn test_month_end_is_clamped() {
        let tz = chrono_tz::Europe::Paris;
        let now = tz.with_ymd_and_hms(2023, 1, 31, 12, 0, 0).unwrap();

        let window = month_window(now).unwrap();

        let end = tz.timestamp_millis_opt(window.end_ms).unwrap();
        assert_eq!(end, tz.with_ymd_and_hms(2023, 2, 28, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_window_crosses_dst_transition() {
        // Late March in Paris crosses the spring-forward Sunday.
        let tz = chrono_tz::Europe::Paris;
        let now = tz.with_ymd_and_hms(2024, 3, 25, 8, 0, 0).unwrap();

        let window = month_window(now).unwrap();

        assert!(window.start_ms < window.end_ms);
        let span = window.end_ms - window.start_ms;
        // One hour is lost to DST, still within the one-month envelope.
        assert!(span >= 28 * DAY_MS && span <= 31 * DAY_MS);
    }
}
