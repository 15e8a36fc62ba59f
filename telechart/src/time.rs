// Copyright 2025 the Telechart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Instant parsing, time tick generation and formatting helpers.
//!
//! Time is modelled as a numeric value in **milliseconds since the Unix epoch**, which keeps the
//! temporal scale a plain linear mapping. This module provides:
//! - ISO-8601 parsing of the snapshot's timestamp axis
//! - "nice" tick steps from milliseconds up to weeks
//! - formatting for tick labels and tooltips in a fixed UTC offset

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};

use crate::error::{ChartError, Result};

const SECOND: f64 = 1_000.0;
const MINUTE: f64 = 60.0 * SECOND;
const HOUR: f64 = 60.0 * MINUTE;
const DAY: f64 = 24.0 * HOUR;

/// Naive layouts accepted when the input carries no offset; they are read as UTC.
const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parses an ISO-8601 instant into epoch milliseconds.
///
/// Accepts RFC 3339 (with offset), naive date-times (read as UTC) and bare dates (midnight UTC).
pub fn parse_instant(text: &str) -> Option<f64> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis() as f64);
    }
    for layout in NAIVE_LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, layout) {
            return Some(dt.and_utc().timestamp_millis() as f64);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis() as f64)
}

/// Like [`parse_instant`], but reports the failing position.
pub fn parse_instant_at(index: usize, text: &str) -> Result<f64> {
    parse_instant(text).ok_or_else(|| ChartError::InvalidTimestamp {
        index,
        value: text.into(),
    })
}

/// Returns a vector of "nice-ish" tick values for a time domain expressed in milliseconds.
///
/// Ticks are aligned to the step in the display offset, so hour and day ticks land on local
/// boundaries rather than UTC ones.
pub fn nice_time_ticks_ms(mut min: f64, mut max: f64, count: usize, offset_ms: f64) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    if !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max {
        return vec![min];
    }
    if min > max {
        core::mem::swap(&mut min, &mut max);
    }

    let span = max - min;
    let step = nice_time_step_ms(span / count.max(1) as f64);
    if step == 0.0 {
        return vec![min, max];
    }

    let start = ((min + offset_ms) / step).ceil() * step - offset_ms;
    let n_f = ((max - start) / step).floor();
    let n = if n_f.is_finite() && n_f >= 0.0 {
        let n_f = n_f.min(10_000.0);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "guarded by finite/non-negative checks and capped at 10k"
        )]
        {
            n_f as u64
        }
    } else {
        return Vec::new();
    };

    (0..=n).map(|i| start + step * i as f64).collect()
}

/// Picks the smallest calendar-friendly step that is at least `step` milliseconds.
pub(crate) fn nice_time_step_ms(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }

    const STEPS: &[f64] = &[
        1.0,
        2.0,
        5.0,
        10.0,
        20.0,
        50.0,
        100.0,
        200.0,
        500.0,
        SECOND,
        5.0 * SECOND,
        15.0 * SECOND,
        30.0 * SECOND,
        MINUTE,
        5.0 * MINUTE,
        15.0 * MINUTE,
        30.0 * MINUTE,
        HOUR,
        3.0 * HOUR,
        6.0 * HOUR,
        12.0 * HOUR,
        DAY,
        2.0 * DAY,
        7.0 * DAY,
    ];

    for &s in STEPS {
        if s >= step {
            return s;
        }
    }
    // Beyond a week: whole multiples of a week.
    (step / (7.0 * DAY)).ceil().max(1.0) * 7.0 * DAY
}

/// Converts a minute offset into a chrono offset, falling back to UTC when out of range.
pub(crate) fn fixed_offset(utc_offset_minutes: i32) -> FixedOffset {
    FixedOffset::east_opt(utc_offset_minutes.saturating_mul(60)).unwrap_or_else(|| Utc.fix())
}

fn to_datetime(ms: f64, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    if !ms.is_finite() {
        return None;
    }
    let ms = {
        let ms = ms.round().clamp(i64::MIN as f64, i64::MAX as f64);
        #[allow(clippy::cast_possible_truncation, reason = "clamped to the i64 range")]
        {
            ms as i64
        }
    };
    DateTime::<Utc>::from_timestamp_millis(ms).map(|dt| dt.with_timezone(&offset))
}

/// Formats a time tick (milliseconds) given the tick step (milliseconds).
///
/// The granularity follows the step: sub-second steps show milliseconds, sub-day steps show
/// the time of day, and longer steps show the date.
pub fn format_time_tick(ms: f64, step: f64, utc_offset_minutes: i32) -> String {
    let Some(dt) = to_datetime(ms, fixed_offset(utc_offset_minutes)) else {
        return format!("{ms}");
    };
    let step = step.abs();
    let layout = if step < SECOND {
        "%H:%M:%S%.3f"
    } else if step < MINUTE {
        "%H:%M:%S"
    } else if step < DAY {
        "%H:%M"
    } else {
        "%b %d"
    };
    dt.format(layout).to_string()
}

/// Formats an instant for display in tooltips.
pub fn format_instant(ms: f64, utc_offset_minutes: i32) -> String {
    match to_datetime(ms, fixed_offset(utc_offset_minutes)) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => format!("{ms}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_offset_naive_and_date_only_instants() {
        let utc = parse_instant("2024-03-01T12:00:00Z").expect("rfc3339");
        let shifted = parse_instant("2024-03-01T14:00:00+02:00").expect("rfc3339 offset");
        let naive = parse_instant("2024-03-01T12:00:00.000").expect("naive");
        let spaced = parse_instant("2024-03-01 12:00:00").expect("space separated");
        assert_eq!(utc, shifted);
        assert_eq!(utc, naive);
        assert_eq!(utc, spaced);

        let date = parse_instant("2024-03-01").expect("date");
        assert_eq!(utc - date, 12.0 * HOUR);
    }

    #[test]
    fn malformed_instants_are_rejected() {
        assert!(parse_instant("not a time").is_none());
        assert!(matches!(
            parse_instant_at(3, "2024-13-45"),
            Err(ChartError::InvalidTimestamp { index: 3, .. })
        ));
    }

    #[test]
    fn time_ticks_choose_minute_steps_for_minute_spans() {
        let ticks = nice_time_ticks_ms(0.0, 30.0 * MINUTE, 6, 0.0);
        assert!(ticks.len() >= 2);
        let step = ticks[1] - ticks[0];
        assert_eq!(step, 5.0 * MINUTE);
        assert!(ticks.iter().all(|t| (0.0..=30.0 * MINUTE).contains(t)));
    }

    #[test]
    fn time_ticks_align_to_display_offset() {
        let offset = 2.0 * HOUR;
        let ticks = nice_time_ticks_ms(0.0, 3.0 * DAY, 3, offset);
        assert!(!ticks.is_empty());
        for t in ticks {
            assert_eq!((t + offset) % DAY, 0.0, "tick {t} not on a local midnight");
        }
    }

    #[test]
    fn tick_format_follows_step() {
        let t = parse_instant("2024-03-01T12:34:56.789Z").expect("instant");
        assert_eq!(format_time_tick(t, 100.0, 0), "12:34:56.789");
        assert_eq!(format_time_tick(t, 5.0 * SECOND, 0), "12:34:56");
        assert_eq!(format_time_tick(t, 15.0 * MINUTE, 0), "12:34");
        assert_eq!(format_time_tick(t, DAY, 0), "Mar 01");
        assert_eq!(format_time_tick(t, 15.0 * MINUTE, 90), "14:04");
    }

    #[test]
    fn instant_format_uses_offset() {
        let t = parse_instant("2024-03-01T23:30:00Z").expect("instant");
        assert_eq!(format_instant(t, 0), "2024-03-01 23:30:00");
        assert_eq!(format_instant(t, 60), "2024-03-02 00:30:00");
    }
}
