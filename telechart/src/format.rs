// Copyright 2025 the Telechart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Numeric label formatting.

/// Formats a tick value using as many decimals as the tick step needs.
///
/// A step of `0.25` yields two decimals, a step of `5` yields none, so all labels on one axis
/// share a precision.
pub fn format_tick_with_step(v: f64, step: f64) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    let decimals = step_decimals(step);
    let s = format!("{v:.decimals$}");
    // Avoid "-0" / "-0.00" for values that round to zero.
    if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
        s[1..].to_string()
    } else {
        s
    }
}

fn step_decimals(step: f64) -> usize {
    let step = step.abs();
    if !step.is_finite() || step == 0.0 {
        return 0;
    }
    // Smallest precision that represents the step exactly (up to float noise).
    (0..=12_i32)
        .find(|&d| {
            let scaled = step * 10_f64.powi(d);
            (scaled - scaled.round()).abs() < 1e-9 * scaled.max(1.0)
        })
        .map_or(12, |d| d.unsigned_abs() as usize)
}

/// Formats a sample value with fixed two-decimal precision.
pub fn format_value(v: f64) -> String {
    format!("{v:.2}")
}

/// Formats a probability in `[0, 1]` as a percentage with one decimal place.
pub fn format_percent(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_precision_follows_step() {
        assert_eq!(format_tick_with_step(10.0, 5.0), "10");
        assert_eq!(format_tick_with_step(0.5, 0.5), "0.5");
        assert_eq!(format_tick_with_step(0.3, 0.1), "0.3");
        assert_eq!(format_tick_with_step(4.95, 0.005), "4.950");
        assert_eq!(format_tick_with_step(1.25, 0.25), "1.25");
        assert_eq!(format_tick_with_step(-0.0001, 0.5), "0.0");
    }

    #[test]
    fn value_and_percent_formats() {
        assert_eq!(format_value(12.0), "12.00");
        assert_eq!(format_value(7.256), "7.26");
        assert_eq!(format_percent(0.873), "87.3%");
        assert_eq!(format_percent(1.0), "100.0%");
    }
}
