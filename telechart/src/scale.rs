// Copyright 2025 the Telechart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tiny scale utilities.
//!
//! A chart uses exactly two continuous scales: a temporal scale for x (epoch milliseconds to
//! pixels) and a linear value scale for y. Both are invertible so the temporal scale can be
//! rescaled under zoom.

use tracing::warn;

use crate::model::MetricsData;
use crate::time;

/// Padding applied on each side of a single-instant time domain.
pub const SINGLE_INSTANT_PAD_MS: f64 = 60_000.0;

/// Half-height applied around a zero-height value domain.
pub const FLAT_VALUE_PAD: f64 = 0.5;

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

/// Specification for a linear scale (domain + options, no range yet).
#[derive(Clone, Copy, Debug)]
pub struct ScaleLinearSpec {
    /// Domain in data units.
    pub domain: (f64, f64),
    /// Whether to "nice" the domain based on tick generation.
    pub nice: bool,
}

impl ScaleLinear {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return r0;
        }
        let t = (x - d0) / denom;
        r0 + t * (r1 - r0)
    }

    /// Maps a value from range space back into domain space.
    pub fn invert(&self, y: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = r1 - r0;
        if denom == 0.0 {
            return d0;
        }
        let t = (y - r0) / denom;
        d0 + t * (d1 - d0)
    }

    /// Returns the configured domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Returns the configured range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Returns “nice-ish” tick values for the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        nice_ticks(self.domain.0, self.domain.1, count)
    }
}

impl ScaleLinearSpec {
    /// Creates a new linear scale spec.
    pub fn new(domain: (f64, f64)) -> Self {
        Self {
            domain,
            nice: false,
        }
    }

    /// Enables or disables nice-domain behavior.
    pub fn with_nice(mut self, nice: bool) -> Self {
        self.nice = nice;
        self
    }

    /// Returns the effective domain after applying `nice` (if enabled).
    pub fn resolved_domain(&self, tick_count: usize) -> (f64, f64) {
        if !self.nice {
            return self.domain;
        }
        let ticks = nice_ticks(self.domain.0, self.domain.1, tick_count);
        match (ticks.first(), ticks.last()) {
            (Some(&lo), Some(&hi)) if ticks.len() >= 2 => (lo, hi),
            _ => self.domain,
        }
    }

    /// Instantiates a concrete scale using the `resolved_domain` (respecting `nice`).
    pub fn instantiate_resolved(&self, range: (f64, f64), tick_count: usize) -> ScaleLinear {
        ScaleLinear::new(self.resolved_domain(tick_count), range)
    }
}

pub(crate) fn nice_ticks(mut min: f64, mut max: f64, count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    if min == max {
        return vec![min];
    }
    if min > max {
        core::mem::swap(&mut min, &mut max);
    }
    let span = max - min;
    let step = nice_step(span / count.max(1) as f64);
    if step == 0.0 {
        return vec![min, max];
    }

    let start = (min / step).floor() * step;
    let stop = (max / step).ceil() * step;

    let n_f = ((stop - start) / step).round();
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
        0
    };
    (0..=n).map(|i| start + step * i as f64).collect()
}

fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let base = 10_f64.powf(power);
    let error = step / base;
    let nice = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    nice * base
}

/// A time scale: a linear scale over epoch milliseconds with calendar-aware ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleTime {
    inner: ScaleLinear,
    utc_offset_minutes: i32,
}

impl ScaleTime {
    /// Creates a new time scale.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            inner: ScaleLinear::new(domain, range),
            utc_offset_minutes: 0,
        }
    }

    /// Sets the offset ticks are aligned to.
    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }

    /// Returns a copy of this scale over a different domain (same range and offset).
    pub fn with_domain(&self, domain: (f64, f64)) -> Self {
        Self {
            inner: ScaleLinear::new(domain, self.inner.range),
            utc_offset_minutes: self.utc_offset_minutes,
        }
    }

    /// Maps a timestamp into range space.
    pub fn map(&self, t: f64) -> f64 {
        self.inner.map(t)
    }

    /// Maps a range coordinate back to a timestamp.
    pub fn invert(&self, x: f64) -> f64 {
        self.inner.invert(x)
    }

    /// Returns tick instants for the time domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.inner.domain;
        time::nice_time_ticks_ms(d0, d1, count, self.offset_ms())
    }

    /// Returns the domain in epoch milliseconds.
    pub fn domain(&self) -> (f64, f64) {
        self.inner.domain
    }

    /// Returns the pixel range.
    pub fn range(&self) -> (f64, f64) {
        self.inner.range
    }

    /// Returns the display offset in minutes.
    pub fn utc_offset_minutes(&self) -> i32 {
        self.utc_offset_minutes
    }

    fn offset_ms(&self) -> f64 {
        f64::from(self.utc_offset_minutes) * 60_000.0
    }
}

/// Computes the temporal domain over parsed instants, ignoring unparseable ones.
///
/// Returns `None` when no instant parsed. A single distinct instant is padded symmetrically so
/// the domain never has zero width.
pub fn time_domain(instants: &[Option<f64>]) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for t in instants.iter().flatten() {
        min = min.min(*t);
        max = max.max(*t);
    }
    if !(min.is_finite() && max.is_finite()) {
        return None;
    }
    if min == max {
        return Some((min - SINGLE_INSTANT_PAD_MS, max + SINGLE_INSTANT_PAD_MS));
    }
    Some((min, max))
}

/// Computes the value domain before nicing.
///
/// Over all present, finite samples: `hi = max` (1 without samples), `lo = min` (0 without
/// samples), and the low end becomes `lo - lo / 100`. For a negative minimum that moves the low
/// end up, not down. A zero-height (or inverted) result is widened by [`FLAT_VALUE_PAD`] on
/// both sides of its midpoint.
pub fn value_domain(data: &MetricsData) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for series in &data.metrics {
        for v in series.values.iter().flatten() {
            if !v.is_finite() {
                warn!(series = %series.metric_identifier, value = v, "ignoring non-finite sample");
                continue;
            }
            lo = lo.min(*v);
            hi = hi.max(*v);
        }
    }
    if !hi.is_finite() {
        hi = 1.0;
    }
    if !lo.is_finite() {
        lo = 0.0;
    }
    let lo = lo - lo / 100.0;
    if hi - lo <= 0.0 {
        let mid = 0.5 * (lo + hi);
        return (mid - FLAT_VALUE_PAD, mid + FLAT_VALUE_PAD);
    }
    (lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Series;

    fn snapshot(values: Vec<Option<f64>>) -> MetricsData {
        let stamps = (0..values.len())
            .map(|i| format!("2024-03-01T00:{i:02}:00Z"))
            .collect();
        MetricsData::new(stamps, vec![Series::new("s", "", values)])
    }

    #[test]
    fn linear_map_and_invert_are_inverse() {
        let s = ScaleLinear::new((0.0, 50.0), (200.0, 0.0));
        assert_eq!(s.map(0.0), 200.0);
        assert_eq!(s.map(50.0), 0.0);
        assert!((s.invert(s.map(12.5)) - 12.5).abs() < 1e-9);
    }

    #[test]
    fn nice_domain_lands_on_round_numbers() {
        let spec = ScaleLinearSpec::new((3.2, 97.1)).with_nice(true);
        assert_eq!(spec.resolved_domain(10), (0.0, 100.0));
    }

    #[test]
    fn single_instant_is_padded() {
        let (d0, d1) = time_domain(&[Some(1_000.0), None, Some(1_000.0)]).expect("domain");
        assert!(d1 > d0);
        assert_eq!(0.5 * (d0 + d1), 1_000.0);
        assert!(time_domain(&[None, None]).is_none());
    }

    #[test]
    fn value_domain_pads_low_end_and_skips_gaps() {
        let (lo, hi) = value_domain(&snapshot(vec![Some(10.0), None, Some(20.0)]));
        assert_eq!(lo, 9.9);
        assert_eq!(hi, 20.0);

        let (lo, hi) = value_domain(&snapshot(vec![Some(-10.0), Some(5.0)]));
        assert_eq!(lo, -9.9);
        assert_eq!(hi, 5.0);
    }

    #[test]
    fn negative_minimum_nices_with_a_unit_step() {
        let domain = value_domain(&snapshot(vec![Some(-10.0), None, Some(5.0)]));
        let spec = ScaleLinearSpec::new(domain).with_nice(true);
        assert_eq!(spec.resolved_domain(10), (-10.0, 5.0));
    }

    #[test]
    fn flat_negative_series_stay_inside_the_domain() {
        let (lo, hi) = value_domain(&snapshot(vec![Some(-5.0); 3]));
        assert!(lo < -5.0 && hi > -5.0, "({lo}, {hi})");
    }

    #[test]
    fn value_domain_defaults_without_samples() {
        assert_eq!(value_domain(&snapshot(vec![None, None])), (0.0, 1.0));
    }

    #[test]
    fn flat_series_get_non_zero_height() {
        let (lo, hi) = value_domain(&snapshot(vec![Some(0.0); 5]));
        assert!(hi > lo);

        let (lo, hi) = value_domain(&snapshot(vec![Some(5.0); 5]));
        let scale = ScaleLinearSpec::new((lo, hi))
            .with_nice(true)
            .instantiate_resolved((100.0, 0.0), 10);
        let (d0, d1) = scale.domain();
        assert!(d1 > d0);
        assert!(scale.map(5.0).is_finite());
    }
}
