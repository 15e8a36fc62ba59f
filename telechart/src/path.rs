// Copyright 2025 the Telechart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Series path geometry with gap semantics.
//!
//! Each series is split into maximal runs of present samples. A run becomes one
//! [`PathSegment`]; an absent sample always ends the current run, so the points on either side
//! of a gap never share a segment. Absent samples are never interpolated.
//!
//! Segments keep each sample's instant so their x coordinates can be re-projected under zoom
//! without rebuilding. Segment membership is fixed at build time.

use kurbo::{BezPath, Point};
use peniko::Color;
use smallvec::SmallVec;

use crate::marker::PointMarker;
use crate::model::Series;
use crate::scale::{ScaleLinear, ScaleTime};
use crate::symbol::Symbol;

/// One present sample, before projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// Position on the snapshot's timestamp axis.
    pub index: usize,
    /// Instant in epoch milliseconds.
    pub time_ms: f64,
    /// Value.
    pub value: f64,
}

/// Splits a series into maximal runs of present samples.
///
/// `instants[i]` is the parsed timestamp at position `i`. A position is absent when its value
/// is `None` or non-finite, when its timestamp did not parse, or when the series is shorter
/// than the timestamp axis.
pub fn present_runs(instants: &[Option<f64>], values: &[Option<f64>]) -> Vec<Vec<Sample>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (index, instant) in instants.iter().enumerate() {
        let sample = match (instant, values.get(index).copied().flatten()) {
            (Some(time_ms), Some(value)) if value.is_finite() => Some(Sample {
                index,
                time_ms: *time_ms,
                value,
            }),
            _ => None,
        };
        match sample {
            Some(s) => current.push(s),
            None if !current.is_empty() => runs.push(core::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// A projected run of present samples.
#[derive(Clone, Debug, PartialEq)]
pub struct PathSegment {
    /// Samples in index order.
    pub samples: Vec<Sample>,
    /// Projected positions, one per sample.
    pub points: Vec<Point>,
}

impl PathSegment {
    fn project(samples: Vec<Sample>, x: &ScaleTime, y: &ScaleLinear) -> Self {
        let points = samples
            .iter()
            .map(|s| Point::new(x.map(s.time_ms), y.map(s.value)))
            .collect();
        Self { samples, points }
    }

    /// Re-projects x coordinates through `x`; y coordinates are kept.
    pub fn reproject_x(&mut self, x: &ScaleTime) {
        for (p, s) in self.points.iter_mut().zip(&self.samples) {
            p.x = x.map(s.time_ms);
        }
    }

    /// Sample index of the first point.
    pub fn first_index(&self) -> Option<usize> {
        self.samples.first().map(|s| s.index)
    }

    /// Sample index of the last point.
    pub fn last_index(&self) -> Option<usize> {
        self.samples.last().map(|s| s.index)
    }

    /// Builds a polyline through the projected points.
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut points = self.points.iter();
        if let Some(first) = points.next() {
            path.move_to(*first);
            for p in points {
                path.line_to(*p);
            }
        }
        path
    }
}

/// Geometry for one series: its segments and markers.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesGeometry {
    /// Series index in display order.
    pub index: usize,
    /// Series label.
    pub label: String,
    /// Line and marker color.
    pub color: Color,
    /// Segments in index order; most series have exactly one.
    pub segments: SmallVec<[PathSegment; 1]>,
    /// One marker per present sample.
    pub markers: Vec<PointMarker>,
}

impl SeriesGeometry {
    /// Builds the geometry of one series through the given scales.
    pub fn build(
        index: usize,
        series: &Series,
        instants: &[Option<f64>],
        x: &ScaleTime,
        y: &ScaleLinear,
        color: Color,
        marker_radius: f64,
        symbol: Symbol,
    ) -> Self {
        let segments: SmallVec<[PathSegment; 1]> = present_runs(instants, &series.values)
            .into_iter()
            .map(|run| PathSegment::project(run, x, y))
            .collect();
        let markers = segments
            .iter()
            .flat_map(|seg| seg.samples.iter().zip(&seg.points))
            .map(|(s, p)| PointMarker {
                series: index,
                index: s.index,
                time_ms: s.time_ms,
                value: s.value,
                pos: *p,
                radius: marker_radius,
                symbol,
            })
            .collect();
        Self {
            index,
            label: series.metric_identifier.clone(),
            color,
            segments,
            markers,
        }
    }

    /// Re-projects every segment point and marker x coordinate.
    pub fn reproject_x(&mut self, x: &ScaleTime) {
        for seg in &mut self.segments {
            seg.reproject_x(x);
        }
        for m in &mut self.markers {
            m.pos.x = x.map(m.time_ms);
        }
    }

    /// Returns one path per segment.
    pub fn paths(&self) -> impl Iterator<Item = BezPath> + '_ {
        self.segments.iter().map(PathSegment::to_bez_path)
    }
}

#[cfg(test)]
mod tests {
    use peniko::color::palette::css;

    use super::*;

    fn instants(n: usize) -> Vec<Option<f64>> {
        (0..n).map(|i| Some(i as f64 * 1_000.0)).collect()
    }

    #[test]
    fn interior_gap_splits_the_run() {
        let runs = present_runs(&instants(5), &[Some(1.0), Some(2.0), None, Some(4.0), Some(5.0)]);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].last().map(|s| s.index), Some(1));
        assert_eq!(runs[1].first().map(|s| s.index), Some(3));
    }

    #[test]
    fn leading_trailing_and_repeated_gaps() {
        let runs = present_runs(&instants(6), &[None, Some(1.0), None, None, Some(2.0), None]);
        assert_eq!(runs.len(), 2);
        assert!(runs.iter().all(|r| r.len() == 1));

        assert!(present_runs(&instants(3), &[None, None, None]).is_empty());
    }

    #[test]
    fn bad_instants_and_non_finite_values_are_gaps() {
        let instants = [Some(0.0), None, Some(2.0), Some(3.0)];
        let runs = present_runs(&instants, &[Some(1.0), Some(1.0), Some(f64::NAN), Some(1.0)]);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0][0].index, 0);
        assert_eq!(runs[1][0].index, 3);
    }

    #[test]
    fn short_series_are_padded_with_gaps() {
        let runs = present_runs(&instants(4), &[Some(1.0), Some(2.0)]);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].len(), 2);
    }

    #[test]
    fn reprojection_moves_x_only() {
        let series = Series::new("s", "", vec![Some(0.0), Some(10.0), None, Some(5.0)]);
        let x = ScaleTime::new((0.0, 3_000.0), (0.0, 300.0));
        let y = ScaleLinear::new((0.0, 10.0), (100.0, 0.0));
        let mut geom = SeriesGeometry::build(
            0,
            &series,
            &instants(4),
            &x,
            &y,
            css::BLACK,
            2.0,
            Symbol::Circle,
        );
        assert_eq!(geom.segments.len(), 2);
        assert_eq!(geom.markers.len(), 3);

        let before: Vec<Point> = geom.markers.iter().map(|m| m.pos).collect();
        geom.reproject_x(&x.with_domain((1_000.0, 2_000.0)));
        for (m, b) in geom.markers.iter().zip(&before) {
            assert_eq!(m.pos.y, b.y);
        }
        assert_eq!(geom.markers[1].pos.x, 0.0);
        assert_eq!(geom.segments[0].points[1].x, 0.0);
        assert_eq!(geom.paths().count(), 2);
    }
}
