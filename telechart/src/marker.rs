// Copyright 2025 the Telechart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point markers and hit testing.
//!
//! Every present sample yields one marker. Markers are drawn in series order, then sample
//! order, and hit testing prefers the later-drawn marker when distances tie.

use kurbo::{BezPath, Point, Rect};

use crate::symbol::Symbol;

/// A marker at one present sample.
#[derive(Clone, Debug, PartialEq)]
pub struct PointMarker {
    /// Index of the owning series.
    pub series: usize,
    /// Position on the snapshot's timestamp axis.
    pub index: usize,
    /// Sample instant in epoch milliseconds.
    pub time_ms: f64,
    /// Sample value.
    pub value: f64,
    /// Projected position.
    pub pos: Point,
    /// Marker radius.
    pub radius: f64,
    /// Marker shape.
    pub symbol: Symbol,
}

impl PointMarker {
    /// Returns the marker outline.
    pub fn path(&self) -> BezPath {
        self.symbol.path(self.pos, self.radius)
    }

    /// Returns `true` if `p` is within the marker plus `slop`.
    pub fn hit(&self, p: Point, slop: f64) -> bool {
        self.symbol.hit(self.pos, self.radius, slop, p)
    }
}

/// Finds the marker under `p`.
///
/// Only markers whose position lies inside `clip` are candidates (markers scrolled out of the
/// plot are hidden). Among hits the nearest wins; ties go to the marker drawn last.
pub fn hit_test<'a>(
    markers: impl IntoIterator<Item = &'a PointMarker>,
    p: Point,
    slop: f64,
    clip: Rect,
) -> Option<&'a PointMarker> {
    let mut best: Option<(&PointMarker, f64)> = None;
    for marker in markers {
        if !clip.contains(marker.pos) && !on_far_edge(clip, marker.pos) {
            continue;
        }
        if !marker.hit(p, slop) {
            continue;
        }
        let d = marker.pos.distance_squared(p);
        if best.is_none_or(|(_, best_d)| d <= best_d) {
            best = Some((marker, d));
        }
    }
    best.map(|(m, _)| m)
}

// `Rect::contains` excludes the right and bottom edges; markers at the end of the domain sit
// exactly there.
fn on_far_edge(clip: Rect, p: Point) -> bool {
    (p.x == clip.x1 && p.y >= clip.y0 && p.y <= clip.y1)
        || (p.y == clip.y1 && p.x >= clip.x0 && p.x <= clip.x1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(series: usize, index: usize, x: f64, y: f64) -> PointMarker {
        PointMarker {
            series,
            index,
            time_ms: index as f64,
            value: 0.0,
            pos: Point::new(x, y),
            radius: 2.0,
            symbol: Symbol::Circle,
        }
    }

    #[test]
    fn nearest_marker_wins() {
        let clip = Rect::new(0.0, 0.0, 100.0, 100.0);
        let markers = [marker(0, 0, 10.0, 10.0), marker(0, 1, 13.0, 10.0)];
        let hit = hit_test(&markers, Point::new(12.0, 10.0), 2.0, clip).expect("hit");
        assert_eq!(hit.index, 1);
        assert!(hit_test(&markers, Point::new(50.0, 50.0), 2.0, clip).is_none());
    }

    #[test]
    fn ties_prefer_the_later_drawn_marker() {
        let clip = Rect::new(0.0, 0.0, 100.0, 100.0);
        let markers = [marker(0, 3, 20.0, 20.0), marker(1, 3, 20.0, 20.0)];
        let hit = hit_test(&markers, Point::new(20.0, 21.0), 2.0, clip).expect("hit");
        assert_eq!(hit.series, 1);
    }

    #[test]
    fn markers_outside_the_clip_are_ignored() {
        let clip = Rect::new(0.0, 0.0, 100.0, 100.0);
        let markers = [marker(0, 0, -1.0, 50.0), marker(0, 1, 100.0, 100.0)];
        assert!(hit_test(&markers, Point::new(0.0, 50.0), 2.0, clip).is_none());
        assert!(hit_test(&markers, Point::new(100.0, 99.0), 2.0, clip).is_some());
    }
}
