// Copyright 2025 the Telechart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Marker symbol shapes.

use kurbo::{BezPath, Circle, Point, Rect, Shape};
use serde::{Deserialize, Serialize};

/// Flattening tolerance for curved symbols, in pixels.
const TOLERANCE: f64 = 0.1;

/// Shape drawn at each sample position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbol {
    /// A circle.
    #[default]
    Circle,
    /// An axis-aligned square.
    Square,
}

impl Symbol {
    /// Returns the outline of this symbol centered at `center` with the given radius
    /// (half the side length for squares).
    pub fn path(self, center: Point, radius: f64) -> BezPath {
        let r = radius.max(0.0);
        match self {
            Self::Circle => Circle::new(center, r).path_elements(TOLERANCE).collect(),
            Self::Square => Rect::from_center_size(center, (2.0 * r, 2.0 * r))
                .path_elements(TOLERANCE)
                .collect(),
        }
    }

    /// Returns `true` if `p` lies within `radius + slop` of the symbol's center, using the
    /// symbol's own shape.
    pub fn hit(self, center: Point, radius: f64, slop: f64, p: Point) -> bool {
        let reach = radius.max(0.0) + slop.max(0.0);
        match self {
            Self::Circle => center.distance(p) <= reach,
            Self::Square => (p.x - center.x).abs() <= reach && (p.y - center.y).abs() <= reach,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_path_is_closed_around_center() {
        let path = Symbol::Circle.path(Point::new(10.0, 10.0), 2.0);
        let bbox = path.bounding_box();
        assert!((bbox.center().x - 10.0).abs() < 0.2);
        assert!((bbox.width() - 4.0).abs() < 0.2);
    }

    #[test]
    fn hit_respects_shape_and_slop() {
        let c = Point::new(0.0, 0.0);
        assert!(Symbol::Circle.hit(c, 2.0, 2.0, Point::new(3.0, 0.0)));
        assert!(!Symbol::Circle.hit(c, 2.0, 2.0, Point::new(3.0, 3.0)));
        assert!(Symbol::Square.hit(c, 2.0, 2.0, Point::new(3.0, 3.0)));
    }
}
