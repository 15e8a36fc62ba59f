// Copyright 2025 the Telechart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zoom/pan state for the temporal axis.
//!
//! The viewport is a [`ZoomTransform`] `{ k, x }` acting on plot-local x coordinates:
//! `x' = x * k + tx`. Only the temporal scale is transformed; the value scale never zooms.
//!
//! Constraints:
//! - `k` is clamped to the configured scale extent (default `[1, 10]`).
//! - `tx` is clamped to `[width * (1 - k), 0]`, so the transformed plot always covers
//!   `[0, width]` and panning never reveals space beyond the data.

use tracing::{trace, warn};

use crate::config::ZoomConfig;
use crate::scale::ScaleTime;

/// A zoom factor plus horizontal translation, in plot-local pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomTransform {
    /// Zoom factor.
    pub k: f64,
    /// Horizontal translation.
    pub x: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    /// The zero-gesture transform.
    pub const IDENTITY: Self = Self { k: 1.0, x: 0.0 };

    /// Creates a transform.
    pub fn new(k: f64, x: f64) -> Self {
        Self { k, x }
    }

    /// Returns `true` for `k = 1, x = 0`.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Applies the transform to a plot-local x coordinate.
    pub fn apply_x(&self, x: f64) -> f64 {
        x * self.k + self.x
    }

    /// Maps a transformed plot-local x coordinate back to the untransformed one.
    pub fn invert_x(&self, x: f64) -> f64 {
        (x - self.x) / self.k
    }

    /// Derives the rescaled temporal scale: this transform composed with `base`.
    ///
    /// `origin` is the pixel where plot-local x is zero (the plot's left edge). The identity
    /// transform returns `base` unchanged.
    pub fn rescale(&self, base: &ScaleTime, origin: f64) -> ScaleTime {
        if self.is_identity() {
            return *base;
        }
        let (r0, r1) = base.range();
        let d0 = base.invert(origin + self.invert_x(r0 - origin));
        let d1 = base.invert(origin + self.invert_x(r1 - origin));
        base.with_domain((d0, d1))
    }
}

/// A pointer gesture, in plot-local pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    /// Wheel rotation anchored at `x`. Negative `delta_y` zooms in.
    Wheel {
        /// Pointer position.
        x: f64,
        /// Wheel delta.
        delta_y: f64,
    },
    /// Horizontal drag by `dx` pixels.
    Drag {
        /// Drag distance.
        dx: f64,
    },
    /// Double click anchored at `x`: zoom in by 2, or out with `zoom_out`.
    DoubleClick {
        /// Pointer position.
        x: f64,
        /// Zoom out instead of in.
        zoom_out: bool,
    },
    /// Explicit transform request.
    Transform(ZoomTransform),
}

/// Owns the viewport for one plot width.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoomController {
    config: ZoomConfig,
    width: f64,
    transform: ZoomTransform,
}

impl ZoomController {
    /// Creates a controller at the identity transform.
    ///
    /// An inverted scale extent is reordered; a non-finite or non-positive one falls back to the
    /// default extent. The same goes for a non-finite wheel sensitivity.
    pub fn new(config: ZoomConfig, width: f64) -> Self {
        Self {
            config: sanitize(config),
            width: width.max(0.0),
            transform: ZoomTransform::IDENTITY,
        }
    }

    /// Returns the current transform.
    pub fn transform(&self) -> ZoomTransform {
        self.transform
    }

    /// Clamps a transform to the scale extent and the translate extent.
    pub fn constrain(&self, t: ZoomTransform) -> ZoomTransform {
        let k = if t.k.is_finite() {
            t.k.clamp(self.config.min_scale, self.config.max_scale)
        } else {
            self.transform.k
        };
        let lo = self.width * (1.0 - k);
        let x = if t.x.is_finite() {
            t.x.clamp(lo.min(0.0), 0.0)
        } else {
            self.transform.x.clamp(lo.min(0.0), 0.0)
        };
        let out = ZoomTransform { k, x };
        if out != t {
            trace!(requested_k = t.k, requested_x = t.x, k, x, "clamped zoom transform");
        }
        out
    }

    /// Applies a gesture. Returns the new transform if it changed.
    pub fn apply(&mut self, gesture: Gesture) -> Option<ZoomTransform> {
        let t = self.transform;
        let requested = match gesture {
            Gesture::Wheel { x, delta_y } => {
                if !delta_y.is_finite() {
                    return None;
                }
                let factor = 2_f64.powf(-delta_y * self.config.wheel_sensitivity);
                self.scaled_about(x, t.k * factor)
            }
            Gesture::Drag { dx } => {
                if !dx.is_finite() {
                    return None;
                }
                ZoomTransform::new(t.k, t.x + dx)
            }
            Gesture::DoubleClick { x, zoom_out } => {
                let k = if zoom_out { t.k * 0.5 } else { t.k * 2.0 };
                self.scaled_about(x, k)
            }
            Gesture::Transform(requested) => requested,
        };
        let next = self.constrain(requested);
        if next == t {
            return None;
        }
        self.transform = next;
        Some(next)
    }

    // Zooms to `k` keeping the data under `anchor` fixed.
    fn scaled_about(&self, anchor: f64, k: f64) -> ZoomTransform {
        let t = self.transform;
        let k = k.clamp(self.config.min_scale, self.config.max_scale);
        let anchor = if anchor.is_finite() { anchor } else { 0.5 * self.width };
        let local = t.invert_x(anchor);
        ZoomTransform::new(k, anchor - local * k)
    }
}

fn sanitize(config: ZoomConfig) -> ZoomConfig {
    let defaults = ZoomConfig::default();
    let (a, b) = (config.min_scale, config.max_scale);
    let (min_scale, max_scale) = if a.is_finite() && b.is_finite() && a > 0.0 && b > 0.0 {
        (a.min(b), a.max(b))
    } else {
        (defaults.min_scale, defaults.max_scale)
    };
    let wheel_sensitivity = if config.wheel_sensitivity.is_finite() {
        config.wheel_sensitivity
    } else {
        defaults.wheel_sensitivity
    };
    let out = ZoomConfig {
        min_scale,
        max_scale,
        wheel_sensitivity,
    };
    if out != config {
        warn!(
            requested_min = a,
            requested_max = b,
            min_scale,
            max_scale,
            "adjusted unusable zoom configuration"
        );
    }
    out
}

/// A transform computed for a particular geometry generation.
///
/// A re-projection is only applied while its generation matches the live geometry; one that
/// outlives a rebuild is discarded.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reprojection {
    /// Geometry generation this transform was computed against.
    pub generation: u64,
    /// Transform to apply.
    pub transform: ZoomTransform,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> ZoomController {
        ZoomController::new(ZoomConfig::default(), 400.0)
    }

    #[test]
    fn scale_request_is_clamped_to_extent() {
        let mut zoom = controller();
        let t = zoom
            .apply(Gesture::Transform(ZoomTransform::new(15.0, 0.0)))
            .expect("changed");
        assert_eq!(t.k, 10.0);

        let t = zoom
            .apply(Gesture::Transform(ZoomTransform::new(0.2, 0.0)))
            .expect("changed");
        assert_eq!(t.k, 1.0);
    }

    #[test]
    fn pan_is_clamped_to_translate_extent() {
        let mut zoom = controller();
        zoom.apply(Gesture::Transform(ZoomTransform::new(2.0, 0.0)));
        let t = zoom.apply(Gesture::Drag { dx: -10_000.0 }).expect("changed");
        assert_eq!(t.x, 400.0 * (1.0 - 2.0));
        assert!(zoom.apply(Gesture::Drag { dx: -5.0 }).is_none());

        let t = zoom.apply(Gesture::Drag { dx: 10_000.0 }).expect("changed");
        assert_eq!(t.x, 0.0);
    }

    #[test]
    fn unzoomed_pan_is_a_no_op() {
        let mut zoom = controller();
        assert!(zoom.apply(Gesture::Drag { dx: 50.0 }).is_none());
        assert!(zoom.transform().is_identity());
    }

    #[test]
    fn wheel_zoom_keeps_the_anchor_fixed() {
        let mut zoom = controller();
        let anchor = 100.0;
        let t = zoom
            .apply(Gesture::Wheel {
                x: anchor,
                delta_y: -500.0,
            })
            .expect("changed");
        assert!(t.k > 1.0);
        assert!((t.apply_x(anchor) - anchor).abs() < 1e-9);
    }

    #[test]
    fn double_click_zooms_in_and_out() {
        let mut zoom = controller();
        let t = zoom
            .apply(Gesture::DoubleClick {
                x: 200.0,
                zoom_out: false,
            })
            .expect("changed");
        assert_eq!(t.k, 2.0);
        let t = zoom
            .apply(Gesture::DoubleClick {
                x: 200.0,
                zoom_out: true,
            })
            .expect("changed");
        assert!(t.is_identity());
    }

    #[test]
    fn inverted_scale_extent_is_reordered() {
        let config = ZoomConfig {
            min_scale: 5.0,
            max_scale: 2.0,
            ..ZoomConfig::default()
        };
        let mut zoom = ZoomController::new(config, 400.0);
        let t = zoom.apply(Gesture::Drag { dx: 10.0 }).expect("changed");
        assert_eq!(t.k, 2.0);
        let t = zoom
            .apply(Gesture::Transform(ZoomTransform::new(9.0, 0.0)))
            .expect("changed");
        assert_eq!(t.k, 5.0);
    }

    #[test]
    fn non_finite_settings_fall_back_to_defaults() {
        let config = ZoomConfig {
            min_scale: f64::NAN,
            max_scale: 4.0,
            wheel_sensitivity: f64::INFINITY,
        };
        let mut zoom = ZoomController::new(config, 400.0);
        let t = zoom
            .apply(Gesture::Transform(ZoomTransform::new(15.0, 0.0)))
            .expect("changed");
        assert_eq!(t.k, ZoomConfig::default().max_scale);

        let mut zoom = ZoomController::new(config, 400.0);
        let t = zoom
            .apply(Gesture::Wheel {
                x: 200.0,
                delta_y: -500.0,
            })
            .expect("changed");
        assert_eq!(t.k, 2.0);
    }

    #[test]
    fn identity_rescale_returns_the_base_scale() {
        let base = ScaleTime::new((1_000.0, 5_000.0), (50.0, 450.0));
        assert_eq!(ZoomTransform::IDENTITY.rescale(&base, 50.0), base);
    }

    #[test]
    fn rescale_narrows_the_visible_window() {
        let base = ScaleTime::new((0.0, 4_000.0), (50.0, 450.0));
        // Zoom 2x and pan to the right half.
        let scaled = ZoomTransform::new(2.0, -400.0).rescale(&base, 50.0);
        let (d0, d1) = scaled.domain();
        assert!((d0 - 2_000.0).abs() < 1e-9);
        assert!((d1 - 4_000.0).abs() < 1e-9);
        assert_eq!(scaled.range(), base.range());
    }
}
