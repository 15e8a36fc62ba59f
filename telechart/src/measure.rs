// Copyright 2025 the Telechart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement hooks for chart layout.
//!
//! Telechart does not shape text. Layout (the legend margin, tooltip boxes) only needs rough
//! extents, so it goes through a small measurement trait that a real shaping backend can
//! implement.

/// A minimal text measurement interface used by layout.
pub trait TextMeasurer {
    /// Returns `(width, height)` in chart pixels for a single line of text.
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64);
}

/// Estimates every character with the same advance, independent of font size.
///
/// This matches how the legend margin is sized: a fixed pixel budget per label character.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvanceMeasurer {
    /// Advance per character, in pixels.
    pub advance: f64,
}

impl FixedAdvanceMeasurer {
    /// Creates a measurer with the given per-character advance.
    pub fn new(advance: f64) -> Self {
        Self {
            advance: advance.max(0.0),
        }
    }
}

impl Default for FixedAdvanceMeasurer {
    fn default() -> Self {
        Self::new(8.0)
    }
}

impl TextMeasurer for FixedAdvanceMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64) {
        (self.advance * text.chars().count() as f64, font_size)
    }
}

/// A heuristic measurer that scales with font size (~0.6em per glyph).
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64) {
        let width = 0.6 * font_size * text.chars().count() as f64;
        (width, font_size)
    }
}
