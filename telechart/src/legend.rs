// Copyright 2025 the Telechart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Series colors, the legend, and the prediction summary.
//!
//! Colors come from a fixed ordinal palette indexed by series position, so they depend only on
//! series order and never on values. The legend is a vertical list of color swatches with text
//! labels placed in the chart's right margin.

use kurbo::{Point, Rect};
use peniko::color::palette::css;
use peniko::{Brush, Color};

use crate::axis::{TextAnchor, TextBaseline, TextLabel};
use crate::format::format_percent;
use crate::layout::Size;
use crate::measure::TextMeasurer;
use crate::model::{Annotation, MetricsData};

/// Heading shown above the prediction summary.
pub const PREDICTION_TITLE: &str = "Model Prediction";

/// The ten-color categorical palette, as RGB.
const CATEGORY10: [(u8, u8, u8); 10] = [
    (0x1f, 0x77, 0xb4),
    (0xff, 0x7f, 0x0e),
    (0x2c, 0xa0, 0x2c),
    (0xd6, 0x27, 0x28),
    (0x94, 0x67, 0xbd),
    (0x8c, 0x56, 0x4b),
    (0xe3, 0x77, 0xc2),
    (0x7f, 0x7f, 0x7f),
    (0xbc, 0xbd, 0x22),
    (0x17, 0xbe, 0xcf),
];

/// Number of distinct palette colors.
pub const PALETTE_SIZE: usize = CATEGORY10.len();

/// Returns the color for the series at `index`.
pub fn palette_color(index: usize) -> Color {
    let (r, g, b) = CATEGORY10[index % PALETTE_SIZE];
    Color::from_rgba8(r, g, b, 255)
}

/// A legend row: a series label and its color.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendItem {
    /// The label string shown next to the swatch.
    pub label: String,
    /// The swatch color.
    pub color: Color,
}

impl LegendItem {
    /// Convenience constructor for a solid-color swatch.
    pub fn solid(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            color,
        }
    }
}

/// Returns one legend item per series, in series order.
pub fn legend_items(data: &MetricsData) -> Vec<LegendItem> {
    data.metrics
        .iter()
        .enumerate()
        .map(|(i, s)| LegendItem::solid(s.metric_identifier.clone(), palette_color(i)))
        .collect()
}

/// Renders the prediction summary.
///
/// `None` without a prediction. The probability, when present, is appended as a percentage with
/// one decimal place: `"anomaly (87.3%)"`.
pub fn prediction_summary(annotation: &Annotation) -> Option<String> {
    let prediction = annotation.prediction.as_deref()?;
    Some(match annotation.probability {
        Some(p) => format!("{prediction} ({})", format_percent(p)),
        None => prediction.to_owned(),
    })
}

/// An unpositioned legend specification (swatches + labels).
///
/// - Measure: call [`LegendSwatchesSpec::measure`] to get a desired size.
/// - Arrange: call [`LegendSwatchesSpec::at`] once you know the origin.
#[derive(Clone, Debug)]
pub struct LegendSwatchesSpec {
    /// Swatch square size.
    pub swatch_size: f64,
    /// Vertical gap between rows.
    pub row_gap: f64,
    /// Horizontal gap between swatch and label.
    pub label_dx: f64,
    /// Label font size.
    pub font_size: f64,
    /// Label color.
    pub text_fill: Brush,
    /// Items in display order.
    pub items: Vec<LegendItem>,
}

impl LegendSwatchesSpec {
    /// Creates a new legend specification with defaults.
    pub fn new(items: Vec<LegendItem>) -> Self {
        Self {
            swatch_size: 10.0,
            row_gap: 6.0,
            label_dx: 6.0,
            font_size: 12.0,
            text_fill: css::BLACK.into(),
            items,
        }
    }

    /// Set the label text paint.
    pub fn with_text_fill(mut self, text_fill: impl Into<Brush>) -> Self {
        self.text_fill = text_fill.into();
        self
    }

    /// Set the label font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Set the swatch size.
    pub fn with_swatch_size(mut self, swatch_size: f64) -> Self {
        self.swatch_size = swatch_size;
        self
    }

    /// Measures the desired legend size.
    pub fn measure(&self, measurer: &impl TextMeasurer) -> Size {
        let b = self.at(0.0, 0.0).bounds(measurer);
        Size {
            width: b.width(),
            height: b.height(),
        }
    }

    /// Creates a positioned legend at the given origin.
    pub fn at(&self, x: f64, y: f64) -> LegendSwatches {
        LegendSwatches {
            origin: Point::new(x, y),
            spec: self.clone(),
        }
    }

    fn row_height(&self) -> f64 {
        self.swatch_size.max(self.font_size)
    }
}

/// One arranged legend row.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
    /// Swatch rectangle.
    pub swatch: Rect,
    /// Swatch color.
    pub color: Color,
    /// Label next to the swatch.
    pub label: TextLabel,
}

/// A positioned legend: a vertical list of color swatches with text labels.
#[derive(Clone, Debug)]
pub struct LegendSwatches {
    /// Top-left corner.
    pub origin: Point,
    /// Layout parameters and items.
    pub spec: LegendSwatchesSpec,
}

impl LegendSwatches {
    /// Arranges one entry per item, top to bottom.
    pub fn entries(&self) -> Vec<LegendEntry> {
        let spec = &self.spec;
        let row_height = spec.row_height();
        spec.items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let y = self.origin.y + i as f64 * (row_height + spec.row_gap);
                let swatch_y = y + (row_height - spec.swatch_size) * 0.5;
                LegendEntry {
                    swatch: Rect::new(
                        self.origin.x,
                        swatch_y,
                        self.origin.x + spec.swatch_size,
                        swatch_y + spec.swatch_size,
                    ),
                    color: item.color,
                    label: TextLabel {
                        pos: Point::new(
                            self.origin.x + spec.swatch_size + spec.label_dx,
                            y + row_height * 0.5,
                        ),
                        text: item.label.clone(),
                        anchor: TextAnchor::Start,
                        baseline: TextBaseline::Middle,
                        font_size: spec.font_size,
                        fill: spec.text_fill.clone(),
                    },
                }
            })
            .collect()
    }

    /// Estimates legend bounds using the provided text measurer.
    pub fn bounds(&self, measurer: &impl TextMeasurer) -> Rect {
        self.entries()
            .iter()
            .map(|e| {
                let (w, h) = measurer.measure(&e.label.text, e.label.font_size);
                let label = Rect::new(
                    e.label.pos.x,
                    e.label.pos.y - 0.5 * h,
                    e.label.pos.x + w,
                    e.label.pos.y + 0.5 * h,
                );
                e.swatch.union(label)
            })
            .reduce(|a, b| a.union(b))
            .unwrap_or_else(|| Rect::from_origin_size(self.origin, (0.0, 0.0)))
    }
}
