// Copyright 2025 the Telechart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis geometry generation.
//!
//! The chart has two axes: a bottom axis driven by the (possibly rescaled) temporal scale and a
//! left axis driven by the niced value scale. Each is arranged into a domain line plus one tick
//! line and label per tick that projects inside the plot.

use kurbo::{Line, Point, Rect};
use peniko::Brush;
use peniko::color::palette::css;

use crate::format::format_tick_with_step;
use crate::scale::{ScaleLinear, ScaleTime};
use crate::time::{format_time_tick, nice_time_step_ms};

/// Tolerance used when deciding whether a tick projects inside the plot.
const EDGE_EPSILON: f64 = 1.0e-9;

/// Horizontal text alignment relative to a label's anchor point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    /// The anchor is at the start of the text.
    Start,
    /// The anchor is at the center of the text.
    Middle,
    /// The anchor is at the end of the text.
    End,
}

/// Vertical text alignment relative to a label's anchor point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextBaseline {
    /// The anchor is at the vertical middle of the text.
    Middle,
    /// The anchor is at the top of the text.
    Hanging,
    /// The anchor is on the alphabetic baseline.
    Alphabetic,
}

/// A positioned single-line label.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLabel {
    /// Anchor point.
    pub pos: Point,
    /// Label text.
    pub text: String,
    /// Horizontal alignment.
    pub anchor: TextAnchor,
    /// Vertical alignment.
    pub baseline: TextBaseline,
    /// Font size in pixels.
    pub font_size: f64,
    /// Text paint.
    pub fill: Brush,
}

/// A paint + width pair for stroked paths (domain lines, ticks, series lines).
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Stroke paint.
    pub brush: Brush,
    /// Stroke width in scene coordinates.
    pub stroke_width: f64,
}

impl StrokeStyle {
    /// Convenience for a solid stroke.
    pub fn solid(brush: impl Into<Brush>, stroke_width: f64) -> Self {
        Self {
            brush: brush.into(),
            stroke_width,
        }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::solid(css::BLACK, 1.0)
    }
}

/// Axis styling defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisStyle {
    /// Style for the axis domain line and tick marks.
    pub rule: StrokeStyle,
    /// Fill paint for tick labels.
    pub label_fill: Brush,
    /// Font size for tick labels.
    pub label_font_size: f64,
    /// Tick line length.
    pub tick_size: f64,
    /// Gap between the tick end and its label.
    pub tick_padding: f64,
}

impl Default for AxisStyle {
    fn default() -> Self {
        let rule = StrokeStyle::default();
        Self {
            label_fill: rule.brush.clone(),
            rule,
            label_font_size: 10.0,
            tick_size: 6.0,
            tick_padding: 3.0,
        }
    }
}

/// Which side of the plot an axis sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisOrient {
    /// Below the plot (time axis).
    Bottom,
    /// Left of the plot (value axis).
    Left,
}

/// One tick: its data value, its tick line and its label.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisTick {
    /// Tick value in data units (epoch milliseconds for the time axis).
    pub value: f64,
    /// Tick line.
    pub line: Line,
    /// Tick label.
    pub label: TextLabel,
}

/// Arranged axis geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisGeometry {
    /// Axis placement.
    pub orient: AxisOrient,
    /// The domain line along the plot edge.
    pub domain: Line,
    /// Ticks inside the plot, in ascending value order.
    pub ticks: Vec<AxisTick>,
    /// Tick step in data units (used for label precision).
    pub step: f64,
    /// Styling used to arrange the axis.
    pub style: AxisStyle,
}

impl AxisGeometry {
    /// Arranges the bottom time axis for a temporal scale spanning the plot's width.
    pub fn time_bottom(scale: &ScaleTime, plot: Rect, tick_count: usize, style: &AxisStyle) -> Self {
        let values = scale.ticks(tick_count);
        let (d0, d1) = scale.domain();
        let step = match tick_step(&values) {
            s if s > 0.0 => s,
            _ => nice_time_step_ms((d1 - d0).abs() / tick_count.max(1) as f64),
        };
        let offset = scale.utc_offset_minutes();
        let y = plot.y1;
        let ticks = values
            .into_iter()
            .filter_map(|v| {
                let x = scale.map(v);
                if x < plot.x0 - EDGE_EPSILON || x > plot.x1 + EDGE_EPSILON {
                    return None;
                }
                Some(AxisTick {
                    value: v,
                    line: Line::new((x, y), (x, y + style.tick_size)),
                    label: TextLabel {
                        pos: Point::new(x, y + style.tick_size + style.tick_padding),
                        text: format_time_tick(v, step, offset),
                        anchor: TextAnchor::Middle,
                        baseline: TextBaseline::Hanging,
                        font_size: style.label_font_size,
                        fill: style.label_fill.clone(),
                    },
                })
            })
            .collect();
        Self {
            orient: AxisOrient::Bottom,
            domain: Line::new((plot.x0, y), (plot.x1, y)),
            ticks,
            step,
            style: style.clone(),
        }
    }

    /// Arranges the left value axis for a linear scale spanning the plot's height.
    pub fn value_left(scale: &ScaleLinear, plot: Rect, tick_count: usize, style: &AxisStyle) -> Self {
        let values = scale.ticks(tick_count);
        let step = tick_step(&values);
        let x = plot.x0;
        let ticks = values
            .into_iter()
            .filter_map(|v| {
                let y = scale.map(v);
                if y < plot.y0 - EDGE_EPSILON || y > plot.y1 + EDGE_EPSILON {
                    return None;
                }
                Some(AxisTick {
                    value: v,
                    line: Line::new((x, y), (x - style.tick_size, y)),
                    label: TextLabel {
                        pos: Point::new(x - style.tick_size - style.tick_padding, y),
                        text: format_tick_with_step(v, step),
                        anchor: TextAnchor::End,
                        baseline: TextBaseline::Middle,
                        font_size: style.label_font_size,
                        fill: style.label_fill.clone(),
                    },
                })
            })
            .collect();
        Self {
            orient: AxisOrient::Left,
            domain: Line::new((x, plot.y0), (x, plot.y1)),
            ticks,
            step,
            style: style.clone(),
        }
    }

    /// Iterates over the tick label strings.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.ticks.iter().map(|t| t.label.text.as_str())
    }
}

fn tick_step(ticks: &[f64]) -> f64 {
    let step = ticks
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .fold(f64::INFINITY, f64::min);
    if step.is_finite() { step } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::ScaleLinearSpec;
    use crate::time::parse_instant;

    fn plot() -> Rect {
        Rect::new(50.0, 20.0, 450.0, 220.0)
    }

    #[test]
    fn value_axis_labels_share_precision() {
        let scale = ScaleLinearSpec::new((0.0, 1.0))
            .with_nice(true)
            .instantiate_resolved((plot().y1, plot().y0), 10);
        let axis = AxisGeometry::value_left(&scale, plot(), 10, &AxisStyle::default());
        let labels: Vec<&str> = axis.labels().collect();
        assert_eq!(labels.first(), Some(&"0.0"));
        assert_eq!(labels.last(), Some(&"1.0"));
        assert_eq!(axis.ticks.len(), 11);
        for tick in &axis.ticks {
            assert_eq!(tick.label.anchor, TextAnchor::End);
            assert!(tick.line.p0.y >= plot().y0 && tick.line.p0.y <= plot().y1);
        }
    }

    #[test]
    fn time_axis_only_emits_ticks_inside_the_plot() {
        let t0 = parse_instant("2024-03-01T00:00:00Z").expect("instant");
        let t1 = parse_instant("2024-03-01T01:00:00Z").expect("instant");
        let scale = ScaleTime::new((t0, t1), (plot().x0, plot().x1));
        let axis = AxisGeometry::time_bottom(&scale, plot(), 6, &AxisStyle::default());
        assert!(!axis.ticks.is_empty());
        assert_eq!(axis.labels().next(), Some("00:00"));
        for tick in &axis.ticks {
            assert!(tick.line.p0.x >= plot().x0 && tick.line.p0.x <= plot().x1);
            assert_eq!(tick.line.p0.y, plot().y1);
        }
    }

    #[test]
    fn time_axis_step_falls_back_for_a_single_tick() {
        // Domain too narrow for two aligned ticks.
        let scale = ScaleTime::new((1_000.5, 1_001.4), (0.0, 100.0));
        let axis = AxisGeometry::time_bottom(&scale, Rect::new(0.0, 0.0, 100.0, 50.0), 10, &AxisStyle::default());
        assert!(axis.step > 0.0);
    }
}
