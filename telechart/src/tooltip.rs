// Copyright 2025 the Telechart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover tooltip overlay.
//!
//! Each mounted chart owns one [`TooltipOverlay`]. It is transient UI state: it is created on
//! mount, dropped on unmount, and never feeds back into geometry or zoom state.

use kurbo::{Point, Rect, Size};

use crate::config::TooltipConfig;
use crate::format::format_value;
use crate::marker::PointMarker;
use crate::measure::{HeuristicTextMeasurer, TextMeasurer};
use crate::time::format_instant;

/// Line height as a multiple of the font size.
const LINE_HEIGHT: f64 = 1.2;

/// A visible tooltip.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    /// Series of the hovered marker.
    pub series: usize,
    /// Sample position of the hovered marker.
    pub index: usize,
    /// Text lines: identifier, time, value.
    pub lines: Vec<String>,
    /// Overlay box in view coordinates.
    pub rect: Rect,
    /// Font size for the lines.
    pub font_size: f64,
    /// Inner padding.
    pub padding: f64,
}

/// Builds the tooltip lines for one sample.
pub fn tooltip_lines(label: &str, time_ms: f64, value: f64, utc_offset_minutes: i32) -> Vec<String> {
    vec![
        label.to_owned(),
        format!("Time: {}", format_instant(time_ms, utc_offset_minutes)),
        format!("Value: {}", format_value(value)),
    ]
}

/// Places a box of `size` at `pointer + offset`, optionally clamped into `view`.
pub fn place(pointer: Point, size: Size, config: &TooltipConfig, view: Rect) -> Rect {
    let mut origin = Point::new(pointer.x + config.offset_x, pointer.y + config.offset_y);
    if config.clamp {
        origin.x = origin.x.min(view.x1 - size.width).max(view.x0);
        origin.y = origin.y.min(view.y1 - size.height).max(view.y0);
    }
    Rect::from_origin_size(origin, size)
}

/// The per-chart tooltip overlay.
#[derive(Clone, Debug)]
pub struct TooltipOverlay {
    config: TooltipConfig,
    utc_offset_minutes: i32,
    visible: Option<Tooltip>,
}

impl TooltipOverlay {
    /// Creates a hidden overlay.
    pub fn new(config: TooltipConfig, utc_offset_minutes: i32) -> Self {
        Self {
            config,
            utc_offset_minutes,
            visible: None,
        }
    }

    /// Shows the overlay for `marker` at `pointer`.
    ///
    /// Hovering the marker that is already shown only repositions the box.
    pub fn show(&mut self, marker: &PointMarker, label: &str, pointer: Point, view: Rect) -> &Tooltip {
        let same = self
            .visible
            .as_ref()
            .is_some_and(|t| t.series == marker.series && t.index == marker.index);
        let lines = match self.visible.take() {
            Some(t) if same => t.lines,
            _ => tooltip_lines(label, marker.time_ms, marker.value, self.utc_offset_minutes),
        };
        let size = self.box_size(&lines);
        self.visible.insert(Tooltip {
            series: marker.series,
            index: marker.index,
            rect: place(pointer, size, &self.config, view),
            lines,
            font_size: self.config.font_size,
            padding: self.config.padding,
        })
    }

    /// Hides the overlay.
    pub fn hide(&mut self) {
        self.visible = None;
    }

    /// Returns the visible tooltip, if any.
    pub fn current(&self) -> Option<&Tooltip> {
        self.visible.as_ref()
    }

    /// Extra pick distance beyond the marker radius.
    pub fn hit_slop(&self) -> f64 {
        self.config.hit_slop
    }

    fn box_size(&self, lines: &[String]) -> Size {
        let measurer = HeuristicTextMeasurer;
        let font_size = self.config.font_size;
        let width = lines
            .iter()
            .map(|l| measurer.measure(l, font_size).0)
            .fold(0.0_f64, f64::max);
        let height = lines.len() as f64 * font_size * LINE_HEIGHT;
        Size::new(
            width + 2.0 * self.config.padding,
            height + 2.0 * self.config.padding,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::Symbol;
    use crate::time::parse_instant;

    fn marker(series: usize, index: usize, value: f64) -> PointMarker {
        PointMarker {
            series,
            index,
            time_ms: parse_instant("2024-03-01T10:15:00Z").expect("instant"),
            value,
            pos: Point::new(100.0, 100.0),
            radius: 2.0,
            symbol: Symbol::Circle,
        }
    }

    #[test]
    fn lines_use_fixed_value_precision() {
        let lines = tooltip_lines("temp", 0.0, 12.0, 0);
        assert_eq!(lines[0], "temp");
        assert_eq!(lines[1], "Time: 1970-01-01 00:00:00");
        assert_eq!(lines[2], "Value: 12.00");
    }

    #[test]
    fn box_is_offset_from_pointer() {
        let view = Rect::new(0.0, 0.0, 800.0, 300.0);
        let mut overlay = TooltipOverlay::new(TooltipConfig::default(), 0);
        let t = overlay.show(&marker(0, 1, 3.0), "temp", Point::new(200.0, 150.0), view);
        assert_eq!(t.rect.origin(), Point::new(210.0, 122.0));
        assert_eq!(t.lines[1], "Time: 2024-03-01 10:15:00");
    }

    #[test]
    fn box_is_clamped_into_view() {
        let view = Rect::new(0.0, 0.0, 300.0, 200.0);
        let mut overlay = TooltipOverlay::new(TooltipConfig::default(), 0);
        let t = overlay.show(&marker(0, 1, 3.0), "temp", Point::new(295.0, 5.0), view);
        assert!(t.rect.x1 <= view.x1 + 1e-9);
        assert!(t.rect.y0 >= view.y0);

        let unclamped = TooltipConfig {
            clamp: false,
            ..TooltipConfig::default()
        };
        let r = place(Point::new(295.0, 5.0), Size::new(50.0, 40.0), &unclamped, view);
        assert_eq!(r.origin(), Point::new(305.0, -23.0));
    }

    #[test]
    fn moving_over_the_same_marker_repositions() {
        let view = Rect::new(0.0, 0.0, 800.0, 300.0);
        let mut overlay = TooltipOverlay::new(TooltipConfig::default(), 0);
        let first = overlay.show(&marker(0, 1, 3.0), "temp", Point::new(100.0, 100.0), view).clone();
        let second = overlay.show(&marker(0, 1, 3.0), "temp", Point::new(101.0, 100.0), view).clone();
        assert_eq!(first.lines, second.lines);
        assert_eq!(second.rect.x0 - first.rect.x0, 1.0);

        overlay.hide();
        assert!(overlay.current().is_none());
    }
}
