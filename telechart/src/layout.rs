// Copyright 2025 the Telechart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A tiny measure/arrange layout helper for the chart.
//!
//! - **Measure**: the right margin is derived from the widest legend label.
//! - **Arrange**: the plot rectangle is whatever remains of the view after the margins, with the
//!   value axis to its left, the time axis below it, and the legend in the right margin.

use kurbo::Rect;

use crate::config::ChartConfig;
use crate::measure::TextMeasurer;

/// A width/height pair used by chart layout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    /// Width in chart coordinate units.
    pub width: f64,
    /// Height in chart coordinate units.
    pub height: f64,
}

impl Size {
    /// Creates a new size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Resolved margins around the plot.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Margins {
    /// Space above the plot.
    pub top: f64,
    /// Space right of the plot (legend).
    pub right: f64,
    /// Space below the plot (time axis).
    pub bottom: f64,
    /// Space left of the plot (value axis).
    pub left: f64,
}

impl Margins {
    /// Resolves margins from the configuration and the series labels.
    ///
    /// The right margin is `width(longest label) + legend_padding`, so it grows monotonically
    /// with the longest label.
    pub fn measure<'a>(
        config: &ChartConfig,
        measurer: &impl TextMeasurer,
        labels: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let widest = labels
            .into_iter()
            .map(|label| measurer.measure(label, config.legend_font_size).0)
            .fold(0.0_f64, f64::max);
        Self {
            top: config.margins.top.max(0.0),
            right: widest + config.legend_padding.max(0.0),
            bottom: config.margins.bottom.max(0.0),
            left: config.margins.left.max(0.0),
        }
    }
}

/// Output of the arrange pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartLayout {
    /// Outer chart bounds.
    pub view: Rect,
    /// The plot rectangle; series are clipped to it.
    pub plot: Rect,
    /// Reserved rectangle for the left (value) axis.
    pub axis_left: Rect,
    /// Reserved rectangle for the bottom (time) axis.
    pub axis_bottom: Rect,
    /// Legend placement rectangle.
    pub legend: Rect,
}

impl ChartLayout {
    /// Computes a layout for a view of the given size.
    ///
    /// The plot may come out with zero width or height when the view is smaller than the
    /// margins; see [`ChartLayout::is_empty`].
    pub fn arrange(view_size: Size, margins: Margins, legend_size: Size, legend_offset: f64) -> Self {
        let view_w = view_size.width.max(0.0);
        let view_h = view_size.height.max(0.0);
        let plot_w = (view_w - margins.left - margins.right).max(0.0);
        let plot_h = (view_h - margins.top - margins.bottom).max(0.0);

        let plot = Rect::new(
            margins.left,
            margins.top,
            margins.left + plot_w,
            margins.top + plot_h,
        );
        let axis_left = Rect::new(plot.x0 - margins.left, plot.y0, plot.x0, plot.y1);
        let axis_bottom = Rect::new(plot.x0, plot.y1, plot.x1, plot.y1 + margins.bottom);

        let offset = legend_offset.max(0.0);
        let legend = Rect::new(
            plot.x1 + offset,
            plot.y0,
            plot.x1 + offset + legend_size.width.max(0.0),
            plot.y0 + legend_size.height.max(0.0),
        );

        Self {
            view: Rect::new(0.0, 0.0, view_w, view_h),
            plot,
            axis_left,
            axis_bottom,
            legend,
        }
    }

    /// Returns `true` if the plot has no drawable area.
    pub fn is_empty(&self) -> bool {
        self.plot.width() <= 0.0 || self.plot.height() <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::FixedAdvanceMeasurer;

    #[test]
    fn plot_is_view_minus_margins() {
        let config = ChartConfig::default();
        let margins = Margins::measure(&config, &FixedAdvanceMeasurer::new(8.0), ["cpu", "memory"]);
        assert_eq!(margins.right, 6.0 * 8.0 + 60.0);

        let layout = ChartLayout::arrange(Size::new(800.0, 300.0), margins, Size::default(), 12.0);
        assert_eq!(layout.plot, Rect::new(50.0, 20.0, 800.0 - 108.0, 270.0));
        assert_eq!(layout.axis_bottom.y0, layout.plot.y1);
        assert_eq!(layout.legend.x0, layout.plot.x1 + 12.0);
        assert!(!layout.is_empty());
    }

    #[test]
    fn tiny_views_produce_an_empty_plot() {
        let config = ChartConfig::default();
        let margins = Margins::measure(&config, &FixedAdvanceMeasurer::default(), ["a"]);
        let layout = ChartLayout::arrange(Size::new(100.0, 40.0), margins, Size::default(), 0.0);
        assert!(layout.is_empty());
        assert!(layout.plot.width() >= 0.0);
        assert!(layout.plot.height() >= 0.0);
    }
}
