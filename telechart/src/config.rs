// Copyright 2025 the Telechart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart configuration.
//!
//! Every field has a default, so a partial JSON/JSON5 document deserializes into a complete
//! configuration. Programmatic callers can use the `with_*` builders instead.

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};
use crate::symbol::Symbol;

/// Fixed margins around the plot (the right margin is derived from the legend labels).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarginConfig {
    /// Space above the plot.
    pub top: f64,
    /// Space below the plot, reserved for the time axis.
    pub bottom: f64,
    /// Space left of the plot, reserved for the value axis.
    pub left: f64,
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self {
            top: 20.0,
            bottom: 30.0,
            left: 50.0,
        }
    }
}

/// Zoom/pan behavior.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    /// Smallest accepted zoom factor.
    pub min_scale: f64,
    /// Largest accepted zoom factor.
    pub max_scale: f64,
    /// Wheel delta multiplier; the zoom factor changes by `2^(-delta * sensitivity)`.
    pub wheel_sensitivity: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min_scale: 1.0,
            max_scale: 10.0,
            wheel_sensitivity: 0.002,
        }
    }
}

/// Tooltip overlay placement and hit testing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    /// Horizontal offset from the pointer.
    pub offset_x: f64,
    /// Vertical offset from the pointer.
    pub offset_y: f64,
    /// Extra pick distance beyond the marker radius.
    pub hit_slop: f64,
    /// Keep the overlay inside the chart bounds.
    pub clamp: bool,
    /// Font size used to estimate the overlay box.
    pub font_size: f64,
    /// Inner padding of the overlay box.
    pub padding: f64,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            offset_x: 10.0,
            offset_y: -28.0,
            hit_slop: 2.0,
            clamp: true,
            font_size: 12.0,
            padding: 6.0,
        }
    }
}

/// Top-level chart configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Requested chart width, used until a container width is known.
    pub width: f64,
    /// Requested chart height.
    pub height: f64,
    /// Fixed margins.
    pub margins: MarginConfig,
    /// Estimated advance per label character, in pixels.
    pub label_char_width: f64,
    /// Constant space added to the widest label for the legend margin.
    pub legend_padding: f64,
    /// Gap between the plot edge and the legend swatches.
    pub legend_offset: f64,
    /// Approximate tick count for the time axis.
    pub time_tick_count: usize,
    /// Approximate tick count for the value axis (also drives domain nicing).
    pub value_tick_count: usize,
    /// Series line width.
    pub stroke_width: f64,
    /// Point marker radius.
    pub marker_radius: f64,
    /// Point marker shape.
    pub marker_symbol: Symbol,
    /// Legend label font size; also sizes the legend margin.
    pub legend_font_size: f64,
    /// Offset applied when formatting instants (axis labels and tooltips).
    pub utc_offset_minutes: i32,
    /// Zoom/pan behavior.
    pub zoom: ZoomConfig,
    /// Tooltip behavior.
    pub tooltip: TooltipConfig,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 300.0,
            margins: MarginConfig::default(),
            label_char_width: 8.0,
            legend_padding: 60.0,
            legend_offset: 12.0,
            time_tick_count: 10,
            value_tick_count: 10,
            stroke_width: 2.0,
            marker_radius: 2.0,
            marker_symbol: Symbol::Circle,
            legend_font_size: 12.0,
            utc_offset_minutes: 0,
            zoom: ZoomConfig::default(),
            tooltip: TooltipConfig::default(),
        }
    }
}

impl ChartConfig {
    /// Parses a configuration from JSON.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the requested chart size.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the fixed margins.
    pub fn with_margins(mut self, margins: MarginConfig) -> Self {
        self.margins = margins;
        self
    }

    /// Sets the accepted zoom factor range.
    pub fn with_scale_extent(mut self, min_scale: f64, max_scale: f64) -> Self {
        self.zoom.min_scale = min_scale;
        self.zoom.max_scale = max_scale;
        self
    }

    /// Sets the tooltip behavior.
    pub fn with_tooltip(mut self, tooltip: TooltipConfig) -> Self {
        self.tooltip = tooltip;
        self
    }

    /// Sets the offset used when formatting instants.
    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }

    /// Checks that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        let z = &self.zoom;
        if !(z.min_scale.is_finite() && z.max_scale.is_finite()) || z.min_scale <= 0.0 {
            return Err(ChartError::InvalidConfig(format!(
                "zoom scale extent must be finite and positive, got [{}, {}]",
                z.min_scale, z.max_scale
            )));
        }
        if z.min_scale > z.max_scale {
            return Err(ChartError::InvalidConfig(format!(
                "zoom min_scale {} exceeds max_scale {}",
                z.min_scale, z.max_scale
            )));
        }
        if self.label_char_width < 0.0 || self.legend_padding < 0.0 {
            return Err(ChartError::InvalidConfig(
                "legend sizing must not be negative".into(),
            ));
        }
        // chrono only accepts offsets strictly within one day.
        if self.utc_offset_minutes.abs() >= 24 * 60 {
            return Err(ChartError::InvalidConfig(format!(
                "utc offset {} minutes is out of range",
                self.utc_offset_minutes
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let config = ChartConfig::from_json(r#"{ "height": 420, "zoom": { "max_scale": 4 } }"#)
            .expect("valid config");
        assert_eq!(config.height, 420.0);
        assert_eq!(config.width, 800.0);
        assert_eq!(config.zoom.min_scale, 1.0);
        assert_eq!(config.zoom.max_scale, 4.0);
        assert_eq!(config.margins, MarginConfig::default());
    }

    #[test]
    fn marker_symbol_reads_lowercase_names() {
        let config =
            ChartConfig::from_json(r#"{ "marker_symbol": "square" }"#).expect("valid config");
        assert_eq!(config.marker_symbol, Symbol::Square);
        assert_eq!(config.legend_font_size, 12.0);
    }

    #[test]
    fn inverted_scale_extent_is_rejected() {
        let config = ChartConfig::default().with_scale_extent(5.0, 2.0);
        assert!(matches!(
            config.validate(),
            Err(ChartError::InvalidConfig(_))
        ));
    }
}
