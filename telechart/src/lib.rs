// Copyright 2025 the Telechart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An interactive line-chart engine for multi-series telemetry.
//!
//! Telechart turns a [`MetricsData`] snapshot (a shared timestamp axis, one or more series with
//! possibly absent samples, and an optional model prediction) into drawable geometry:
//! - **Scales** map instants and values into plot coordinates.
//! - **Series paths** are split at absent samples; gaps are never bridged.
//! - **Guides** (axes, legend) are generated as positioned lines, rectangles and labels.
//! - **Interaction** (zoom/pan of the time axis, hover tooltips) re-projects existing geometry
//!   instead of rebuilding it.
//!
//! Drawing is left to the host: a [`ChartFrame`] contains only `kurbo` geometry and `peniko`
//! colors. Text is not shaped; label sizes come from a [`TextMeasurer`].

mod axis;
mod chart;
mod config;
mod error;
mod format;
mod layout;
mod legend;
mod marker;
mod measure;
mod model;
mod path;
mod query;
mod resize;
mod scale;
mod symbol;
mod time;
mod tooltip;
mod zoom;

pub use axis::{
    AxisGeometry, AxisOrient, AxisStyle, AxisTick, StrokeStyle, TextAnchor, TextBaseline,
    TextLabel,
};
pub use chart::{ChartFrame, RenderedChart, TimeSeriesChart, render};
pub use config::{ChartConfig, MarginConfig, TooltipConfig, ZoomConfig};
pub use error::{ChartError, Result};
pub use format::{format_percent, format_tick_with_step, format_value};
pub use layout::{ChartLayout, Margins, Size};
pub use legend::{
    LegendEntry, LegendItem, LegendSwatches, LegendSwatchesSpec, PALETTE_SIZE, PREDICTION_TITLE,
    legend_items, palette_color, prediction_summary,
};
pub use marker::{PointMarker, hit_test};
pub use measure::{FixedAdvanceMeasurer, HeuristicTextMeasurer, TextMeasurer};
pub use model::{Annotation, MetricsData, Series};
pub use path::{PathSegment, Sample, SeriesGeometry, present_runs};
pub use query::{
    Aggregation, FetchState, Grouping, MetricEntry, MetricQuery, MetricSample, MetricSelection,
    ModelOutput, ModelRef,
};
pub use resize::{ResizeSignal, ResizeSubscription};
pub use scale::{
    FLAT_VALUE_PAD, SINGLE_INSTANT_PAD_MS, ScaleLinear, ScaleLinearSpec, ScaleTime, time_domain,
    value_domain,
};
pub use symbol::Symbol;
pub use time::{
    format_instant, format_time_tick, nice_time_ticks_ms, parse_instant, parse_instant_at,
};
pub use tooltip::{Tooltip, TooltipOverlay, place as place_tooltip, tooltip_lines};
pub use zoom::{Gesture, Reprojection, ZoomController, ZoomTransform};
