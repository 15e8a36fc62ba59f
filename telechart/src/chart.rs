// Copyright 2025 the Telechart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The chart pipeline.
//!
//! Rendering is split into three explicit stages:
//!
//! 1. **Rebuild**: layout, scales, series geometry and axes are derived from the snapshot and
//!    the chart size. This runs only when the chart has been invalidated (new snapshot, new
//!    height, or a container resize).
//! 2. **Attach**: [`TimeSeriesChart::mount`] subscribes to container resizes and creates the
//!    tooltip overlay. [`TimeSeriesChart::unmount`] (or dropping the chart) releases both.
//! 3. **Re-project**: a zoom/pan gesture patches x coordinates of the existing geometry and
//!    regenerates the time axis. It never rebuilds.
//!
//! Every interaction flushes a pending rebuild first, so re-projection always runs against
//! geometry for the current snapshot and size. Re-projections carry the geometry generation
//! they were computed for and are discarded once that generation is gone.

use kurbo::Point;
use tracing::{debug, trace, warn};

use crate::axis::{AxisGeometry, AxisStyle};
use crate::config::ChartConfig;
use crate::layout::{ChartLayout, Margins, Size};
use crate::legend::{
    LegendEntry, LegendItem, LegendSwatchesSpec, legend_items, palette_color, prediction_summary,
};
use crate::marker::{PointMarker, hit_test};
use crate::measure::FixedAdvanceMeasurer;
use crate::model::MetricsData;
use crate::path::SeriesGeometry;
use crate::resize::{ResizeSignal, ResizeSubscription};
use crate::scale::{ScaleLinear, ScaleLinearSpec, ScaleTime, time_domain, value_domain};
use crate::time::parse_instant;
use crate::tooltip::{Tooltip, TooltipOverlay};
use crate::zoom::{Gesture, Reprojection, ZoomController, ZoomTransform};

/// Everything needed to draw one chart state.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartFrame {
    /// Layout rectangles.
    pub layout: ChartLayout,
    /// Unzoomed temporal scale.
    pub base_time_scale: ScaleTime,
    /// Temporal scale under the current transform.
    pub time_scale: ScaleTime,
    /// Value scale; never zoomed.
    pub value_scale: ScaleLinear,
    /// Bottom time axis (follows `time_scale`).
    pub time_axis: AxisGeometry,
    /// Left value axis.
    pub value_axis: AxisGeometry,
    /// Per-series geometry in display order.
    pub series: Vec<SeriesGeometry>,
    /// Arranged legend rows.
    pub legend: Vec<LegendEntry>,
    /// Series line width.
    pub stroke_width: f64,
    /// Transform `time_scale` was derived with.
    pub transform: ZoomTransform,
}

impl ChartFrame {
    /// Builds a frame at the identity transform.
    ///
    /// Returns `None` when there is nothing to draw: no series, no timestamps, no parseable
    /// timestamp, or no plot area left after the margins.
    pub fn build(data: &MetricsData, size: Size, config: &ChartConfig) -> Option<Self> {
        if data.is_empty() {
            debug!(
                series = data.metrics.len(),
                timestamps = data.timestamp.len(),
                "nothing to render"
            );
            return None;
        }
        if let Err(err) = data.validate() {
            warn!(%err, "series length differs from the timestamp axis; missing positions are gaps");
        }

        let instants: Vec<Option<f64>> = data
            .timestamp
            .iter()
            .enumerate()
            .map(|(index, text)| {
                let parsed = parse_instant(text);
                if parsed.is_none() {
                    warn!(index, timestamp = %text, "skipping unparseable timestamp");
                }
                parsed
            })
            .collect();

        let measurer = FixedAdvanceMeasurer::new(config.label_char_width);
        let margins = Margins::measure(
            config,
            &measurer,
            data.metrics.iter().map(|s| s.metric_identifier.as_str()),
        );
        let legend_spec =
            LegendSwatchesSpec::new(legend_items(data)).with_font_size(config.legend_font_size);
        let layout = ChartLayout::arrange(
            size,
            margins,
            legend_spec.measure(&measurer),
            config.legend_offset,
        );
        if layout.is_empty() {
            debug!(width = size.width, height = size.height, "plot area is empty");
            return None;
        }
        let plot = layout.plot;

        let Some(domain) = time_domain(&instants) else {
            warn!("no timestamp could be parsed");
            return None;
        };
        let time_scale = ScaleTime::new(domain, (plot.x0, plot.x1))
            .with_utc_offset_minutes(config.utc_offset_minutes);
        let value_scale = ScaleLinearSpec::new(value_domain(data))
            .with_nice(true)
            .instantiate_resolved((plot.y1, plot.y0), config.value_tick_count);

        let style = AxisStyle::default();
        let series = data
            .metrics
            .iter()
            .enumerate()
            .map(|(i, s)| {
                SeriesGeometry::build(
                    i,
                    s,
                    &instants,
                    &time_scale,
                    &value_scale,
                    palette_color(i),
                    config.marker_radius,
                    config.marker_symbol,
                )
            })
            .collect();

        Some(Self {
            layout,
            base_time_scale: time_scale,
            time_scale,
            value_scale,
            time_axis: AxisGeometry::time_bottom(&time_scale, plot, config.time_tick_count, &style),
            value_axis: AxisGeometry::value_left(
                &value_scale,
                plot,
                config.value_tick_count,
                &style,
            ),
            series,
            legend: legend_spec.at(layout.legend.x0, layout.legend.y0).entries(),
            stroke_width: config.stroke_width,
            transform: ZoomTransform::IDENTITY,
        })
    }

    /// Re-projects x coordinates and the time axis under `transform`.
    ///
    /// y coordinates, segment membership and the value axis are left untouched.
    pub fn reproject(&mut self, transform: ZoomTransform, time_tick_count: usize) {
        let plot = self.layout.plot;
        self.time_scale = transform.rescale(&self.base_time_scale, plot.x0);
        self.time_axis = AxisGeometry::time_bottom(
            &self.time_scale,
            plot,
            time_tick_count,
            &self.time_axis.style,
        );
        for series in &mut self.series {
            series.reproject_x(&self.time_scale);
        }
        self.transform = transform;
    }

    /// Iterates over all markers in draw order.
    pub fn markers(&self) -> impl Iterator<Item = &PointMarker> {
        self.series.iter().flat_map(|s| s.markers.iter())
    }

    /// Finds the marker under `p` among markers inside the plot.
    pub fn hit_test(&self, p: Point, slop: f64) -> Option<&PointMarker> {
        hit_test(self.markers(), p, slop, self.layout.plot)
    }

    /// Number of drawn path segments across all series.
    pub fn segment_count(&self) -> usize {
        self.series.iter().map(|s| s.segments.len()).sum()
    }
}

/// Output of the stateless [`render`] entry point.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedChart {
    /// Drawable frame, or `None` when there is nothing to draw.
    pub frame: Option<ChartFrame>,
    /// `(label, color)` pairs in series order.
    pub legend: Vec<LegendItem>,
    /// Prediction summary, when the snapshot carries a prediction.
    pub prediction: Option<String>,
}

/// Renders a snapshot at `size` without interaction state.
pub fn render(data: &MetricsData, size: Size, config: &ChartConfig) -> RenderedChart {
    RenderedChart {
        frame: ChartFrame::build(data, size, config),
        legend: legend_items(data),
        prediction: data.model.as_ref().and_then(prediction_summary),
    }
}

/// An interactive time-series chart instance.
///
/// Owns its snapshot, viewport, geometry and tooltip overlay; nothing is shared between
/// instances.
#[derive(Debug)]
pub struct TimeSeriesChart {
    config: ChartConfig,
    data: MetricsData,
    size: Size,
    frame: Option<ChartFrame>,
    invalidated: bool,
    generation: u64,
    zoom: ZoomController,
    subscription: Option<ResizeSubscription>,
    overlay: Option<TooltipOverlay>,
}

impl TimeSeriesChart {
    /// Creates an unmounted chart with an empty snapshot.
    pub fn new(config: ChartConfig) -> Self {
        Self {
            size: Size::new(config.width, config.height),
            zoom: ZoomController::new(config.zoom, 0.0),
            config,
            data: MetricsData::default(),
            frame: None,
            invalidated: true,
            generation: 0,
            subscription: None,
            overlay: None,
        }
    }

    /// Replaces the snapshot. The viewport resets on the next rebuild.
    pub fn set_data(&mut self, data: MetricsData) {
        self.data = data;
        self.invalidate();
    }

    /// Changes the chart height.
    pub fn set_height(&mut self, height: f64) {
        if self.size.height != height {
            self.size.height = height;
            self.invalidate();
        }
    }

    /// Marks the geometry stale.
    pub fn invalidate(&mut self) {
        self.invalidated = true;
    }

    /// Returns `true` if a rebuild is pending.
    pub fn is_invalidated(&self) -> bool {
        self.invalidated
    }

    /// Attaches the interaction layer: resize listening and the tooltip overlay.
    ///
    /// Mounting an already mounted chart first releases the previous attachment.
    pub fn mount(&mut self, signal: &ResizeSignal) {
        self.unmount();
        let subscription = signal.subscribe();
        if let Some(width) = subscription.current_width() {
            self.apply_width(width);
        }
        self.subscription = Some(subscription);
        self.overlay = Some(TooltipOverlay::new(
            self.config.tooltip,
            self.config.utc_offset_minutes,
        ));
        debug!(width = self.size.width, "chart mounted");
    }

    /// Releases the resize subscription and the tooltip overlay.
    pub fn unmount(&mut self) {
        if self.subscription.take().is_some() {
            debug!("chart unmounted");
        }
        self.overlay = None;
    }

    /// Returns `true` between [`mount`](Self::mount) and [`unmount`](Self::unmount).
    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    /// Picks up a pending container resize.
    pub fn sync_size(&mut self) {
        let pending = self.subscription.as_ref().and_then(|s| s.take_pending());
        if let Some(width) = pending {
            self.apply_width(width);
        }
    }

    fn apply_width(&mut self, width: f64) {
        if self.size.width != width {
            self.size.width = width;
            self.invalidate();
        }
    }

    /// Runs a pending rebuild. Returns `true` if one ran.
    pub fn flush(&mut self) -> bool {
        self.sync_size();
        if !self.invalidated {
            return false;
        }
        self.generation += 1;
        self.frame = ChartFrame::build(&self.data, self.size, &self.config);
        let plot_width = self.frame.as_ref().map_or(0.0, |f| f.layout.plot.width());
        self.zoom = ZoomController::new(self.config.zoom, plot_width);
        if let Some(overlay) = &mut self.overlay {
            overlay.hide();
        }
        self.invalidated = false;
        debug!(
            generation = self.generation,
            series = self.data.metrics.len(),
            width = self.size.width,
            height = self.size.height,
            drawn = self.frame.is_some(),
            "rebuilt chart geometry"
        );
        true
    }

    /// Returns the current frame, rebuilding first if needed.
    pub fn frame(&mut self) -> Option<&ChartFrame> {
        self.flush();
        self.frame.as_ref()
    }

    /// Computes the re-projection for a gesture without applying it.
    ///
    /// Pointer positions are in chart coordinates. Returns `None` when the chart is not
    /// mounted, has nothing drawn, or the gesture leaves the viewport unchanged.
    pub fn plan_gesture(&mut self, gesture: Gesture) -> Option<Reprojection> {
        if !self.is_mounted() {
            return None;
        }
        self.flush();
        let origin = self.frame.as_ref()?.layout.plot.x0;
        let local = match gesture {
            Gesture::Wheel { x, delta_y } => Gesture::Wheel {
                x: x - origin,
                delta_y,
            },
            Gesture::DoubleClick { x, zoom_out } => Gesture::DoubleClick {
                x: x - origin,
                zoom_out,
            },
            other => other,
        };
        let transform = self.zoom.apply(local)?;
        Some(Reprojection {
            generation: self.generation,
            transform,
        })
    }

    /// Applies a re-projection. Returns `false` if it was computed for older geometry.
    pub fn apply_reprojection(&mut self, reprojection: Reprojection) -> bool {
        self.flush();
        if reprojection.generation != self.generation {
            trace!(
                stale = reprojection.generation,
                live = self.generation,
                "discarding stale re-projection"
            );
            return false;
        }
        let Some(frame) = &mut self.frame else {
            return false;
        };
        frame.reproject(reprojection.transform, self.config.time_tick_count);
        trace!(
            k = reprojection.transform.k,
            x = reprojection.transform.x,
            "re-projected time axis"
        );
        true
    }

    /// Handles a zoom/pan gesture end to end. Returns the new transform if it changed.
    pub fn handle_gesture(&mut self, gesture: Gesture) -> Option<ZoomTransform> {
        let reprojection = self.plan_gesture(gesture)?;
        self.apply_reprojection(reprojection)
            .then_some(reprojection.transform)
    }

    /// Returns the current viewport transform.
    pub fn transform(&self) -> ZoomTransform {
        self.zoom.transform()
    }

    /// Updates the tooltip for a pointer at `p` (chart coordinates).
    pub fn pointer_move(&mut self, p: Point) -> Option<&Tooltip> {
        if !self.is_mounted() {
            return None;
        }
        self.flush();
        let overlay = self.overlay.as_mut()?;
        let frame = self.frame.as_ref()?;
        match frame.hit_test(p, overlay.hit_slop()) {
            Some(marker) => {
                let label = frame
                    .series
                    .get(marker.series)
                    .map_or("", |s| s.label.as_str());
                Some(overlay.show(marker, label, p, frame.layout.view))
            }
            None => {
                overlay.hide();
                None
            }
        }
    }

    /// Hides the tooltip.
    pub fn pointer_leave(&mut self) {
        if let Some(overlay) = &mut self.overlay {
            overlay.hide();
        }
    }

    /// Returns the visible tooltip, if any.
    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.overlay.as_ref().and_then(TooltipOverlay::current)
    }

    /// Returns `(label, color)` pairs for the current snapshot.
    pub fn legend(&self) -> Vec<LegendItem> {
        legend_items(&self.data)
    }

    /// Returns the prediction summary for the current snapshot.
    pub fn prediction_summary(&self) -> Option<String> {
        self.data.model.as_ref().and_then(prediction_summary)
    }

    /// Returns the current snapshot.
    pub fn data(&self) -> &MetricsData {
        &self.data
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Returns the chart size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Returns the geometry generation, incremented on every rebuild.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for TimeSeriesChart {
    fn drop(&mut self) {
        self.unmount();
    }
}
