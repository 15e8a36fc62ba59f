// Copyright 2025 the Telechart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renders telemetry snapshots to SVG files.
//!
//! Usage: `telechart_demo [DATA.json] [CONFIG.json5]`
//!
//! Without a data file a synthetic three-series snapshot with gaps is used. The demo mounts a
//! chart, then walks it through a zoom, a pan, a hover and a container resize, writing one SVG
//! per state into `telechart_demo_out/`.

mod svg;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use kurbo::Point;
use serde_json::json;
use telechart::{
    Annotation, ChartConfig, FetchState, Gesture, MetricQuery, MetricSelection, MetricsData,
    ModelRef, ResizeSignal, Series, Size, TimeSeriesChart, render,
};
use tracing::{info, warn};

const OUT_DIR: &str = "telechart_demo_out";

fn main() -> Result<()> {
    // RUST_LOG takes precedence, fallback to info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let data_path = args.next();
    let config_path = args.next();

    let config = match &config_path {
        Some(path) => load_config(Path::new(path))?,
        None => ChartConfig::default(),
    };
    let data = match &data_path {
        Some(path) => load_data(Path::new(path))?,
        None => synthetic_snapshot(),
    };

    let out_dir = PathBuf::from(OUT_DIR);
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    placeholders_demo(&out_dir, &config)?;
    response_demo(&out_dir, &config)?;
    interactive_demo(&out_dir, &config, data)?;

    info!(dir = %out_dir.display(), "done");
    Ok(())
}

fn load_config(path: &Path) -> Result<ChartConfig> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: ChartConfig =
        json5::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

fn load_data(path: &Path) -> Result<MetricsData> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let data = MetricsData::from_json(&text)?;
    if let Err(err) = data.validate() {
        warn!(%err, "snapshot is ragged; rendering anyway");
    }
    Ok(data)
}

fn write_svg(dir: &Path, name: &str, svg: &str) -> Result<()> {
    let path = dir.join(format!("{name}.svg"));
    fs::write(&path, svg).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "wrote");
    Ok(())
}

fn synthetic_snapshot() -> MetricsData {
    let n: i32 = 120;
    let timestamp = (0..n)
        .map(|i| format!("2024-03-01T{:02}:{:02}:00", 8 + i / 60, i % 60))
        .collect();
    let vibration = (0..n)
        .map(|i| {
            let t = f64::from(i) / 10.0;
            (i % 17 != 5).then(|| 0.5 + 0.4 * t.sin())
        })
        .collect();
    let temperature = (0..n)
        .map(|i| {
            let t = f64::from(i) / 25.0;
            (!(40..48).contains(&i)).then(|| 0.9 + 0.2 * t.cos())
        })
        .collect();
    let load = (0..n)
        .map(|i| Some(if (i / 30) % 2 == 0 { 0.2 } else { 0.35 }))
        .collect();

    MetricsData::new(
        timestamp,
        vec![
            Series::new("vibration_rms", "g", vibration),
            Series::new("bearing_temperature", "kC", temperature),
            Series::new("load", "", load),
        ],
    )
    .with_model(Annotation {
        name: Some("gearbox-health".into()),
        prediction: Some("anomaly".into()),
        probability: Some(0.873),
    })
}

fn placeholders_demo(dir: &Path, config: &ChartConfig) -> Result<()> {
    let size = Size::new(config.width, config.height);
    for (name, state) in [
        ("loading", FetchState::Loading),
        ("error", FetchState::Failed("upstream timed out".into())),
    ] {
        if let Some(text) = state.placeholder() {
            write_svg(dir, name, &svg::placeholder_svg(size, &text))?;
        }
    }
    Ok(())
}

fn response_demo(dir: &Path, config: &ChartConfig) -> Result<()> {
    let query = MetricQuery::NumericScalarModel {
        selection: MetricSelection {
            tenant_identifier: "acme".into(),
            device_identifier: "gearbox-7".into(),
            start: "2024-03-01T08:00:00".into(),
            end: "2024-03-01T08:05:00".into(),
            metric_identifier: vec!["vibration_x".into(), "vibration_y".into()],
            ..MetricSelection::default()
        },
        model: ModelRef {
            name: "gearbox-health".into(),
            model_type: "classifier".into(),
            window_size: 64,
            version: "3".into(),
        },
    };
    info!(variables = %serde_json::Value::Object(query.variables()?), "request");

    let response = json!({
        "numericScalarModel": [
            {
                "metricIdentifier": "vibration_x",
                "unit": "g",
                "values": [
                    { "timestampLocal": "2024-03-01T08:00:00", "value": 0.41 },
                    { "timestampLocal": "2024-03-01T08:01:00", "value": 0.47 },
                    { "timestampLocal": "2024-03-01T08:02:00", "value": null },
                    { "timestampLocal": "2024-03-01T08:03:00", "value": 0.52 },
                    { "timestampLocal": "2024-03-01T08:04:00", "value": 0.49 }
                ],
                "model": { "name": "gearbox-health", "predicted": "normal", "probability": null }
            },
            {
                "metricIdentifier": "vibration_y",
                "unit": "g",
                "values": [
                    { "timestampLocal": "2024-03-01T08:00:00", "value": 0.12 },
                    { "timestampLocal": "2024-03-01T08:01:00", "value": 0.15 },
                    { "timestampLocal": "2024-03-01T08:02:00", "value": 0.11 },
                    { "timestampLocal": "2024-03-01T08:03:00", "value": 0.18 },
                    { "timestampLocal": "2024-03-01T08:04:00", "value": 0.14 }
                ]
            }
        ]
    });
    let data = MetricsData::from_response(&query, &response)?;
    let size = Size::new(config.width, config.height);
    let rendered = render(&data, size, config);
    for item in &rendered.legend {
        let rgba = item.color.to_rgba8();
        info!(label = %item.label, color = %format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b), "legend");
    }
    match &rendered.frame {
        Some(frame) => write_svg(
            dir,
            "response",
            &svg::frame_to_svg(frame, None, rendered.prediction.as_deref()),
        ),
        None => {
            warn!("response snapshot has nothing to draw");
            Ok(())
        }
    }
}

fn interactive_demo(dir: &Path, config: &ChartConfig, data: MetricsData) -> Result<()> {
    let signal = ResizeSignal::with_width(config.width);
    let mut chart = TimeSeriesChart::new(config.clone());
    chart.set_data(data);
    chart.mount(&signal);

    snapshot(dir, "overview", &mut chart)?;
    let Some(plot) = chart.frame().map(|f| f.layout.plot) else {
        warn!("snapshot has nothing to draw");
        chart.unmount();
        return Ok(());
    };

    chart.handle_gesture(Gesture::Wheel {
        x: plot.center().x,
        delta_y: -600.0,
    });
    snapshot(dir, "zoomed", &mut chart)?;

    chart.handle_gesture(Gesture::Drag { dx: -120.0 });
    snapshot(dir, "panned", &mut chart)?;

    let target = chart.frame().and_then(|f| {
        f.markers()
            .find(|m| f.layout.plot.contains(m.pos))
            .map(|m| m.pos)
    });
    if let Some(p) = target {
        chart.pointer_move(Point::new(p.x + 1.0, p.y));
    }
    snapshot(dir, "hover", &mut chart)?;
    chart.pointer_leave();

    signal.resize(config.width * 0.75);
    snapshot(dir, "resized", &mut chart)?;

    chart.unmount();
    info!(listeners = signal.listener_count(), "unmounted");
    Ok(())
}

fn snapshot(dir: &Path, name: &str, chart: &mut TimeSeriesChart) -> Result<()> {
    let prediction = chart.prediction_summary();
    let tooltip = chart.tooltip().cloned();
    let Some(frame) = chart.frame() else {
        return Ok(());
    };
    let svg = svg::frame_to_svg(frame, tooltip.as_ref(), prediction.as_deref());
    write_svg(dir, name, &svg)
}
