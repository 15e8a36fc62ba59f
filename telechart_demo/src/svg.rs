// Copyright 2025 the Telechart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG dump utilities for `telechart_demo`.

use kurbo::{Line, Rect};
use peniko::{Brush, Color};
use peniko::color::palette::css;
use telechart::{
    AxisGeometry, ChartFrame, PREDICTION_TITLE, Size, StrokeStyle, TextAnchor, TextBaseline,
    TextLabel, Tooltip,
};

/// Serializes one chart state, with an optional tooltip and prediction summary.
pub(crate) fn frame_to_svg(
    frame: &ChartFrame,
    tooltip: Option<&Tooltip>,
    prediction: Option<&str>,
) -> String {
    let view = frame.layout.view;
    let plot = frame.layout.plot;
    let mut out = open_svg(view);

    out.push_str(&format!(
        r#"<defs><clipPath id="plot"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath></defs>"#,
        plot.x0,
        plot.y0,
        plot.width(),
        plot.height()
    ));
    out.push('\n');

    write_axis(&mut out, &frame.value_axis);
    write_axis(&mut out, &frame.time_axis);

    out.push_str("<g clip-path=\"url(#plot)\">\n");
    for series in &frame.series {
        let stroke = StrokeStyle::solid(series.color, frame.stroke_width);
        for path in series.paths() {
            out.push_str(&format!(r#"<path d="{}" fill="none""#, path.to_svg()));
            write_paint_attr(&mut out, "stroke", &stroke.brush);
            out.push_str(&format!(r#" stroke-width="{}"/>"#, stroke.stroke_width));
            out.push('\n');
        }
        for marker in &series.markers {
            out.push_str(&format!(r#"<path d="{}""#, marker.path().to_svg()));
            write_paint_attr(&mut out, "fill", &Brush::Solid(series.color));
            out.push_str("/>\n");
        }
    }
    out.push_str("</g>\n");

    for entry in &frame.legend {
        write_rect(&mut out, entry.swatch, entry.color);
        write_label(&mut out, &entry.label);
    }

    if let Some(text) = prediction {
        let x = frame.layout.legend.x0;
        let y = frame.layout.legend.y1 + 24.0;
        write_label(&mut out, &plain_label(x, y, PREDICTION_TITLE, 12.0));
        write_label(&mut out, &plain_label(x, y + 16.0, text, 12.0));
    }

    if let Some(tooltip) = tooltip {
        write_tooltip(&mut out, tooltip);
    }

    out.push_str("</svg>\n");
    out
}

/// Serializes a text-only placeholder (loading / error states).
pub(crate) fn placeholder_svg(size: Size, text: &str) -> String {
    let view = Rect::new(0.0, 0.0, size.width, size.height);
    let mut out = open_svg(view);
    let mut label = plain_label(view.center().x, view.center().y, text, 14.0);
    label.anchor = TextAnchor::Middle;
    label.baseline = TextBaseline::Middle;
    write_label(&mut out, &label);
    out.push_str("</svg>\n");
    out
}

fn open_svg(view: Rect) -> String {
    let mut out = String::new();
    out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
    out.push_str(&format!(
        r#"viewBox="{} {} {} {}" width="{}" height="{}" font-family="sans-serif">"#,
        view.x0,
        view.y0,
        view.width(),
        view.height(),
        view.width(),
        view.height()
    ));
    out.push('\n');
    write_rect(&mut out, view, css::WHITE);
    out
}

fn plain_label(x: f64, y: f64, text: &str, font_size: f64) -> TextLabel {
    TextLabel {
        pos: (x, y).into(),
        text: text.to_owned(),
        anchor: TextAnchor::Start,
        baseline: TextBaseline::Alphabetic,
        font_size,
        fill: css::BLACK.into(),
    }
}

fn write_axis(out: &mut String, axis: &AxisGeometry) {
    write_line(out, axis.domain, &axis.style.rule);
    for tick in &axis.ticks {
        write_line(out, tick.line, &axis.style.rule);
        write_label(out, &tick.label);
    }
}

fn write_tooltip(out: &mut String, tooltip: &Tooltip) {
    let r = tooltip.rect;
    out.push_str(&format!(
        r#"<rect x="{}" y="{}" width="{}" height="{}" rx="4""#,
        r.x0,
        r.y0,
        r.width(),
        r.height()
    ));
    write_paint_attr(out, "fill", &Brush::Solid(css::WHITE.with_alpha(0.9)));
    write_paint_attr(out, "stroke", &Brush::Solid(css::GRAY));
    out.push_str("/>\n");
    let line_height = tooltip.font_size * 1.2;
    for (i, line) in tooltip.lines.iter().enumerate() {
        let mut label = plain_label(
            r.x0 + tooltip.padding,
            r.y0 + tooltip.padding + i as f64 * line_height,
            line,
            tooltip.font_size,
        );
        label.baseline = TextBaseline::Hanging;
        write_label(out, &label);
    }
}

fn write_rect(out: &mut String, rect: Rect, color: Color) {
    out.push_str(&format!(
        r#"<rect x="{}" y="{}" width="{}" height="{}""#,
        rect.x0,
        rect.y0,
        rect.width(),
        rect.height(),
    ));
    write_paint_attr(out, "fill", &Brush::Solid(color));
    out.push_str("/>\n");
}

fn write_line(out: &mut String, line: Line, stroke: &StrokeStyle) {
    out.push_str(&format!(
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}""#,
        line.p0.x, line.p0.y, line.p1.x, line.p1.y
    ));
    write_paint_attr(out, "stroke", &stroke.brush);
    out.push_str(&format!(r#" stroke-width="{}"/>"#, stroke.stroke_width));
    out.push('\n');
}

fn write_label(out: &mut String, t: &TextLabel) {
    let baseline = match t.baseline {
        TextBaseline::Middle => "middle",
        TextBaseline::Alphabetic => "alphabetic",
        TextBaseline::Hanging => "hanging",
    };
    out.push_str(&format!(
        r#"<text x="{}" y="{}" font-size="{}" dominant-baseline="{}""#,
        t.pos.x, t.pos.y, t.font_size, baseline
    ));
    out.push_str(match t.anchor {
        TextAnchor::Start => r#" text-anchor="start""#,
        TextAnchor::Middle => r#" text-anchor="middle""#,
        TextAnchor::End => r#" text-anchor="end""#,
    });
    write_paint_attr(out, "fill", &t.fill);
    out.push('>');
    out.push_str(&escape_xml(&t.text));
    out.push_str("</text>\n");
}

fn svg_paint(brush: &Brush) -> (String, Option<f64>) {
    match brush {
        Brush::Solid(color) => {
            let rgba = color.to_rgba8();
            let fill = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
            let fill_opacity = if rgba.a == 255 {
                None
            } else {
                Some(f64::from(rgba.a) / 255.0)
            };
            (fill, fill_opacity)
        }
        _ => ("none".to_string(), None),
    }
}

fn write_paint_attr(out: &mut String, name: &str, brush: &Brush) {
    let (value, opacity) = svg_paint(brush);
    out.push_str(&format!(r#" {name}="{value}""#));
    if let Some(o) = opacity {
        out.push_str(&format!(r#" {name}-opacity="{o}""#));
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_escaped() {
        let mut out = String::new();
        write_label(&mut out, &plain_label(0.0, 0.0, "a<b & c", 10.0));
        assert!(out.contains("a&lt;b &amp; c"));
    }

    #[test]
    fn placeholder_contains_text() {
        let svg = placeholder_svg(Size::new(200.0, 100.0), "Loading...");
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(">Loading...</text>"));
    }
}
