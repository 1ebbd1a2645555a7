//! Visualization: render a [`Chart`] to a standalone **SVG** document.
//!
//! Drawing order (later elements paint over earlier ones):
//! 1. unlabeled grid lines at the x/y tick positions
//! 2. x (time) and y (value) axes with tick labels and titles
//! 3. one `<g class="country">` per series holding its path and end label
//!
//! Series paths carry `stroke-dasharray="L,L"` and the current `stroke-dashoffset`, labels
//! carry the current `opacity`, so any frame of the animation can be written out. In
//! [`RenderMode::Animated`] the document instead starts hidden and replays the entrance
//! with SMIL `<animate>` elements.

pub mod text;
pub mod types;
pub mod util;

pub use types::RenderMode;

use crate::chart::{Chart, LABEL_DX, LABEL_FONT_PX};
use crate::curve::fmt_num;
use std::fmt::{self, Write};

use text::xml_escape;
use types::{CUBIC_IN_OUT_SPLINE, GRID_OPACITY, GRID_STROKE, TICK_PADDING, TICK_SIZE};
use util::{format_tick_value, to_hex};

/// Current animation state as SVG.
pub fn render_svg(chart: &Chart) -> String {
    render(chart, RenderMode::Snapshot)
}

/// Self-animating SVG that replays the entrance sequence.
pub fn render_animated_svg(chart: &Chart) -> String {
    render(chart, RenderMode::Animated)
}

pub fn render(chart: &Chart, mode: RenderMode) -> String {
    let mut out = String::with_capacity(16 * 1024);
    write_document(&mut out, chart, mode).expect("writing to a String cannot fail");
    out
}

fn write_document(out: &mut String, chart: &Chart, mode: RenderMode) -> fmt::Result {
    let cfg = chart.config();
    let (w, h) = (cfg.outer_width(), cfg.outer_height());
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = fmt_num(w),
        h = fmt_num(h)
    )?;
    writeln!(
        out,
        r#"<g transform="translate({},{})">"#,
        fmt_num(cfg.margins.left),
        fmt_num(cfg.margins.top)
    )?;
    write_grid(out, chart)?;
    write_x_axis(out, chart)?;
    write_y_axis(out, chart)?;
    for idx in 0..chart.series().len() {
        write_series(out, chart, idx, mode)?;
    }
    writeln!(out, "</g>")?;
    writeln!(out, "</svg>")
}

fn write_grid(out: &mut String, chart: &Chart) -> fmt::Result {
    let cfg = chart.config();
    let scales = chart.scales();
    let (w, h) = (fmt_num(cfg.width), fmt_num(cfg.height));

    writeln!(
        out,
        r#"<g class="grid grid-x" stroke="{GRID_STROKE}" stroke-opacity="{GRID_OPACITY}">"#
    )?;
    for d in scales.x.ticks(cfg.x_ticks) {
        let x = fmt_num(scales.x.map(d));
        writeln!(out, r#"<line x1="{x}" x2="{x}" y1="0" y2="{h}"/>"#)?;
    }
    writeln!(out, "</g>")?;

    writeln!(
        out,
        r#"<g class="grid grid-y" stroke="{GRID_STROKE}" stroke-opacity="{GRID_OPACITY}">"#
    )?;
    for v in scales.y.ticks(cfg.y_ticks) {
        let y = fmt_num(scales.y.map(v));
        writeln!(out, r#"<line x1="0" x2="{w}" y1="{y}" y2="{y}"/>"#)?;
    }
    writeln!(out, "</g>")
}

fn write_x_axis(out: &mut String, chart: &Chart) -> fmt::Result {
    let cfg = chart.config();
    let x = &chart.scales().x;
    let (w, h) = (fmt_num(cfg.width), fmt_num(cfg.height));

    writeln!(
        out,
        r#"<g class="axis axis--x" transform="translate(0,{h})" font-family="sans-serif" font-size="10" text-anchor="middle">"#
    )?;
    writeln!(
        out,
        r#"<path class="domain" stroke="currentColor" fill="none" d="M0,{t}V0H{w}V{t}"/>"#,
        t = fmt_num(TICK_SIZE)
    )?;
    // Axis labels every year; the grid uses the sparser configured count.
    let years = (x.domain.1 - x.domain.0).num_days() / 365 + 1;
    for d in x.ticks(years.max(2) as usize) {
        writeln!(
            out,
            r#"<g class="tick" transform="translate({},0)"><line stroke="currentColor" y2="{}"/><text fill="currentColor" y="{}" dy="0.71em">{}</text></g>"#,
            fmt_num(x.map(d)),
            fmt_num(TICK_SIZE),
            fmt_num(TICK_SIZE + TICK_PADDING),
            d.format("%Y")
        )?;
    }
    writeln!(
        out,
        r#"<text class="axis-title" x="{w}" dx="4em" dy="0.8em" fill="black" font-size="12px" text-anchor="start">{}</text>"#,
        xml_escape(&cfg.x_title)
    )?;
    writeln!(out, "</g>")
}

fn write_y_axis(out: &mut String, chart: &Chart) -> fmt::Result {
    let cfg = chart.config();
    let y = &chart.scales().y;
    let h = fmt_num(cfg.height);
    let step = y.tick_step(cfg.y_ticks);

    writeln!(
        out,
        r#"<g class="axis axis--y" font-family="sans-serif" font-size="10" text-anchor="end">"#
    )?;
    writeln!(
        out,
        r#"<path class="domain" stroke="currentColor" fill="none" d="M-{t},{h}H0V0H-{t}"/>"#,
        t = fmt_num(TICK_SIZE)
    )?;
    for v in y.ticks(cfg.y_ticks) {
        writeln!(
            out,
            r#"<g class="tick" transform="translate(0,{})"><line stroke="currentColor" x2="-{}"/><text fill="currentColor" x="-{}" dy="0.32em">{}</text></g>"#,
            fmt_num(y.map(v)),
            fmt_num(TICK_SIZE),
            fmt_num(TICK_SIZE + TICK_PADDING),
            xml_escape(&format_tick_value(v, step, &cfg.locale))
        )?;
    }
    writeln!(
        out,
        r#"<text class="axis-title" transform="rotate(-90)" x="{}" dy="-3em" fill="black" font-size="12px" text-anchor="middle">{}</text>"#,
        fmt_num(-(cfg.height / 2.0)),
        xml_escape(&cfg.y_title)
    )?;
    writeln!(out, "</g>")
}

fn write_series(out: &mut String, chart: &Chart, idx: usize, mode: RenderMode) -> fmt::Result {
    let (Some(series), Some(geom), Some(frame), Some(key)) = (
        chart.series().get(idx),
        chart.geometry(idx),
        chart.frame(idx),
        chart.key(idx),
    ) else {
        return Ok(());
    };
    let len = geom.total_length;
    let animate = mode == RenderMode::Animated && series.default_visible;
    let (offset, opacity) = match mode {
        RenderMode::Snapshot => (frame.dash_offset, frame.label_opacity),
        RenderMode::Animated => (len, 0.0),
    };
    let dur = format!("{}ms", chart.config().entrance_duration_ms);

    writeln!(out, r#"<g class="country" id="{}">"#, xml_escape(key))?;
    write!(
        out,
        r#"<path class="line" d="{}" fill="none" stroke="{}" stroke-width="1.5" stroke-dasharray="{l},{l}" stroke-dashoffset="{}""#,
        geom.path.to_svg_d(),
        to_hex(geom.color),
        fmt_num(offset),
        l = fmt_num(len)
    )?;
    if animate {
        writeln!(out, ">")?;
        write_animate(out, "stroke-dashoffset", &fmt_num(len), "0", &dur)?;
        writeln!(out, "</path>")?;
    } else {
        writeln!(out, "/>")?;
    }

    if let Some(anchor) = geom.label_anchor {
        write!(
            out,
            r#"<text transform="translate({},{})" x="{}" dy="0.3em" text-anchor="start" font-family="sans-serif" font-size="{}px" opacity="{}">{}"#,
            fmt_num(anchor.x),
            fmt_num(anchor.y),
            fmt_num(LABEL_DX),
            LABEL_FONT_PX,
            fmt_num(opacity),
            xml_escape(&series.country_name)
        )?;
        if animate {
            write_animate(out, "opacity", "0", "1", &dur)?;
        }
        writeln!(out, "</text>")?;
    }
    writeln!(out, "</g>")
}

fn write_animate(out: &mut String, attr: &str, from: &str, to: &str, dur: &str) -> fmt::Result {
    write!(
        out,
        r#"<animate attributeName="{attr}" from="{from}" to="{to}" begin="0s" dur="{dur}" fill="freeze" calcMode="spline" keyTimes="0;1" keySplines="{CUBIC_IN_OUT_SPLINE}"/>"#
    )
}
