//! Movement profile rendering
//!
//! Produces a standalone SVG scatter of horizontal break against induced
//! vertical break. Class names match the visualizer page stylesheet, so
//! the same document renders correctly inline (page CSS restyles it for
//! the active theme) and saved on its own (the embedded defaults apply).

use pitchplot_common::plot::{
    display_name, pitch_color, point_radius, scale_x, scale_y, PLOT_PADDING, PLOT_SIZE,
};
use pitchplot_common::PitchRecord;

/// Gridline positions in inches; zero is drawn as an axis instead
const GRID_STEPS: [f64; 8] = [-20.0, -15.0, -10.0, -5.0, 5.0, 10.0, 15.0, 20.0];
/// Labeled tick positions in inches
const LABEL_STEPS: [f64; 4] = [-20.0, -10.0, 10.0, 20.0];

/// Render the movement profile for a validated, filtered record list.
///
/// Records missing either break coordinate are skipped rather than drawn
/// at a fabricated position.
pub fn movement_profile(records: &[PitchRecord]) -> String {
    let size = PLOT_SIZE;
    let pad = PLOT_PADDING;
    let inner = size - 2.0 * pad;

    let mut svg = String::with_capacity(8 * 1024);

    svg.push_str(&format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{size:.0}" height="{size:.0}" viewBox="0 0 {size:.0} {size:.0}" font-family="system-ui, sans-serif">"##
    ));
    svg.push('\n');
    svg.push_str(concat!(
        "<style>\n",
        ".plot-bg { fill: #0d1117; }\n",
        ".grid-line { stroke: #21262d; stroke-width: 1; }\n",
        ".axis-line { stroke: #484f58; stroke-width: 1.5; }\n",
        ".axis-label { fill: #8b949e; font-size: 11px; }\n",
        ".title-text { fill: #e6edf3; font-size: 12px; font-weight: 600; }\n",
        "</style>\n",
    ));

    svg.push_str(&format!(
        r##"<rect class="plot-bg" x="{pad:.0}" y="{pad:.0}" width="{inner:.0}" height="{inner:.0}"/>"##
    ));
    svg.push('\n');

    for v in GRID_STEPS {
        let x = scale_x(v);
        svg.push_str(&format!(
            r##"<line class="grid-line" x1="{x:.1}" y1="{pad:.0}" x2="{x:.1}" y2="{:.0}"/>"##,
            size - pad
        ));
        svg.push('\n');
    }
    for v in GRID_STEPS {
        let y = scale_y(v);
        svg.push_str(&format!(
            r##"<line class="grid-line" x1="{pad:.0}" y1="{y:.1}" x2="{:.0}" y2="{y:.1}"/>"##,
            size - pad
        ));
        svg.push('\n');
    }

    let x_zero = scale_x(0.0);
    let y_zero = scale_y(0.0);
    svg.push_str(&format!(
        r##"<line class="axis-line" x1="{x_zero:.1}" y1="{pad:.0}" x2="{x_zero:.1}" y2="{:.0}"/>"##,
        size - pad
    ));
    svg.push('\n');
    svg.push_str(&format!(
        r##"<line class="axis-line" x1="{pad:.0}" y1="{y_zero:.1}" x2="{:.0}" y2="{y_zero:.1}"/>"##,
        size - pad
    ));
    svg.push('\n');

    for v in LABEL_STEPS {
        svg.push_str(&format!(
            r##"<text class="axis-label" x="{:.1}" y="{:.0}" text-anchor="middle">{v:.0}"</text>"##,
            scale_x(v),
            size - pad + 18.0
        ));
        svg.push('\n');
    }
    for v in LABEL_STEPS {
        svg.push_str(&format!(
            r##"<text class="axis-label" x="{:.0}" y="{:.1}" text-anchor="end">{v:.0}"</text>"##,
            pad - 8.0,
            scale_y(v) + 4.0
        ));
        svg.push('\n');
    }

    svg.push_str(&format!(
        r##"<text class="title-text" x="{:.0}" y="{:.0}" text-anchor="middle">Horizontal Break (in)</text>"##,
        size / 2.0,
        size - 8.0
    ));
    svg.push('\n');
    svg.push_str(&format!(
        r##"<text class="title-text" x="14" y="{mid:.0}" text-anchor="middle" transform="rotate(-90, 14, {mid:.0})">Induced Vertical Break (in)</text>"##,
        mid = size / 2.0
    ));
    svg.push('\n');

    for record in records {
        let (horz, vert) = match (record.horz_brk, record.ivb) {
            (Some(h), Some(v)) => (h, v),
            _ => continue,
        };

        let cx = scale_x(horz);
        let cy = scale_y(vert);
        let radius = point_radius(record.usage.unwrap_or(0.0));
        let color = pitch_color(&record.pitch_type);
        let key = xml_escape(&record.pitch_type);
        let label = xml_escape(display_name(&record.pitch_type));

        svg.push_str(&format!(
            r##"<g class="pitch-circle" data-pitch="{key}"><title>{label}</title><circle cx="{cx:.1}" cy="{cy:.1}" r="{radius:.1}" fill="{color}" fill-opacity="0.25" stroke="{color}" stroke-width="2"/><circle cx="{cx:.1}" cy="{cy:.1}" r="6" fill="{color}"/></g>"##
        ));
        svg.push('\n');
    }

    svg.push_str("</svg>\n");
    svg
}

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
