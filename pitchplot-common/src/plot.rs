//! Plot geometry and pitch color policy
//!
//! Coordinate mapping, point sizing, and the pitch-type color table used
//! by the movement-profile rendering. Color lookup is a deterministic
//! case-folded exact match with an explicit fallback, so one label can
//! never shadow another.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Square plot edge length in pixels
pub const PLOT_SIZE: f64 = 480.0;
/// Gap between the plot rectangle and the SVG edge, pixels
pub const PLOT_PADDING: f64 = 50.0;
/// Horizontal break axis range, inches
pub const X_RANGE: (f64, f64) = (-20.0, 20.0);
/// Induced vertical break axis range, inches
pub const Y_RANGE: (f64, f64) = (-22.0, 22.0);

/// Fallback color for labels missing from the table
pub const UNKNOWN_COLOR: &str = "#888888";

/// Color table keyed by case-folded pitch label
static PITCH_COLORS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("fastball (4s)", "#E63946"),
        ("fastball", "#E63946"),
        ("four-seam", "#E63946"),
        ("4-seam", "#E63946"),
        ("fastball (2s)", "#F4722B"),
        ("fastball (2s) / sinker", "#F4722B"),
        ("sinker", "#F4722B"),
        ("two-seam", "#F4722B"),
        ("2-seam", "#F4722B"),
        ("cutter", "#8B4513"),
        ("slider", "#22C55E"),
        ("curveball", "#7DD3FC"),
        ("curve", "#7DD3FC"),
        ("change", "#16A34A"),
        ("changeup", "#16A34A"),
        ("splitter", "#A855F7"),
        ("split", "#A855F7"),
        ("sweeper", "#EAB308"),
        ("slurve", "#1D3557"),
        ("knuckle", "#6D6875"),
        ("knuckleball", "#6D6875"),
        ("screwball", "#B5838D"),
        ("unknown", UNKNOWN_COLOR),
    ])
});

/// Look up the plot color for a pitch label.
pub fn pitch_color(pitch_type: &str) -> &'static str {
    let key = pitch_type.trim().to_lowercase();
    PITCH_COLORS.get(key.as_str()).copied().unwrap_or(UNKNOWN_COLOR)
}

/// Common display name for verbose table labels.
pub fn display_name(pitch_type: &str) -> &str {
    match pitch_type {
        "Fastball (4S)" => "Four-Seam",
        "Fastball (2S) / Sinker" => "Sinker",
        other => other,
    }
}

/// Map horizontal break (inches) to an x pixel coordinate.
pub fn scale_x(value: f64) -> f64 {
    let inner = PLOT_SIZE - 2.0 * PLOT_PADDING;
    PLOT_PADDING + (value - X_RANGE.0) / (X_RANGE.1 - X_RANGE.0) * inner
}

/// Map induced vertical break (inches) to a y pixel coordinate.
/// Positive break plots upward, so the axis is inverted.
pub fn scale_y(value: f64) -> f64 {
    let inner = PLOT_SIZE - 2.0 * PLOT_PADDING;
    PLOT_PADDING + (Y_RANGE.1 - value) / (Y_RANGE.1 - Y_RANGE.0) * inner
}

/// Scale a usage fraction into a bounded point radius.
pub fn point_radius(usage: f64) -> f64 {
    (18.0 + usage * 38.0).clamp(20.0, 38.0)
}
