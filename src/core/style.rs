//! Color scales, color bars and shared display constants.

use serde::Serialize;

/// Named color scales understood by the plotting engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColorScale {
    /// Diverging red/blue, reversed so positive values are red.
    #[serde(rename = "RdBu_r")]
    RdBuReversed,
    /// White → gray → black, used for curvature shading.
    #[serde(rename = "curvature")]
    Curvature,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBar {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thickness: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tick_values: Vec<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tick_text: Vec<String>,
}

/// Half-width of a zero-centered color range: the largest magnitude among
/// `values`, or 1 when that is zero (no degenerate zero-width scale).
/// NaN entries are ignored.
pub fn symmetric_half_range<'a>(values: impl IntoIterator<Item = &'a f32>) -> f32 {
    let m = values
        .into_iter()
        .fold(0.0f32, |acc, v| if v.is_nan() { acc } else { acc.max(v.abs()) });
    if m == 0.0 {
        1.0
    } else {
        m
    }
}

/// CSS color string for an RGB triple with components in 0..=1.
pub fn css_rgb(color: [f32; 3]) -> String {
    let [r, g, b] = color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    format!("rgb({r},{g},{b})")
}
