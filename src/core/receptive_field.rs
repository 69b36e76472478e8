//! 2D receptive-field heatmap for one selected electrode.

use ndarray::{s, Array1, Array2, ArrayView2};
use serde::Serialize;

use crate::dataset::Dataset;
use crate::error::VizResult;
use crate::statistic::{
    StatisticType, FEATURE_LABELS, FEATURE_SEPARATORS, SPECTROGRAM_TICK_KHZ,
    SPECTROGRAM_TICK_ROWS,
};
use crate::style::{symmetric_half_range, ColorBar, ColorScale};

pub const PLACEHOLDER_TITLE: &str = "Please select an electrode...";

/// Display window of every panel, in seconds before the stimulus event.
pub const TIME_WINDOW: (f32, f32) = (-0.6, 0.0);
pub const TIME_SAMPLES: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisRange {
    Auto,
    Reversed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YAxis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub tick_values: Vec<f32>,
    pub tick_text: Vec<String>,
    pub tick_font_size: u32,
    pub range: AxisRange,
}

impl YAxis {
    fn untitled() -> Self {
        Self {
            title: None,
            tick_values: Vec::new(),
            tick_text: Vec::new(),
            tick_font_size: 12,
            range: AxisRange::Auto,
        }
    }

    fn spectrogram() -> Self {
        Self {
            title: Some("Frequency (kHz)".to_string()),
            tick_values: SPECTROGRAM_TICK_ROWS.to_vec(),
            tick_text: SPECTROGRAM_TICK_KHZ.iter().map(|s| s.to_string()).collect(),
            tick_font_size: 12,
            range: AxisRange::Auto,
        }
    }

    fn features() -> Self {
        Self {
            title: None,
            tick_values: (0..FEATURE_LABELS.len()).map(|i| i as f32).collect(),
            tick_text: FEATURE_LABELS.iter().map(|s| s.to_string()).collect(),
            tick_font_size: 6,
            range: AxisRange::Reversed,
        }
    }

    pub fn has_ticks(&self) -> bool {
        !self.tick_values.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeAxis {
    pub title: String,
    /// Sample positions along x; fixed, independent of the matrix width.
    pub values: Vec<f32>,
}

impl Default for TimeAxis {
    fn default() -> Self {
        Self {
            title: "Time (s)".to_string(),
            values: Array1::linspace(TIME_WINDOW.0, TIME_WINDOW.1, TIME_SAMPLES).to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: String,
    pub width: f32,
    pub dash: String,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: "black".to_string(),
            width: 1.0,
            dash: "dash".to_string(),
        }
    }
}

/// Horizontal lines splitting the rows into feature blocks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Separators {
    pub rows: Vec<f32>,
    pub line: LineStyle,
}

impl Separators {
    fn for_statistic(statistic: StatisticType) -> Self {
        let rows = if statistic.is_spectrogram() {
            SPECTROGRAM_TICK_ROWS.to_vec()
        } else {
            FEATURE_SEPARATORS.to_vec()
        };
        Self {
            rows,
            line: LineStyle::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RfPanel {
    pub title: String,
    pub statistic: StatisticType,
    pub electrode: Option<usize>,
    /// `[row, time]`, time reversed relative to storage.
    pub z: Array2<f32>,
    pub zmin: f32,
    pub zmax: f32,
    pub color_scale: ColorScale,
    pub colorbar: ColorBar,
    pub y_axis: YAxis,
    pub time_axis: TimeAxis,
    pub separators: Separators,
}

impl RfPanel {
    pub fn is_placeholder(&self) -> bool {
        self.electrode.is_none()
    }
}

fn weight_colorbar(m: f32) -> ColorBar {
    ColorBar {
        title: "Beta<br>weight<br>(A.U.)".to_string(),
        thickness: None,
        tick_values: vec![-m, 0.0, m],
        tick_text: vec!["-max".to_string(), "0".to_string(), "max".to_string()],
    }
}

fn flip_time(slice: ArrayView2<'_, f32>) -> Array2<f32> {
    slice.slice(s![.., ..;-1]).to_owned()
}

/// Builds the heatmap for `electrode`, or the placeholder when nothing is
/// selected yet.
pub fn build_rf_panel(
    dataset: &Dataset,
    electrode: Option<usize>,
    statistic: StatisticType,
) -> VizResult<RfPanel> {
    let Some(id) = electrode else {
        return Ok(placeholder(dataset, statistic));
    };

    let (z, y_axis) = if statistic.is_spectrogram() {
        (flip_time(dataset.spectrogram(id)?), YAxis::spectrogram())
    } else {
        (flip_time(dataset.receptive_field(id)?), YAxis::features())
    };
    let r = dataset.statistic(id, statistic)?;
    let m = symmetric_half_range(z.iter());

    Ok(RfPanel {
        title: format!("Electrode {id}, r={}", format_r(r)),
        statistic,
        electrode: Some(id),
        z,
        zmin: -m,
        zmax: m,
        color_scale: ColorScale::RdBuReversed,
        colorbar: weight_colorbar(m),
        y_axis,
        time_axis: TimeAxis::default(),
        separators: Separators::for_statistic(statistic),
    })
}

/// Two decimals; a missing correlation reads `nan`.
fn format_r(r: f32) -> String {
    if r.is_nan() {
        "nan".to_string()
    } else {
        format!("{r:.2}")
    }
}

fn placeholder(dataset: &Dataset, statistic: StatisticType) -> RfPanel {
    RfPanel {
        title: PLACEHOLDER_TITLE.to_string(),
        statistic,
        electrode: None,
        z: Array2::zeros(dataset.spectrogram_shape()),
        zmin: -1.0,
        zmax: 1.0,
        color_scale: ColorScale::RdBuReversed,
        colorbar: weight_colorbar(1.0),
        y_axis: YAxis::untitled(),
        time_axis: TimeAxis::default(),
        separators: Separators::for_statistic(statistic),
    }
}
