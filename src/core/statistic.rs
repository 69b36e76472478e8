//! Statistic selectors and the fixed receptive-field feature layout.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VizError;

/// Which precomputed correlation column (and which weight tensor) to show.
///
/// The wire code doubles as the column index into the statistics matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum StatisticType {
    UniqueOnset,
    UniquePeakRate,
    UniqueFeatures,
    UniqueAbsPitch,
    UniqueRelPitch,
    UniqueOther,
    #[default]
    FullModel,
    Spectrogram,
}

impl StatisticType {
    pub fn code(self) -> u8 {
        match self {
            StatisticType::UniqueOnset => 0,
            StatisticType::UniquePeakRate => 1,
            StatisticType::UniqueFeatures => 2,
            StatisticType::UniqueAbsPitch => 3,
            StatisticType::UniqueRelPitch => 4,
            StatisticType::UniqueOther => 5,
            StatisticType::FullModel => 12,
            StatisticType::Spectrogram => 20,
        }
    }

    pub fn from_code(code: u8) -> Result<Self, VizError> {
        Self::all()
            .iter()
            .copied()
            .find(|s| s.code() == code)
            .ok_or_else(|| VizError::invalid_config(format!("unknown statistic code {code}")))
    }

    /// Column of the statistics matrix backing this selector.
    pub fn column(self) -> usize {
        self.code() as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            StatisticType::UniqueOnset => "Unique Onset",
            StatisticType::UniquePeakRate => "Unique Peak rate",
            StatisticType::UniqueFeatures => "Unique Features",
            StatisticType::UniqueAbsPitch => "Unique Abs Pitch",
            StatisticType::UniqueRelPitch => "Unique Rel Pitch",
            StatisticType::UniqueOther => "Unique ...",
            StatisticType::FullModel => "Full phonological+pitch",
            StatisticType::Spectrogram => "Spectrogram",
        }
    }

    pub fn is_spectrogram(self) -> bool {
        self == StatisticType::Spectrogram
    }

    pub fn all() -> &'static [StatisticType] {
        &[
            StatisticType::UniqueOnset,
            StatisticType::UniquePeakRate,
            StatisticType::UniqueFeatures,
            StatisticType::UniqueAbsPitch,
            StatisticType::UniqueRelPitch,
            StatisticType::UniqueOther,
            StatisticType::FullModel,
            StatisticType::Spectrogram,
        ]
    }
}

impl TryFrom<u8> for StatisticType {
    type Error = VizError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl From<StatisticType> for u8 {
    fn from(s: StatisticType) -> u8 {
        s.code()
    }
}

/// Dropdown values arrive as decimal strings ("12").
impl FromStr for StatisticType {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code: u8 = s
            .trim()
            .parse()
            .map_err(|_| VizError::invalid_config(format!("unknown statistic value {s:?}")))?;
        Self::from_code(code)
    }
}

impl fmt::Display for StatisticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Highest column any selector reads; the statistics matrix must be wider.
pub const MIN_STATISTIC_COLUMNS: usize = 21;

/// Row labels of the full phonological+pitch receptive field. Blank entries
/// are spacer rows inside the pitch blocks.
pub const FEATURE_LABELS: [&str; 46] = [
    "onset",
    "sonorant",
    "obstruent",
    "voiced",
    "nasal",
    "syllabic",
    "fricative",
    "plosive",
    "back",
    "low",
    "front",
    "high",
    "labial",
    "coronal",
    "dorsal",
    "abs. pitch",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "rel. pitch",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "\u{2206}rel. pitch",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "peakRate",
];

pub const FEATURE_COUNT: usize = FEATURE_LABELS.len();

/// Block boundaries of the full-feature layout (onset | phonetic | abs | rel | ∆rel | peakRate).
pub const FEATURE_SEPARATORS: [f32; 5] = [0.5, 14.5, 24.5, 34.5, 44.5];

/// Spectrogram rows carrying a frequency tick, and their labels in kHz.
pub const SPECTROGRAM_TICK_ROWS: [f32; 3] = [11.0, 43.0, 79.0];
pub const SPECTROGRAM_TICK_KHZ: [&str; 3] = ["0.5", "2", "8"];
