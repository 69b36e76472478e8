//! Error type shared by the dataset loader, the view builders and the dashboard.

/// Result alias used across the crate.
pub type VizResult<T> = Result<T, VizError>;

#[derive(Debug, thiserror::Error)]
pub enum VizError {
    /// A required input is missing or malformed. Fatal at start-up.
    #[error("failed to load {what}: {reason}")]
    DataLoad { what: String, reason: String },

    /// A selector value or selector combination outside the supported set.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("electrode {index} out of range (dataset has {count} electrodes)")]
    ElectrodeOutOfRange { index: usize, count: usize },

    #[error("electrode {index} is not part of the current view")]
    ElectrodeNotInView { index: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VizError {
    pub fn data_load(what: impl Into<String>, reason: impl Into<String>) -> Self {
        VizError::DataLoad {
            what: what.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        VizError::InvalidConfiguration(msg.into())
    }
}
