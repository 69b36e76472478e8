//! Cross-platform application paths

use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct AppPaths {
    data_dir: PathBuf,
}

impl AppPaths {
    pub fn new() -> Result<Self, String> {
        let data_dir = Self::get_data_dir()?;

        fs::create_dir_all(&data_dir)
            .map_err(|e| format!("Failed to create data directory: {}", e))?;

        Ok(Self { data_dir })
    }

    pub fn from_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn get_data_dir() -> Result<PathBuf, String> {
        let base = dirs::data_dir().ok_or("Could not determine data directory")?;
        Ok(base.join("speech_cortex"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Default dataset bundle location.
    pub fn dataset_file(&self) -> PathBuf {
        self.data_dir.join("speech_cortex.scx")
    }

    pub fn config_file(&self) -> PathBuf {
        self.data_dir.join("config.json")
    }
}
