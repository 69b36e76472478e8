//! Host configuration: `config.json` in the data directory plus environment
//! overrides.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use speech_cortex::cache::SceneCache;
use speech_cortex::dataset::LoadOptions;

use crate::paths::AppPaths;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CortexConfig {
    /// Dataset bundle; `None` means the default file in the data directory.
    pub dataset: Option<PathBuf>,
    pub cache_ttl_secs: u64,
    pub cache_enabled: bool,
    pub region_shift_min: u16,
    pub region_shift_x: f32,
}

impl Default for CortexConfig {
    fn default() -> Self {
        let shift = LoadOptions::default();
        Self {
            dataset: None,
            cache_ttl_secs: 300,
            cache_enabled: true,
            region_shift_min: shift.region_shift_min,
            region_shift_x: shift.region_shift_x,
        }
    }
}

impl CortexConfig {
    /// Reads `config.json` (absent file means defaults), then applies the
    /// process environment.
    pub fn load(paths: &AppPaths) -> Result<Self, ConfigError> {
        let mut cfg = Self::from_file(&paths.config_file())?;
        cfg.apply_env(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // SPEECH_CORTEX_DATASET=/path/to/bundle.scx
        if let Some(v) = lookup("SPEECH_CORTEX_DATASET") {
            let v = v.trim();
            if !v.is_empty() {
                self.dataset = Some(PathBuf::from(v));
            }
        }

        // SPEECH_CORTEX_CACHE_TTL_SECS=300
        if let Some(v) = lookup("SPEECH_CORTEX_CACHE_TTL_SECS") {
            if let Ok(n) = v.trim().parse::<u64>() {
                self.cache_ttl_secs = n;
            }
        }

        // SPEECH_CORTEX_CACHE=off|on
        if let Some(v) = lookup("SPEECH_CORTEX_CACHE") {
            let vv = v.trim().to_ascii_lowercase();
            self.cache_enabled = !(vv == "off" || vv == "0" || vv == "false");
        }
    }

    pub fn dataset_path(&self, paths: &AppPaths) -> PathBuf {
        self.dataset
            .clone()
            .unwrap_or_else(|| paths.dataset_file())
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            region_shift_min: self.region_shift_min,
            region_shift_x: self.region_shift_x,
        }
    }

    /// A zero TTL disables caching as well.
    pub fn scene_cache(&self) -> Option<SceneCache> {
        (self.cache_enabled && self.cache_ttl_secs > 0)
            .then(|| SceneCache::new(Duration::from_secs(self.cache_ttl_secs)))
    }
}
