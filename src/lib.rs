//! # speech_cortex
//!
//! View construction for speech-cortex electrode recordings: a 3D cortical
//! scene with an electrode overlay, and a 2D receptive-field heatmap for the
//! electrode picked in that scene.
//!
//! Rendering is left to an external plotting engine; this crate produces
//! fully specified, serializable descriptions of what to draw.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use speech_cortex::prelude::*;
//!
//! # fn main() -> Result<(), VizError> {
//! let dataset = Dataset::load_bundle("speech_cortex.scx", &LoadOptions::default())?;
//! let mut dashboard = Dashboard::new(Arc::new(dataset));
//!
//! dashboard.handle(UiEvent::SetStatistic(StatisticType::Spectrogram))?;
//! let out = dashboard.handle(UiEvent::Click { id: 310 })?;
//! println!("{}", out.rf_panel.title);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`dataset`]: Immutable dataset and the bundle file format
//! - [`scene`]: 3D scene builder (view selector)
//! - [`receptive_field`]: 2D receptive-field panel builder
//! - [`cache`]: Time-limited scene memoization
//! - [`dashboard`]: UI state and event handling

#[path = "core/storage.rs"]
pub mod storage;

#[path = "core/statistic.rs"]
pub mod statistic;

#[path = "core/dataset.rs"]
pub mod dataset;

#[path = "core/style.rs"]
pub mod style;

#[path = "core/scene.rs"]
pub mod scene;

#[path = "core/receptive_field.rs"]
pub mod receptive_field;

#[path = "core/cache.rs"]
pub mod cache;

pub mod dashboard;
pub mod error;

#[cfg(test)]
mod test_support;

/// Prelude module for convenient imports.
///
/// ```
/// use speech_cortex::prelude::*;
/// ```
pub mod prelude {
    pub use crate::cache::SceneCache;
    pub use crate::dashboard::{Dashboard, DashboardOutputs, SelectionState, UiEvent};
    pub use crate::dataset::{Dataset, DatasetBuilder, Electrode, LoadOptions, Mesh};
    pub use crate::error::{VizError, VizResult};
    pub use crate::receptive_field::{build_rf_panel, RfPanel};
    pub use crate::scene::{build_scene, ColorMode, SceneDescription, SceneParams, ViewMode};
    pub use crate::statistic::StatisticType;
}
