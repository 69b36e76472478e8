//! Reactive wiring: UI events in, freshly derived outputs out.
//!
//! The dashboard owns the only mutable state of the system, the
//! [`SelectionState`]. Every event is applied to a copy of that state; all
//! outputs are then recomputed from the full copy and the copy is committed
//! only if that succeeds.

pub mod controls;

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::cache::SceneCache;
use crate::dataset::Dataset;
use crate::error::{VizError, VizResult};
use crate::receptive_field::{build_rf_panel, RfPanel};
use crate::scene::{build_scene, view_electrodes, ColorMode, SceneDescription, SceneParams, ViewMode};
use crate::statistic::StatisticType;

pub use controls::{brain_label, inventory, Control, ControlId, ControlKind, ControlOption};

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SelectionState {
    pub params: SceneParams,
    /// Last clicked electrode; cleared when the view mode changes.
    pub selected: Option<usize>,
    pub last_hover: Option<Value>,
    pub last_click: Option<Value>,
    /// Box or lasso selection reported by the scene.
    pub last_select: Option<Value>,
    pub last_relayout: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    SetViewMode(ViewMode),
    SetColorMode(ColorMode),
    SetShowFullBrain(bool),
    SetStatistic(StatisticType),
    /// Point picked in the 3D scene, reported by electrode index.
    Click { id: usize },
    Hover { payload: Value },
    Select { payload: Value },
    Relayout { payload: Value },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StimSummary {
    pub electrode: usize,
    pub effect: u8,
    pub passive: String,
    pub repetition: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardOutputs {
    pub scene: Arc<SceneDescription>,
    pub rf_panel: RfPanel,
    pub brain_label: String,
    pub stim_summary: Option<StimSummary>,
    pub hover_echo: String,
    pub click_echo: String,
    pub select_echo: String,
    pub relayout_echo: String,
}

pub struct Dashboard {
    dataset: Arc<Dataset>,
    state: SelectionState,
    cache: Option<SceneCache>,
}

impl Dashboard {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self::with_cache(dataset, Some(SceneCache::default()))
    }

    pub fn with_cache(dataset: Arc<Dataset>, cache: Option<SceneCache>) -> Self {
        Self {
            dataset,
            state: SelectionState::default(),
            cache,
        }
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn controls(&self) -> Vec<Control> {
        inventory(&self.state.params)
    }

    /// Outputs for the current state, without applying any event.
    pub fn render(&mut self) -> VizResult<DashboardOutputs> {
        let state = self.state.clone();
        self.derive(&state)
    }

    pub fn handle(&mut self, event: UiEvent) -> VizResult<DashboardOutputs> {
        debug!(?event, "ui event");
        let candidate = match self.apply(event) {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "ui event rejected");
                return Err(e);
            }
        };
        match self.derive(&candidate) {
            Ok(out) => {
                self.state = candidate;
                Ok(out)
            }
            Err(e) => {
                warn!(error = %e, "ui event rejected");
                Err(e)
            }
        }
    }

    fn apply(&self, event: UiEvent) -> VizResult<SelectionState> {
        let mut next = self.state.clone();
        match event {
            UiEvent::SetViewMode(view) => {
                if view != next.params.view {
                    next.selected = None;
                }
                next.params.view = view;
            }
            UiEvent::SetColorMode(color) => next.params.color = color,
            UiEvent::SetShowFullBrain(on) => next.params.show_full_brain = on,
            UiEvent::SetStatistic(statistic) => next.params.statistic = statistic,
            UiEvent::Click { id } => {
                let electrode = self.dataset.electrode(id)?;
                if !view_electrodes(&self.dataset, next.params.view).contains(&id) {
                    return Err(VizError::ElectrodeNotInView { index: id });
                }
                next.selected = Some(id);
                next.last_click = Some(json!({
                    "points": [{
                        "id": id,
                        "x": electrode.position[0],
                        "y": electrode.position[1],
                        "z": electrode.position[2],
                        "text": electrode.label,
                    }]
                }));
            }
            UiEvent::Hover { payload } => next.last_hover = Some(payload),
            UiEvent::Select { payload } => next.last_select = Some(payload),
            UiEvent::Relayout { payload } => next.last_relayout = Some(payload),
        }
        Ok(next)
    }

    /// Every output is a function of `state` alone.
    fn derive(&mut self, state: &SelectionState) -> VizResult<DashboardOutputs> {
        let params = state.params;
        let dataset = &self.dataset;
        let scene = match self.cache.as_mut() {
            Some(cache) => cache.get_or_build(params, || build_scene(dataset, params))?,
            None => Arc::new(build_scene(dataset, params)?),
        };
        let rf_panel = build_rf_panel(dataset, state.selected, params.statistic)?;

        let stim_summary = match (params.view, state.selected) {
            (ViewMode::Stimulation, Some(id)) => {
                dataset.stimulation_for(id).map(|s| StimSummary {
                    electrode: id,
                    effect: s.effect.code(),
                    passive: s.passive.clone(),
                    repetition: s.repetition.clone(),
                })
            }
            _ => None,
        };

        Ok(DashboardOutputs {
            scene,
            rf_panel,
            brain_label: brain_label(params.show_full_brain).to_string(),
            stim_summary,
            hover_echo: serde_json::to_string_pretty(&state.last_hover)?,
            click_echo: serde_json::to_string_pretty(&state.last_click)?,
            select_echo: serde_json::to_string_pretty(&state.last_select)?,
            relayout_echo: serde_json::to_string_pretty(&state.last_relayout)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receptive_field::PLACEHOLDER_TITLE;
    use crate::scene::MeshKind;
    use crate::test_support::sample_dataset;

    fn dashboard(n: usize) -> Dashboard {
        Dashboard::new(Arc::new(sample_dataset(n)))
    }

    #[test]
    fn initial_render_shows_placeholder() {
        let mut d = dashboard(12);
        let out = d.render().unwrap();
        assert_eq!(out.rf_panel.title, "Please select an electrode...");
        assert_eq!(out.rf_panel.title, PLACEHOLDER_TITLE);
        assert_eq!(out.brain_label, "Whole brain");
        assert_eq!(out.scene.meshes.len(), 2);
        assert_eq!(out.hover_echo, "null");
        assert!(out.stim_summary.is_none());
    }

    #[test]
    fn never_clicking_keeps_placeholder_through_other_events() {
        let mut d = dashboard(12);
        d.handle(UiEvent::SetStatistic(StatisticType::Spectrogram)).unwrap();
        d.handle(UiEvent::SetShowFullBrain(false)).unwrap();
        let out = d.handle(UiEvent::SetColorMode(ColorMode::ByAnatomy)).unwrap();
        assert_eq!(out.rf_panel.title, PLACEHOLDER_TITLE);
        assert_eq!(out.brain_label, "Temporal lobe only");
        assert!(out.scene.mesh(MeshKind::FullBrain).is_none());
    }

    #[test]
    fn click_then_statistic_change_keeps_selection() {
        let mut d = dashboard(320);
        d.handle(UiEvent::Click { id: 310 }).unwrap();
        let out = d.handle(UiEvent::SetStatistic(StatisticType::Spectrogram)).unwrap();
        let r = d.dataset().statistics()[[310, 20]];
        assert_eq!(out.rf_panel.title, format!("Electrode 310, r={r:.2}"));
        assert_eq!(d.state().selected, Some(310));
        assert!(out.click_echo.contains("310"));
    }

    #[test]
    fn switching_view_mode_clears_selection() {
        let mut d = dashboard(12);
        d.handle(UiEvent::Click { id: 3 }).unwrap();
        let out = d.handle(UiEvent::SetViewMode(ViewMode::Stimulation)).unwrap();
        assert_eq!(d.state().selected, None);
        assert_eq!(out.rf_panel.title, PLACEHOLDER_TITLE);

        // Re-selecting the current view is not a switch.
        d.handle(UiEvent::Click { id: 1 }).unwrap();
        d.handle(UiEvent::SetViewMode(ViewMode::Stimulation)).unwrap();
        assert_eq!(d.state().selected, Some(1));
    }

    #[test]
    fn stimulation_view_reports_effect_summary() {
        let mut d = dashboard(12);
        d.handle(UiEvent::SetViewMode(ViewMode::Stimulation)).unwrap();
        d.handle(UiEvent::SetColorMode(ColorMode::ByStimEffect)).unwrap();
        let out = d.handle(UiEvent::Click { id: 2 }).unwrap();
        let summary = out.stim_summary.unwrap();
        assert_eq!(summary.electrode, 2);
        assert_eq!(summary.effect, 3);
        assert_eq!(summary.passive, "passive effect 2");
        assert_eq!(out.scene.points.ids.len(), 5);
    }

    #[test]
    fn rejected_event_leaves_state_untouched() {
        let mut d = dashboard(12);
        d.handle(UiEvent::Click { id: 4 }).unwrap();
        let before = d.state().clone();

        let err = d.handle(UiEvent::SetColorMode(ColorMode::ByStimEffect)).unwrap_err();
        assert!(matches!(err, VizError::InvalidConfiguration(_)));
        assert_eq!(d.state(), &before);

        let err = d.handle(UiEvent::Click { id: 99 }).unwrap_err();
        assert!(matches!(err, VizError::ElectrodeOutOfRange { index: 99, .. }));
        assert_eq!(d.state(), &before);
    }

    #[test]
    fn clicks_outside_current_view_are_rejected() {
        let mut d = dashboard(12);
        d.handle(UiEvent::SetViewMode(ViewMode::Stimulation)).unwrap();
        let err = d.handle(UiEvent::Click { id: 9 }).unwrap_err();
        assert!(matches!(err, VizError::ElectrodeNotInView { index: 9 }));
        assert_eq!(d.state().selected, None);
    }

    #[test]
    fn interaction_payloads_are_echoed() {
        let mut d = dashboard(6);
        let out = d
            .handle(UiEvent::Hover {
                payload: json!({ "points": [{ "id": 1 }] }),
            })
            .unwrap();
        assert!(out.hover_echo.contains("\"id\": 1"));
        let out = d
            .handle(UiEvent::Relayout {
                payload: json!({ "scene.camera": { "eye": { "x": 1.0 } } }),
            })
            .unwrap();
        assert!(out.relayout_echo.contains("scene.camera"));
        assert!(out.hover_echo.contains("\"id\": 1"));
    }

    #[test]
    fn box_selection_is_echoed_without_changing_the_selection() {
        let mut d = dashboard(6);
        d.handle(UiEvent::Click { id: 2 }).unwrap();
        let out = d
            .handle(UiEvent::Select {
                payload: json!({ "points": [{ "id": 1 }, { "id": 4 }], "range": { "x": [0, 3] } }),
            })
            .unwrap();
        assert!(out.select_echo.contains("\"range\""));
        assert!(out.select_echo.contains("\"id\": 4"));
        assert_eq!(d.state().selected, Some(2));
        assert_eq!(out.hover_echo, "null");

        let out = d.handle(UiEvent::SetShowFullBrain(false)).unwrap();
        assert!(out.select_echo.contains("\"id\": 4"));
    }

    #[test]
    fn leaving_stimulation_view_needs_a_supported_color_first() {
        let mut d = dashboard(12);
        d.handle(UiEvent::SetViewMode(ViewMode::Stimulation)).unwrap();
        d.handle(UiEvent::SetColorMode(ColorMode::ByStimEffect)).unwrap();
        d.handle(UiEvent::Click { id: 1 }).unwrap();
        let before = d.state().clone();

        let err = d
            .handle(UiEvent::SetViewMode(ViewMode::ReceptiveField))
            .unwrap_err();
        assert!(matches!(err, VizError::InvalidConfiguration(_)));
        assert_eq!(d.state(), &before);
        assert_eq!(d.state().params.view, ViewMode::Stimulation);
        assert_eq!(d.state().selected, Some(1));

        d.handle(UiEvent::SetColorMode(ColorMode::ByAnatomy)).unwrap();
        let out = d
            .handle(UiEvent::SetViewMode(ViewMode::ReceptiveField))
            .unwrap();
        assert_eq!(d.state().selected, None);
        assert_eq!(out.scene.points.ids.len(), 12);
    }

    #[test]
    fn cached_and_uncached_dashboards_agree() {
        let ds = Arc::new(sample_dataset(10));
        let mut cached = Dashboard::new(Arc::clone(&ds));
        let mut plain = Dashboard::with_cache(ds, None);
        for event in [
            UiEvent::SetColorMode(ColorMode::ByAnatomy),
            UiEvent::Click { id: 7 },
            UiEvent::SetColorMode(ColorMode::ByCorrelation),
            UiEvent::SetStatistic(StatisticType::UniqueAbsPitch),
        ] {
            let a = cached.handle(event.clone()).unwrap();
            let b = plain.handle(event).unwrap();
            assert_eq!(a.scene.points, b.scene.points);
            assert_eq!(a.scene.meshes.len(), b.scene.meshes.len());
            assert_eq!(a.rf_panel, b.rf_panel);
        }
    }
}
