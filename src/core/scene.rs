//! 3D scene construction: cortical meshes plus the electrode point cloud.
//!
//! [`build_scene`] is a pure function of its parameters and the loaded
//! [`Dataset`]; it never inspects which UI control changed.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Mesh};
use crate::error::{VizError, VizResult};
use crate::statistic::StatisticType;
use crate::style::{css_rgb, symmetric_half_range, ColorBar, ColorScale};

/// Which electrode table backs the point cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    #[serde(rename = "RF")]
    ReceptiveField,
    #[serde(rename = "ST")]
    Stimulation,
}

impl ViewMode {
    pub fn wire_value(self) -> &'static str {
        match self {
            ViewMode::ReceptiveField => "RF",
            ViewMode::Stimulation => "ST",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::ReceptiveField => "Receptive Fields",
            ViewMode::Stimulation => "Stimulation",
        }
    }

    pub fn all() -> &'static [ViewMode] {
        &[ViewMode::ReceptiveField, ViewMode::Stimulation]
    }
}

impl FromStr for ViewMode {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewMode::all()
            .iter()
            .copied()
            .find(|m| m.wire_value() == s.trim())
            .ok_or_else(|| VizError::invalid_config(format!("unknown view mode {s:?}")))
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_value())
    }
}

/// Point-color encoding requested by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColorMode {
    #[serde(rename = "anatomy_num")]
    ByAnatomy,
    #[default]
    #[serde(rename = "vcorrs")]
    ByCorrelation,
    #[serde(rename = "stim_effect")]
    ByStimEffect,
}

impl ColorMode {
    pub fn wire_value(self) -> &'static str {
        match self {
            ColorMode::ByAnatomy => "anatomy_num",
            ColorMode::ByCorrelation => "vcorrs",
            ColorMode::ByStimEffect => "stim_effect",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ColorMode::ByAnatomy => "Anatomy",
            ColorMode::ByCorrelation => "Correlation",
            ColorMode::ByStimEffect => "Stimulation effect",
        }
    }

    /// Whether this encoding is defined for `view`.
    pub fn supports(self, view: ViewMode) -> bool {
        match self {
            ColorMode::ByAnatomy | ColorMode::ByCorrelation => true,
            ColorMode::ByStimEffect => view == ViewMode::Stimulation,
        }
    }

    pub fn all() -> &'static [ColorMode] {
        &[
            ColorMode::ByAnatomy,
            ColorMode::ByCorrelation,
            ColorMode::ByStimEffect,
        ]
    }
}

impl FromStr for ColorMode {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorMode::all()
            .iter()
            .copied()
            .find(|m| m.wire_value() == s.trim())
            .ok_or_else(|| VizError::invalid_config(format!("unknown color mode {s:?}")))
    }
}

/// The full input tuple of [`build_scene`]. Also the scene cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SceneParams {
    pub view: ViewMode,
    pub color: ColorMode,
    pub show_full_brain: bool,
    pub statistic: StatisticType,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            view: ViewMode::default(),
            color: ColorMode::default(),
            show_full_brain: true,
            statistic: StatisticType::default(),
        }
    }
}

impl SceneParams {
    pub fn validate(&self) -> VizResult<()> {
        if !self.color.supports(self.view) {
            return Err(VizError::invalid_config(format!(
                "color mode {} is not available in {} view",
                self.color.wire_value(),
                self.view.label()
            )));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Scene description
// ─────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshKind {
    TemporalLobe,
    FullBrain,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Lighting {
    pub ambient: f32,
    pub diffuse: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeshLayer {
    pub kind: MeshKind,
    pub name: String,
    pub mesh: Arc<Mesh>,
    pub opacity: f32,
    pub base_color: String,
    pub lighting: Lighting,
    /// Shading scale for the mesh curvature; no color bar is shown.
    pub color_scale: ColorScale,
}

impl MeshLayer {
    fn cortex(kind: MeshKind, mesh: &Arc<Mesh>, opacity: f32) -> Self {
        Self {
            kind,
            name: "brain".to_string(),
            mesh: Arc::clone(mesh),
            opacity,
            base_color: "rgb(200,200,200)".to_string(),
            lighting: Lighting {
                ambient: 0.9,
                diffuse: 0.9,
            },
            color_scale: ColorScale::Curvature,
        }
    }
}

/// Resolved point colors; each variant carries exactly what it needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MarkerColor {
    /// Categorical per-region color.
    ByAnatomy { colors: Vec<String> },
    /// Selected statistic column on a zero-centered diverging scale.
    ByCorrelation {
        values: Vec<f32>,
        range: [f32; 2],
        color_scale: ColorScale,
        colorbar: ColorBar,
    },
    /// Stimulation effect codes on a fixed `[1, 3]` diverging scale.
    ByStimEffect {
        values: Vec<u8>,
        range: [f32; 2],
        color_scale: ColorScale,
    },
}

impl MarkerColor {
    pub fn range(&self) -> Option<[f32; 2]> {
        match self {
            MarkerColor::ByAnatomy { .. } => None,
            MarkerColor::ByCorrelation { range, .. } | MarkerColor::ByStimEffect { range, .. } => {
                Some(*range)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointCloud {
    pub name: String,
    /// Electrode indices; click events report these.
    pub ids: Vec<usize>,
    pub positions: Vec<[f32; 3]>,
    /// Hover text (anatomical label).
    pub text: Vec<String>,
    pub marker_size: f32,
    pub color: MarkerColor,
}

impl PointCloud {
    pub fn contains(&self, id: usize) -> bool {
        self.ids.contains(&id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Camera {
    pub eye: [f32; 3],
    pub up: [f32; 3],
    pub center: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneLayout {
    pub camera: Camera,
    /// x, y, z axis titles. Tick labels, grids, backgrounds and axis labels are hidden.
    pub axis_titles: [String; 3],
    pub height: u32,
    pub click_mode: String,
}

impl Default for SceneLayout {
    fn default() -> Self {
        Self {
            camera: Camera {
                eye: [-1.25, 0.1, 0.13],
                up: [0.0, 0.0, 1.0],
                center: [0.0, 0.0, 0.0],
            },
            axis_titles: ["L-R".to_string(), "A-P".to_string(), "D-V".to_string()],
            height: 500,
            click_mode: "event+select".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SceneDescription {
    pub params: SceneParams,
    /// Temporal lobe first, then the full brain when shown.
    pub meshes: Vec<MeshLayer>,
    pub points: PointCloud,
    pub layout: SceneLayout,
}

impl SceneDescription {
    pub fn mesh(&self, kind: MeshKind) -> Option<&MeshLayer> {
        self.meshes.iter().find(|m| m.kind == kind)
    }
}

// ─────────────────────────────────────────────────────────────────────────
// View selector
// ─────────────────────────────────────────────────────────────────────────

/// Electrode indices shown for `view`, in display order.
pub fn view_electrodes(dataset: &Dataset, view: ViewMode) -> Vec<usize> {
    match view {
        ViewMode::ReceptiveField => (0..dataset.electrode_count()).collect(),
        ViewMode::Stimulation => dataset.stimulation().iter().map(|s| s.electrode).collect(),
    }
}

pub fn build_scene(dataset: &Dataset, params: SceneParams) -> VizResult<SceneDescription> {
    params.validate()?;

    let ids = view_electrodes(dataset, params.view);
    let mut positions = Vec::with_capacity(ids.len());
    let mut text = Vec::with_capacity(ids.len());
    for &id in &ids {
        let e = dataset.electrode(id)?;
        positions.push(e.position);
        text.push(e.label.clone());
    }

    let color = match params.color {
        ColorMode::ByAnatomy => MarkerColor::ByAnatomy {
            colors: ids
                .iter()
                .map(|&id| dataset.electrode(id).map(|e| css_rgb(e.color)))
                .collect::<VizResult<_>>()?,
        },
        ColorMode::ByCorrelation => {
            let column = dataset.statistic_column(params.statistic);
            let values: Vec<f32> = ids.iter().map(|&id| column[id]).collect();
            let m = symmetric_half_range(&values);
            MarkerColor::ByCorrelation {
                values,
                range: [-m, m],
                color_scale: ColorScale::RdBuReversed,
                colorbar: ColorBar {
                    title: "Corr.".to_string(),
                    thickness: Some(20),
                    tick_values: Vec::new(),
                    tick_text: Vec::new(),
                },
            }
        }
        ColorMode::ByStimEffect => MarkerColor::ByStimEffect {
            values: dataset
                .stimulation()
                .iter()
                .map(|s| s.effect.code())
                .collect(),
            range: [1.0, 3.0],
            color_scale: ColorScale::RdBuReversed,
        },
    };

    let mut meshes = vec![MeshLayer::cortex(
        MeshKind::TemporalLobe,
        dataset.temporal_mesh(),
        0.6,
    )];
    if params.show_full_brain {
        meshes.push(MeshLayer::cortex(
            MeshKind::FullBrain,
            dataset.full_brain_mesh(),
            0.2,
        ));
    }

    Ok(SceneDescription {
        params,
        meshes,
        points: PointCloud {
            name: "electrode".to_string(),
            ids,
            positions,
            text,
            marker_size: 6.0,
            color,
        },
        layout: SceneLayout::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_builder, sample_dataset, STIM_SITES};
    use crate::dataset::LoadOptions;
    use ndarray::Array2;

    fn params(view: ViewMode, color: ColorMode, show: bool, stat: StatisticType) -> SceneParams {
        SceneParams {
            view,
            color,
            show_full_brain: show,
            statistic: stat,
        }
    }

    #[test]
    fn correlation_range_is_symmetric_max_abs() {
        let ds = sample_dataset(40);
        for &stat in StatisticType::all() {
            let scene = build_scene(
                &ds,
                params(ViewMode::ReceptiveField, ColorMode::ByCorrelation, true, stat),
            )
            .unwrap();
            let expected = ds
                .statistic_column(stat)
                .iter()
                .fold(0.0f32, |m, v| m.max(v.abs()));
            let expected = if expected == 0.0 { 1.0 } else { expected };
            assert_eq!(scene.points.color.range(), Some([-expected, expected]));
        }
    }

    #[test]
    fn correlation_range_uses_only_the_chosen_subset() {
        let mut b = sample_builder(20);
        // Large value outside the stimulation subset must not widen the range.
        b.correlations[[15, 14]] = 50.0;
        let ds = b.build(&LoadOptions::default()).unwrap();

        let rf = build_scene(
            &ds,
            params(ViewMode::ReceptiveField, ColorMode::ByCorrelation, true, StatisticType::Spectrogram),
        )
        .unwrap();
        assert_eq!(rf.points.color.range(), Some([-50.0, 50.0]));

        let st = build_scene(
            &ds,
            params(ViewMode::Stimulation, ColorMode::ByCorrelation, true, StatisticType::Spectrogram),
        )
        .unwrap();
        let [lo, hi] = st.points.color.range().unwrap();
        assert_eq!(lo, -hi);
        assert!(hi < 50.0);
    }

    #[test]
    fn all_zero_column_normalizes_to_unit_range() {
        let mut b = sample_builder(10);
        b.correlations = Array2::zeros(b.correlations.dim());
        let ds = b.build(&LoadOptions::default()).unwrap();
        let scene = build_scene(
            &ds,
            params(ViewMode::ReceptiveField, ColorMode::ByCorrelation, false, StatisticType::FullModel),
        )
        .unwrap();
        assert_eq!(scene.points.color.range(), Some([-1.0, 1.0]));
    }

    #[test]
    fn hiding_full_brain_removes_exactly_one_mesh() {
        let ds = sample_dataset(10);
        let on = build_scene(
            &ds,
            params(ViewMode::ReceptiveField, ColorMode::ByAnatomy, true, StatisticType::FullModel),
        )
        .unwrap();
        let off = build_scene(
            &ds,
            params(ViewMode::ReceptiveField, ColorMode::ByAnatomy, false, StatisticType::FullModel),
        )
        .unwrap();

        assert_eq!(on.meshes.len(), 2);
        assert_eq!(off.meshes.len(), 1);
        assert_eq!(off.meshes[0].kind, MeshKind::TemporalLobe);
        assert!(off.mesh(MeshKind::FullBrain).is_none());
        assert_eq!(on.meshes[0].kind, MeshKind::TemporalLobe);
        assert_eq!(on.meshes[0].opacity, off.meshes[0].opacity);
        assert!(Arc::ptr_eq(&on.meshes[0].mesh, &off.meshes[0].mesh));
        assert_eq!(on.points, off.points);

        let full = on.mesh(MeshKind::FullBrain).unwrap();
        assert_eq!(full.opacity, 0.2);
        assert_eq!(on.meshes[0].opacity, 0.6);
    }

    #[test]
    fn rf_view_shows_every_electrode_with_labels() {
        let ds = sample_dataset(25);
        let scene = build_scene(
            &ds,
            params(ViewMode::ReceptiveField, ColorMode::ByAnatomy, true, StatisticType::FullModel),
        )
        .unwrap();
        assert_eq!(scene.points.ids, (0..25).collect::<Vec<_>>());
        for (i, &id) in scene.points.ids.iter().enumerate() {
            let e = ds.electrode(id).unwrap();
            assert_eq!(scene.points.positions[i], e.position);
            assert_eq!(scene.points.text[i], e.label);
        }
        match &scene.points.color {
            MarkerColor::ByAnatomy { colors } => {
                assert_eq!(colors.len(), 25);
                assert_eq!(colors[3], css_rgb(ds.electrode(3).unwrap().color));
            }
            other => panic!("unexpected encoding {other:?}"),
        }
        assert_eq!(scene.points.color.range(), None);
    }

    #[test]
    fn stimulation_view_uses_stim_subset_and_fixed_range() {
        let ds = sample_dataset(30);
        let scene = build_scene(
            &ds,
            params(ViewMode::Stimulation, ColorMode::ByStimEffect, true, StatisticType::FullModel),
        )
        .unwrap();
        assert_eq!(scene.points.ids.len(), STIM_SITES);
        match &scene.points.color {
            MarkerColor::ByStimEffect { values, range, .. } => {
                assert_eq!(*range, [1.0, 3.0]);
                assert_eq!(values, &vec![1, 2, 3, 1, 2]);
            }
            other => panic!("unexpected encoding {other:?}"),
        }
    }

    #[test]
    fn stim_effect_coloring_is_rejected_in_rf_view() {
        let ds = sample_dataset(10);
        let err = build_scene(
            &ds,
            params(ViewMode::ReceptiveField, ColorMode::ByStimEffect, true, StatisticType::FullModel),
        )
        .unwrap_err();
        assert!(matches!(err, VizError::InvalidConfiguration(_)));
    }

    #[test]
    fn layout_matches_display_convention() {
        let ds = sample_dataset(3);
        let scene = build_scene(&ds, SceneParams::default()).unwrap();
        assert_eq!(scene.layout.camera.eye, [-1.25, 0.1, 0.13]);
        assert_eq!(scene.layout.axis_titles[2], "D-V");
        assert_eq!(scene.points.marker_size, 6.0);
        assert_eq!(scene.points.name, "electrode");
    }

    #[test]
    fn wire_values_parse() {
        assert_eq!("RF".parse::<ViewMode>().unwrap(), ViewMode::ReceptiveField);
        assert_eq!("ST".parse::<ViewMode>().unwrap(), ViewMode::Stimulation);
        assert!("XX".parse::<ViewMode>().is_err());
        assert_eq!("anatomy_num".parse::<ColorMode>().unwrap(), ColorMode::ByAnatomy);
        assert_eq!("vcorrs".parse::<ColorMode>().unwrap(), ColorMode::ByCorrelation);
        assert!(matches!(
            "rainbow".parse::<ColorMode>(),
            Err(VizError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn scene_serializes_with_tagged_marker_color() {
        let ds = sample_dataset(4);
        let scene = build_scene(&ds, SceneParams::default()).unwrap();
        let json = serde_json::to_value(&scene).unwrap();
        assert_eq!(json["points"]["color"]["mode"], "by_correlation");
        assert_eq!(json["points"]["color"]["color_scale"], "RdBu_r");
        assert_eq!(json["params"]["view"], "RF");
        assert_eq!(json["params"]["statistic"], 12);
    }
}
