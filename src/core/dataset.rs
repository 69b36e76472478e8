//! Immutable scientific dataset backing every view.
//!
//! Raw arrays are collected in a [`DatasetBuilder`] (either by hand or from a
//! bundle file), validated once, and frozen into a [`Dataset`]. Nothing is
//! mutated after [`DatasetBuilder::build`] returns.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::sync::Arc;

use ndarray::{concatenate, Array2, Array3, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{VizError, VizResult};
use crate::statistic::{StatisticType, FEATURE_COUNT, MIN_STATISTIC_COLUMNS};
use crate::storage;

const TAG_TEMPORAL_MESH: [u8; 4] = *b"TMSH";
const TAG_FULL_MESH: [u8; 4] = *b"FMSH";
const TAG_CURVATURE: [u8; 4] = *b"CURV";
const TAG_TEMPORAL_CURVATURE: [u8; 4] = *b"TCRV";
const TAG_ELECTRODES: [u8; 4] = *b"ELEC";
const TAG_REGIONS: [u8; 4] = *b"REGN";
const TAG_UNIQUE_VARIANCE: [u8; 4] = *b"UVAR";
const TAG_CORRELATIONS: [u8; 4] = *b"VCOR";
const TAG_RECEPTIVE_FIELDS: [u8; 4] = *b"FSTR";
const TAG_SPECTROGRAMS: [u8; 4] = *b"SSTR";
const TAG_STIMULATION: [u8; 4] = *b"STIM";

// ─────────────────────────────────────────────────────────────────────────
// Records
// ─────────────────────────────────────────────────────────────────────────

/// Triangulated surface with optional per-vertex curvature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<[f32; 3]>,
    pub triangles: Vec<[u32; 3]>,
    pub curvature: Option<Vec<f32>>,
}

impl Mesh {
    pub fn new(vertices: Vec<[f32; 3]>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            triangles,
            curvature: None,
        }
    }

    pub fn with_curvature(mut self, curvature: Vec<f32>) -> Self {
        self.curvature = Some(curvature);
        self
    }

    fn validate(&self, what: &str) -> VizResult<()> {
        let n = self.vertices.len();
        if let Some(bad) = self
            .triangles
            .iter()
            .flatten()
            .find(|&&ix| ix as usize >= n)
        {
            return Err(VizError::data_load(
                what,
                format!("triangle references vertex {bad} but mesh has {n} vertices"),
            ));
        }
        if let Some(curv) = &self.curvature {
            if curv.len() != n {
                return Err(VizError::data_load(
                    what,
                    format!("curvature has {} values for {n} vertices", curv.len()),
                ));
            }
        }
        Ok(())
    }
}

/// Anatomical region: display name and RGB color (components in 0..=1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub color: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Electrode {
    /// Row position in the source table; the cross-reference key for every table.
    pub index: usize,
    pub position: [f32; 3],
    /// Zero-based region code.
    pub region: u16,
    pub label: String,
    pub color: [f32; 3],
}

/// Categorical stimulation outcome (codes 1..=3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct StimEffect(u8);

impl StimEffect {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 3;

    pub fn new(code: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&code).then_some(Self(code))
    }

    pub fn code(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for StimEffect {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::new(code).ok_or_else(|| format!("stimulation effect code {code} not in 1..=3"))
    }
}

impl From<StimEffect> for u8 {
    fn from(e: StimEffect) -> u8 {
        e.0
    }
}

/// One row of the stimulation summary table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StimulationEffect {
    pub electrode: usize,
    pub effect: StimEffect,
    /// Effect observed during passive listening.
    #[serde(default)]
    pub passive: String,
    /// Effect observed during the repetition task.
    #[serde(default)]
    pub repetition: String,
}

/// Load-time placement adjustment: electrodes in regions `>= region_shift_min`
/// are moved by `region_shift_x` along x so they sit outside the pial surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadOptions {
    pub region_shift_min: u16,
    pub region_shift_x: f32,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            region_shift_min: 5,
            region_shift_x: -1.0,
        }
    }
}

impl LoadOptions {
    /// No placement adjustment.
    pub fn unshifted() -> Self {
        Self {
            region_shift_min: u16::MAX,
            region_shift_x: 0.0,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Dataset
// ─────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Dataset {
    temporal: Arc<Mesh>,
    full_brain: Arc<Mesh>,
    regions: Vec<Region>,
    electrodes: Vec<Electrode>,
    statistics: Array2<f32>,
    receptive_fields: Array3<f32>,
    spectrograms: Array3<f32>,
    stimulation: Vec<StimulationEffect>,
}

impl Dataset {
    /// Load and validate a bundle file. Any failure is fatal for the caller.
    pub fn load_bundle(path: impl AsRef<Path>, opts: &LoadOptions) -> VizResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            VizError::data_load(path.display().to_string(), format!("cannot open: {e}"))
        })?;
        let dataset = Self::load_bundle_from(&mut BufReader::new(file), opts)?;
        info!(
            path = %path.display(),
            electrodes = dataset.electrode_count(),
            regions = dataset.regions.len(),
            stimulation_sites = dataset.stimulation.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    pub fn load_bundle_from<R: Read>(r: &mut R, opts: &LoadOptions) -> VizResult<Self> {
        DatasetBuilder::read_bundle_from(r)?.build(opts)
    }

    /// Meshes are shared with every scene built from this dataset.
    pub fn temporal_mesh(&self) -> &Arc<Mesh> {
        &self.temporal
    }

    pub fn full_brain_mesh(&self) -> &Arc<Mesh> {
        &self.full_brain
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn electrodes(&self) -> &[Electrode] {
        &self.electrodes
    }

    pub fn electrode_count(&self) -> usize {
        self.electrodes.len()
    }

    pub fn electrode(&self, index: usize) -> VizResult<&Electrode> {
        self.electrodes
            .get(index)
            .ok_or(VizError::ElectrodeOutOfRange {
                index,
                count: self.electrodes.len(),
            })
    }

    /// Statistics matrix `[electrode, column]` (unique variance, then correlations).
    pub fn statistics(&self) -> ArrayView2<'_, f32> {
        self.statistics.view()
    }

    pub fn statistic_column(&self, statistic: StatisticType) -> ArrayView1<'_, f32> {
        self.statistics.column(statistic.column())
    }

    pub fn statistic(&self, index: usize, statistic: StatisticType) -> VizResult<f32> {
        self.electrode(index)?;
        Ok(self.statistics[[index, statistic.column()]])
    }

    /// Receptive-field weights `[feature, time]` of one electrode.
    pub fn receptive_field(&self, index: usize) -> VizResult<ArrayView2<'_, f32>> {
        self.electrode(index)?;
        Ok(self.receptive_fields.index_axis(Axis(0), index))
    }

    /// Spectrogram-model weights `[frequency, time]` of one electrode.
    pub fn spectrogram(&self, index: usize) -> VizResult<ArrayView2<'_, f32>> {
        self.electrode(index)?;
        Ok(self.spectrograms.index_axis(Axis(0), index))
    }

    /// `(frequency rows, time bins)` of every spectrogram slice.
    pub fn spectrogram_shape(&self) -> (usize, usize) {
        let (_, f, t) = self.spectrograms.dim();
        (f, t)
    }

    pub fn stimulation(&self) -> &[StimulationEffect] {
        &self.stimulation
    }

    pub fn stimulation_for(&self, index: usize) -> Option<&StimulationEffect> {
        self.stimulation.iter().find(|s| s.electrode == index)
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Builder + bundle codec
// ─────────────────────────────────────────────────────────────────────────

/// Raw source tables, as stored in a bundle. Region codes are one-based.
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    pub temporal: Mesh,
    pub full_brain: Mesh,
    pub regions: Vec<Region>,
    pub positions: Vec<[f32; 3]>,
    pub region_codes: Vec<u16>,
    pub unique_variance: Array2<f32>,
    pub correlations: Array2<f32>,
    pub receptive_fields: Array3<f32>,
    pub spectrograms: Array3<f32>,
    pub stimulation: Vec<StimulationEffect>,
}

impl DatasetBuilder {
    /// Validate every table against the electrode count and freeze the result.
    pub fn build(self, opts: &LoadOptions) -> VizResult<Dataset> {
        self.temporal.validate("temporal mesh")?;
        self.full_brain.validate("full-brain mesh")?;

        let n = self.positions.len();
        if n == 0 {
            return Err(VizError::data_load("electrodes", "electrode table is empty"));
        }
        if self.region_codes.len() != n {
            return Err(VizError::data_load(
                "electrodes",
                format!(
                    "{} region codes for {n} electrode positions",
                    self.region_codes.len()
                ),
            ));
        }

        let mut electrodes = Vec::with_capacity(n);
        for (index, (&position, &code)) in self.positions.iter().zip(&self.region_codes).enumerate()
        {
            if code == 0 || code as usize > self.regions.len() {
                return Err(VizError::data_load(
                    "electrodes",
                    format!(
                        "electrode {index} has region code {code}; expected 1..={}",
                        self.regions.len()
                    ),
                ));
            }
            let region = code - 1;
            let info = &self.regions[region as usize];
            let mut position = position;
            if region >= opts.region_shift_min {
                position[0] += opts.region_shift_x;
            }
            electrodes.push(Electrode {
                index,
                position,
                region,
                label: info.name.clone(),
                color: info.color,
            });
        }

        for (what, rows) in [
            ("unique-variance matrix", self.unique_variance.nrows()),
            ("correlation matrix", self.correlations.nrows()),
            ("receptive-field tensor", self.receptive_fields.dim().0),
            ("spectrogram tensor", self.spectrograms.dim().0),
        ] {
            if rows != n {
                return Err(VizError::data_load(
                    what,
                    format!("{rows} rows for {n} electrodes"),
                ));
            }
        }

        let statistics = concatenate(
            Axis(1),
            &[self.unique_variance.view(), self.correlations.view()],
        )
        .map_err(|e| VizError::data_load("statistics matrix", e.to_string()))?;
        if statistics.ncols() < MIN_STATISTIC_COLUMNS {
            return Err(VizError::data_load(
                "statistics matrix",
                format!(
                    "{} columns; at least {MIN_STATISTIC_COLUMNS} required",
                    statistics.ncols()
                ),
            ));
        }

        let (_, features, rf_time) = self.receptive_fields.dim();
        if features != FEATURE_COUNT || rf_time == 0 {
            return Err(VizError::data_load(
                "receptive-field tensor",
                format!("slices are {features}x{rf_time}; expected {FEATURE_COUNT} feature rows"),
            ));
        }
        let (_, freqs, sp_time) = self.spectrograms.dim();
        if freqs == 0 || sp_time == 0 {
            return Err(VizError::data_load(
                "spectrogram tensor",
                "empty spectrogram slices",
            ));
        }

        if let Some(bad) = self.stimulation.iter().find(|s| s.electrode >= n) {
            return Err(VizError::data_load(
                "stimulation table",
                format!("references electrode {} of {n}", bad.electrode),
            ));
        }
        let mut seen = vec![false; n];
        for s in &self.stimulation {
            if std::mem::replace(&mut seen[s.electrode], true) {
                return Err(VizError::data_load(
                    "stimulation table",
                    format!("electrode {} listed more than once", s.electrode),
                ));
            }
        }

        Ok(Dataset {
            temporal: Arc::new(self.temporal),
            full_brain: Arc::new(self.full_brain),
            regions: self.regions,
            electrodes,
            statistics,
            receptive_fields: self.receptive_fields,
            spectrograms: self.spectrograms,
            stimulation: self.stimulation,
        })
    }

    pub fn write_bundle(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let mut w = BufWriter::new(File::create(path)?);
        self.write_bundle_to(&mut w)?;
        w.flush()
    }

    pub fn write_bundle_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        storage::write_header(w)?;

        write_mesh_chunk(w, TAG_TEMPORAL_MESH, &self.temporal)?;
        write_mesh_chunk(w, TAG_FULL_MESH, &self.full_brain)?;
        if let Some(curv) = &self.full_brain.curvature {
            write_f32_chunk(w, TAG_CURVATURE, curv)?;
        }
        if let Some(curv) = &self.temporal.curvature {
            write_f32_chunk(w, TAG_TEMPORAL_CURVATURE, curv)?;
        }

        let mut payload = Vec::new();
        storage::write_len(&mut payload, self.positions.len())?;
        for (p, code) in self.positions.iter().zip(&self.region_codes) {
            for c in p {
                storage::write_f32_le(&mut payload, *c)?;
            }
            storage::write_u32_le(&mut payload, u32::from(*code))?;
        }
        storage::write_chunk_lz4(w, TAG_ELECTRODES, &payload)?;

        let mut payload = Vec::new();
        storage::write_len(&mut payload, self.regions.len())?;
        for region in &self.regions {
            storage::write_string(&mut payload, &region.name)?;
            for c in region.color {
                storage::write_f32_le(&mut payload, c)?;
            }
        }
        storage::write_chunk_lz4(w, TAG_REGIONS, &payload)?;

        write_matrix_chunk(w, TAG_UNIQUE_VARIANCE, &self.unique_variance)?;
        write_matrix_chunk(w, TAG_CORRELATIONS, &self.correlations)?;
        write_tensor_chunk(w, TAG_RECEPTIVE_FIELDS, &self.receptive_fields)?;
        write_tensor_chunk(w, TAG_SPECTROGRAMS, &self.spectrograms)?;

        let payload = serde_json::to_vec(&self.stimulation)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        storage::write_chunk_lz4(w, TAG_STIMULATION, &payload)
    }

    /// Read raw tables from a bundle. Unknown chunks are skipped; every
    /// required chunk must be present.
    pub fn read_bundle_from<R: Read>(r: &mut R) -> VizResult<Self> {
        storage::read_header(r).map_err(|e| VizError::data_load("dataset bundle", e.to_string()))?;

        let mut slots = BundleSlots::default();
        loop {
            let (tag, len) = match storage::read_chunk_header(r) {
                Ok(Some(v)) => v,
                Ok(None) => break,
                Err(e) => return Err(VizError::data_load("dataset bundle", e.to_string())),
            };
            storage::read_chunk_payload(r, len)
                .and_then(|payload| slots.accept(tag, &payload))
                .map_err(|e| VizError::data_load(tag_name(tag), e.to_string()))?;
        }
        slots.finish()
    }
}

/// Chunks collected while scanning a bundle.
#[derive(Default)]
struct BundleSlots {
    temporal: Option<Mesh>,
    full_brain: Option<Mesh>,
    curvature: Option<Vec<f32>>,
    temporal_curvature: Option<Vec<f32>>,
    electrodes: Option<(Vec<[f32; 3]>, Vec<u16>)>,
    regions: Option<Vec<Region>>,
    unique_variance: Option<Array2<f32>>,
    correlations: Option<Array2<f32>>,
    receptive_fields: Option<Array3<f32>>,
    spectrograms: Option<Array3<f32>>,
    stimulation: Option<Vec<StimulationEffect>>,
}

impl BundleSlots {
    fn accept(&mut self, tag: [u8; 4], payload: &[u8]) -> io::Result<()> {
        let mut cursor = io::Cursor::new(payload);
        match tag {
            TAG_TEMPORAL_MESH => self.temporal = Some(read_mesh_payload(&mut cursor)?),
            TAG_FULL_MESH => self.full_brain = Some(read_mesh_payload(&mut cursor)?),
            TAG_CURVATURE => self.curvature = Some(storage::read_f32_vec(&mut cursor)?),
            TAG_TEMPORAL_CURVATURE => {
                self.temporal_curvature = Some(storage::read_f32_vec(&mut cursor)?)
            }
            TAG_ELECTRODES => self.electrodes = Some(read_electrode_payload(&mut cursor)?),
            TAG_REGIONS => self.regions = Some(read_region_payload(&mut cursor)?),
            TAG_UNIQUE_VARIANCE => self.unique_variance = Some(read_matrix_payload(&mut cursor)?),
            TAG_CORRELATIONS => self.correlations = Some(read_matrix_payload(&mut cursor)?),
            TAG_RECEPTIVE_FIELDS => self.receptive_fields = Some(read_tensor_payload(&mut cursor)?),
            TAG_SPECTROGRAMS => self.spectrograms = Some(read_tensor_payload(&mut cursor)?),
            TAG_STIMULATION => {
                self.stimulation = Some(
                    serde_json::from_slice(payload)
                        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?,
                )
            }
            _ => {
                // Unknown chunk: skipped.
            }
        }
        Ok(())
    }

    fn finish(self) -> VizResult<DatasetBuilder> {
        let mut temporal = required(self.temporal, TAG_TEMPORAL_MESH)?;
        temporal.curvature = self.temporal_curvature;
        let mut full_brain = required(self.full_brain, TAG_FULL_MESH)?;
        full_brain.curvature = Some(required(self.curvature, TAG_CURVATURE)?);
        let (positions, region_codes) = required(self.electrodes, TAG_ELECTRODES)?;

        Ok(DatasetBuilder {
            temporal,
            full_brain,
            regions: required(self.regions, TAG_REGIONS)?,
            positions,
            region_codes,
            unique_variance: required(self.unique_variance, TAG_UNIQUE_VARIANCE)?,
            correlations: required(self.correlations, TAG_CORRELATIONS)?,
            receptive_fields: required(self.receptive_fields, TAG_RECEPTIVE_FIELDS)?,
            spectrograms: required(self.spectrograms, TAG_SPECTROGRAMS)?,
            stimulation: required(self.stimulation, TAG_STIMULATION)?,
        })
    }
}

fn tag_name(tag: [u8; 4]) -> String {
    format!("{} chunk", String::from_utf8_lossy(&tag))
}

fn required<T>(v: Option<T>, tag: [u8; 4]) -> VizResult<T> {
    v.ok_or_else(|| VizError::data_load("dataset bundle", format!("missing {}", tag_name(tag))))
}

fn write_f32_chunk<W: Write>(w: &mut W, tag: [u8; 4], values: &[f32]) -> io::Result<()> {
    let mut payload = Vec::with_capacity(4 + values.len() * 4);
    storage::write_f32_slice(&mut payload, values)?;
    storage::write_chunk_lz4(w, tag, &payload)
}

fn write_mesh_chunk<W: Write>(w: &mut W, tag: [u8; 4], mesh: &Mesh) -> io::Result<()> {
    let mut payload = Vec::with_capacity(8 + mesh.vertices.len() * 12 + mesh.triangles.len() * 12);
    storage::write_len(&mut payload, mesh.vertices.len())?;
    for v in &mesh.vertices {
        for c in v {
            storage::write_f32_le(&mut payload, *c)?;
        }
    }
    storage::write_len(&mut payload, mesh.triangles.len())?;
    for t in &mesh.triangles {
        for ix in t {
            storage::write_u32_le(&mut payload, *ix)?;
        }
    }
    storage::write_chunk_lz4(w, tag, &payload)
}

fn read_mesh_payload<R: Read>(r: &mut R) -> io::Result<Mesh> {
    let nv = storage::read_len(r)?;
    let mut vertices = Vec::with_capacity(nv.min(1 << 22));
    for _ in 0..nv {
        vertices.push([
            storage::read_f32_le(r)?,
            storage::read_f32_le(r)?,
            storage::read_f32_le(r)?,
        ]);
    }
    let nt = storage::read_len(r)?;
    let mut triangles = Vec::with_capacity(nt.min(1 << 22));
    for _ in 0..nt {
        triangles.push([
            storage::read_u32_le(r)?,
            storage::read_u32_le(r)?,
            storage::read_u32_le(r)?,
        ]);
    }
    Ok(Mesh::new(vertices, triangles))
}

fn read_electrode_payload<R: Read>(r: &mut R) -> io::Result<(Vec<[f32; 3]>, Vec<u16>)> {
    let n = storage::read_len(r)?;
    let mut positions = Vec::with_capacity(n.min(1 << 20));
    let mut codes = Vec::with_capacity(n.min(1 << 20));
    for _ in 0..n {
        positions.push([
            storage::read_f32_le(r)?,
            storage::read_f32_le(r)?,
            storage::read_f32_le(r)?,
        ]);
        let code = u16::try_from(storage::read_u32_le(r)?)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "region code too large"))?;
        codes.push(code);
    }
    Ok((positions, codes))
}

fn read_region_payload<R: Read>(r: &mut R) -> io::Result<Vec<Region>> {
    let n = storage::read_len(r)?;
    let mut regions = Vec::with_capacity(n.min(1 << 16));
    for _ in 0..n {
        let name = storage::read_string(r)?;
        let color = [
            storage::read_f32_le(r)?,
            storage::read_f32_le(r)?,
            storage::read_f32_le(r)?,
        ];
        regions.push(Region { name, color });
    }
    Ok(regions)
}

fn write_matrix_chunk<W: Write>(w: &mut W, tag: [u8; 4], m: &Array2<f32>) -> io::Result<()> {
    let mut payload = Vec::with_capacity(8 + m.len() * 4);
    storage::write_len(&mut payload, m.nrows())?;
    storage::write_len(&mut payload, m.ncols())?;
    for v in m.iter() {
        storage::write_f32_le(&mut payload, *v)?;
    }
    storage::write_chunk_lz4(w, tag, &payload)
}

fn read_matrix_payload<R: Read>(r: &mut R) -> io::Result<Array2<f32>> {
    let rows = storage::read_len(r)?;
    let cols = storage::read_len(r)?;
    let data = read_f32_values(r, rows.saturating_mul(cols))?;
    Array2::from_shape_vec((rows, cols), data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn write_tensor_chunk<W: Write>(w: &mut W, tag: [u8; 4], t: &Array3<f32>) -> io::Result<()> {
    let (d0, d1, d2) = t.dim();
    let mut payload = Vec::with_capacity(12 + t.len() * 4);
    storage::write_len(&mut payload, d0)?;
    storage::write_len(&mut payload, d1)?;
    storage::write_len(&mut payload, d2)?;
    // Logical (row-major) order regardless of memory layout.
    for v in t.iter() {
        storage::write_f32_le(&mut payload, *v)?;
    }
    storage::write_chunk_lz4(w, tag, &payload)
}

fn read_tensor_payload<R: Read>(r: &mut R) -> io::Result<Array3<f32>> {
    let d0 = storage::read_len(r)?;
    let d1 = storage::read_len(r)?;
    let d2 = storage::read_len(r)?;
    let data = read_f32_values(r, d0.saturating_mul(d1).saturating_mul(d2))?;
    Array3::from_shape_vec((d0, d1, d2), data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn read_f32_values<R: Read>(r: &mut R, n: usize) -> io::Result<Vec<f32>> {
    let mut out = Vec::with_capacity(n.min(1 << 24));
    for _ in 0..n {
        out.push(storage::read_f32_le(r)?);
    }
    Ok(out)
}
