//! Deterministic in-memory datasets for unit tests.

use ndarray::{Array2, Array3};

use crate::dataset::{
    Dataset, DatasetBuilder, LoadOptions, Mesh, Region, StimEffect, StimulationEffect,
};

pub const REGION_NAMES: [&str; 7] = ["HG", "PT", "PP", "pSTG", "mSTG", "aSTG", "pMTG"];
pub const TIME_BINS: usize = 60;
pub const SPECTROGRAM_ROWS: usize = 80;
pub const STIM_SITES: usize = 5;

fn wave(a: usize, b: usize, c: usize) -> f32 {
    let k = (a * 31 + b * 17 + c * 7) % 23;
    k as f32 / 11.0 - 1.0
}

pub fn sample_builder(n: usize) -> DatasetBuilder {
    let temporal = Mesh::new(
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        vec![[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]],
    );
    let full_brain = Mesh::new(
        vec![
            [1.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, -1.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, -1.0],
        ],
        vec![
            [0, 2, 4],
            [2, 1, 4],
            [1, 3, 4],
            [3, 0, 4],
            [2, 0, 5],
            [1, 2, 5],
            [3, 1, 5],
            [0, 3, 5],
        ],
    )
    .with_curvature(vec![0.1, -0.2, 0.3, -0.4, 0.5, -0.6]);

    let regions = REGION_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| Region {
            name: name.to_string(),
            color: [i as f32 / 7.0, 0.5, 1.0 - i as f32 / 7.0],
        })
        .collect();

    let positions = (0..n)
        .map(|i| [-60.0 + (i % 20) as f32, 10.0 - (i / 20) as f32, 5.0 + (i % 3) as f32])
        .collect();
    let region_codes = (0..n).map(|i| (i % REGION_NAMES.len()) as u16 + 1).collect();

    let stimulation = (0..n.min(STIM_SITES))
        .map(|i| StimulationEffect {
            electrode: i,
            effect: StimEffect::new((i % 3) as u8 + 1).unwrap(),
            passive: format!("passive effect {i}"),
            repetition: format!("repetition effect {i}"),
        })
        .collect();

    DatasetBuilder {
        temporal,
        full_brain,
        regions,
        positions,
        region_codes,
        unique_variance: Array2::from_shape_fn((n, 6), |(i, j)| wave(i, j, 1) * 0.2),
        correlations: Array2::from_shape_fn((n, 15), |(i, j)| wave(i, j, 2) * 0.5),
        receptive_fields: Array3::from_shape_fn((n, 46, TIME_BINS), |(i, f, t)| {
            wave(i, f, t) * (1.0 + t as f32 / TIME_BINS as f32)
        }),
        spectrograms: Array3::from_shape_fn((n, SPECTROGRAM_ROWS, TIME_BINS), |(i, f, t)| {
            wave(i, f + 3, t) * 0.25
        }),
        stimulation,
    }
}

pub fn sample_dataset(n: usize) -> Dataset {
    sample_builder(n).build(&LoadOptions::default()).unwrap()
}
