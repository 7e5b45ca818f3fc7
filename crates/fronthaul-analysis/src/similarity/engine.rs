//! Pairwise similarity computation.

use rayon::prelude::*;

use fronthaul_core::config::SimilarityConfig;
use fronthaul_core::constants;
use fronthaul_core::errors::AnalysisError;
use fronthaul_core::types::{CellSeries, SimilarityMethod};

use super::matrix::{DegeneratePair, SimilarityMatrix};
use crate::stats::{self, RollingBaseline};

/// Minimum overlapping slots for a pair to be compared.
const MIN_COMMON_SLOTS: usize = 2;

/// Parameters for [`compute_similarity`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityParams {
    pub method: SimilarityMethod,
    pub prewhiten: bool,
    pub window: usize,
    pub min_periods: usize,
    pub epsilon: f64,
}

impl Default for SimilarityParams {
    fn default() -> Self {
        Self::from(&SimilarityConfig::default())
    }
}

impl From<&SimilarityConfig> for SimilarityParams {
    fn from(config: &SimilarityConfig) -> Self {
        Self {
            method: config.effective_method(),
            prewhiten: config.effective_prewhiten(),
            window: config.effective_window(),
            min_periods: config.effective_min_periods(),
            epsilon: constants::DEFAULT_EPSILON,
        }
    }
}

/// Compute the similarity matrix over `series`, one row per cell,
/// cells ordered ascending.
///
/// Pairs are aligned on their common slots. Fewer than two common slots
/// gives similarity 0 and a degenerate-pair entry; an undefined
/// correlation is treated as 0 before scaling.
pub fn compute_similarity(
    series: &[CellSeries],
    params: &SimilarityParams,
) -> Result<SimilarityMatrix, AnalysisError> {
    if series.is_empty() {
        return Err(AnalysisError::NotEnoughCells {
            required: 1,
            actual: 0,
        });
    }

    let mut prepared: Vec<CellSeries> = series.iter().map(|s| prepare(s, params)).collect();
    prepared.sort_by_key(|s| s.cell_id);
    if let Some(w) = prepared.windows(2).find(|w| w[0].cell_id == w[1].cell_id) {
        return Err(AnalysisError::InvalidParameter {
            name: "series",
            message: format!("cell {} appears more than once", w[0].cell_id),
        });
    }

    let n = prepared.len();
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
        .collect();

    let scored: Vec<(usize, usize, f64, bool)> = pairs
        .par_iter()
        .map(|&(i, j)| {
            let (a, b) = prepared[i].align(&prepared[j]);
            if a.len() < MIN_COMMON_SLOTS {
                return (i, j, 0.0, true);
            }
            (i, j, pair_similarity(&a, &b, params.method), false)
        })
        .collect();

    let mut matrix = vec![vec![0.0; n]; n];
    let mut degenerate_pairs = Vec::new();
    for (i, row) in matrix.iter_mut().enumerate() {
        row[i] = 1.0;
    }
    for (i, j, s, degenerate) in scored {
        matrix[i][j] = s;
        matrix[j][i] = s;
        if degenerate {
            tracing::warn!(
                cell_a = %prepared[i].cell_id,
                cell_b = %prepared[j].cell_id,
                "fewer than {MIN_COMMON_SLOTS} common slots, similarity set to 0"
            );
            degenerate_pairs.push(DegeneratePair {
                cell_a: prepared[i].cell_id,
                cell_b: prepared[j].cell_id,
            });
        }
    }

    let cell_ids = prepared.iter().map(|s| s.cell_id).collect();
    tracing::info!(
        cell_count = n,
        method = %params.method,
        degenerate = degenerate_pairs.len(),
        "similarity matrix computed"
    );
    Ok(SimilarityMatrix::from_parts(
        matrix,
        cell_ids,
        params.method,
        degenerate_pairs,
    ))
}

/// Method-specific preprocessing of one series.
fn prepare(series: &CellSeries, params: &SimilarityParams) -> CellSeries {
    match params.method {
        SimilarityMethod::Correlation if params.prewhiten => {
            let baseline = RollingBaseline::compute(series.values(), params.window, params.min_periods);
            let z = baseline.robust_z(series.values(), params.epsilon);
            series.with_values(&z)
        }
        SimilarityMethod::Correlation => series.clone(),
        SimilarityMethod::Cosine => series.map_values(|v| if v > 0.0 { 1.0 } else { 0.0 }),
    }
}

fn pair_similarity(a: &[f64], b: &[f64], method: SimilarityMethod) -> f64 {
    match method {
        SimilarityMethod::Correlation => {
            let r = stats::nan_to_zero(stats::pearson(a, b));
            ((r + 1.0) / 2.0).clamp(0.0, 1.0)
        }
        SimilarityMethod::Cosine => stats::nan_to_zero(stats::cosine(a, b)).clamp(0.0, 1.0),
    }
}
