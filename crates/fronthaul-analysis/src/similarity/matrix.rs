//! Validated square similarity matrix over an ordered list of cells.

use serde::{Deserialize, Serialize};

use fronthaul_core::errors::InputError;
use fronthaul_core::types::{CellId, SimilarityMethod};

/// Symmetry tolerance when validating external matrices.
const SYMMETRY_TOLERANCE: f64 = 1e-6;

/// A pair of cells with too few overlapping slots to compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegeneratePair {
    pub cell_a: CellId,
    pub cell_b: CellId,
}

/// Square, symmetric similarity matrix with values in `[0, 1]` and a unit
/// diagonal. Rows and columns follow `cell_ids`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSimilarityMatrix")]
pub struct SimilarityMatrix {
    matrix: Vec<Vec<f64>>,
    cell_ids: Vec<CellId>,
    method: SimilarityMethod,
    #[serde(default)]
    degenerate_pairs: Vec<DegeneratePair>,
}

#[derive(Deserialize)]
struct RawSimilarityMatrix {
    matrix: Vec<Vec<f64>>,
    cell_ids: Vec<CellId>,
    #[serde(default)]
    method: SimilarityMethod,
    #[serde(default)]
    degenerate_pairs: Vec<DegeneratePair>,
}

impl TryFrom<RawSimilarityMatrix> for SimilarityMatrix {
    type Error = InputError;

    fn try_from(raw: RawSimilarityMatrix) -> Result<Self, Self::Error> {
        let mut m = SimilarityMatrix::new(raw.matrix, raw.cell_ids, raw.method)?;
        m.degenerate_pairs = raw.degenerate_pairs;
        Ok(m)
    }
}

impl SimilarityMatrix {
    /// Validate an externally supplied matrix.
    ///
    /// Checks squareness, agreement with `cell_ids`, symmetry, the `[0, 1]`
    /// range, and a unit diagonal. Rows and columns are reordered so that
    /// `cell_ids` ascend.
    pub fn new(
        matrix: Vec<Vec<f64>>,
        cell_ids: Vec<CellId>,
        method: SimilarityMethod,
    ) -> Result<Self, InputError> {
        let n = matrix.len();
        if n != cell_ids.len() {
            return Err(InputError::InvalidMatrix(format!(
                "{n} rows but {} cell ids",
                cell_ids.len()
            )));
        }
        for (i, row) in matrix.iter().enumerate() {
            if row.len() != n {
                return Err(InputError::InvalidMatrix(format!(
                    "row {i} has {} columns, expected {n}",
                    row.len()
                )));
            }
        }
        let mut seen = cell_ids.clone();
        seen.sort();
        seen.dedup();
        if seen.len() != n {
            return Err(InputError::InvalidMatrix("duplicate cell ids".to_string()));
        }
        for i in 0..n {
            if (matrix[i][i] - 1.0).abs() > SYMMETRY_TOLERANCE {
                return Err(InputError::InvalidMatrix(format!(
                    "diagonal entry {i} is {}, expected 1",
                    matrix[i][i]
                )));
            }
            for j in 0..n {
                let v = matrix[i][j];
                if !(0.0..=1.0).contains(&v) {
                    return Err(InputError::InvalidMatrix(format!(
                        "entry ({i}, {j}) = {v} is outside [0, 1]"
                    )));
                }
                if (v - matrix[j][i]).abs() > SYMMETRY_TOLERANCE {
                    return Err(InputError::InvalidMatrix(format!(
                        "entries ({i}, {j}) and ({j}, {i}) differ"
                    )));
                }
            }
        }
        let (matrix, cell_ids) = sort_by_cell(matrix, cell_ids);
        Ok(Self {
            matrix,
            cell_ids,
            method,
            degenerate_pairs: Vec::new(),
        })
    }

    /// Trusted constructor for matrices built by the engine.
    pub(crate) fn from_parts(
        matrix: Vec<Vec<f64>>,
        cell_ids: Vec<CellId>,
        method: SimilarityMethod,
        degenerate_pairs: Vec<DegeneratePair>,
    ) -> Self {
        Self {
            matrix,
            cell_ids,
            method,
            degenerate_pairs,
        }
    }

    pub fn len(&self) -> usize {
        self.cell_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cell_ids.is_empty()
    }

    pub fn cell_ids(&self) -> &[CellId] {
        &self.cell_ids
    }

    pub fn method(&self) -> SimilarityMethod {
        self.method
    }

    pub fn degenerate_pairs(&self) -> &[DegeneratePair] {
        &self.degenerate_pairs
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.matrix
    }

    /// Entry by row/column index.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.matrix[i][j]
    }

    pub fn index_of(&self, cell: CellId) -> Option<usize> {
        self.cell_ids.iter().position(|&c| c == cell)
    }

    /// Similarity between two cells by id.
    pub fn similarity(&self, a: CellId, b: CellId) -> Option<f64> {
        Some(self.matrix[self.index_of(a)?][self.index_of(b)?])
    }

    /// `1 - similarity`, with an exact zero diagonal.
    pub fn distance_matrix(&self) -> Vec<Vec<f64>> {
        let n = self.len();
        let mut d = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    d[i][j] = 1.0 - self.matrix[i][j];
                }
            }
        }
        d
    }

    /// Mean off-diagonal similarity among the given row indices; 1.0 for
    /// fewer than two members.
    pub fn mean_similarity(&self, members: &[usize]) -> f64 {
        if members.len() < 2 {
            return 1.0;
        }
        let mut sum = 0.0;
        let mut count = 0usize;
        for (k, &i) in members.iter().enumerate() {
            for &j in &members[k + 1..] {
                sum += self.matrix[i][j];
                count += 1;
            }
        }
        sum / count as f64
    }
}

/// Permute rows and columns into ascending cell-id order.
fn sort_by_cell(matrix: Vec<Vec<f64>>, cell_ids: Vec<CellId>) -> (Vec<Vec<f64>>, Vec<CellId>) {
    if cell_ids.windows(2).all(|w| w[0] < w[1]) {
        return (matrix, cell_ids);
    }
    let mut order: Vec<usize> = (0..cell_ids.len()).collect();
    order.sort_by_key(|&i| cell_ids[i]);
    let sorted = order
        .iter()
        .map(|&i| order.iter().map(|&j| matrix[i][j]).collect())
        .collect();
    (sorted, order.iter().map(|&i| cell_ids[i]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: i64) -> Vec<CellId> {
        (1..=n).map(CellId).collect()
    }

    #[test]
    fn accepts_valid_matrix() {
        let m = SimilarityMatrix::new(
            vec![vec![1.0, 0.8], vec![0.8, 1.0]],
            ids(2),
            SimilarityMethod::Correlation,
        )
        .unwrap();
        assert_eq!(m.similarity(CellId(1), CellId(2)), Some(0.8));
        assert!((m.distance_matrix()[0][1] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn rejects_non_square() {
        let err = SimilarityMatrix::new(
            vec![vec![1.0, 0.5], vec![0.5]],
            ids(2),
            SimilarityMethod::Correlation,
        )
        .unwrap_err();
        assert!(matches!(err, InputError::InvalidMatrix(_)));
    }

    #[test]
    fn rejects_cell_count_mismatch() {
        assert!(SimilarityMatrix::new(vec![vec![1.0]], ids(2), SimilarityMethod::Cosine).is_err());
    }

    #[test]
    fn rejects_asymmetric_and_out_of_range() {
        assert!(SimilarityMatrix::new(
            vec![vec![1.0, 0.5], vec![0.6, 1.0]],
            ids(2),
            SimilarityMethod::Correlation
        )
        .is_err());
        assert!(SimilarityMatrix::new(
            vec![vec![1.0, 1.5], vec![1.5, 1.0]],
            ids(2),
            SimilarityMethod::Correlation
        )
        .is_err());
        assert!(SimilarityMatrix::new(
            vec![vec![0.9, 0.5], vec![0.5, 1.0]],
            ids(2),
            SimilarityMethod::Correlation
        )
        .is_err());
    }

    #[test]
    fn deserialization_validates() {
        let ok = r#"{"matrix": [[1.0, 0.3], [0.3, 1.0]], "cell_ids": ["1", "2"], "method": "cosine"}"#;
        let m: SimilarityMatrix = serde_json::from_str(ok).unwrap();
        assert_eq!(m.method(), SimilarityMethod::Cosine);

        let bad = r#"{"matrix": [[1.0, 0.3], [0.4, 1.0]], "cell_ids": ["1", "2"]}"#;
        assert!(serde_json::from_str::<SimilarityMatrix>(bad).is_err());
    }

    #[test]
    fn unsorted_cell_ids_are_reordered() {
        let json = r#"{
            "matrix": [[1.0, 0.1, 0.9], [0.1, 1.0, 0.2], [0.9, 0.2, 1.0]],
            "cell_ids": ["5", "1", "3"]
        }"#;
        let m: SimilarityMatrix = serde_json::from_str(json).unwrap();
        assert_eq!(m.cell_ids(), &[CellId(1), CellId(3), CellId(5)]);
        assert_eq!(
            m.rows(),
            &[
                vec![1.0, 0.2, 0.1],
                vec![0.2, 1.0, 0.9],
                vec![0.1, 0.9, 1.0],
            ]
        );
        assert_eq!(m.similarity(CellId(5), CellId(3)), Some(0.9));
        assert_eq!(m.similarity(CellId(1), CellId(5)), Some(0.1));
    }

    #[test]
    fn mean_similarity_of_singleton_is_one() {
        let m = SimilarityMatrix::new(
            vec![
                vec![1.0, 0.8, 0.2],
                vec![0.8, 1.0, 0.4],
                vec![0.2, 0.4, 1.0],
            ],
            ids(3),
            SimilarityMethod::Correlation,
        )
        .unwrap();
        assert_eq!(m.mean_similarity(&[2]), 1.0);
        assert!((m.mean_similarity(&[0, 1, 2]) - (0.8 + 0.2 + 0.4) / 3.0).abs() < 1e-12);
    }
}
