//! Sparse vectors and the precomputed job feature matrix

use crate::error::{JobMatcherError, Result};
use serde::{Deserialize, Serialize};

/// A sparse vector with strictly increasing column indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl SparseVector {
    /// The all-zero vector.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Build from (column, value) pairs in any order. Repeated columns are
    /// summed and explicit zeros are dropped.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (usize, f64)>,
    {
        let mut pairs: Vec<(usize, f64)> = pairs.into_iter().collect();
        pairs.sort_by_key(|(col, _)| *col);

        let mut indices: Vec<usize> = Vec::with_capacity(pairs.len());
        let mut values: Vec<f64> = Vec::with_capacity(pairs.len());
        for (col, value) in pairs {
            if indices.last() == Some(&col) {
                if let Some(last) = values.last_mut() {
                    *last += value;
                }
            } else {
                indices.push(col);
                values.push(value);
            }
        }

        let (indices, values) = indices
            .into_iter()
            .zip(values)
            .filter(|(_, v)| *v != 0.0)
            .unzip();

        Self { indices, values }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }

    /// Largest populated column, if any.
    pub fn max_index(&self) -> Option<usize> {
        self.indices.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Euclidean norm
    pub fn norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Dot product via a merge over both sorted index lists.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    /// Scale every value in place.
    pub(crate) fn scale(&mut self, factor: f64) {
        for v in &mut self.values {
            *v *= factor;
        }
    }

    pub(crate) fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }
}

/// Cosine similarity between two sparse vectors. A zero vector is
/// dissimilar to everything, including another zero vector.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let norm_a = a.norm();
    let norm_b = b.norm();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        a.dot(b) / (norm_a * norm_b)
    }
}

/// Compressed sparse row matrix as stored in the model bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsrMatrix {
    /// (rows, columns)
    pub shape: (usize, usize),
    pub indptr: Vec<usize>,
    pub indices: Vec<usize>,
    pub data: Vec<f64>,
}

impl CsrMatrix {
    /// Pack sparse rows into CSR layout.
    pub fn from_rows(rows: &[SparseVector], n_cols: usize) -> Self {
        let mut indptr = Vec::with_capacity(rows.len() + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        indptr.push(0);
        for row in rows {
            indices.extend_from_slice(row.indices());
            data.extend_from_slice(row.values());
            indptr.push(indices.len());
        }

        Self {
            shape: (rows.len(), n_cols),
            indptr,
            indices,
            data,
        }
    }
}

/// The job feature matrix, one validated row per posting, with row norms
/// computed once at load time.
#[derive(Debug, Clone)]
pub struct JobMatrix {
    rows: Vec<SparseVector>,
    norms: Vec<f64>,
    n_features: usize,
}

impl JobMatrix {
    /// Validate a CSR matrix and unpack it into rows.
    pub fn from_csr(csr: CsrMatrix) -> Result<Self> {
        let (n_rows, n_features) = csr.shape;

        if csr.indptr.len() != n_rows + 1 {
            return Err(JobMatcherError::ArtifactLoad(format!(
                "job matrix indptr has {} entries, expected {} for {} rows",
                csr.indptr.len(),
                n_rows + 1,
                n_rows
            )));
        }
        if csr.indices.len() != csr.data.len() {
            return Err(JobMatcherError::ArtifactLoad(format!(
                "job matrix has {} column indices but {} values",
                csr.indices.len(),
                csr.data.len()
            )));
        }
        if csr.indptr.first() != Some(&0) || csr.indptr.last() != Some(&csr.data.len()) {
            return Err(JobMatcherError::ArtifactLoad(
                "job matrix indptr must start at 0 and end at the number of stored values".to_string(),
            ));
        }
        if csr.indptr.windows(2).any(|w| w[0] > w[1]) {
            return Err(JobMatcherError::ArtifactLoad(
                "job matrix indptr is not monotonically non-decreasing".to_string(),
            ));
        }
        if let Some(col) = csr.indices.iter().find(|&&col| col >= n_features) {
            return Err(JobMatcherError::ArtifactLoad(format!(
                "job matrix column index {} out of range for {} features",
                col, n_features
            )));
        }
        if csr.data.iter().any(|v| !v.is_finite()) {
            return Err(JobMatcherError::ArtifactLoad(
                "job matrix contains non-finite values".to_string(),
            ));
        }

        let rows: Vec<SparseVector> = csr
            .indptr
            .windows(2)
            .map(|w| {
                let (start, end) = (w[0], w[1]);
                SparseVector::from_pairs(
                    csr.indices[start..end]
                        .iter()
                        .copied()
                        .zip(csr.data[start..end].iter().copied()),
                )
            })
            .collect();
        let norms = rows.iter().map(SparseVector::norm).collect();

        Ok(Self {
            rows,
            norms,
            n_features,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn nnz(&self) -> usize {
        self.rows.iter().map(SparseVector::nnz).sum()
    }

    pub fn row(&self, index: usize) -> Option<&SparseVector> {
        self.rows.get(index)
    }

    /// Cosine similarity of `query` against every row, in row order.
    pub fn cosine_similarities(&self, query: &SparseVector) -> Result<Vec<f64>> {
        if let Some(col) = query.max_index() {
            if col >= self.n_features {
                return Err(JobMatcherError::Configuration(format!(
                    "query vector column {} exceeds job matrix width {}",
                    col, self.n_features
                )));
            }
        }

        let query_norm = query.norm();
        if query_norm == 0.0 {
            return Ok(vec![0.0; self.rows.len()]);
        }

        Ok(self
            .rows
            .iter()
            .zip(&self.norms)
            .map(|(row, &row_norm)| {
                if row_norm == 0.0 {
                    0.0
                } else {
                    query.dot(row) / (query_norm * row_norm)
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn csr(shape: (usize, usize), indptr: Vec<usize>, indices: Vec<usize>, data: Vec<f64>) -> CsrMatrix {
        CsrMatrix { shape, indptr, indices, data }
    }

    #[test]
    fn test_from_pairs_sorts_and_merges() {
        let v = SparseVector::from_pairs(vec![(3, 1.0), (1, 2.0), (3, 0.5), (2, 0.0)]);
        assert_eq!(v.indices(), &[1, 3]);
        assert_eq!(v.values(), &[2.0, 1.5]);
    }

    #[test]
    fn test_dot_and_norm() {
        let a = SparseVector::from_pairs(vec![(0, 1.0), (2, 2.0), (5, 3.0)]);
        let b = SparseVector::from_pairs(vec![(2, 4.0), (5, 1.0), (7, 9.0)]);
        assert_relative_eq!(a.dot(&b), 11.0);
        assert_relative_eq!(a.norm(), 14.0_f64.sqrt());
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        let a = SparseVector::from_pairs(vec![(0, 1.0)]);
        assert_eq!(cosine_similarity(&a, &SparseVector::zero()), 0.0);
        assert_eq!(cosine_similarity(&SparseVector::zero(), &SparseVector::zero()), 0.0);
        assert_relative_eq!(cosine_similarity(&a, &a), 1.0);
    }

    #[test]
    fn test_csr_round_trip_through_job_matrix() {
        let rows = vec![
            SparseVector::from_pairs(vec![(0, 1.0), (2, 1.0)]),
            SparseVector::zero(),
            SparseVector::from_pairs(vec![(1, 3.0)]),
        ];
        let matrix = JobMatrix::from_csr(CsrMatrix::from_rows(&rows, 3)).unwrap();

        assert_eq!(matrix.n_rows(), 3);
        assert_eq!(matrix.n_features(), 3);
        assert_eq!(matrix.nnz(), 3);
        assert_eq!(matrix.row(0), Some(&rows[0]));
        assert!(matrix.row(1).unwrap().is_zero());
    }

    #[test]
    fn test_cosine_similarities_against_rows() {
        let rows = vec![
            SparseVector::from_pairs(vec![(0, 1.0), (1, 1.0)]),
            SparseVector::from_pairs(vec![(2, 1.0)]),
            SparseVector::zero(),
        ];
        let matrix = JobMatrix::from_csr(CsrMatrix::from_rows(&rows, 3)).unwrap();
        let query = SparseVector::from_pairs(vec![(0, 1.0)]);

        let scores = matrix.cosine_similarities(&query).unwrap();
        assert_eq!(scores.len(), 3);
        assert_relative_eq!(scores[0], 1.0 / 2.0_f64.sqrt());
        assert_eq!(scores[1], 0.0);
        assert_eq!(scores[2], 0.0);
    }

    #[test]
    fn test_zero_query_scores_zero_everywhere() {
        let rows = vec![SparseVector::from_pairs(vec![(0, 1.0)])];
        let matrix = JobMatrix::from_csr(CsrMatrix::from_rows(&rows, 1)).unwrap();
        assert_eq!(matrix.cosine_similarities(&SparseVector::zero()).unwrap(), vec![0.0]);
    }

    #[test]
    fn test_query_wider_than_matrix_is_rejected() {
        let rows = vec![SparseVector::from_pairs(vec![(0, 1.0)])];
        let matrix = JobMatrix::from_csr(CsrMatrix::from_rows(&rows, 1)).unwrap();
        let query = SparseVector::from_pairs(vec![(4, 1.0)]);
        assert!(matches!(
            matrix.cosine_similarities(&query),
            Err(JobMatcherError::Configuration(_))
        ));
    }

    #[test]
    fn test_invalid_csr_is_rejected() {
        let bad_indptr = csr((2, 3), vec![0, 1], vec![0], vec![1.0]);
        assert!(matches!(JobMatrix::from_csr(bad_indptr), Err(JobMatcherError::ArtifactLoad(_))));

        let out_of_range = csr((1, 3), vec![0, 1], vec![3], vec![1.0]);
        assert!(matches!(JobMatrix::from_csr(out_of_range), Err(JobMatcherError::ArtifactLoad(_))));

        let length_mismatch = csr((1, 3), vec![0, 2], vec![0, 1], vec![1.0]);
        assert!(matches!(JobMatrix::from_csr(length_mismatch), Err(JobMatcherError::ArtifactLoad(_))));

        let decreasing = csr((3, 3), vec![0, 2, 1, 2], vec![0, 1], vec![1.0, 1.0]);
        let err = JobMatrix::from_csr(decreasing).unwrap_err();
        assert!(err.to_string().contains("monotonically"), "{}", err);

        let non_finite = csr((1, 3), vec![0, 1], vec![0], vec![f64::NAN]);
        assert!(matches!(JobMatrix::from_csr(non_finite), Err(JobMatcherError::ArtifactLoad(_))));
    }
}
