//! Pairwise distances between feature vectors.
//!
//! Arc weights of the training graph are produced by a [`Distance`]
//! implementation, or looked up in a pre-computed [`DistanceMatrix`]
//! indexed by the samples' original positions.
//!
//! # Examples
//!
//! ```
//! use opforest::distance::{Distance, DistanceMetric};
//!
//! let d = DistanceMetric::Euclidean.distance(&[0.0, 0.0], &[3.0, 4.0]);
//! assert!((d - 5.0).abs() < 1e-6);
//!
//! // Any closure with the right shape is a distance too.
//! let hamming = |a: &[f32], b: &[f32]| a.iter().zip(b).filter(|(x, y)| x != y).count() as f32;
//! assert_eq!(hamming.distance(&[1.0, 2.0], &[1.0, 3.0]), 1.0);
//! ```

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{OpfError, Result};
use crate::primitives::Matrix;

/// Scale applied by [`DistanceMetric::LogEuclidean`] so that log-compressed
/// weights keep useful resolution in `f32`.
pub const MAX_ARC_WEIGHT: f32 = 100_000.0;

/// A symmetric, non-negative dissimilarity between two feature vectors.
///
/// Implementations must be pure: equal inputs give equal outputs.
pub trait Distance {
    /// Distance between `a` and `b` (same length).
    fn distance(&self, a: &[f32], b: &[f32]) -> f32;
}

impl<F> Distance for F
where
    F: Fn(&[f32], &[f32]) -> f32,
{
    fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        self(a, b)
    }
}

/// Built-in distance metrics.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum DistanceMetric {
    /// Euclidean distance: `sqrt(sum((a_i - b_i)^2))`
    #[default]
    Euclidean,
    /// Squared Euclidean distance: `sum((a_i - b_i)^2)`
    SquaredEuclidean,
    /// `MAX_ARC_WEIGHT * ln(1 + sum((a_i - b_i)^2))`
    LogEuclidean,
    /// Manhattan distance: `sum(|a_i - b_i|)`
    Manhattan,
    /// Chebyshev distance: `max(|a_i - b_i|)`
    Chebyshev,
}

impl Distance for DistanceMetric {
    fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        debug_assert_eq!(a.len(), b.len(), "feature widths must match");
        match self {
            DistanceMetric::Euclidean => squared_euclidean(a, b).sqrt(),
            DistanceMetric::SquaredEuclidean => squared_euclidean(a, b),
            DistanceMetric::LogEuclidean => MAX_ARC_WEIGHT * squared_euclidean(a, b).ln_1p(),
            DistanceMetric::Manhattan => a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum::<f32>(),
            DistanceMetric::Chebyshev => a
                .iter()
                .zip(b)
                .map(|(x, y)| (x - y).abs())
                .fold(0.0, f32::max),
        }
    }
}

fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let diff = x - y;
            diff * diff
        })
        .sum()
}

/// Pre-computed pairwise distances, indexed by original sample identity.
///
/// Square, symmetric, zero-diagonal and non-negative; the constructors
/// reject anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f32>,
}

impl DistanceMatrix {
    /// Builds a matrix from explicit rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the rows are not square, symmetric, zero on the
    /// diagonal, finite and non-negative.
    pub fn from_rows<R: AsRef<[f32]>>(rows: &[R]) -> Result<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != n {
                return Err(OpfError::DimensionMismatch {
                    expected: format!("{n}x{n} distance matrix"),
                    actual: format!("row {i} has {} entries", row.len()),
                });
            }
            data.extend_from_slice(row);
        }
        let matrix = Self { n, data };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Computes all pairwise distances between the rows of `x`.
    ///
    /// Row `i` of `x` gets identity `i`.
    ///
    /// # Errors
    ///
    /// Returns an error if `metric` yields a negative, non-finite or
    /// asymmetric value (possible with custom closures or non-finite features).
    pub fn compute<D: Distance + Sync>(x: &Matrix<f32>, metric: &D) -> Result<Self> {
        let n = x.n_rows();
        let fill_row = |i: usize| -> Vec<f32> {
            (0..n)
                .map(|j| {
                    if i == j {
                        0.0
                    } else {
                        metric.distance(x.row(i), x.row(j))
                    }
                })
                .collect()
        };

        #[cfg(feature = "parallel")]
        let rows: Vec<Vec<f32>> = (0..n).into_par_iter().map(fill_row).collect();
        #[cfg(not(feature = "parallel"))]
        let rows: Vec<Vec<f32>> = (0..n).map(fill_row).collect();

        let matrix = Self {
            n,
            data: rows.into_iter().flatten().collect(),
        };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Number of samples covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.n
    }

    /// True when the matrix covers no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Distance between identities `i` and `j`.
    ///
    /// # Panics
    ///
    /// Panics if either identity is out of range.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.data[i * self.n + j]
    }

    /// Returns an error unless every identity is covered by the matrix.
    pub(crate) fn check_identities(&self, identities: &[usize]) -> Result<()> {
        match identities.iter().find(|&&id| id >= self.n) {
            Some(&id) => Err(OpfError::DimensionMismatch {
                expected: format!("sample identity < {}", self.n),
                actual: format!("{id}"),
            }),
            None => Ok(()),
        }
    }

    fn validate(&self) -> Result<()> {
        for i in 0..self.n {
            if self.get(i, i) != 0.0 {
                return Err(OpfError::InvalidHyperparameter {
                    param: format!("distances[{i}][{i}]"),
                    value: self.get(i, i).to_string(),
                    constraint: "0 on the diagonal".to_string(),
                });
            }
            for j in (i + 1)..self.n {
                let (a, b) = (self.get(i, j), self.get(j, i));
                if !a.is_finite() || a < 0.0 {
                    return Err(OpfError::InvalidHyperparameter {
                        param: format!("distances[{i}][{j}]"),
                        value: a.to_string(),
                        constraint: "finite and non-negative".to_string(),
                    });
                }
                if (a - b).abs() > 1e-6 * a.abs().max(1.0) {
                    return Err(OpfError::InvalidHyperparameter {
                        param: format!("distances[{j}][{i}]"),
                        value: b.to_string(),
                        constraint: format!("symmetric with distances[{i}][{j}] = {a}"),
                    });
                }
            }
        }
        Ok(())
    }
}
