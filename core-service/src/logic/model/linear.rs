//! Linear Model - Ordinary least squares on standardized features
//!
//! The fit centers the design matrix and the target and takes the
//! minimum-norm least-squares solution through an SVD. A Cholesky pass over
//! the centered normal equations, pivoting in column order, flags columns
//! whose remaining pivot is negligible relative to their own squared norm:
//! those are linearly dependent on earlier columns ("aliased"). Aliased
//! columns are reported; the minimum-norm solution spreads their share of
//! the fit evenly instead of pinning any one of them to 0.

use nalgebra::{DMatrix, DVector, SVD};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::constants::{MIN_TRAINING_ROWS, SVD_MAX_ITERATIONS};
use crate::logic::error::{DimensionMismatch, TrainingError};

/// Weight vector + bias; immutable after fitting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    weights: Vec<f64>,
    bias: f64,
    /// Indices of columns found linearly dependent on earlier ones
    aliased: Vec<usize>,
}

/// Solution of the least-squares problem before any policy is applied
#[derive(Debug, Clone)]
pub struct OlsFit {
    pub model: LinearModel,
    pub aliased: Vec<usize>,
}

impl LinearModel {
    /// Build from explicit coefficients
    pub fn new(weights: Vec<f64>, bias: f64) -> Self {
        Self {
            weights,
            bias,
            aliased: Vec::new(),
        }
    }

    /// Least-squares fit; aliased columns are reported, not rejected
    pub fn fit_ols(
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
        tolerance: f64,
    ) -> Result<OlsFit, TrainingError> {
        let (n, p) = x.dim();

        if n != y.len() {
            return Err(TrainingError::LabelMismatch { rows: n, labels: y.len() });
        }
        if n == 0 {
            return Err(TrainingError::EmptyTrainingSet);
        }
        if n < MIN_TRAINING_ROWS {
            return Err(TrainingError::InsufficientSamples {
                available: n,
                required: MIN_TRAINING_ROWS,
            });
        }

        let x_mean = x.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(p));
        let y_mean = y.sum() / n as f64;

        let xc = &x - &x_mean.view().insert_axis(Axis(0));
        let yc = y.mapv(|v| v - y_mean);

        if xc.iter().chain(yc.iter()).any(|v| !v.is_finite()) {
            return Err(TrainingError::NonFiniteSolution);
        }

        let aliased = aliased_columns(&xc.t().dot(&xc), tolerance);
        if aliased.len() == p {
            return Err(TrainingError::NoIdentifiableFeatures);
        }

        let weights = solve_minimum_norm(&xc, &yc, tolerance)?;

        let bias = y_mean - x_mean.dot(&weights);

        if !bias.is_finite() || weights.iter().any(|w| !w.is_finite()) {
            return Err(TrainingError::NonFiniteSolution);
        }

        let model = LinearModel {
            weights: weights.to_vec(),
            bias,
            aliased: aliased.clone(),
        };
        Ok(OlsFit { model, aliased })
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn aliased(&self) -> &[usize] {
        &self.aliased
    }

    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    /// bias + w·x, summed in column order
    pub fn infer(&self, x: ArrayView1<'_, f64>) -> Result<f64, DimensionMismatch> {
        if x.len() != self.weights.len() {
            return Err(DimensionMismatch {
                expected: self.weights.len(),
                actual: x.len(),
            });
        }

        Ok(self
            .weights
            .iter()
            .zip(x.iter())
            .fold(self.bias, |acc, (w, v)| acc + w * v))
    }

    /// Row-wise `infer`
    pub fn infer_batch(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>, DimensionMismatch> {
        x.axis_iter(Axis(0)).map(|row| self.infer(row)).collect()
    }
}

/// Column indices whose Cholesky pivot vanishes against the columns kept so far
fn aliased_columns(gram: &Array2<f64>, tolerance: f64) -> Vec<usize> {
    let p = gram.nrows();
    let mut l = Array2::<f64>::zeros((p, p));
    let mut active: Vec<usize> = Vec::with_capacity(p);
    let mut aliased = Vec::new();

    for j in 0..p {
        // Row j of L against the columns kept so far
        let mut row = Vec::with_capacity(active.len());
        for (a, &k) in active.iter().enumerate() {
            let mut sum = gram[[j, k]];
            for (b, &m) in active.iter().take(a).enumerate() {
                sum -= row[b] * l[[k, m]];
            }
            row.push(sum / l[[k, k]]);
        }

        let norm = gram[[j, j]];
        let pivot = norm - row.iter().map(|v| v * v).sum::<f64>();

        if norm <= 0.0 || pivot <= tolerance * norm {
            aliased.push(j);
            continue;
        }

        for (a, &k) in active.iter().enumerate() {
            l[[j, k]] = row[a];
        }
        l[[j, j]] = pivot.sqrt();
        active.push(j);
    }

    aliased
}

/// Minimum-norm `w` minimizing `|xc·w - yc|`
///
/// Singular values below `sqrt(tolerance)·σ_max` count as zero, the same
/// relative cut the pivot test applies to squared norms.
fn solve_minimum_norm(
    xc: &Array2<f64>,
    yc: &Array1<f64>,
    tolerance: f64,
) -> Result<Array1<f64>, TrainingError> {
    let (n, p) = xc.dim();
    let a = DMatrix::from_fn(n, p, |i, j| xc[[i, j]]);
    let b = DVector::from_iterator(n, yc.iter().copied());

    let svd = SVD::try_new(a, true, true, f64::EPSILON, SVD_MAX_ITERATIONS)
        .ok_or(TrainingError::NonFiniteSolution)?;
    let cutoff = tolerance.sqrt() * svd.singular_values.max();

    let w = svd
        .solve(&b, cutoff)
        .map_err(|_| TrainingError::NonFiniteSolution)?;

    Ok(w.iter().copied().collect())
}
