//! Standardization with training-time statistics
//!
//! Constant columns keep scale 1.0: they are centered but never divided by
//! zero, so `transform` output stays finite.

use ndarray::{Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::logic::error::{DimensionMismatch, FitError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl StandardScaler {
    /// Mean and population standard deviation per column; `x` must not contain NaN
    pub fn fit(x: ArrayView2<'_, f64>) -> Result<Self, FitError> {
        let n = x.nrows();
        if n == 0 || x.ncols() == 0 {
            return Err(FitError::EmptyMatrix { rows: n, cols: x.ncols() });
        }

        let mut means = Vec::with_capacity(x.ncols());
        let mut scales = Vec::with_capacity(x.ncols());

        for (index, column) in x.axis_iter(Axis(1)).enumerate() {
            let mean = column.iter().sum::<f64>() / n as f64;
            let variance = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
            let std = variance.sqrt();

            if !mean.is_finite() || !std.is_finite() {
                return Err(FitError::NonFinite { index });
            }

            means.push(mean);
            scales.push(safe_scale(mean, std));
        }

        Ok(Self { means, scales })
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    pub fn n_features(&self) -> usize {
        self.means.len()
    }

    pub fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>, DimensionMismatch> {
        if x.ncols() != self.means.len() {
            return Err(DimensionMismatch {
                expected: self.means.len(),
                actual: x.ncols(),
            });
        }

        let mut out = x.to_owned();
        for ((mut column, mean), scale) in out
            .axis_iter_mut(Axis(1))
            .zip(&self.means)
            .zip(&self.scales)
        {
            column.mapv_inplace(|v| (v - mean) / scale);
        }
        Ok(out)
    }
}

/// Zero-variance columns fall back to unit scale
fn safe_scale(mean: f64, std: f64) -> f64 {
    if std < 10.0 * f64::EPSILON * mean.abs().max(1.0) {
        1.0
    } else {
        std
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_fit_population_statistics() {
        let x = array![[1.0, 10.0], [3.0, 10.0]];
        let scaler = StandardScaler::fit(x.view()).unwrap();

        assert_eq!(scaler.means(), &[2.0, 10.0]);
        assert_eq!(scaler.scales()[0], 1.0);
        // Constant column falls back to identity scale
        assert_eq!(scaler.scales()[1], 1.0);
    }

    #[test]
    fn test_transform_standardizes() {
        let x = array![[0.0], [2.0], [4.0]];
        let scaler = StandardScaler::fit(x.view()).unwrap();
        let out = scaler.transform(x.view()).unwrap();

        let mean: f64 = out.iter().sum::<f64>() / 3.0;
        let var: f64 = out.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / 3.0;
        assert!(mean.abs() < 1e-12);
        assert!((var - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_column_stays_finite() {
        let x = array![[5.0, 1.0], [5.0, 2.0], [5.0, 3.0]];
        let scaler = StandardScaler::fit(x.view()).unwrap();
        let out = scaler.transform(array![[7.0, 2.0]].view()).unwrap();

        assert!(out.iter().all(|v| v.is_finite()));
        assert_eq!(out[[0, 0]], 2.0);
    }

    #[test]
    fn test_empty_matrix_rejected() {
        let x = Array2::<f64>::zeros((0, 3));
        assert_eq!(
            StandardScaler::fit(x.view()),
            Err(FitError::EmptyMatrix { rows: 0, cols: 3 })
        );
    }
}
