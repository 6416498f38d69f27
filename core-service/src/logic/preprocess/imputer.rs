//! Mean imputation
//!
//! NaN marks a missing value. Fill values come from the training partition
//! and are never recomputed by `transform`.

use ndarray::{Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::logic::error::{DimensionMismatch, FitError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeanImputer {
    fill_values: Vec<f64>,
}

impl MeanImputer {
    /// Column means over non-missing entries
    pub fn fit(x: ArrayView2<'_, f64>) -> Result<Self, FitError> {
        let mut fill_values = Vec::with_capacity(x.ncols());

        for (index, column) in x.axis_iter(Axis(1)).enumerate() {
            let (sum, count) = column
                .iter()
                .filter(|v| !v.is_nan())
                .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

            if count == 0 {
                return Err(FitError::DegenerateColumn { index });
            }

            let mean = sum / count as f64;
            if !mean.is_finite() {
                return Err(FitError::NonFinite { index });
            }
            fill_values.push(mean);
        }

        Ok(Self { fill_values })
    }

    pub fn fill_values(&self) -> &[f64] {
        &self.fill_values
    }

    pub fn n_features(&self) -> usize {
        self.fill_values.len()
    }

    pub fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>, DimensionMismatch> {
        if x.ncols() != self.fill_values.len() {
            return Err(DimensionMismatch {
                expected: self.fill_values.len(),
                actual: x.ncols(),
            });
        }

        Ok(self.fill(x))
    }

    /// Width must already match `fill_values`
    pub(crate) fn fill(&self, x: ArrayView2<'_, f64>) -> Array2<f64> {
        let mut out = x.to_owned();
        for (mut column, fill) in out.axis_iter_mut(Axis(1)).zip(&self.fill_values) {
            column.mapv_inplace(|v| if v.is_nan() { *fill } else { v });
        }
        out
    }
}
