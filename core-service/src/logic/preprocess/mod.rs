//! Preprocess Module - Imputation followed by standardization
//!
//! `fit` runs once on the training partition. `apply` is a pure function of
//! its input and the frozen state; nothing in this module refits.

pub mod imputer;
pub mod scaler;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::logic::error::{DimensionMismatch, FitError};
pub use imputer::MeanImputer;
pub use scaler::StandardScaler;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preprocessor {
    imputer: MeanImputer,
    scaler: StandardScaler,
}

impl Preprocessor {
    /// Fit imputation values, then scaling statistics on the imputed matrix
    pub fn fit(x: ArrayView2<'_, f64>) -> Result<Self, FitError> {
        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(FitError::EmptyMatrix {
                rows: x.nrows(),
                cols: x.ncols(),
            });
        }

        let imputer = MeanImputer::fit(x)?;
        let imputed = imputer.fill(x);
        let scaler = StandardScaler::fit(imputed.view())?;

        log::debug!("Preprocessor fitted on {}x{} matrix", x.nrows(), x.ncols());
        Ok(Self { imputer, scaler })
    }

    pub fn imputer(&self) -> &MeanImputer {
        &self.imputer
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn n_features(&self) -> usize {
        self.imputer.n_features()
    }

    /// Impute then standardize, column-wise
    pub fn apply(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>, DimensionMismatch> {
        let imputed = self.imputer.transform(x)?;
        self.scaler.transform(imputed.view())
    }

    /// Single-row variant of `apply`
    pub fn apply_row(&self, row: ArrayView1<'_, f64>) -> Result<Array1<f64>, DimensionMismatch> {
        let matrix = row.insert_axis(Axis(0));
        let out = self.apply(matrix)?;
        Ok(out.row(0).to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn training_matrix() -> Array2<f64> {
        array![
            [20.0, 60.0, 0.0],
            [30.0, f64::NAN, 1.0],
            [40.0, 80.0, 0.0],
            [f64::NAN, 100.0, 1.0],
        ]
    }

    #[test]
    fn test_scaler_sees_imputed_values() {
        let pre = Preprocessor::fit(training_matrix().view()).unwrap();

        assert_eq!(pre.imputer().fill_values(), &[30.0, 80.0, 0.5]);
        // Imputed columns: [20,30,40,30] and [60,80,80,100]
        assert_eq!(pre.scaler().means(), &[30.0, 80.0, 0.5]);
    }

    #[test]
    fn test_apply_is_pure() {
        let pre = Preprocessor::fit(training_matrix().view()).unwrap();
        let snapshot = pre.clone();

        let x = array![[25.0, f64::NAN, 1.0], [f64::NAN, 90.0, 0.0]];
        let first = pre.apply(x.view()).unwrap();
        let second = pre.apply(x.view()).unwrap();

        assert_eq!(pre, snapshot);
        assert!(first
            .iter()
            .zip(second.iter())
            .all(|(a, b)| a.to_bits() == b.to_bits()));
        assert!(first.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_apply_does_not_refit() {
        let pre = Preprocessor::fit(training_matrix().view()).unwrap();

        // A batch with very different statistics is scaled with the training ones
        let shifted = array![[1000.0, 1000.0, 1.0], [1000.0, 1000.0, 1.0]];
        let out = pre.apply(shifted.view()).unwrap();

        let expected = (1000.0 - 30.0) / pre.scaler().scales()[0];
        assert_eq!(out[[0, 0]], expected);
        assert_eq!(pre.scaler().means()[0], 30.0);
    }

    #[test]
    fn test_apply_row_matches_apply() {
        let pre = Preprocessor::fit(training_matrix().view()).unwrap();
        let row = array![35.0, 70.0, 1.0];

        let single = pre.apply_row(row.view()).unwrap();
        let batch = pre.apply(row.view().insert_axis(Axis(0))).unwrap();
        assert_eq!(single, batch.row(0));
    }

    #[test]
    fn test_fit_errors() {
        let empty = Array2::<f64>::zeros((0, 2));
        assert!(matches!(
            Preprocessor::fit(empty.view()),
            Err(FitError::EmptyMatrix { .. })
        ));

        let missing = array![[1.0, f64::NAN], [2.0, f64::NAN]];
        assert_eq!(
            Preprocessor::fit(missing.view()),
            Err(FitError::DegenerateColumn { index: 1 })
        );
    }

    #[test]
    fn test_apply_rejects_wrong_width() {
        let pre = Preprocessor::fit(training_matrix().view()).unwrap();
        let err = pre.apply(array![[1.0, 2.0]].view()).unwrap_err();
        assert_eq!(err, DimensionMismatch { expected: 3, actual: 2 });
    }
}
