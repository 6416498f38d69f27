//! Regression metrics for the held-out partition

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// Goodness-of-fit summary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    /// None when the targets are constant
    pub r2: Option<f64>,
    pub mae: f64,
    pub rmse: f64,
}

impl RegressionMetrics {
    /// Returns None for empty input
    pub fn evaluate(actual: ArrayView1<'_, f64>, predicted: ArrayView1<'_, f64>) -> Option<Self> {
        if actual.is_empty() || actual.len() != predicted.len() {
            return None;
        }

        Some(Self {
            r2: r2_score(actual, predicted),
            mae: mean_absolute_error(actual, predicted),
            rmse: root_mean_squared_error(actual, predicted),
        })
    }
}

/// Coefficient of determination
pub fn r2_score(actual: ArrayView1<'_, f64>, predicted: ArrayView1<'_, f64>) -> Option<f64> {
    let n = actual.len();
    if n == 0 {
        return None;
    }

    let mean = actual.sum() / n as f64;
    let ss_tot: f64 = actual.iter().map(|y| (y - mean).powi(2)).sum();
    if ss_tot == 0.0 {
        return None;
    }

    let ss_res: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(y, p)| (y - p).powi(2))
        .sum();

    Some(1.0 - ss_res / ss_tot)
}

pub fn mean_absolute_error(actual: ArrayView1<'_, f64>, predicted: ArrayView1<'_, f64>) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let total: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(y, p)| (y - p).abs())
        .sum();
    total / actual.len() as f64
}

pub fn root_mean_squared_error(actual: ArrayView1<'_, f64>, predicted: ArrayView1<'_, f64>) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let total: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(y, p)| (y - p).powi(2))
        .sum();
    (total / actual.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_perfect_fit() {
        let y = array![1.0, 2.0, 3.0];
        let m = RegressionMetrics::evaluate(y.view(), y.view()).unwrap();
        assert_eq!(m.r2, Some(1.0));
        assert_eq!(m.mae, 0.0);
        assert_eq!(m.rmse, 0.0);
    }

    #[test]
    fn test_known_errors() {
        let y = array![1.0, 2.0, 3.0, 4.0];
        let p = array![2.0, 2.0, 3.0, 2.0];
        assert_eq!(mean_absolute_error(y.view(), p.view()), 0.75);
        assert!((root_mean_squared_error(y.view(), p.view()) - 1.25f64.sqrt()).abs() < 1e-12);
        // ss_tot = 5, ss_res = 5
        assert_eq!(r2_score(y.view(), p.view()), Some(0.0));
    }

    #[test]
    fn test_constant_targets_have_no_r2() {
        let y = array![5.0, 5.0];
        let p = array![4.0, 6.0];
        assert_eq!(r2_score(y.view(), p.view()), None);
        let m = RegressionMetrics::evaluate(y.view(), p.view()).unwrap();
        assert_eq!(m.mae, 1.0);
    }

    #[test]
    fn test_empty_input() {
        let empty = ndarray::Array1::<f64>::zeros(0);
        assert!(RegressionMetrics::evaluate(empty.view(), empty.view()).is_none());
    }
}
