//! Trainer - Dataset → fitted artifact bundle
//!
//! Drops unlabeled records, derives the schema, splits with a seeded shuffle,
//! fits the preprocessor on the training partition only, then solves the
//! regression on the standardized training matrix. The held-out partition is
//! touched only to compute metrics.

use std::path::Path;

use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PIVOT_TOLERANCE, DEFAULT_SEED, DEFAULT_TEST_RATIO};
use crate::logic::artifacts::{ArtifactBundle, BundleMetadata};
use crate::logic::dataset::{load_dataset, Dataset};
use crate::logic::error::{PipelineError, TrainingError};
use crate::logic::features::{encode_record, FeatureSchema};
use crate::logic::model::{LinearModel, RegressionMetrics};
use crate::logic::preprocess::Preprocessor;

// ============================================================================
// CONFIG
// ============================================================================

/// What to do when some feature columns are linear combinations of others
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollinearityPolicy {
    /// Keep aliased columns in the minimum-norm solution and report them
    #[default]
    MinimumNorm,
    /// Fail with `TrainingError::RankDeficient`
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Shuffle seed for the train/test split
    pub seed: u64,
    /// Fraction of labeled rows held out, in (0, 1)
    pub test_ratio: f64,
    /// Relative pivot below which a column counts as aliased
    pub pivot_tolerance: f64,
    pub collinearity: CollinearityPolicy,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            test_ratio: DEFAULT_TEST_RATIO,
            pivot_tolerance: DEFAULT_PIVOT_TOLERANCE,
            collinearity: CollinearityPolicy::default(),
        }
    }
}

impl TrainerConfig {
    pub fn validate(&self) -> Result<(), TrainingError> {
        if !self.test_ratio.is_finite() || self.test_ratio <= 0.0 || self.test_ratio >= 1.0 {
            return Err(TrainingError::InvalidConfig(format!(
                "test_ratio must be in (0, 1), got {}",
                self.test_ratio
            )));
        }
        if !self.pivot_tolerance.is_finite() || self.pivot_tolerance <= 0.0 {
            return Err(TrainingError::InvalidConfig(format!(
                "pivot_tolerance must be positive, got {}",
                self.pivot_tolerance
            )));
        }
        Ok(())
    }
}

// ============================================================================
// REPORT
// ============================================================================

/// Outcome of one training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub train_rows: usize,
    pub test_rows: usize,
    /// Records discarded for lacking a premium
    pub dropped_unlabeled: usize,
    /// Columns linearly dependent on earlier ones
    pub aliased_columns: Vec<String>,
    pub train_r2: Option<f64>,
    pub test_r2: Option<f64>,
    pub test_mae: Option<f64>,
    pub test_rmse: Option<f64>,
}

// ============================================================================
// TRAINER
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> Result<Self, TrainingError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Load a CSV file and train on it
    pub fn train_file(&self, path: &Path) -> Result<ArtifactBundle, PipelineError> {
        let dataset = load_dataset(path)?;
        self.train(&dataset)
    }

    /// Build every artifact from `dataset`; deterministic for a fixed config
    pub fn train(&self, dataset: &Dataset) -> Result<ArtifactBundle, PipelineError> {
        self.config.validate()?;

        let (labeled, dropped_unlabeled) = dataset.labeled();
        if dropped_unlabeled > 0 {
            log::warn!("Dropped {} records without a premium", dropped_unlabeled);
        }
        if labeled.is_empty() {
            return Err(TrainingError::EmptyTrainingSet.into());
        }

        let schema = FeatureSchema::build(&labeled)?;
        let (x, y) = design_matrix(&labeled, &schema);

        let (train_idx, test_idx) = split_indices(labeled.len(), self.config.test_ratio, self.config.seed);
        if train_idx.is_empty() {
            return Err(TrainingError::EmptyTrainingSet.into());
        }

        let x_train = x.select(Axis(0), &train_idx);
        let y_train = y.select(Axis(0), &train_idx);

        let preprocessor = Preprocessor::fit(x_train.view())?;
        let xs_train = preprocessor.apply(x_train.view())?;

        let fit = LinearModel::fit_ols(xs_train.view(), y_train.view(), self.config.pivot_tolerance)?;
        let aliased_columns: Vec<String> = fit
            .aliased
            .iter()
            .map(|&i| schema.column_names()[i].clone())
            .collect();

        if !aliased_columns.is_empty() {
            match self.config.collinearity {
                CollinearityPolicy::Reject => {
                    return Err(TrainingError::RankDeficient {
                        columns: aliased_columns,
                    }
                    .into());
                }
                CollinearityPolicy::MinimumNorm => {
                    log::warn!(
                        "Collinear feature columns, solved at minimum norm: {}",
                        aliased_columns.join(", ")
                    );
                }
            }
        }

        let model = fit.model;

        let train_pred = model.infer_batch(xs_train.view())?;
        let train_metrics = RegressionMetrics::evaluate(y_train.view(), train_pred.view());

        let test_metrics = if test_idx.is_empty() {
            None
        } else {
            let x_test = x.select(Axis(0), &test_idx);
            let y_test = y.select(Axis(0), &test_idx);
            let xs_test = preprocessor.apply(x_test.view())?;
            let test_pred = model.infer_batch(xs_test.view())?;
            RegressionMetrics::evaluate(y_test.view(), test_pred.view())
        };

        let report = TrainingReport {
            train_rows: train_idx.len(),
            test_rows: test_idx.len(),
            dropped_unlabeled,
            aliased_columns,
            train_r2: train_metrics.and_then(|m| m.r2),
            test_r2: test_metrics.and_then(|m| m.r2),
            test_mae: test_metrics.map(|m| m.mae),
            test_rmse: test_metrics.map(|m| m.rmse),
        };

        log::info!(
            "Model trained on {} rows ({} held out); test R²: {}",
            report.train_rows,
            report.test_rows,
            report
                .test_r2
                .map(|r| format!("{:.4}", r))
                .unwrap_or_else(|| "n/a".to_string())
        );

        let metadata = BundleMetadata::new(
            dataset.fingerprint().map(str::to_string),
            self.config.seed,
            self.config.test_ratio,
            report,
        );

        Ok(ArtifactBundle {
            schema,
            preprocessor,
            model,
            metadata,
        })
    }
}

/// Seeded shuffle; the first `ceil(ratio * n)` shuffled indices are held out
pub fn split_indices(n: usize, test_ratio: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((n as f64 * test_ratio).ceil() as usize).min(n);
    let train = indices.split_off(n_test);
    (train, indices)
}

/// Encoded rows (NaN for missing) and labels, in dataset order
fn design_matrix(dataset: &Dataset, schema: &FeatureSchema) -> (Array2<f64>, Array1<f64>) {
    let n = dataset.len();
    let mut x = Array2::<f64>::zeros((n, schema.len()));
    let mut y = Array1::<f64>::zeros(n);

    for (i, record) in dataset.records().iter().enumerate() {
        let row = encode_record(record, schema);
        x.row_mut(i).assign(&row.view());
        y[i] = record.premium.unwrap_or(f64::NAN);
    }

    (x, y)
}
