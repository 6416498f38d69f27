//! Artifacts Module - Fitted pipeline state
//!
//! An `ArtifactBundle` is everything inference needs: schema, preprocessor
//! and model, produced together by one training run and never mixed with
//! pieces from another run.

pub mod handle;
pub mod storage;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::logic::error::{ArtifactError, PredictError};
use crate::logic::features::{FeatureSchema, RawInput};
use crate::logic::model::LinearModel;
use crate::logic::predictor;
use crate::logic::preprocess::Preprocessor;
use crate::logic::trainer::TrainingReport;

pub use handle::ArtifactHandle;
pub use storage::{default_bundle_path, load_bundle, save_bundle};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleMetadata {
    pub id: Uuid,
    pub trained_at: DateTime<Utc>,
    /// SHA-256 of the training file, when trained from disk
    pub dataset_fingerprint: Option<String>,
    pub seed: u64,
    pub test_ratio: f64,
    pub report: TrainingReport,
}

impl BundleMetadata {
    pub fn new(
        dataset_fingerprint: Option<String>,
        seed: u64,
        test_ratio: f64,
        report: TrainingReport,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            trained_at: Utc::now(),
            dataset_fingerprint,
            seed,
            test_ratio,
            report,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactBundle {
    pub schema: FeatureSchema,
    pub preprocessor: Preprocessor,
    pub model: LinearModel,
    pub metadata: BundleMetadata,
}

impl ArtifactBundle {
    pub fn predict(&self, raw: &RawInput) -> Result<f64, PredictError> {
        predictor::predict(raw, &self.schema, &self.preprocessor, &self.model)
    }

    /// Layout hash must match the column list, and every fitted width must match the schema
    pub fn check_consistency(&self) -> Result<(), ArtifactError> {
        self.schema.verify()?;

        let width = self.schema.len();
        let widths = [
            ("imputer", self.preprocessor.imputer().n_features()),
            ("scaler", self.preprocessor.scaler().n_features()),
            ("model", self.model.n_features()),
        ];
        for (part, actual) in widths {
            if actual != width {
                return Err(ArtifactError::Inconsistent(format!(
                    "{} expects {} features, schema has {}",
                    part, actual, width
                )));
            }
        }
        Ok(())
    }
}
