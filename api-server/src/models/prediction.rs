//! Prediction and model info payloads

use chrono::{DateTime, Utc};
use premium_core::{ArtifactBundle, LayoutInfo};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub premium_estimate: f64,
}

#[derive(Debug, Serialize)]
pub struct ModelMetrics {
    pub train_rows: usize,
    pub test_rows: usize,
    pub dropped_unlabeled: usize,
    pub train_r2: Option<f64>,
    pub test_r2: Option<f64>,
    pub test_mae: Option<f64>,
    pub test_rmse: Option<f64>,
}

/// Public description of the bundle in service
#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub bundle_id: Uuid,
    pub trained_at: DateTime<Utc>,
    pub dataset_fingerprint: Option<String>,
    pub layout: LayoutInfo,
    pub aliased_columns: Vec<String>,
    pub metrics: ModelMetrics,
}

impl From<&ArtifactBundle> for ModelInfo {
    fn from(bundle: &ArtifactBundle) -> Self {
        let meta = &bundle.metadata;
        let report = &meta.report;

        Self {
            bundle_id: meta.id,
            trained_at: meta.trained_at,
            dataset_fingerprint: meta.dataset_fingerprint.clone(),
            layout: bundle.schema.layout_info(),
            aliased_columns: report.aliased_columns.clone(),
            metrics: ModelMetrics {
                train_rows: report.train_rows,
                test_rows: report.test_rows,
                dropped_unlabeled: report.dropped_unlabeled,
                train_r2: report.train_r2,
                test_r2: report.test_r2,
                test_mae: report.test_mae,
                test_rmse: report.test_rmse,
            },
        }
    }
}
