//! Pipeline error taxonomy
//!
//! Schema, fit and training errors are fatal at startup: a caller must not
//! serve predictions from a half-built pipeline. `ValidationError` is the only
//! error a request boundary is expected to recover from.

use thiserror::Error;

/// Malformed or incomplete training data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("dataset contains no records")]
    EmptyDataset,

    #[error("no record carries a value for mandatory field '{0}'")]
    MissingField(&'static str),
}

/// Degenerate statistics while fitting the preprocessor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FitError {
    #[error("cannot fit on an empty matrix ({rows}x{cols})")]
    EmptyMatrix { rows: usize, cols: usize },

    #[error("column {index} is entirely missing")]
    DegenerateColumn { index: usize },

    #[error("column {index} produced a non-finite statistic")]
    NonFinite { index: usize },
}

/// Ill-posed regression
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrainingError {
    #[error("training partition is empty")]
    EmptyTrainingSet,

    #[error("not enough training rows: got {available}, need at least {required}")]
    InsufficientSamples { available: usize, required: usize },

    #[error("every feature column is aliased; no coefficient can be identified")]
    NoIdentifiableFeatures,

    #[error("design matrix is rank deficient; aliased columns: {columns:?}")]
    RankDeficient { columns: Vec<String> },

    #[error("label vector length {labels} does not match {rows} rows")]
    LabelMismatch { rows: usize, labels: usize },

    #[error("least-squares solution is not finite")]
    NonFiniteSolution,

    #[error("invalid trainer configuration: {0}")]
    InvalidConfig(String),
}

/// Out-of-domain or malformed inference input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must be one of {allowed:?}, got '{value}'")]
    UnknownCategory {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },
}

impl ValidationError {
    /// Name of the offending input field
    pub fn field(&self) -> &'static str {
        match self {
            Self::NotFinite { field }
            | Self::OutOfRange { field, .. }
            | Self::UnknownCategory { field, .. } => field,
        }
    }
}

/// Training file could not be read or lacks required columns
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("cannot read dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset is missing required columns: {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("row {row}: column '{column}' has non-numeric value '{value}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
}

/// Feature vector built against a different schema than the one in use
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "feature layout mismatch: expected v{expected_version} (hash: {expected_hash:08x}), \
     got v{actual_version} (hash: {actual_hash:08x})"
)]
pub struct LayoutMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

/// Matrix or vector width does not match the fitted state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("expected {expected} feature columns, got {actual}")]
pub struct DimensionMismatch {
    pub expected: usize,
    pub actual: usize,
}

/// Persisted artifact bundle could not be used
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    LayoutMismatch(#[from] LayoutMismatchError),

    #[error("inconsistent bundle: {0}")]
    Inconsistent(String),
}

/// Any failure while building the artifact bundle
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    DataLoad(#[from] DataLoadError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Fit(#[from] FitError),

    #[error(transparent)]
    Training(#[from] TrainingError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    Dimension(#[from] DimensionMismatch),
}

/// Failure of a single prediction request
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Layout(#[from] LayoutMismatchError),

    #[error(transparent)]
    Dimension(#[from] DimensionMismatch),
}
