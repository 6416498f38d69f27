//! Premium Core - Insurance premium estimation pipeline
//!
//! Trains a linear regression on a tabular dataset of policyholders and
//! scores new submissions against the frozen schema, preprocessor and model
//! produced by that training run.

pub mod constants;
pub mod logic;

pub use logic::artifacts::{ArtifactBundle, ArtifactHandle, BundleMetadata};
pub use logic::dataset::{load_dataset, Dataset};
pub use logic::error::{
    ArtifactError, DataLoadError, PipelineError, PredictError, TrainingError, ValidationError,
};
pub use logic::features::{FeatureSchema, LayoutInfo, RawInput};
pub use logic::trainer::{CollinearityPolicy, Trainer, TrainerConfig, TrainingReport};
