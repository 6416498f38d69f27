//! Logic Module - Premium estimation pipeline
//!
//! - `dataset/` - CSV loading, header aliasing, typed records
//! - `features/` - Schema derivation and schema-aligned encoding
//! - `preprocess/` - Mean imputation + standardization
//! - `model/` - Least-squares regression and metrics
//! - `trainer` / `predictor` - Build and use an `ArtifactBundle`
//! - `artifacts/` - Bundle persistence and hot-swap handle

pub mod error;

pub mod dataset;
pub mod features;
pub mod preprocess;
pub mod model;

pub mod trainer;
pub mod predictor;
pub mod artifacts;

#[cfg(test)]
pub mod testing;
