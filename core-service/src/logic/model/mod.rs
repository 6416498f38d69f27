//! Model Module - Linear regression over standardized features
//!
//! `linear` owns the least-squares fit and inference; `metrics` scores
//! predictions on the held-out partition.

pub mod linear;
pub mod metrics;

// Re-export common types
pub use linear::{LinearModel, OlsFit};
pub use metrics::RegressionMetrics;
