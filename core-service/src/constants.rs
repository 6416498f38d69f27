//! Central Configuration Constants
//!
//! Single source of truth for pipeline defaults and input domain bounds.
//! Changing a bound here changes what the encoder accepts at inference time.

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name (also the data directory name)
pub const APP_NAME: &str = "premium-estimator";

// ============================================
// Training defaults
// ============================================

/// Fraction of labeled records held out for evaluation
pub const DEFAULT_TEST_RATIO: f64 = 0.2;

/// Seed for the train/held-out shuffle
pub const DEFAULT_SEED: u64 = 42;

/// Relative pivot tolerance below which a column is considered aliased
pub const DEFAULT_PIVOT_TOLERANCE: f64 = 1e-8;

/// Iteration cap for the least-squares SVD
pub const SVD_MAX_ITERATIONS: usize = 1_000;

/// Minimum number of training rows for a regression fit
pub const MIN_TRAINING_ROWS: usize = 2;

// ============================================
// Inference domain bounds (inclusive)
// ============================================

pub const AGE_MIN: f64 = 18.0;
pub const AGE_MAX: f64 = 100.0;

/// Weight in kilograms
pub const WEIGHT_MIN: f64 = 30.0;
pub const WEIGHT_MAX: f64 = 200.0;

pub const CHILDREN_MIN: i64 = 0;
pub const CHILDREN_MAX: i64 = 10;

/// Region labels that act as an explicit catch-all bucket when present in training data
pub const OTHER_REGION_LABELS: &[&str] = &["autre", "other"];
