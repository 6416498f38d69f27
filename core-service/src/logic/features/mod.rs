//! Features Module - Schema derivation and encoding
//!
//! The schema is derived from training data; the encoder maps raw
//! submissions and training records onto it through a single alignment path.

pub mod schema;
pub mod vector;
pub mod encoder;

#[cfg(test)]
mod tests;

// Re-export common types
pub use schema::{FeatureSchema, LayoutInfo, BASE_COLUMNS, LAYOUT_VERSION, REGION_PREFIX};
pub use vector::FeatureVector;
pub use encoder::{encode, encode_record, RawInput};
