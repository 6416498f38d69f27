//! Feature Vector - Schema-aligned model input
//!
//! Carries the layout version and hash of the schema it was encoded against,
//! so a vector can never be fed to artifacts fitted on another column list.

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use super::schema::FeatureSchema;
use crate::logic::error::LayoutMismatchError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Feature layout version
    pub version: u8,
    /// CRC32 hash of the feature layout (for mismatch detection)
    pub layout_hash: u32,
    /// Values in schema column order
    values: Vec<f64>,
}

impl FeatureVector {
    /// Zeroed vector for `schema`
    pub fn zeros(schema: &FeatureSchema) -> Self {
        Self {
            version: schema.version(),
            layout_hash: schema.layout_hash(),
            values: vec![0.0; schema.len()],
        }
    }

    pub(crate) fn from_aligned(schema: &FeatureSchema, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), schema.len());
        Self {
            version: schema.version(),
            layout_hash: schema.layout_hash(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn view(&self) -> ArrayView1<'_, f64> {
        ArrayView1::from(self.values.as_slice())
    }

    pub fn into_array(self) -> Array1<f64> {
        Array1::from(self.values)
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Get feature by column name
    pub fn get_by_name(&self, schema: &FeatureSchema, name: &str) -> Option<f64> {
        schema.index_of(name).and_then(|i| self.get(i))
    }

    /// Validate that this vector matches `schema`
    pub fn validate(&self, schema: &FeatureSchema) -> Result<(), LayoutMismatchError> {
        schema.validate_layout(self.version, self.layout_hash)
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self, schema: &FeatureSchema) -> serde_json::Value {
        serde_json::json!({
            "feature_version": self.version,
            "layout_hash": self.layout_hash,
            "named_values": schema.column_names().iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.clone(), *value))
                .collect::<std::collections::BTreeMap<_, _>>(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_matches_schema() {
        let schema = FeatureSchema::from_regions(["Ariana", "Bizerte"]);
        let vector = FeatureVector::zeros(&schema);

        assert_eq!(vector.len(), schema.len());
        assert!(vector.as_slice().iter().all(|v| *v == 0.0));
        assert!(vector.validate(&schema).is_ok());
    }

    #[test]
    fn test_validate_rejects_other_schema() {
        let a = FeatureSchema::from_regions(["Ariana"]);
        let b = FeatureSchema::from_regions(["Bizerte"]);
        let vector = FeatureVector::zeros(&a);

        let err = vector.validate(&b).unwrap_err();
        assert_eq!(err.expected_hash, b.layout_hash());
        assert_eq!(err.actual_hash, a.layout_hash());
    }

    #[test]
    fn test_to_log_entry() {
        let schema = FeatureSchema::from_regions(["Ariana"]);
        let vector = FeatureVector::zeros(&schema);

        let log = vector.to_log_entry(&schema);
        assert_eq!(log["feature_version"], schema.version());
        assert_eq!(log["named_values"]["region_Ariana"], 0.0);
    }
}
