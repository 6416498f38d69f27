//! Encoder - Raw submission → schema-aligned feature vector
//!
//! Every row, training or inference, goes through `align`: a name→value
//! association is reindexed to the schema's exact column order and absent
//! columns are filled with 0. Training rows insert NaN for missing values
//! explicitly so they reach the imputer instead of being zero-filled.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::schema::{region_column, FeatureSchema};
use super::vector::FeatureVector;
use crate::constants::{AGE_MAX, AGE_MIN, CHILDREN_MAX, CHILDREN_MIN, WEIGHT_MAX, WEIGHT_MIN};
use crate::logic::dataset::{Record, Sex, SmokingStatus, SEX_LABELS, SMOKING_LABELS};
use crate::logic::error::ValidationError;

/// One user submission, as received from a form or API call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    pub age: f64,
    /// Kilograms
    pub weight: f64,
    pub sex: String,
    pub smoking_status: String,
    pub region: String,
    #[serde(alias = "children")]
    pub number_of_children: i64,
}

/// Encode a submission against `schema`, rejecting out-of-domain values
pub fn encode(raw: &RawInput, schema: &FeatureSchema) -> Result<FeatureVector, ValidationError> {
    let age = check_range("age", raw.age, AGE_MIN, AGE_MAX)?;
    let weight = check_range("weight", raw.weight, WEIGHT_MIN, WEIGHT_MAX)?;

    let sex = Sex::parse(&raw.sex).ok_or_else(|| ValidationError::UnknownCategory {
        field: "sex",
        value: raw.sex.clone(),
        allowed: SEX_LABELS,
    })?;

    let smoking = SmokingStatus::parse(&raw.smoking_status).ok_or_else(|| {
        ValidationError::UnknownCategory {
            field: "smoking_status",
            value: raw.smoking_status.clone(),
            allowed: SMOKING_LABELS,
        }
    })?;

    if !(CHILDREN_MIN..=CHILDREN_MAX).contains(&raw.number_of_children) {
        return Err(ValidationError::OutOfRange {
            field: "number_of_children",
            value: raw.number_of_children as f64,
            min: CHILDREN_MIN as f64,
            max: CHILDREN_MAX as f64,
        });
    }

    let mut row = HashMap::new();
    row.insert("age".to_string(), age);
    row.insert("weight".to_string(), weight);
    row.insert("sex".to_string(), sex.code());
    row.insert("smoker".to_string(), smoking.code());
    row.insert("children".to_string(), raw.number_of_children as f64);

    match resolve_region(schema, &raw.region) {
        Some(region) => {
            row.insert(region_column(region), 1.0);
        }
        None => {
            log::debug!("Region '{}' unknown to schema, all region flags zero", raw.region);
        }
    }

    Ok(FeatureVector::from_aligned(schema, align(schema, &row)))
}

/// Encode a training record; missing values become NaN for the imputer
pub fn encode_record(record: &Record, schema: &FeatureSchema) -> FeatureVector {
    let or_missing = |value: Option<f64>| value.filter(|v| v.is_finite()).unwrap_or(f64::NAN);

    let mut row = HashMap::new();
    row.insert("age".to_string(), or_missing(record.age));
    row.insert("weight".to_string(), or_missing(record.weight));
    row.insert("sex".to_string(), or_missing(record.sex.map(|s| s.code())));
    row.insert(
        "smoker".to_string(),
        or_missing(record.smoking_status.map(|s| s.code())),
    );
    row.insert("children".to_string(), or_missing(record.children));

    if let Some(region) = record.region.as_deref().and_then(|r| resolve_region(schema, r)) {
        row.insert(region_column(region), 1.0);
    }

    FeatureVector::from_aligned(schema, align(schema, &row))
}

/// Reindex a name→value row to schema order, filling absent columns with 0
pub fn align(schema: &FeatureSchema, row: &HashMap<String, f64>) -> Vec<f64> {
    schema
        .column_names()
        .iter()
        .map(|name| row.get(name).copied().unwrap_or(0.0))
        .collect()
}

/// Known region matching `raw`, else the schema's catch-all region, else none
fn resolve_region<'a>(schema: &'a FeatureSchema, raw: &str) -> Option<&'a str> {
    let wanted = raw.trim();
    schema
        .regions()
        .iter()
        .find(|r| r.as_str() == wanted)
        .map(String::as_str)
        .or_else(|| schema.other_region())
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value < min || value > max {
        return Err(ValidationError::OutOfRange { field, value, min, max });
    }
    Ok(value)
}
