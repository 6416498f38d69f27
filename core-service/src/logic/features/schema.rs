//! Feature Schema - Data-driven feature layout
//!
//! **CRITICAL: This type controls column alignment between training and inference**
//!
//! ## Rules (NEVER break these):
//! 1. Base columns come first, in `BASE_COLUMNS` order
//! 2. Region indicator columns follow, sorted lexicographically
//! 3. Changing either rule → increment LAYOUT_VERSION
//!
//! The layout hash lets persisted bundles and encoded vectors prove they were
//! built against the same column list.

use std::collections::BTreeSet;

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use crate::constants::OTHER_REGION_LABELS;
use crate::logic::dataset::{normalize_region, Dataset, Field};
use crate::logic::error::{LayoutMismatchError, SchemaError};

// ============================================================================
// LAYOUT VERSION
// ============================================================================

/// Current layout version
/// MUST be incremented when the column derivation rules change
pub const LAYOUT_VERSION: u8 = 1;

/// Numeric and binary-coded columns, in vector order
pub const BASE_COLUMNS: &[&str] = &[
    "age",      // 0: years
    "weight",   // 1: kilograms
    "sex",      // 2: male=0, female=1
    "smoker",   // 3: no=0, yes=1
    "children", // 4: number of children
];

/// Prefix of region indicator column names
pub const REGION_PREFIX: &str = "region_";

/// Column name for a region indicator
pub fn region_column(region: &str) -> String {
    format!("{}{}", REGION_PREFIX, region)
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over the version and ordered column names
pub fn compute_layout_hash(version: u8, columns: &[String]) -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[version]);

    for name in columns {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

// ============================================================================
// SCHEMA
// ============================================================================

/// Ordered, immutable column list frozen at training time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    version: u8,
    layout_hash: u32,
    columns: Vec<String>,
    regions: Vec<String>,
}

impl FeatureSchema {
    /// Derive the schema from a training dataset
    pub fn build(dataset: &Dataset) -> Result<Self, SchemaError> {
        if dataset.is_empty() {
            return Err(SchemaError::EmptyDataset);
        }

        for field in Field::REQUIRED {
            if !dataset.records().iter().any(|r| r.has(field)) {
                return Err(SchemaError::MissingField(field.name()));
            }
        }

        let schema = Self::from_regions(dataset.regions());
        log::info!(
            "Feature schema built: {} columns ({} regions), hash {:08x}",
            schema.len(),
            schema.regions.len(),
            schema.layout_hash
        );
        Ok(schema)
    }

    /// Schema for an explicit region set; names are trimmed, deduplicated and sorted
    pub fn from_regions<I, S>(regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let regions: Vec<String> = regions
            .into_iter()
            .filter_map(|r| normalize_region(r.as_ref()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let columns = Self::derive_columns(&regions);
        let layout_hash = compute_layout_hash(LAYOUT_VERSION, &columns);

        Self {
            version: LAYOUT_VERSION,
            layout_hash,
            columns,
            regions,
        }
    }

    fn derive_columns(regions: &[String]) -> Vec<String> {
        BASE_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(regions.iter().map(|r| region_column(r)))
            .collect()
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn layout_hash(&self) -> u32 {
        self.layout_hash
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Known regions, in column order
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    /// Get column index by name (O(n) but columns are few)
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Training region acting as an explicit catch-all, if any
    pub fn other_region(&self) -> Option<&str> {
        self.regions
            .iter()
            .find(|r| OTHER_REGION_LABELS.contains(&r.to_lowercase().as_str()))
            .map(String::as_str)
    }

    /// Check that incoming data was built against this layout
    pub fn validate_layout(&self, version: u8, hash: u32) -> Result<(), LayoutMismatchError> {
        if version != self.version || hash != self.layout_hash {
            return Err(LayoutMismatchError {
                expected_version: self.version,
                expected_hash: self.layout_hash,
                actual_version: version,
                actual_hash: hash,
            });
        }
        Ok(())
    }

    /// Recompute columns and hash from the region list; catches edited or stale schemas
    pub fn verify(&self) -> Result<(), LayoutMismatchError> {
        let columns = Self::derive_columns(&self.regions);
        let hash = compute_layout_hash(LAYOUT_VERSION, &columns);

        if self.version != LAYOUT_VERSION || columns != self.columns || hash != self.layout_hash {
            return Err(LayoutMismatchError {
                expected_version: LAYOUT_VERSION,
                expected_hash: hash,
                actual_version: self.version,
                actual_hash: self.layout_hash,
            });
        }
        Ok(())
    }

    pub fn layout_info(&self) -> LayoutInfo {
        LayoutInfo {
            version: self.version,
            hash: self.layout_hash,
            feature_count: self.columns.len(),
            feature_names: self.columns.clone(),
        }
    }
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

// ============================================================================
// TESTS
// ============================================================================
