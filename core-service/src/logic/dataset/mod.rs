//! Dataset Module - Historical policy records used for training
//!
//! A record keeps every field optional: missing feature values are imputed
//! later, records without a label are dropped before the split.

pub mod loader;


use std::collections::BTreeSet;
use serde::{Deserialize, Serialize};

pub use loader::{load_dataset, load_dataset_from_reader};

// ============================================================================
// FIELDS
// ============================================================================

/// Fields of a dataset record, in file-independent form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Age,
    Weight,
    Sex,
    SmokingStatus,
    Region,
    Children,
    Premium,
}

impl Field {
    /// Fields every training file must provide
    pub const REQUIRED: [Field; 7] = [
        Field::Age,
        Field::Weight,
        Field::Sex,
        Field::SmokingStatus,
        Field::Region,
        Field::Children,
        Field::Premium,
    ];

    /// Name fields, excluded from modeling
    pub const OPTIONAL: [Field; 2] = [Field::FirstName, Field::LastName];

    pub fn name(&self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Age => "age",
            Self::Weight => "weight",
            Self::Sex => "sex",
            Self::SmokingStatus => "smoking_status",
            Self::Region => "region",
            Self::Children => "number_of_children",
            Self::Premium => "premium",
        }
    }

    /// Accepted header spellings, already normalized (see `loader::normalize_header`)
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::FirstName => &["prenom", "prénom", "first_name", "firstname"],
            Self::LastName => &["nom", "last_name", "lastname"],
            Self::Age => &["age", "âge"],
            Self::Weight => &["poids", "weight", "poids (kg)"],
            Self::Sex => &["sexe", "sex"],
            Self::SmokingStatus => &["statut de fumeur", "smoking_status", "smoker"],
            Self::Region => &["region", "région"],
            Self::Children => &["nombre d'enfants", "children", "number_of_children"],
            Self::Premium => &["prime d'assurance", "premium", "charges"],
        }
    }
}

// ============================================================================
// CATEGORICALS
// ============================================================================

/// Accepted spellings, as listed in validation messages
pub const SEX_LABELS: &[&str] = &["Homme", "Femme"];
pub const SMOKING_LABELS: &[&str] = &["Non", "Oui"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Case-insensitive parse of French/English labels or a 0/1 code
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "homme" | "male" | "m" | "h" | "0" => Some(Self::Male),
            "femme" | "female" | "f" | "1" => Some(Self::Female),
            _ => None,
        }
    }

    /// Numeric code used in the feature vector
    pub fn code(&self) -> f64 {
        match self {
            Self::Male => 0.0,
            Self::Female => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmokingStatus {
    NonSmoker,
    Smoker,
}

impl SmokingStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "non" | "no" | "n" | "false" | "0" => Some(Self::NonSmoker),
            "oui" | "yes" | "y" | "true" | "1" => Some(Self::Smoker),
            _ => None,
        }
    }

    pub fn code(&self) -> f64 {
        match self {
            Self::NonSmoker => 0.0,
            Self::Smoker => 1.0,
        }
    }
}

/// Trim a region name; blank names count as missing
pub fn normalize_region(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// ============================================================================
// RECORD / DATASET
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<f64>,
    pub weight: Option<f64>,
    pub sex: Option<Sex>,
    pub smoking_status: Option<SmokingStatus>,
    pub region: Option<String>,
    pub children: Option<f64>,
    pub premium: Option<f64>,
}

impl Record {
    /// Whether the record carries a usable value for `field`
    pub fn has(&self, field: Field) -> bool {
        match field {
            Field::FirstName => self.first_name.is_some(),
            Field::LastName => self.last_name.is_some(),
            Field::Age => self.age.is_some_and(f64::is_finite),
            Field::Weight => self.weight.is_some_and(f64::is_finite),
            Field::Sex => self.sex.is_some(),
            Field::SmokingStatus => self.smoking_status.is_some(),
            Field::Region => self.region.as_deref().and_then(normalize_region).is_some(),
            Field::Children => self.children.is_some_and(f64::is_finite),
            Field::Premium => self.is_labeled(),
        }
    }

    pub fn is_labeled(&self) -> bool {
        self.premium.is_some_and(f64::is_finite)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
    /// SHA-256 hex of the source file, when loaded from disk
    fingerprint: Option<String>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records, fingerprint: None }
    }

    pub fn with_fingerprint(mut self, fingerprint: String) -> Self {
        self.fingerprint = Some(fingerprint);
        self
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    /// Keep only records with a finite label; returns the number dropped
    pub fn labeled(&self) -> (Dataset, usize) {
        let records: Vec<Record> = self
            .records
            .iter()
            .filter(|r| r.is_labeled())
            .cloned()
            .collect();
        let dropped = self.records.len() - records.len();

        (
            Dataset {
                records,
                fingerprint: self.fingerprint.clone(),
            },
            dropped,
        )
    }

    /// Distinct region names, sorted lexicographically
    pub fn regions(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .filter_map(|r| r.region.as_deref().and_then(normalize_region))
            .collect()
    }
}
