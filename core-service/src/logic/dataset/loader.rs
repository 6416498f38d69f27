//! CSV loader for the historical dataset
//!
//! Headers are matched against `Field::aliases` after normalization, so the
//! French export and an English one load the same way.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use sha2::{Digest, Sha256};

use super::{normalize_region, Dataset, Field, Record, Sex, SmokingStatus};
use crate::logic::error::DataLoadError;

/// Cell spellings treated as a missing value
const MISSING_MARKERS: &[&str] = &["", "na", "n/a", "nan", "null", "none"];

/// Lowercase, trim, and fold typographic apostrophes
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .trim_start_matches('\u{feff}')
        .to_lowercase()
        .replace(['\u{2019}', '\u{2018}', '`'], "'")
}

/// Load a dataset from a CSV file and fingerprint its bytes
pub fn load_dataset(path: &Path) -> Result<Dataset, DataLoadError> {
    let bytes = std::fs::read(path).map_err(|source| DataLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let fingerprint = hex::encode(Sha256::digest(&bytes));
    let dataset = load_dataset_from_reader(bytes.as_slice())?.with_fingerprint(fingerprint);

    log::info!(
        "Loaded {} records from {} (sha256 {})",
        dataset.len(),
        path.display(),
        dataset.fingerprint().unwrap_or("-")
    );
    Ok(dataset)
}

/// Load a dataset from any CSV source with a header row
pub fn load_dataset_from_reader<R: Read>(reader: R) -> Result<Dataset, DataLoadError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let columns = resolve_columns(&headers)?;

    let mut records = Vec::new();
    for (row_idx, row) in reader.records().enumerate() {
        let row = row?;
        // Line number in the file, header being line 1
        let line = row_idx + 2;
        records.push(parse_record(&row, &headers, &columns, line)?);
    }

    Ok(Dataset::new(records))
}

/// Map every known field to its column index; fail listing all missing required fields
fn resolve_columns(headers: &StringRecord) -> Result<HashMap<Field, usize>, DataLoadError> {
    let normalized: Vec<String> = headers.iter().map(normalize_header).collect();

    let mut columns = HashMap::new();
    for field in Field::REQUIRED.iter().chain(Field::OPTIONAL.iter()) {
        let position = normalized
            .iter()
            .position(|h| field.aliases().contains(&h.as_str()));
        if let Some(idx) = position {
            columns.insert(*field, idx);
        }
    }

    let missing: Vec<String> = Field::REQUIRED
        .iter()
        .filter(|f| !columns.contains_key(f))
        .map(|f| f.name().to_string())
        .collect();

    if !missing.is_empty() {
        return Err(DataLoadError::MissingColumns { missing });
    }

    Ok(columns)
}

fn parse_record(
    row: &StringRecord,
    headers: &StringRecord,
    columns: &HashMap<Field, usize>,
    line: usize,
) -> Result<Record, DataLoadError> {
    let cell = |field: Field| -> Option<&str> {
        columns
            .get(&field)
            .and_then(|&idx| row.get(idx))
            .filter(|value| !is_missing(value))
    };

    let numeric = |field: Field| -> Result<Option<f64>, DataLoadError> {
        match cell(field) {
            None => Ok(None),
            Some(value) => value
                .parse::<f64>()
                .map(Some)
                .map_err(|_| DataLoadError::InvalidValue {
                    row: line,
                    column: headers
                        .get(columns[&field])
                        .unwrap_or(field.name())
                        .to_string(),
                    value: value.to_string(),
                }),
        }
    };

    let sex = cell(Field::Sex).and_then(|value| {
        let parsed = Sex::parse(value);
        if parsed.is_none() {
            log::warn!("Line {}: unrecognized sex '{}', treated as missing", line, value);
        }
        parsed
    });

    let smoking_status = cell(Field::SmokingStatus).and_then(|value| {
        let parsed = SmokingStatus::parse(value);
        if parsed.is_none() {
            log::warn!(
                "Line {}: unrecognized smoking status '{}', treated as missing",
                line, value
            );
        }
        parsed
    });

    Ok(Record {
        first_name: cell(Field::FirstName).map(str::to_string),
        last_name: cell(Field::LastName).map(str::to_string),
        age: numeric(Field::Age)?,
        weight: numeric(Field::Weight)?,
        sex,
        smoking_status,
        region: cell(Field::Region).and_then(normalize_region),
        children: numeric(Field::Children)?,
        premium: numeric(Field::Premium)?.filter(|p| p.is_finite()),
    })
}

fn is_missing(value: &str) -> bool {
    MISSING_MARKERS.contains(&value.trim().to_lowercase().as_str())
}
