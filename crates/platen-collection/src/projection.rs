//! CSV-to-JSON projection consumed by the site templates.
//!
//! Runs as a build hook before the generator: the templates read
//! `typewriters.json` to render the collection table, so the projection must
//! be fully regenerated on every build.

use crate::error::{CollectionError, Result};
use crate::record::{read_records, Record};
use crate::{BRAND_COLUMN, MODEL_COLUMN};
use std::fs;
use std::path::{Path, PathBuf};

/// Result of a projection run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectionOutcome {
    /// The CSV does not exist, nothing was written
    Skipped { csv: PathBuf },
    /// The JSON file was (re)written
    Written {
        path: PathBuf,
        records: usize,
        discarded: usize,
    },
}

/// Check whether a record carries enough to identify a machine.
pub fn is_identified(record: &Record) -> bool {
    record.contains(BRAND_COLUMN) || record.contains(MODEL_COLUMN)
}

/// Keep only identified records, preserving order.
///
/// Returns the kept records and how many were dropped.
pub fn select(records: Vec<Record>) -> (Vec<Record>, usize) {
    let total = records.len();
    let kept: Vec<Record> = records.into_iter().filter(is_identified).collect();
    let discarded = total - kept.len();
    (kept, discarded)
}

/// Serialize records as a pretty-printed JSON array.
pub fn to_json(records: &[Record]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Project the collection CSV into a JSON array.
///
/// Rows without a brand and without a model are discarded. The parent
/// directory of `json_path` is created when needed.
///
/// # Errors
///
/// Returns CSV, serialization or I/O errors. A missing CSV is not an error;
/// it yields [`ProjectionOutcome::Skipped`].
pub fn project(csv_path: &Path, json_path: &Path) -> Result<ProjectionOutcome> {
    let records = match read_records(csv_path) {
        Ok(records) => records,
        Err(CollectionError::CsvNotFound(csv)) => {
            tracing::debug!(csv = %csv.display(), "no collection CSV, skipping projection");
            return Ok(ProjectionOutcome::Skipped { csv });
        }
        Err(e) => return Err(e),
    };

    let (kept, discarded) = select(records);
    let json = to_json(&kept)?;

    if let Some(parent) = json_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CollectionError::io(parent, e))?;
    }
    fs::write(json_path, json).map_err(|e| CollectionError::io(json_path, e))?;

    tracing::info!(
        records = kept.len(),
        discarded,
        path = %json_path.display(),
        "projected collection"
    );

    Ok(ProjectionOutcome::Written {
        path: json_path.to_path_buf(),
        records: kept.len(),
        discarded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_select_requires_brand_or_model() {
        let records = vec![
            Record::from_iter([(BRAND_COLUMN, json!("Royal"))]),
            Record::from_iter([("Color", json!("Black"))]),
            Record::from_iter([(MODEL_COLUMN, json!("SM3"))]),
        ];

        let (kept, discarded) = select(records);
        assert_eq!(kept.len(), 2);
        assert_eq!(discarded, 1);
    }

    #[test]
    fn test_to_json_preserves_column_order_and_unicode() {
        let record = Record::from_iter([
            (BRAND_COLUMN, json!("Triumph")),
            (MODEL_COLUMN, json!("Gabriele")),
            ("Location", json!("Zürich")),
        ]);

        let json = to_json(&[record]).unwrap();
        let brand = json.find("Typewriter Brand").unwrap();
        let location = json.find("Location").unwrap();
        assert!(brand < location);
        assert!(json.contains("Zürich"));

        let parsed: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["Model"], json!("Gabriele"));
    }
}
