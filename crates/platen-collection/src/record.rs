//! CSV reading and cell normalization.
//!
//! The collection is maintained in a spreadsheet, so the export is noisy:
//! headers carry stray whitespace, empty cells show up as `nan` or `None`, and
//! numeric columns come back as `1925.0`. Everything here turns that into a
//! sequence of [`Record`]s where absent values are simply missing keys.

use crate::error::{CollectionError, Result};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Number, Value};
use std::path::Path;

/// Cell markers treated as "no value", compared case-insensitively after trimming.
const BLANK_MARKERS: &[&str] = &["", "nan", "none"];

/// Largest integer an `f64` represents exactly.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// One row of the collection, keyed by column name in file order.
///
/// Only present values are stored; a blank cell never produces a key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, Value>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value.
    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        self.fields.insert(column.into(), value);
    }

    /// Get the raw JSON value of a field.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    /// Check whether a field is present.
    pub fn contains(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    /// Render a field as display text.
    ///
    /// Strings are returned as-is, numbers in their shortest form
    /// (`1925`, not `1925.0`).
    pub fn text(&self, column: &str) -> Option<String> {
        match self.fields.get(column)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Number of present fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if no field is present.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over `(column, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Check whether a raw cell counts as missing.
pub fn is_blank(cell: &str) -> bool {
    let trimmed = cell.trim();
    BLANK_MARKERS
        .iter()
        .any(|marker| trimmed.eq_ignore_ascii_case(marker))
}

/// Parse a cell as a finite number.
fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Convert a number to JSON, collapsing integral values to integers.
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

/// Read the collection CSV into normalized records.
///
/// A column is treated as numeric when every non-blank cell in it parses as
/// a number; otherwise all its cells are kept as trimmed strings. Rows shorter
/// than the header are padded with blanks.
///
/// # Errors
///
/// Returns [`CollectionError::CsvNotFound`] if the file is missing and
/// [`CollectionError::Csv`] if it cannot be parsed.
pub fn read_records(path: &Path) -> Result<Vec<Record>> {
    if !path.exists() {
        return Err(CollectionError::CsvNotFound(path.to_path_buf()));
    }

    let csv_err = |source| CollectionError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let rows = reader
        .records()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(csv_err)?;

    let numeric: Vec<bool> = (0..headers.len())
        .map(|col| {
            let mut cells = rows
                .iter()
                .filter_map(|row| row.get(col))
                .filter(|cell| !is_blank(cell))
                .peekable();
            cells.peek().is_some() && cells.all(|cell| parse_number(cell).is_some())
        })
        .collect();

    tracing::debug!(
        path = %path.display(),
        rows = rows.len(),
        columns = headers.len(),
        "read collection CSV"
    );

    let records = rows
        .iter()
        .map(|row| {
            headers
                .iter()
                .enumerate()
                .filter_map(|(col, name)| {
                    let cell = row.get(col)?;
                    if is_blank(cell) {
                        return None;
                    }
                    let value = match parse_number(cell) {
                        Some(n) if numeric[col] => number_value(n),
                        _ => Value::String(cell.trim().to_string()),
                    };
                    Some((name.clone(), value))
                })
                .collect()
        })
        .collect();

    Ok(records)
}
