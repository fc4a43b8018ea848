//! Machine page generation.
//!
//! Every typewriter with a brand, model and serial number gets a Markdown page
//! under `content/typewriters/`. Pages are placeholders meant to be edited by
//! hand afterwards, so an existing page is never touched.

use crate::error::{CollectionError, Result};
use crate::record::Record;
use crate::slug::slugify;
use crate::{BRAND_COLUMN, MODEL_COLUMN, SERIAL_COLUMN};
use chrono::NaiveDate;
use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write as _};
use std::path::{Path, PathBuf};

/// Optional columns copied into page metadata, as `(column, key)`.
const METADATA_FIELDS: &[(&str, &str)] = &[
    ("Year", "year"),
    ("Size", "size"),
    ("Electric/Manual", "type"),
    ("Pitch", "pitch"),
    ("Typeface", "typeface"),
    ("Layout", "layout"),
    ("Color", "color"),
    ("Location", "location"),
    ("Notes", "notes"),
    ("Work Needed", "work_needed"),
];

/// Identity of a machine page derived from a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineIdentity {
    pub make: String,
    pub model: String,
    pub serial: String,
    /// `{make}-{model}-{serial}` slug shared by file name and URL
    pub slug: String,
}

impl MachineIdentity {
    /// Derive the identity of a record.
    ///
    /// Returns `None` when brand, model or serial is missing, or when any of
    /// them slugs to nothing.
    pub fn from_record(record: &Record) -> Option<Self> {
        let make = record.text(BRAND_COLUMN)?;
        let model = record.text(MODEL_COLUMN)?;
        let serial = record.text(SERIAL_COLUMN)?;

        let parts = [slugify(&make), slugify(&model), slugify(&serial)];
        if parts.iter().any(String::is_empty) {
            return None;
        }

        Some(Self {
            make,
            model,
            serial,
            slug: parts.join("-"),
        })
    }

    /// File name of the page.
    pub fn file_name(&self) -> String {
        format!("{}.md", self.slug)
    }

    /// Page title.
    pub fn title(&self) -> String {
        format!("{} {} - Serial {}", self.make, self.model, self.serial)
    }
}

/// Summary of a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagesReport {
    /// Pages written during this run
    pub generated: Vec<PathBuf>,
    /// Records missing brand, model or serial
    pub incomplete: usize,
    /// Records whose page already exists
    pub existing: usize,
}

impl PagesReport {
    /// Total records that did not produce a page.
    pub fn skipped(&self) -> usize {
        self.incomplete + self.existing
    }
}

/// Writes placeholder machine pages.
#[derive(Debug, Clone)]
pub struct PageGenerator {
    out_dir: PathBuf,
    date: NaiveDate,
}

enum PageResult {
    Written(PathBuf),
    Exists,
    Incomplete,
}

impl PageGenerator {
    /// Create a generator writing into `out_dir`, stamping pages with `date`.
    pub fn new(out_dir: impl Into<PathBuf>, date: NaiveDate) -> Self {
        Self {
            out_dir: out_dir.into(),
            date,
        }
    }

    /// Output directory for pages.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Generate pages for all records.
    ///
    /// The output directory is created if needed. Running twice over the same
    /// records writes nothing the second time.
    pub fn generate(&self, records: &[Record]) -> Result<PagesReport> {
        fs::create_dir_all(&self.out_dir).map_err(|e| CollectionError::io(&self.out_dir, e))?;

        let mut report = PagesReport::default();
        for record in records {
            match self.generate_one(record)? {
                PageResult::Written(path) => {
                    tracing::debug!(path = %path.display(), "generated machine page");
                    report.generated.push(path);
                }
                PageResult::Exists => report.existing += 1,
                PageResult::Incomplete => report.incomplete += 1,
            }
        }

        tracing::info!(
            generated = report.generated.len(),
            skipped = report.skipped(),
            "machine pages generated"
        );
        Ok(report)
    }

    /// Generate the page for a single record, if it has none yet.
    ///
    /// Returns the path of the new page, or `None` if the record is incomplete
    /// or the page already exists.
    pub fn generate_page(&self, record: &Record) -> Result<Option<PathBuf>> {
        Ok(match self.generate_one(record)? {
            PageResult::Written(path) => Some(path),
            _ => None,
        })
    }

    fn generate_one(&self, record: &Record) -> Result<PageResult> {
        let Some(identity) = MachineIdentity::from_record(record) else {
            return Ok(PageResult::Incomplete);
        };

        let path = self.out_dir.join(identity.file_name());
        // create_new makes the existence check and the write a single step
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(PageResult::Exists),
            Err(e) => return Err(CollectionError::io(&path, e)),
        };

        let content = render_page(&identity, record, self.date);
        file.write_all(content.as_bytes())
            .map_err(|e| CollectionError::io(&path, e))?;

        Ok(PageResult::Written(path))
    }
}

/// Render the page: front matter followed by a placeholder body.
pub fn render_page(identity: &MachineIdentity, record: &Record, date: NaiveDate) -> String {
    let title = identity.title();
    let slug = &identity.slug;

    let mut page = String::new();
    let _ = writeln!(page, "Title: {title}");
    let _ = writeln!(page, "Date: {}", date.format("%Y-%m-%d"));
    let _ = writeln!(page, "Category: machine");
    let _ = writeln!(page, "template: typewriter_machine");
    let _ = writeln!(page, "Save_as: typewriters/{slug}/index.html");
    let _ = writeln!(page, "URL: typewriters/{slug}/");
    page.push('\n');

    let _ = writeln!(page, "make: {}", identity.make);
    let _ = writeln!(page, "model: {}", identity.model);
    let _ = writeln!(page, "serial: {}", identity.serial);
    for (column, key) in METADATA_FIELDS {
        if let Some(value) = record.text(column) {
            let _ = writeln!(page, "{key}: {value}");
        }
    }

    let _ = write!(
        page,
        "\n# {title}\n\n## Overview\n\nThis page documents the {} {} typewriter with serial number {}.\n\n## Description\n\nAdd description, photos, and details about this typewriter here.\n",
        identity.make, identity.model, identity.serial
    );

    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 10).unwrap()
    }

    fn royal() -> Record {
        Record::from_iter([
            (BRAND_COLUMN, json!("Royal")),
            (MODEL_COLUMN, json!("Quiet De Luxe")),
            (SERIAL_COLUMN, json!("A-1234")),
            ("Year", json!(1948)),
            ("Color", json!("Black")),
        ])
    }

    #[test]
    fn test_identity_requires_all_three_fields() {
        assert!(MachineIdentity::from_record(&royal()).is_some());

        let no_serial = Record::from_iter([
            (BRAND_COLUMN, json!("Royal")),
            (MODEL_COLUMN, json!("Quiet De Luxe")),
        ]);
        assert!(MachineIdentity::from_record(&no_serial).is_none());
    }

    #[test]
    fn test_identity_rejects_empty_slug() {
        let record = Record::from_iter([
            (BRAND_COLUMN, json!("Royal")),
            (MODEL_COLUMN, json!("P")),
            (SERIAL_COLUMN, json!("???")),
        ]);
        assert!(MachineIdentity::from_record(&record).is_none());
    }

    #[test]
    fn test_identity_numeric_serial() {
        let record = Record::from_iter([
            (BRAND_COLUMN, json!("Olympia")),
            (MODEL_COLUMN, json!("SM3")),
            (SERIAL_COLUMN, json!(551234)),
        ]);
        let identity = MachineIdentity::from_record(&record).unwrap();
        assert_eq!(identity.file_name(), "olympia-sm3-551234.md");
        assert_eq!(identity.title(), "Olympia SM3 - Serial 551234");
    }

    #[test]
    fn test_render_page_front_matter() {
        let record = royal();
        let identity = MachineIdentity::from_record(&record).unwrap();
        let page = render_page(&identity, &record, date());

        assert!(page.starts_with("Title: Royal Quiet De Luxe - Serial A-1234\n"));
        assert!(page.contains("Date: 2025-02-10\n"));
        assert!(page.contains("Save_as: typewriters/royal-quiet-de-luxe-a-1234/index.html\n"));
        assert!(page.contains("URL: typewriters/royal-quiet-de-luxe-a-1234/\n"));
        assert!(page.contains("year: 1948\n"));
        assert!(page.contains("color: Black\n"));
        assert!(!page.contains("pitch:"));
        assert!(page.contains("# Royal Quiet De Luxe - Serial A-1234"));
    }

    #[test]
    fn test_generate_never_overwrites() {
        let dir = TempDir::new().unwrap();
        let generator = PageGenerator::new(dir.path().join("typewriters"), date());

        let first = generator.generate(&[royal()]).unwrap();
        assert_eq!(first.generated.len(), 1);

        let path = &first.generated[0];
        fs::write(path, "edited by hand").unwrap();

        let second = generator.generate(&[royal()]).unwrap();
        assert!(second.generated.is_empty());
        assert_eq!(second.existing, 1);
        assert_eq!(fs::read_to_string(path).unwrap(), "edited by hand");
    }

    #[test]
    fn test_generate_skips_incomplete_records() {
        let dir = TempDir::new().unwrap();
        let generator = PageGenerator::new(dir.path(), date());
        let partial = Record::from_iter([(BRAND_COLUMN, json!("Hermes"))]);

        let report = generator.generate(&[partial, royal()]).unwrap();
        assert_eq!(report.generated.len(), 1);
        assert_eq!(report.incomplete, 1);
        assert_eq!(report.skipped(), 1);
    }
}
