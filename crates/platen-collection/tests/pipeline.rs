//! End-to-end tests for the collection pipeline: CSV in, JSON and pages out.

use chrono::NaiveDate;
use platen_collection::{project, read_records, PageGenerator, ProjectionOutcome};
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

const COLLECTION: &str = "\
Location,Typewriter Brand,Model,Year,Serial No,Pitch,Notes
San Francisco,Royal,Quiet De Luxe,1948.0,A-1234,10,
Tracy,Olympia,SM3,1957,551234,12,Script typeface
Tracy,,,,,,spare parts box
San Francisco,Smith Corona,Silent,nan,None,,
";

fn setup() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("content")).unwrap();
    fs::write(dir.path().join("content/typewriters.csv"), COLLECTION).unwrap();
    dir
}

#[test]
fn test_projection_writes_identified_records() {
    let dir = setup();
    let csv = dir.path().join("content/typewriters.csv");
    let json_path = dir.path().join("content/extra/typewriters.json");

    let outcome = project(&csv, &json_path).unwrap();
    assert_eq!(
        outcome,
        ProjectionOutcome::Written {
            path: json_path.clone(),
            records: 3,
            discarded: 1,
        }
    );

    let parsed: Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    let items = parsed.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["Year"], json!(1948));
    assert_eq!(items[0]["Pitch"], json!(10));
    assert!(items[0].get("Notes").is_none());
    assert_eq!(items[1]["Serial No"], json!("551234"));
    assert!(items[2].get("Year").is_none());
    assert!(items[2].get("Serial No").is_none());
}

#[test]
fn test_projection_skips_missing_csv() {
    let dir = TempDir::new().unwrap();
    let json_path = dir.path().join("typewriters.json");

    let outcome = project(&dir.path().join("typewriters.csv"), &json_path).unwrap();
    assert!(matches!(outcome, ProjectionOutcome::Skipped { .. }));
    assert!(!json_path.exists());
}

#[test]
fn test_page_generation_is_idempotent() {
    let dir = setup();
    let records = read_records(&dir.path().join("content/typewriters.csv")).unwrap();
    let pages_dir = dir.path().join("content/typewriters");
    let generator = PageGenerator::new(&pages_dir, NaiveDate::from_ymd_opt(2025, 2, 10).unwrap());

    let first = generator.generate(&records).unwrap();
    assert_eq!(first.generated.len(), 2);
    assert_eq!(first.incomplete, 2);
    assert!(pages_dir.join("royal-quiet-de-luxe-a-1234.md").exists());
    assert!(pages_dir.join("olympia-sm3-551234.md").exists());

    let before: Vec<_> = first
        .generated
        .iter()
        .map(|p| fs::read_to_string(p).unwrap())
        .collect();

    let second = generator.generate(&records).unwrap();
    assert!(second.generated.is_empty());
    assert_eq!(second.existing, 2);

    let after: Vec<_> = first
        .generated
        .iter()
        .map(|p| fs::read_to_string(p).unwrap())
        .collect();
    assert_eq!(before, after);
    assert_eq!(fs::read_dir(&pages_dir).unwrap().count(), 2);
}
