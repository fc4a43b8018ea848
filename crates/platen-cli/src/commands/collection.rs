//! Collection commands: `platen pages` and `platen project`.

use crate::cli::PagesArgs;
use crate::commands::utils::{Workspace, resolve_path};
use crate::error::{CliError, Result};
use crate::ui;
use chrono::NaiveDate;
use platen_collection::{PageGenerator, PagesReport, ProjectionOutcome};
use std::path::PathBuf;

/// Write a page for every fully identified machine that lacks one.
pub async fn pages(args: PagesArgs, workspace: &Workspace) -> Result<()> {
    ui::banner("pages");

    let date = page_date(&args, workspace);
    let out_dir = args
        .out_dir
        .as_deref()
        .map(|dir| resolve_path(dir, &workspace.paths.root))
        .unwrap_or_else(|| workspace.paths.pages_dir.clone());
    let csv = workspace.paths.collection_csv.clone();

    tracing::debug!(csv = %csv.display(), out = %out_dir.display(), %date, "generating pages");
    let report = tokio::task::spawn_blocking(move || generate_pages(csv, out_dir, date))
        .await
        .map_err(|e| CliError::Custom(format!("page generation panicked: {}", e)))??;

    for path in &report.generated {
        ui::info(&format!("Created {}", workspace.display_path(path)));
    }
    ui::success(&pages_summary(&report));
    Ok(())
}

/// Convert the collection CSV to the JSON read by the templates.
pub async fn project(workspace: &Workspace) -> Result<()> {
    ui::banner("project");

    let csv = workspace.paths.collection_csv.clone();
    let json = workspace.paths.collection_json.clone();
    let outcome = tokio::task::spawn_blocking(move || platen_collection::project(&csv, &json))
        .await
        .map_err(|e| CliError::Custom(format!("projection panicked: {}", e)))??;

    match outcome {
        ProjectionOutcome::Written {
            path,
            records,
            discarded,
        } => {
            ui::success(&format!(
                "Wrote {} records to {}",
                records,
                workspace.display_path(&path)
            ));
            if discarded > 0 {
                ui::info(&format!(
                    "Dropped {} rows without a brand or model",
                    discarded
                ));
            }
        }
        ProjectionOutcome::Skipped { csv } => {
            ui::warning(&format!(
                "{} not found; nothing to project",
                workspace.display_path(&csv)
            ));
        }
    }
    Ok(())
}

/// `--date`, then `collection.pageDate`, then today.
fn page_date(args: &PagesArgs, workspace: &Workspace) -> NaiveDate {
    args.date
        .or(workspace.config.collection.page_date)
        .unwrap_or_else(|| chrono::Local::now().date_naive())
}

fn generate_pages(csv: PathBuf, out_dir: PathBuf, date: NaiveDate) -> Result<PagesReport> {
    let records = platen_collection::read_records(&csv)?;
    Ok(PageGenerator::new(out_dir, date).generate(&records)?)
}

fn pages_summary(report: &PagesReport) -> String {
    format!(
        "{} page(s) created, {} already present, {} incomplete row(s) skipped",
        report.generated.len(),
        report.existing,
        report.incomplete
    )
}
