//! Build and rebuild command implementations.
//!
//! `platen build` refreshes the collection JSON and runs the site generator;
//! `platen rebuild` removes the output directory first.

use crate::cli::{BuildArgs, Profile};
use crate::commands::utils::Workspace;
use crate::dev::{BuildReport, HookStatus, SiteBuilder, site_stats};
use crate::error::{CliError, Result};
use crate::ui;
use platen_collection::ProjectionOutcome;
use std::future::Future;

/// Execute the build command.
///
/// # Errors
///
/// Returns errors when the generator cannot be started or exits non-zero.
/// The generator's captured output travels with the error.
pub async fn execute(args: BuildArgs, workspace: &Workspace) -> Result<()> {
    let profile = args.profile();
    ui::banner(&format!("build ({})", profile));

    let builder = workspace.builder();
    let report = run_with_spinner(&builder, "Generating site", builder.build(profile)).await?;
    print_report(&report, workspace);
    Ok(())
}

/// Execute the rebuild command (clean, then build).
pub async fn rebuild(args: BuildArgs, workspace: &Workspace) -> Result<()> {
    let profile = args.profile();
    ui::banner(&format!("rebuild ({})", profile));

    let builder = workspace.builder();
    let report =
        run_with_spinner(&builder, "Cleaning and generating site", builder.rebuild(profile))
            .await?;
    print_report(&report, workspace);
    Ok(())
}

/// Drive a build future behind a spinner, finishing with ✓ or ✗.
pub(crate) async fn run_with_spinner<F>(
    builder: &SiteBuilder,
    action: &str,
    build: F,
) -> Result<BuildReport>
where
    F: Future<Output = Result<BuildReport>>,
{
    let spinner = ui::Spinner::new(&format!(
        "{} with {}...",
        action,
        builder.generator().name()
    ));

    match build.await {
        Ok(report) => {
            spinner.finish(&format!(
                "Site generated in {}",
                ui::format_duration(report.elapsed)
            ));
            Ok(report)
        }
        Err(e) => {
            spinner.fail(&failure_headline(&e));
            Err(e)
        }
    }
}

/// Hook status, generator output (debug only), and the site summary.
pub(crate) fn print_report(report: &BuildReport, workspace: &Workspace) {
    match &report.hook {
        HookStatus::Ran(ProjectionOutcome::Written {
            records, discarded, ..
        }) => {
            let mut line = format!("Collection JSON refreshed: {} records", records);
            if *discarded > 0 {
                line.push_str(&format!(" ({} unidentified rows dropped)", discarded));
            }
            ui::info(&line);
        }
        HookStatus::Ran(ProjectionOutcome::Skipped { csv }) => {
            tracing::debug!(csv = %csv.display(), "no collection CSV; projection skipped");
        }
        HookStatus::Failed(reason) => {
            ui::warning(&format!("Collection JSON not refreshed: {}", reason));
        }
    }

    tracing::debug!(profile = %report.profile, output = %report.output, "generator output");

    let stats = site_stats(&workspace.paths.output_dir);
    ui::print_site_summary(
        &workspace.display_output(),
        stats.files,
        stats.bytes,
        report.elapsed,
    );
}

/// Short ✗ line for a failed build. The details come with the error itself.
pub(crate) fn failure_headline(error: &CliError) -> String {
    match error {
        CliError::Busy(_) => "Another build is still running".to_string(),
        CliError::Build(crate::error::BuildError::CleanFailed { .. }) => {
            "Could not clean the output directory".to_string()
        }
        _ => "Build failed".to_string(),
    }
}

/// Profile label used by the interactive console.
pub(crate) fn describe_profile(profile: Profile) -> &'static str {
    match profile {
        Profile::Development => "development settings",
        Profile::Production => "production settings",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BuildError;
    use std::path::PathBuf;

    #[test]
    fn test_failure_headline() {
        assert_eq!(
            failure_headline(&CliError::Busy("x".to_string())),
            "Another build is still running"
        );
        assert_eq!(
            failure_headline(
                &BuildError::CleanFailed {
                    path: PathBuf::from("output"),
                    source: std::io::Error::other("denied"),
                }
                .into()
            ),
            "Could not clean the output directory"
        );
        assert_eq!(
            failure_headline(&CliError::Custom("boom".to_string())),
            "Build failed"
        );
    }

    #[test]
    fn test_describe_profile() {
        assert_eq!(describe_profile(Profile::Production), "production settings");
    }
}
