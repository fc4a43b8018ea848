//! Check command implementation.
//!
//! Pre-flight for a project: is the generator installed, and does the layout
//! it will be pointed at exist? Configuration is validated while loading, so
//! reaching this command means the config itself is sound.

use crate::commands::utils::Workspace;
use crate::dev::SiteGenerator;
use crate::error::{BuildError, CliError, Result};
use crate::ui;

/// Execute the check command.
///
/// Every check runs even after a failure so the user sees the whole picture;
/// the first failure is returned.
pub async fn execute(workspace: &Workspace) -> Result<()> {
    ui::banner("check");

    let builder = workspace.builder();
    let mut failures = Vec::new();

    match check_generator(builder.generator()).await {
        Ok(version) => ui::success(&format!("Generator: {}", version)),
        Err(e) => {
            ui::error(&e.to_string());
            failures.push(e);
        }
    }

    let layout = check_layout(workspace);
    if layout.is_empty() {
        ui::success(&format!(
            "Layout: {} → {}",
            workspace.display_path(&workspace.paths.content_dir),
            workspace.display_output()
        ));
    }
    for error in layout {
        ui::error(&error.to_string());
        failures.push(error);
    }

    if workspace.paths.collection_csv.is_file() {
        ui::success(&format!(
            "Collection: {}",
            workspace.display_path(&workspace.paths.collection_csv)
        ));
    } else {
        ui::info("No collection CSV; the projection hook will be skipped");
    }

    let count = failures.len();
    match failures.into_iter().next() {
        None => {
            ui::success("Ready to build");
            Ok(())
        }
        Some(first) => {
            if count > 1 {
                ui::warning(&format!("{} checks failed", count));
            }
            Err(first)
        }
    }
}

/// Run `<generator> --version`.
pub async fn check_generator(generator: &dyn SiteGenerator) -> Result<String> {
    let version = generator.version().await?;
    Ok(if version.is_empty() {
        generator.name().to_string()
    } else {
        version
    })
}

/// Content directory and both settings files must exist.
pub fn check_layout(workspace: &Workspace) -> Vec<CliError> {
    let paths = &workspace.paths;
    let mut errors = Vec::new();

    if !paths.content_dir.is_dir() {
        errors.push(CliError::FileNotFound(paths.content_dir.clone()));
    }
    for settings in [&paths.development_settings, &paths.production_settings] {
        if !settings.is_file() {
            errors.push(BuildError::SettingsNotFound(settings.clone()).into());
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigOverrides;
    use crate::dev::CommandGenerator;
    use std::fs;
    use tempfile::TempDir;

    fn workspace(temp: &TempDir) -> Workspace {
        Workspace::load(Some(temp.path()), None, &ConfigOverrides::default()).unwrap()
    }

    #[test]
    #[serial_test::serial]
    fn test_check_layout_reports_missing_pieces() {
        let temp = TempDir::new().unwrap();
        let errors = check_layout(&workspace(&temp));

        assert_eq!(errors.len(), 3);
        assert!(matches!(errors[0], CliError::FileNotFound(_)));
        assert!(matches!(
            errors[1],
            CliError::Build(BuildError::SettingsNotFound(_))
        ));
    }

    #[test]
    #[serial_test::serial]
    fn test_check_layout_complete() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("content")).unwrap();
        fs::write(temp.path().join("pelicanconf.py"), "").unwrap();
        fs::write(temp.path().join("publishconf.py"), "").unwrap();

        assert!(check_layout(&workspace(&temp)).is_empty());
    }

    #[tokio::test]
    async fn test_check_generator_missing() {
        let generator = CommandGenerator::new("platen-test-no-such-generator");
        let result = check_generator(&generator).await;
        assert!(matches!(
            result,
            Err(CliError::Build(BuildError::GeneratorNotFound { .. }))
        ));
    }
}
