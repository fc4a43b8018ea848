//! Shared utilities for command implementations.
//!
//! - Path resolution
//! - Project root detection (nearest `platen.config.json`)
//! - Loading the [`Workspace`] every command operates on

use crate::config::{CONFIG_FILE_NAME, ConfigOverrides, PlatenConfig, SitePaths};
use crate::dev::{CommandGenerator, SiteBuilder};
use crate::error::{CliError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Resolve a path relative to a working directory.
///
/// If the path is absolute, returns it unchanged. Otherwise, joins it with
/// the working directory.
pub fn resolve_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Get the current working directory.
pub fn get_cwd() -> Result<PathBuf> {
    std::env::current_dir().map_err(|e| {
        CliError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to get current directory: {}", e),
        ))
    })
}

/// Walks up the directory tree to find the nearest `platen.config.json`.
///
/// Returns the directory containing it, or `None` at the filesystem root.
pub fn find_config_root(start_dir: &Path) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .find(|dir| dir.join(CONFIG_FILE_NAME).is_file())
        .map(Path::to_path_buf)
}

/// Resolves the project root directory.
///
/// 1. Explicit `--root` flag
/// 2. Nearest directory with a `platen.config.json`, walking up from cwd
/// 3. The current directory
pub fn resolve_project_root(explicit_root: Option<&Path>) -> Result<PathBuf> {
    let cwd = get_cwd()?;

    if let Some(root) = explicit_root {
        let absolute = resolve_path(root, &cwd);
        if !absolute.is_dir() {
            return Err(CliError::InvalidArgument(format!(
                "Specified --root is not a directory: {}",
                absolute.display()
            )));
        }
        return Ok(absolute);
    }

    if let Some(root) = find_config_root(&cwd) {
        if root != cwd {
            tracing::debug!(root = %root.display(), "using project root from config file");
        }
        return Ok(root);
    }

    Ok(cwd)
}

/// Everything a command needs: the loaded config and its resolved paths.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub config: PlatenConfig,
    pub paths: SitePaths,
}

impl Workspace {
    /// Resolve the project root and load its configuration.
    pub fn load(
        explicit_root: Option<&Path>,
        config_path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Self> {
        let root = resolve_project_root(explicit_root)?;
        let config = PlatenConfig::load(&root, config_path, overrides)?;
        let paths = config.paths(&root);
        Ok(Self { config, paths })
    }

    /// Builder driving the configured generator command.
    pub fn builder(&self) -> Arc<SiteBuilder> {
        let generator = CommandGenerator::from_command_line(&self.config.generator);
        Arc::new(SiteBuilder::new(self.paths.clone(), Arc::new(generator)))
    }

    /// Output directory relative to the root, for display.
    pub fn display_output(&self) -> String {
        self.display_path(&self.paths.output_dir)
    }

    /// A path relative to the project root when it lives inside it.
    pub fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.paths.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}
