//! Command implementations for the Platen CLI.
//!
//! - [`build`] - generate the site, or clean and generate (`rebuild`)
//! - [`clean`] - remove the output directory
//! - [`serve`] - preview server, optionally with watch mode
//! - [`check`] - generator and layout pre-flight
//! - [`collection`] - `pages` and `project`
//! - [`interactive`] - line-command console when no subcommand is given
//!
//! Each command provides an `execute` function that takes its parsed
//! arguments and the loaded [`Workspace`].

pub mod build;
pub mod check;
pub mod clean;
pub mod collection;
pub mod interactive;
pub mod serve;
pub(crate) mod utils;

use crate::cli::{Cli, Command};
use crate::config::ConfigOverrides;
use crate::error::Result;

pub use utils::{Workspace, find_config_root, get_cwd, resolve_path, resolve_project_root};

// Re-export execute functions for convenience
pub use build::execute as build_execute;
pub use build::rebuild as rebuild_execute;
pub use check::execute as check_execute;
pub use clean::execute as clean_execute;
pub use collection::{pages as pages_execute, project as project_execute};
pub use interactive::execute as interactive_execute;
pub use serve::execute as serve_execute;

/// Load the workspace for a parsed command line.
///
/// Only `serve` contributes CLI overrides; everything else comes from the
/// config file, the environment, and defaults.
pub fn load_workspace(cli: &Cli) -> Result<Workspace> {
    let overrides = match &cli.command {
        Some(Command::Serve(args)) => ConfigOverrides {
            port: args.port,
            poll_interval_ms: args.interval,
            watch_mode: args.watch_mode,
        },
        _ => ConfigOverrides::default(),
    };
    Workspace::load(cli.root.as_deref(), cli.config.as_deref(), &overrides)
}

/// Run a parsed command line.
pub async fn dispatch(cli: Cli) -> Result<()> {
    let workspace = load_workspace(&cli)?;

    match cli.command {
        Some(Command::Build(args)) => build_execute(args, &workspace).await,
        Some(Command::Rebuild(args)) => rebuild_execute(args, &workspace).await,
        Some(Command::Clean) => clean_execute(&workspace).await,
        Some(Command::Serve(args)) => serve_execute(args, &workspace).await,
        Some(Command::Check) => check_execute(&workspace).await,
        Some(Command::Pages(args)) => pages_execute(args, &workspace).await,
        Some(Command::Project) => project_execute(&workspace).await,
        None => interactive_execute(&workspace).await,
    }
}
