//! Platen CLI - build, clean, and serve a Pelican site with auto-rebuild.
//!
//! Platen drives an external static site generator as an opaque subprocess
//! and adds what a day of writing needs around it: a local preview server,
//! rebuild-on-change, and the typewriter collection pipeline.
//!
//! # Architecture
//!
//! - [`error`] - error types with actionable messages
//! - [`logger`] - structured logging with tracing
//! - [`ui`] - terminal status lines, spinner, and summaries
//! - [`cli`] - argument parsing
//! - [`config`] - layered configuration (`platen.config.json`, `PLATEN_*`, flags)
//! - [`dev`] - generator invocation, preview server lifecycle, and watch mode
//! - [`commands`] - individual command implementations
//!
//! # Example
//!
//! ```rust,no_run
//! use platen_cli::cli::Profile;
//! use platen_cli::commands::Workspace;
//! use platen_cli::config::ConfigOverrides;
//!
//! # async fn run() -> platen_cli::Result<()> {
//! let workspace = Workspace::load(None, None, &ConfigOverrides::default())?;
//! let report = workspace.builder().build(Profile::Development).await?;
//! println!("built in {:?}", report.elapsed);
//! # Ok(())
//! # }
//! ```

// Public modules
pub mod cli;
pub mod commands;
pub mod config;
pub mod dev;
pub mod error;
pub mod logger;
pub mod ui;

// Re-export commonly used types
pub use error::{BuildError, CliError, ConfigError, Result, ServerError};
