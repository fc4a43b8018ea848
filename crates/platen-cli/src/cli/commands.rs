use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::cli::enums::*;
use crate::cli::validation::{parse_interval_ms, parse_port};

/// Available Platen subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate the site
    ///
    /// Refreshes the collection JSON, then runs the site generator with the
    /// development (default) or production settings.
    Build(BuildArgs),

    /// Serve the generated site locally
    ///
    /// Builds first if the output directory does not exist. With --watch,
    /// rebuilds and restarts the server whenever content changes.
    Serve(ServeArgs),

    /// Remove the output directory
    Clean,

    /// Clean, then build
    Rebuild(BuildArgs),

    /// Check that the generator and project layout are usable
    ///
    /// Verifies the generator can be started, the content directory and both
    /// settings files exist, and the configuration is valid.
    Check,

    /// Create a page for every collection entry that does not have one yet
    ///
    /// Existing pages are never overwritten.
    Pages(PagesArgs),

    /// Convert the collection CSV into JSON for the site templates
    Project,
}

/// Arguments for the build and rebuild commands
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Use the production settings file
    #[arg(long)]
    pub production: bool,
}

impl BuildArgs {
    pub fn profile(&self) -> Profile {
        Profile::from_flag(self.production)
    }
}

/// Arguments for the serve command
#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Port to serve on
    ///
    /// Defaults to the configured port (8000).
    #[arg(short, long, value_parser = parse_port)]
    pub port: Option<u16>,

    /// Build with the production settings file
    #[arg(long)]
    pub production: bool,

    /// Rebuild and restart the server when content changes
    #[arg(short, long)]
    pub watch: bool,

    /// Change detection strategy for --watch
    #[arg(long, value_enum, value_name = "MODE", requires = "watch")]
    pub watch_mode: Option<WatchMode>,

    /// Poll interval in milliseconds for --watch
    #[arg(long, value_name = "MS", value_parser = parse_interval_ms, requires = "watch")]
    pub interval: Option<u64>,
}

impl ServeArgs {
    pub fn profile(&self) -> Profile {
        Profile::from_flag(self.production)
    }
}

/// Arguments for the pages command
#[derive(Args, Debug, Clone, Default)]
pub struct PagesArgs {
    /// Date written into new pages (YYYY-MM-DD)
    ///
    /// Defaults to `collection.pageDate` from the config, or today.
    #[arg(long, value_name = "DATE")]
    pub date: Option<chrono::NaiveDate>,

    /// Write pages here instead of the configured pages directory
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
}
