//! Command-line interface definition for Platen.
//!
//! # Command Structure
//!
//! - `platen build [--production]` - generate the site
//! - `platen serve [--port N] [--production] [--watch]` - preview locally
//! - `platen clean` / `platen rebuild` - remove output, or remove and build
//! - `platen check` - pre-flight checks
//! - `platen pages` / `platen project` - collection pipeline
//! - `platen` with no subcommand - interactive console

mod commands;
pub mod enums;
mod validation;

use clap::Parser;
use std::path::PathBuf;

pub use commands::{BuildArgs, Command, PagesArgs, ServeArgs};
pub use enums::*;
pub use validation::{parse_interval_ms, parse_port};

/// Platen - build, clean, and serve a Pelican site
#[derive(Parser, Debug)]
#[command(
    name = "platen",
    version,
    about = "Build, clean, and serve a Pelican site with auto-rebuild",
    long_about = "Platen drives an external static site generator (Pelican by default).\n\
                  It builds, cleans, and serves the generated site, rebuilds on content\n\
                  changes, and turns the typewriter collection CSV into JSON and pages.\n\n\
                  Run without a subcommand for an interactive console."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Project directory (defaults to the current directory)
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Path to platen.config.json
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute; omit for the interactive console
    #[command(subcommand)]
    pub command: Option<Command>,
}
