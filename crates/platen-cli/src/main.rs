//! Platen CLI entry point.
//!
//! Parses arguments, initializes logging and colors, and dispatches to the
//! command implementations. Errors are rendered through miette.

use clap::Parser;
use miette::Result;
use platen_cli::{cli, commands, error, logger, ui};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = cli::Cli::parse();

    // Initialize logging and colors based on global flags
    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    // Convert CLI errors to miette diagnostics for error reporting
    commands::dispatch(args)
        .await
        .map_err(error::cli_error_to_miette)
}
