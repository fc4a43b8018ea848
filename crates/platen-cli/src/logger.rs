//! Logging infrastructure for the Platen CLI.
//!
//! Structured logging via the `tracing` ecosystem. User-facing status lines go
//! through [`crate::ui`]; this module only configures the subscriber that
//! receives `tracing` events from the CLI and the collection crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use platen_cli::logger::init_logger;
//! use tracing::{debug, info};
//!
//! init_logger(false, false, false);
//!
//! info!("Starting build");
//! debug!(port = 8000, "binding");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "platen=debug,platen_cli=debug,platen_collection=debug";
const QUIET_FILTER: &str = "platen=error,platen_cli=error,platen_collection=error";
const DEFAULT_FILTER: &str = "platen=info,platen_cli=info,platen_collection=info";

/// Build the filter for the given verbosity flags.
///
/// Order of precedence:
/// 1. `--verbose`: DEBUG for platen crates
/// 2. `--quiet`: ERROR only
/// 3. `RUST_LOG`
/// 4. INFO for platen crates
pub fn build_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Initialize the tracing subscriber.
///
/// Call once at the start of the program, before any logging occurs. A second
/// call is ignored rather than panicking, so tests can call it freely.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && should_use_colors())
        .with_writer(std::io::stderr)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(build_filter(verbose, quiet))
        .with(fmt_layer)
        .try_init();
}

/// Check if colored log output should be enabled.
///
/// `NO_COLOR` disables colors, `FORCE_COLOR` forces them; otherwise the
/// terminal capabilities of stderr decide.
pub fn should_use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    console::Term::stderr().features().colors_supported()
}
