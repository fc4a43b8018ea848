//! Terminal UI utilities for status lines, spinners, and summaries.
//!
//! Everything here writes to stderr so stdout stays free for piping. Colors
//! degrade gracefully when the terminal doesn't support them.
//!
//! # Examples
//!
//! ```no_run
//! use platen_cli::ui;
//!
//! ui::init_colors(false);
//! ui::banner("build");
//!
//! let spinner = ui::Spinner::new("Running pelican...");
//! spinner.finish("Site generated");
//!
//! ui::success("Build complete");
//! ui::error("Failed to clean output directory");
//! ```

mod format;
mod messages;
mod spinner;

pub use format::{format_duration, format_size, print_site_summary};
pub use messages::{banner, captured_output, error, info, success, warning};
pub use spinner::Spinner;

use owo_colors::{OwoColorize, Style};

/// Check if running in a CI environment.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
}

/// Check if color output should be enabled.
///
/// Respects NO_COLOR and FORCE_COLOR environment variables, falls back to
/// terminal capability detection.
pub fn should_use_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    console::user_attended_stderr()
}

/// Initialize color support based on environment and the `--no-color` flag.
///
/// Should be called early in `main`.
pub fn init_colors(no_color: bool) {
    console::set_colors_enabled_stderr(!no_color && should_use_color());
}

/// Style `text` for stderr, or leave it plain when colors are off.
pub(crate) fn paint(text: &str, style: Style) -> String {
    if console::colors_enabled_stderr() {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

/// Whether animated output (spinners) makes sense here.
pub(crate) fn is_interactive() -> bool {
    !is_ci() && console::user_attended_stderr()
}
