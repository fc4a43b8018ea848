//! Spinner for tasks without known duration, such as a generator run.

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::Style;
use std::time::Duration;

/// Simple spinner for tasks without known duration.
///
/// Falls back to plain status lines when stderr is not a terminal or when
/// running in CI, so logs stay readable.
///
/// ```no_run
/// use platen_cli::ui::Spinner;
///
/// let spinner = Spinner::new("Running pelican...");
/// spinner.finish("Site generated");
/// ```
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    /// Create and start a new spinner.
    pub fn new(message: &str) -> Self {
        let pb = if super::is_interactive() {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
                pb.set_style(style.tick_strings(&["◐", "◓", "◑", "◒", "●"]));
            }
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        } else {
            ProgressBar::hidden()
        };
        pb.set_message(message.to_string());

        Self { pb }
    }

    /// Update spinner message while it's running.
    pub fn set_message(&self, message: &str) {
        self.pb.set_message(message.to_string());
    }

    /// Finish spinner with a green checkmark.
    pub fn finish(&self, message: &str) {
        if self.pb.is_hidden() {
            super::success(message);
        } else {
            self.pb
                .finish_with_message(format!("{} {}", super::paint("✓", Style::new().green()), message));
        }
    }

    /// Finish spinner with a red X.
    pub fn fail(&self, message: &str) {
        if self.pb.is_hidden() {
            super::error(message);
        } else {
            self.pb
                .finish_with_message(format!("{} {}", super::paint("✗", Style::new().red()), message));
        }
    }
}
