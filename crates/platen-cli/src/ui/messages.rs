//! Status message functions for terminal output.

use super::paint;
use owo_colors::Style;

/// Print the tool banner with the action being performed.
///
/// ```no_run
/// use platen_cli::ui::banner;
///
/// banner("serve on port 8000");
/// ```
pub fn banner(action: &str) {
    eprintln!(
        "{} {} {}",
        paint("platen", Style::new().bold().cyan()),
        paint(&format!("v{}", env!("CARGO_PKG_VERSION")), Style::new().dimmed()),
        paint(&format!("· {}", action), Style::new().dimmed())
    );
    eprintln!();
}

/// Print a success message to stderr.
pub fn success(message: &str) {
    eprintln!("{} {}", paint("✓", Style::new().green().bold()), message);
}

/// Print an info message to stderr.
pub fn info(message: &str) {
    eprintln!("{} {}", paint("ℹ", Style::new().blue().bold()), message);
}

/// Print a warning message to stderr.
pub fn warning(message: &str) {
    eprintln!(
        "{} {}",
        paint("⚠", Style::new().yellow().bold()),
        paint(message, Style::new().yellow())
    );
}

/// Print an error message to stderr.
pub fn error(message: &str) {
    eprintln!(
        "{} {}",
        paint("✗", Style::new().red().bold()),
        paint(message, Style::new().red())
    );
}

/// Print the captured output of an external tool, indented and dimmed.
///
/// Empty output prints nothing.
pub fn captured_output(output: &str) {
    let output = output.trim_end();
    if output.is_empty() {
        return;
    }
    for line in output.lines() {
        let dim = Style::new().dimmed();
        eprintln!("  {} {}", paint("│", dim), paint(line, dim));
    }
}
