//! Miette diagnostic conversion for CLI errors.
//!
//! Generator failures carry their captured output, which is far more useful to
//! the user than the exit code, so it is appended to the report.

use crate::error::{BuildError, CliError, ServerError};
use miette::Report;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Build(e) => build_error_to_miette(e),
        CliError::Server(e) => server_error_to_miette(e),
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        _ => miette::miette!("{}", err),
    }
}

/// Convert BuildError to miette Report
pub fn build_error_to_miette(err: BuildError) -> Report {
    match err {
        BuildError::GeneratorFailed {
            program,
            status,
            output,
        } if !output.trim().is_empty() => {
            miette::miette!(
                "Site generator '{}' failed ({})\n\n{}",
                program,
                status,
                output.trim_end()
            )
        }
        _ => miette::miette!("{}", err),
    }
}

/// Convert ServerError to miette Report
pub fn server_error_to_miette(err: ServerError) -> Report {
    match err {
        ServerError::PortInUse { port, suggested } => miette::miette!(
            help = format!("platen serve --port {}", suggested),
            "Port {} is already in use",
            port
        ),
        _ => miette::miette!("{}", err),
    }
}
