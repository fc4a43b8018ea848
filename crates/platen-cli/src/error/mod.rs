//! Error handling for the Platen CLI.
//!
//! This module provides a hierarchical error type system using `thiserror`.
//! Every failure the toolkit can hit falls into one of four families, and each
//! one is caught at the component boundary and turned into an actionable
//! message rather than a crash:
//!
//! - **External tool failure** ([`BuildError::GeneratorFailed`]): the site
//!   generator exited non-zero; the captured output travels with the error.
//! - **Port in use** ([`ServerError::PortInUse`]): the OS refused the bind; the
//!   error carries a suggested alternate port.
//! - **Filesystem errors** ([`BuildError::CleanFailed`], [`CliError::Io`]).
//! - **Unexpected server termination**
//!   ([`ServerError::UnexpectedTermination`]): the background server died
//!   outside of an explicit stop.

mod miette;

pub use self::miette::cli_error_to_miette;

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level CLI error type.
///
/// This is the primary error type returned by commands and by the build and
/// server components. It converts from domain-specific errors via `From`.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration-related errors (invalid values, conflicting options, etc.)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Build process errors (generator failures, cleaning failures, etc.)
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Development server errors
    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    /// Collection pipeline errors (CSV parsing, page writing)
    #[error("Collection error: {0}")]
    Collection(#[from] platen_collection::CollectionError),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File watching errors
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// Another operation is still running
    #[error("Busy: {0}")]
    Busy(String),

    /// Generic errors with custom messages
    #[error("{0}")]
    Custom(String),
}

impl CliError {
    /// Check whether this error is a port conflict.
    pub fn is_port_in_use(&self) -> bool {
        matches!(self, CliError::Server(ServerError::PortInUse { .. }))
    }

    /// Captured generator output, if this is a generator failure.
    pub fn captured_output(&self) -> Option<&str> {
        match self {
            CliError::Build(BuildError::GeneratorFailed { output, .. }) if !output.is_empty() => {
                Some(output)
            }
            _ => None,
        }
    }
}

/// Configuration-specific errors.
///
/// These errors occur during config file loading, parsing, and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file doesn't exist at the expected location
    #[error("Config file not found: {}\n\nHint: Create a platen.config.json file or pass --config <path>", .0.display())]
    NotFound(PathBuf),

    /// Mutually exclusive options were specified
    #[error("Conflicting options: {0}\n\nHint: These options cannot be used together")]
    ConflictingOptions(String),

    /// Missing required configuration field
    #[error("Missing required field: {field}\n\nHint: {hint}")]
    MissingField {
        /// Name of the missing field
        field: String,
        /// Helpful hint for providing the field
        hint: String,
    },

    /// Invalid value for a configuration option
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The invalid value
        value: String,
        /// Helpful hint for correct values
        hint: String,
    },

    /// I/O error while reading config
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
}

/// Build process errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The generator binary could not be spawned
    #[error("Site generator '{program}' could not be started: {source}\n\nHint: Install it (pip install pelican) or set \"generator\" in platen.config.json")]
    GeneratorNotFound {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The generator ran and reported failure
    #[error("Site generator '{program}' failed ({status})")]
    GeneratorFailed {
        program: String,
        /// Exit status description ("exit code 1", "terminated by signal")
        status: String,
        /// Combined stdout/stderr of the run
        output: String,
    },

    /// Settings file for the selected profile is missing
    #[error("Settings file not found: {}\n\nHint: Check 'developmentSettings' / 'productionSettings' in platen.config.json", .0.display())]
    SettingsNotFound(PathBuf),

    /// Removing the output directory failed
    #[error("Failed to clean {}: {source}\n\nHint: Close programs holding files in the output directory", .path.display())]
    CleanFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Development server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The OS refused the bind because the port is taken
    #[error("Port {port} is already in use\n\nHint: Try a different port: platen serve --port {suggested}")]
    PortInUse { port: u16, suggested: u16 },

    /// Binding failed for another reason
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The background server did not confirm startup in time
    #[error("Server on port {port} did not start within {timeout_ms}ms")]
    StartTimeout { port: u16, timeout_ms: u64 },

    /// A session is already running on this manager
    #[error("Server is already running on port {port}")]
    AlreadyRunning { port: u16 },

    /// An operation needed a running server
    #[error("Server is not running\n\nHint: Use 'serve' to start it")]
    NotRunning,

    /// The background server died outside of an explicit stop
    #[error("Server on port {port} stopped unexpectedly: {reason}")]
    UnexpectedTermination { port: u16, reason: String },
}

impl ServerError {
    /// Classify a bind failure.
    pub fn from_bind(addr: SocketAddr, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::AddrInUse {
            ServerError::PortInUse {
                port: addr.port(),
                suggested: addr.port().saturating_add(1),
            }
        } else {
            ServerError::Bind { addr, source }
        }
    }
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_in_use_classification() {
        let addr: SocketAddr = "127.0.0.1:8000".parse().unwrap();
        let err = ServerError::from_bind(
            addr,
            std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use"),
        );
        assert!(matches!(
            err,
            ServerError::PortInUse {
                port: 8000,
                suggested: 8001
            }
        ));

        let cli: CliError = err.into();
        assert!(cli.is_port_in_use());
        assert!(cli.to_string().contains("--port 8001"));
    }

    #[test]
    fn test_other_bind_errors_are_not_port_in_use() {
        let addr: SocketAddr = "127.0.0.1:80".parse().unwrap();
        let err = ServerError::from_bind(
            addr,
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, ServerError::Bind { .. }));
        assert!(!CliError::from(err).is_port_in_use());
    }

    #[test]
    fn test_generator_failed_keeps_output() {
        let err: CliError = BuildError::GeneratorFailed {
            program: "pelican".to_string(),
            status: "exit code 1".to_string(),
            output: "CRITICAL: settings not found".to_string(),
        }
        .into();

        assert!(err.to_string().contains("exit code 1"));
        assert_eq!(err.captured_output(), Some("CRITICAL: settings not found"));
    }

    #[test]
    fn test_generator_failed_empty_output() {
        let err: CliError = BuildError::GeneratorFailed {
            program: "pelican".to_string(),
            status: "exit code 2".to_string(),
            output: String::new(),
        }
        .into();
        assert_eq!(err.captured_output(), None);
    }

    #[test]
    fn test_config_error_invalid_value() {
        let err = ConfigError::InvalidValue {
            field: "port".to_string(),
            value: "0".to_string(),
            hint: "Use a port between 1 and 65535".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Invalid value for 'port'"));
        assert!(msg.contains("Hint: Use a port"));
    }
}
