//! The external site generator, behind a trait.
//!
//! The generator is opaque: it gets a content directory, a settings file and
//! an output directory, and either succeeds or fails with some output.

use crate::error::{BuildError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;

/// One generator invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    /// Working directory for the generator process (the project root)
    pub cwd: PathBuf,
    pub content_dir: PathBuf,
    pub settings: PathBuf,
    pub output_dir: PathBuf,
}

/// Something that can turn a content tree into a site.
#[async_trait]
pub trait SiteGenerator: Send + Sync {
    /// Short name used in messages ("pelican").
    fn name(&self) -> &str;

    /// Generate the site, returning the tool's captured output on success.
    async fn generate(&self, request: &GenerateRequest) -> Result<String>;

    /// Report the tool's version, proving it can be started.
    async fn version(&self) -> Result<String>;
}

/// Runs the generator as a child process.
///
/// Invoked as `<program> [leading args] <content> -s <settings> -o <output>`.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: String,
    leading_args: Vec<String>,
}

impl CommandGenerator {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    /// Split a configured command such as `"python -m pelican"` on whitespace.
    pub fn from_command_line(command: &str) -> Self {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next().unwrap_or_default();
        Self {
            program,
            leading_args: parts.collect(),
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.leading_args)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        cmd
    }

    fn not_found(&self, source: std::io::Error) -> BuildError {
        BuildError::GeneratorNotFound {
            program: self.program.clone(),
            source,
        }
    }
}

#[async_trait]
impl SiteGenerator for CommandGenerator {
    fn name(&self) -> &str {
        &self.program
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String> {
        let mut cmd = self.command();
        cmd.current_dir(&request.cwd)
            .arg(&request.content_dir)
            .arg("-s")
            .arg(&request.settings)
            .arg("-o")
            .arg(&request.output_dir);

        tracing::debug!(program = %self.program, ?request, "running site generator");

        let output = cmd.output().await.map_err(|e| self.not_found(e))?;
        let combined = combine_output(&output.stdout, &output.stderr);

        if output.status.success() {
            Ok(combined)
        } else {
            Err(BuildError::GeneratorFailed {
                program: self.program.clone(),
                status: describe_status(output.status),
                output: combined,
            }
            .into())
        }
    }

    async fn version(&self) -> Result<String> {
        let output = self
            .command()
            .arg("--version")
            .output()
            .await
            .map_err(|e| self.not_found(e))?;
        let combined = combine_output(&output.stdout, &output.stderr);

        if output.status.success() {
            Ok(combined.trim().to_string())
        } else {
            Err(BuildError::GeneratorFailed {
                program: self.program.clone(),
                status: describe_status(output.status),
                output: combined,
            }
            .into())
        }
    }
}

fn combine_output(stdout: &[u8], stderr: &[u8]) -> String {
    let mut combined = String::from_utf8_lossy(stdout).into_owned();
    let stderr = String::from_utf8_lossy(stderr);
    if !stderr.trim().is_empty() {
        if !combined.is_empty() && !combined.ends_with('\n') {
            combined.push('\n');
        }
        combined.push_str(&stderr);
    }
    combined
}

fn describe_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}
