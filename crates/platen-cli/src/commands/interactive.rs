//! Interactive console, started when `platen` runs without a subcommand.
//!
//! Reads one command per line from stdin and drives a [`Controller`], so the
//! server and watch mode keep running between commands.

use crate::cli::Profile;
use crate::commands::build::{describe_profile, print_report, run_with_spinner};
use crate::commands::clean;
use crate::commands::utils::Workspace;
use crate::dev::{Controller, LogSink, StopOutcome};
use crate::error::{CliError, Result};
use crate::ui;
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;

/// How often the console checks on the server and watch mode.
const TICK_INTERVAL: Duration = Duration::from_secs(1);

const HELP: &str = "\
Commands:
  build [prod]              generate the site
  rebuild [prod]            clean, then generate
  clean                     remove the output directory
  serve [PORT] [prod]       serve the output directory
  serve-watch [PORT] [prod] serve and rebuild on content changes
  refresh [prod]            stop, rebuild, and restart on the same port (alias: r)
  stop                      stop the server and watch mode
  status                    show server and build state
  help                      show this list
  exit | quit               stop everything and leave";

/// One parsed console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractiveCommand {
    Build(Profile),
    Rebuild(Profile),
    Clean,
    Serve { port: Option<u16>, profile: Profile },
    ServeWatch { port: Option<u16>, profile: Profile },
    Refresh(Option<Profile>),
    Stop,
    Status,
    Help,
    Exit,
}

/// Why a console line was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCommandError(String);

impl fmt::Display for ParseCommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ParseCommandError {}

/// Trailing arguments: an optional port and an optional production flag.
#[derive(Default)]
struct Options {
    port: Option<u16>,
    production: bool,
}

fn parse_options<'a>(
    command: &str,
    args: impl Iterator<Item = &'a str>,
    allow_port: bool,
) -> std::result::Result<Options, ParseCommandError> {
    let mut options = Options::default();
    for arg in args {
        match arg {
            "prod" | "production" | "--production" => options.production = true,
            _ if allow_port && options.port.is_none() => {
                let port = arg
                    .parse::<u16>()
                    .ok()
                    .filter(|port| *port != 0)
                    .ok_or_else(|| {
                        ParseCommandError(format!("'{}' is not a valid port", arg))
                    })?;
                options.port = Some(port);
            }
            _ => {
                return Err(ParseCommandError(format!(
                    "unexpected argument '{}' for {}",
                    arg, command
                )));
            }
        }
    }
    Ok(options)
}

fn no_args<'a>(
    command: &str,
    mut args: impl Iterator<Item = &'a str>,
    parsed: InteractiveCommand,
) -> std::result::Result<InteractiveCommand, ParseCommandError> {
    match args.next() {
        None => Ok(parsed),
        Some(extra) => Err(ParseCommandError(format!(
            "{} takes no arguments (got '{}')",
            command, extra
        ))),
    }
}

impl FromStr for InteractiveCommand {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Err(ParseCommandError("empty command".to_string()));
        };
        let command = command.to_ascii_lowercase();

        match command.as_str() {
            "build" | "b" => {
                let options = parse_options(&command, words, false)?;
                Ok(InteractiveCommand::Build(Profile::from_flag(options.production)))
            }
            "rebuild" => {
                let options = parse_options(&command, words, false)?;
                Ok(InteractiveCommand::Rebuild(Profile::from_flag(options.production)))
            }
            "serve" | "s" => {
                let options = parse_options(&command, words, true)?;
                Ok(InteractiveCommand::Serve {
                    port: options.port,
                    profile: Profile::from_flag(options.production),
                })
            }
            "serve-watch" | "watch" | "w" => {
                let options = parse_options(&command, words, true)?;
                Ok(InteractiveCommand::ServeWatch {
                    port: options.port,
                    profile: Profile::from_flag(options.production),
                })
            }
            "refresh" | "r" => {
                let options = parse_options(&command, words, false)?;
                Ok(InteractiveCommand::Refresh(
                    options.production.then_some(Profile::Production),
                ))
            }
            "clean" => no_args(&command, words, InteractiveCommand::Clean),
            "stop" => no_args(&command, words, InteractiveCommand::Stop),
            "status" => no_args(&command, words, InteractiveCommand::Status),
            "help" | "?" | "h" => no_args(&command, words, InteractiveCommand::Help),
            "exit" | "quit" | "q" => no_args(&command, words, InteractiveCommand::Exit),
            other => Err(ParseCommandError(format!(
                "unknown command '{}' (type 'help')",
                other
            ))),
        }
    }
}

/// Console state between lines.
struct Console<'a> {
    workspace: &'a Workspace,
    controller: Controller,
    /// Profile of the current (or last) server session
    serving: Profile,
}

impl Console<'_> {
    /// Run one command. Returns `false` on exit.
    async fn handle(&mut self, command: InteractiveCommand) -> bool {
        let result = match command {
            InteractiveCommand::Build(profile) => self.build(profile, false).await,
            InteractiveCommand::Rebuild(profile) => self.build(profile, true).await,
            InteractiveCommand::Clean => self
                .controller
                .clean()
                .await
                .map(|outcome| clean::report(outcome, self.workspace)),
            InteractiveCommand::Serve { port, profile } => {
                self.serving = profile;
                self.controller.serve(port, profile).await.map(|_| ())
            }
            InteractiveCommand::ServeWatch { port, profile } => {
                self.serving = profile;
                self.controller
                    .serve_watch(port, profile)
                    .await
                    .map(|_| ui::info("Watching content for changes"))
            }
            InteractiveCommand::Refresh(profile) => {
                let profile = profile.unwrap_or(self.serving);
                self.controller.refresh(profile).await.map(|_| ())
            }
            InteractiveCommand::Stop => {
                if self.controller.stop().await == StopOutcome::NotRunning {
                    ui::info("Server is not running");
                }
                Ok(())
            }
            InteractiveCommand::Status => {
                self.print_status();
                Ok(())
            }
            InteractiveCommand::Help => {
                eprintln!("{}", HELP);
                Ok(())
            }
            InteractiveCommand::Exit => return false,
        };

        if let Err(e) = result {
            report_error(&e);
        }
        true
    }

    async fn build(&self, profile: Profile, clean_first: bool) -> Result<()> {
        let builder = self.controller.manager().builder();
        ui::info(&format!("Building with {}", describe_profile(profile)));
        let report = if clean_first {
            run_with_spinner(builder, "Cleaning and generating site", self.controller.rebuild(profile))
                .await?
        } else {
            run_with_spinner(builder, "Generating site", self.controller.build(profile)).await?
        };
        print_report(&report, self.workspace);
        Ok(())
    }

    fn print_status(&self) {
        let status = self.controller.status();
        match status.server.url() {
            Some(url) if status.server.is_running() => {
                ui::info(&format!("Server: running at {} ({})", url, self.serving))
            }
            _ => ui::info(&format!("Server: {}", status.server.phase)),
        }
        ui::info(&format!(
            "Watch mode: {}",
            if status.watching { "on" } else { "off" }
        ));
        if status.building {
            ui::info("A build is in progress");
        }
    }
}

/// Print an error the way the one-shot commands would, without exiting.
fn report_error(error: &CliError) {
    ui::error(&error.to_string());
    if let Some(output) = error.captured_output() {
        ui::captured_output(output);
    }
    if let CliError::Server(crate::error::ServerError::PortInUse { suggested, .. }) = error {
        ui::info(&format!("Try: serve {}", suggested));
    }
}

fn prompt() {
    eprint!("platen> ");
    let _ = std::io::stderr().flush();
}

/// Execute the interactive console.
pub async fn execute(workspace: &Workspace) -> Result<()> {
    ui::banner("interactive");
    eprintln!("Type 'help' for commands, 'exit' to quit.");

    let mut console = Console {
        workspace,
        controller: Controller::new(
            &workspace.config,
            workspace.builder(),
            LogSink::new(ui::info),
        ),
        serving: Profile::Development,
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(TICK_INTERVAL);
    ticker.tick().await;

    prompt();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    // End of input
                    Ok(None) => break,
                    Err(e) => {
                        console.controller.shutdown().await;
                        return Err(e.into());
                    }
                };
                if !line.trim().is_empty() {
                    match line.parse::<InteractiveCommand>() {
                        Ok(command) => {
                            if !console.handle(command).await {
                                break;
                            }
                        }
                        Err(e) => ui::warning(&e.to_string()),
                    }
                }
                prompt();
            }
            _ = signal::ctrl_c() => {
                eprintln!();
                break;
            }
            _ = ticker.tick() => {
                for notice in console.controller.tick().await {
                    eprintln!();
                    ui::warning(&notice);
                    prompt();
                }
            }
        }
    }

    console.controller.shutdown().await;
    ui::success("Goodbye");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> std::result::Result<InteractiveCommand, ParseCommandError> {
        line.parse()
    }

    #[test]
    fn test_parse_build_commands() {
        assert_eq!(
            parse("build").unwrap(),
            InteractiveCommand::Build(Profile::Development)
        );
        assert_eq!(
            parse("BUILD prod").unwrap(),
            InteractiveCommand::Build(Profile::Production)
        );
        assert_eq!(
            parse("rebuild --production").unwrap(),
            InteractiveCommand::Rebuild(Profile::Production)
        );
        assert!(parse("build 8000").is_err());
    }

    #[test]
    fn test_parse_serve_commands() {
        assert_eq!(
            parse("serve").unwrap(),
            InteractiveCommand::Serve {
                port: None,
                profile: Profile::Development
            }
        );
        assert_eq!(
            parse("serve 9000 prod").unwrap(),
            InteractiveCommand::Serve {
                port: Some(9000),
                profile: Profile::Production
            }
        );
        assert_eq!(
            parse("serve-watch 8080").unwrap(),
            InteractiveCommand::ServeWatch {
                port: Some(8080),
                profile: Profile::Development
            }
        );
        assert!(parse("serve 0").is_err());
        assert!(parse("serve abc").is_err());
        assert!(parse("serve 8000 9000").is_err());
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse("  stop ").unwrap(), InteractiveCommand::Stop);
        assert_eq!(parse("status").unwrap(), InteractiveCommand::Status);
        assert_eq!(parse("clean").unwrap(), InteractiveCommand::Clean);
        assert_eq!(parse("r").unwrap(), InteractiveCommand::Refresh(None));
        assert_eq!(
            parse("refresh prod").unwrap(),
            InteractiveCommand::Refresh(Some(Profile::Production))
        );
        assert_eq!(parse("exit").unwrap(), InteractiveCommand::Exit);
        assert_eq!(parse("quit").unwrap(), InteractiveCommand::Exit);
        assert_eq!(parse("?").unwrap(), InteractiveCommand::Help);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse("").is_err());
        assert!(parse("deploy").is_err());
        assert!(parse("stop now").is_err());
        let error = parse("frobnicate").unwrap_err();
        assert!(error.to_string().contains("unknown command 'frobnicate'"));
    }
}
