//! Serve command implementation.
//!
//! Serves the output directory until interrupted, building it first when it
//! doesn't exist yet. With `--watch`, content changes trigger stop → rebuild
//! → restart on the same port.

use crate::cli::{Profile, ServeArgs, WatchMode};
use crate::commands::utils::Workspace;
use crate::dev::{ChangeSource, LogSink, ServerManager, WatchLoop};
use crate::error::{Result, ServerError};
use crate::ui;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;

/// Debounce for native watch events.
const WATCH_DEBOUNCE: Duration = Duration::from_millis(100);

/// How often a plain (non-watch) session checks that the server is alive.
const LIVENESS_INTERVAL: Duration = Duration::from_secs(1);

/// Execute the serve command.
///
/// Returns `Ok` when stopped with Ctrl+C.
///
/// # Errors
///
/// Port conflicts (with a suggested alternative), failed builds, and a server
/// that stops on its own.
pub async fn execute(args: ServeArgs, workspace: &Workspace) -> Result<()> {
    let profile = args.profile();
    let port = workspace.config.port;
    ui::banner(&if args.watch {
        format!("serve on port {} with watch ({})", port, profile)
    } else {
        format!("serve on port {} ({})", port, profile)
    });

    let manager = Arc::new(
        ServerManager::new(workspace.config.host, workspace.builder())
            .with_sink(LogSink::new(ui::info)),
    );

    let addr = match manager
        .start(port, &workspace.paths.output_dir, profile)
        .await
    {
        Ok(addr) => addr,
        Err(e) => {
            ui::error("Could not start the preview server");
            return Err(e);
        }
    };
    ui::info("Press Ctrl+C to stop");

    if args.watch {
        watch(&manager, workspace, profile, addr.port()).await
    } else {
        serve_until_interrupted(&manager, addr.port()).await
    }
}

async fn watch(
    manager: &Arc<ServerManager>,
    workspace: &Workspace,
    profile: Profile,
    port: u16,
) -> Result<()> {
    let source = match workspace.config.watch_mode {
        WatchMode::Poll => ChangeSource::poll(workspace.config.poll_interval()),
        WatchMode::Events => ChangeSource::events(
            &workspace.paths.content_dir,
            vec![workspace.paths.collection_json.clone()],
            WATCH_DEBOUNCE,
        )?,
    };

    let watch_loop = WatchLoop::new(Arc::clone(manager), profile, port, source);
    let shutdown = async {
        let _ = signal::ctrl_c().await;
    };

    match watch_loop.run(shutdown).await {
        Ok(summary) => {
            ui::success(&format!(
                "Stopped after {} rebuild(s)",
                summary.rebuilds
            ));
            Ok(())
        }
        Err(e) => {
            manager.shutdown().await;
            ui::error("Watch mode stopped");
            Err(e)
        }
    }
}

async fn serve_until_interrupted(manager: &ServerManager, port: u16) -> Result<()> {
    let mut liveness = tokio::time::interval(LIVENESS_INTERVAL);
    liveness.tick().await;

    let interrupted = signal::ctrl_c();
    tokio::pin!(interrupted);

    loop {
        tokio::select! {
            _ = &mut interrupted => {
                manager.stop().await;
                ui::success("Stopped");
                return Ok(());
            }
            _ = liveness.tick() => {
                if !manager.is_running() {
                    let error = manager.take_unexpected_stop().unwrap_or(
                        ServerError::UnexpectedTermination {
                            port,
                            reason: "the server is no longer running".to_string(),
                        },
                    );
                    return Err(error.into());
                }
            }
        }
    }
}
