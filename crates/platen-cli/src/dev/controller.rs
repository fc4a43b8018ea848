//! Headless controller for interactive front ends.
//!
//! Wraps the builder, the server manager, and an optional background watch
//! loop behind the small set of actions a console or a GUI exposes: build,
//! rebuild, clean, serve, serve with watch, stop, refresh, and status.

use crate::cli::{Profile, WatchMode};
use crate::config::PlatenConfig;
use crate::dev::builder::{BuildReport, CleanOutcome, SiteBuilder};
use crate::dev::manager::ServerManager;
use crate::dev::reload::{ChangeSource, RefreshHandle, WatchLoop, WatchSummary};
use crate::dev::state::{LogSink, ServerStatus, StopOutcome};
use crate::error::{CliError, Result, ServerError};
use parking_lot::Mutex;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Debounce for native watch events.
const WATCH_DEBOUNCE: Duration = Duration::from_millis(100);

struct WatchHandle {
    stop: oneshot::Sender<()>,
    refresh: RefreshHandle,
    task: JoinHandle<Result<WatchSummary>>,
}

/// Snapshot for a status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerStatus {
    pub server: ServerStatus,
    pub building: bool,
    pub watching: bool,
}

pub struct Controller {
    manager: Arc<ServerManager>,
    builder: Arc<SiteBuilder>,
    default_port: u16,
    poll_interval: Duration,
    watch_mode: WatchMode,
    watch: Mutex<Option<WatchHandle>>,
}

impl Controller {
    pub fn new(config: &PlatenConfig, builder: Arc<SiteBuilder>, sink: LogSink) -> Self {
        let manager = ServerManager::new(config.host, Arc::clone(&builder)).with_sink(sink);
        Self::with_manager(config, Arc::new(manager))
    }

    /// Use an existing manager (and its builder).
    pub fn with_manager(config: &PlatenConfig, manager: Arc<ServerManager>) -> Self {
        Self {
            builder: Arc::clone(manager.builder()),
            manager,
            default_port: config.port,
            poll_interval: config.poll_interval(),
            watch_mode: config.watch_mode,
            watch: Mutex::new(None),
        }
    }

    pub fn manager(&self) -> &Arc<ServerManager> {
        &self.manager
    }

    pub async fn build(&self, profile: Profile) -> Result<BuildReport> {
        self.builder.build(profile).await
    }

    pub async fn rebuild(&self, profile: Profile) -> Result<BuildReport> {
        self.builder.rebuild(profile).await
    }

    pub async fn clean(&self) -> Result<CleanOutcome> {
        self.builder.clean().await
    }

    /// Start serving the output directory.
    pub async fn serve(&self, port: Option<u16>, profile: Profile) -> Result<SocketAddr> {
        let output = self.builder.paths().output_dir.clone();
        self.manager
            .start(port.unwrap_or(self.default_port), &output, profile)
            .await
    }

    /// Start serving, and rebuild/restart in the background on content changes.
    pub async fn serve_watch(&self, port: Option<u16>, profile: Profile) -> Result<SocketAddr> {
        if self.is_watching() {
            return Err(CliError::Busy("watch mode is already active".to_string()));
        }

        let source = match self.watch_mode {
            WatchMode::Poll => ChangeSource::poll(self.poll_interval),
            WatchMode::Events => {
                let paths = self.builder.paths();
                ChangeSource::events(
                    &paths.content_dir,
                    vec![paths.collection_json.clone()],
                    WATCH_DEBOUNCE,
                )?
            }
        };

        let addr = self.serve(port, profile).await?;

        let (stop, stopped) = oneshot::channel::<()>();
        let mut watch_loop =
            WatchLoop::new(Arc::clone(&self.manager), profile, addr.port(), source);
        let refresh = watch_loop.refresh_handle();
        let task = tokio::spawn(watch_loop.run(async {
            let _ = stopped.await;
        }));

        *self.watch.lock() = Some(WatchHandle {
            stop,
            refresh,
            task,
        });
        Ok(addr)
    }

    /// Stop watch mode (if active) and the server.
    pub async fn stop(&self) -> StopOutcome {
        if let Some(summary) = self.stop_watch().await {
            tracing::debug!(rebuilds = summary.rebuilds, "watch mode ended");
        }
        self.manager.stop().await
    }

    /// Stop, rebuild, and restart on the same port.
    ///
    /// Rejected when nothing is being served or a build is already running.
    /// In watch mode the watch loop runs the cycle, so it keeps watching.
    pub async fn refresh(&self, profile: Profile) -> Result<SocketAddr> {
        let status = self.manager.status();
        let Some(addr) = status.addr.filter(|_| status.is_running()) else {
            return Err(ServerError::NotRunning.into());
        };
        if self.builder.is_busy() {
            return Err(CliError::Busy("a build is already in progress".to_string()));
        }

        let watching = self
            .watch
            .lock()
            .as_ref()
            .filter(|w| !w.task.is_finished())
            .map(|w| w.refresh.clone());
        if let Some(handle) = watching {
            if let Some(result) = handle.refresh(profile).await {
                return result;
            }
        }

        let output = self.builder.paths().output_dir.clone();
        self.manager.stop().await;
        self.builder.rebuild(profile).await?;
        self.manager.start(addr.port(), &output, profile).await
    }

    pub fn status(&self) -> ControllerStatus {
        ControllerStatus {
            server: self.manager.status(),
            building: self.builder.is_busy(),
            watching: self.is_watching(),
        }
    }

    /// Periodic check. Reports, once each, an unexpected server stop and the
    /// end of a watch loop that stopped on its own.
    pub async fn tick(&self) -> Vec<String> {
        let mut notices = Vec::new();

        let finished = {
            let mut watch = self.watch.lock();
            if watch.as_ref().is_some_and(|w| w.task.is_finished()) {
                watch.take()
            } else {
                None
            }
        };
        if let Some(handle) = finished {
            match handle.task.await {
                Ok(Ok(summary)) => notices.push(format!(
                    "Watch mode ended after {} rebuild(s)",
                    summary.rebuilds
                )),
                Ok(Err(e)) => notices.push(format!("Watch mode stopped: {}", e)),
                Err(e) => notices.push(format!("Watch mode stopped: {}", e)),
            }
        }

        if let Some(error) = self.manager.take_unexpected_stop() {
            notices.push(error.to_string());
        }

        notices
    }

    /// Stop everything with the log sink muted.
    pub async fn shutdown(&self) -> StopOutcome {
        let _mute = self.manager.sink().mute();
        self.stop_watch().await;
        self.manager.stop().await
    }

    fn is_watching(&self) -> bool {
        self.watch
            .lock()
            .as_ref()
            .is_some_and(|w| !w.task.is_finished())
    }

    async fn stop_watch(&self) -> Option<WatchSummary> {
        let handle = self.watch.lock().take()?;
        let _ = handle.stop.send(());
        match handle.task.await {
            Ok(Ok(summary)) => Some(summary),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "watch mode had stopped with an error");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "watch task failed");
                None
            }
        }
    }
}
