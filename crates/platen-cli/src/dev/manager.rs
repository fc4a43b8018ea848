//! Preview server lifecycle manager.
//!
//! A [`ServerManager`] owns at most one background server session. Two locks
//! are involved:
//!
//! - the lifecycle lock (async) serializes `start` and `stop` as a whole,
//!   including their bounded waits;
//! - the state lock (sync) guards the phase and session and is only held for
//!   short, non-awaiting sections.
//!
//! A session whose background task dies on its own is noticed lazily, the
//! next time anyone asks for the status.

use crate::cli::Profile;
use crate::dev::builder::SiteBuilder;
use crate::dev::server;
use crate::dev::state::{LogSink, Phase, ServerStatus, StopOutcome};
use crate::error::{CliError, Result, ServerError};
use parking_lot::Mutex;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// How long `start` waits for the server to confirm it is listening.
pub const START_TIMEOUT: Duration = Duration::from_millis(500);

/// How long `stop` waits for a graceful shutdown before aborting.
pub const STOP_TIMEOUT: Duration = Duration::from_secs(2);

struct Session {
    addr: SocketAddr,
    root: PathBuf,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<io::Result<()>>,
}

#[derive(Default)]
struct Inner {
    phase: Phase,
    session: Option<Session>,
    unexpected: Option<ServerError>,
}

/// Starts, stops, and supervises the preview server.
pub struct ServerManager {
    host: IpAddr,
    builder: Arc<SiteBuilder>,
    state: Mutex<Inner>,
    lifecycle: tokio::sync::Mutex<()>,
    sink: LogSink,
    start_timeout: Duration,
    stop_timeout: Duration,
}

impl ServerManager {
    /// `builder` is used when asked to serve a directory that does not exist yet.
    pub fn new(host: IpAddr, builder: Arc<SiteBuilder>) -> Self {
        Self {
            host,
            builder,
            state: Mutex::new(Inner::default()),
            lifecycle: tokio::sync::Mutex::new(()),
            sink: LogSink::discard(),
            start_timeout: START_TIMEOUT,
            stop_timeout: STOP_TIMEOUT,
        }
    }

    pub fn with_sink(mut self, sink: LogSink) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_timeouts(mut self, start: Duration, stop: Duration) -> Self {
        self.start_timeout = start;
        self.stop_timeout = stop;
        self
    }

    pub fn sink(&self) -> &LogSink {
        &self.sink
    }

    pub fn builder(&self) -> &Arc<SiteBuilder> {
        &self.builder
    }

    /// Serve `root` on `port`. A missing output directory is built first; any
    /// other missing `root` is [`CliError::FileNotFound`].
    ///
    /// Returns the bound address once the server is listening. Port 0 binds an
    /// ephemeral port.
    pub async fn start(&self, port: u16, root: &Path, profile: Profile) -> Result<SocketAddr> {
        let _lifecycle = self.lifecycle.lock().await;

        let reaped = {
            let mut inner = self.state.lock();
            let reaped = reap(&mut inner);
            if let Some(session) = inner.session.as_ref() {
                return Err(ServerError::AlreadyRunning {
                    port: session.addr.port(),
                }
                .into());
            }
            inner.phase = Phase::Starting;
            reaped
        };
        if let Some(message) = reaped {
            self.sink.emit(&message);
        }

        if !root.exists() {
            // The builder can only produce its own output directory
            if root != self.builder.paths().output_dir {
                self.set_phase(Phase::Stopped);
                return Err(CliError::FileNotFound(root.to_path_buf()));
            }
            self.sink.emit(&format!(
                "{} does not exist yet; building first",
                root.display()
            ));
            if let Err(e) = self.builder.build(profile).await {
                self.set_phase(Phase::Stopped);
                return Err(e);
            }
        }

        let addr = SocketAddr::new(self.host, port);
        let (ready_tx, ready_rx) = oneshot::channel::<io::Result<SocketAddr>>();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let serve_root = root.to_path_buf();

        let mut task = tokio::spawn(async move {
            let listener = match TcpListener::bind(addr).await {
                Ok(listener) => listener,
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return Ok(());
                }
            };
            let local = listener.local_addr();
            let bound = local.is_ok();
            let _ = ready_tx.send(local);
            if !bound {
                return Ok(());
            }
            server::serve(listener, &serve_root, shutdown_rx).await
        });

        let bound = match tokio::time::timeout(self.start_timeout, ready_rx).await {
            Ok(Ok(Ok(bound))) if !task.is_finished() => bound,
            Ok(Ok(Ok(bound))) => {
                return Err(self.startup_failed(ServerError::UnexpectedTermination {
                    port: bound.port(),
                    reason: "exited right after binding".to_string(),
                }));
            }
            Ok(Ok(Err(e))) => {
                let _ = (&mut task).await;
                return Err(self.startup_failed(ServerError::from_bind(addr, e)));
            }
            Ok(Err(_)) => {
                let _ = (&mut task).await;
                return Err(self.startup_failed(ServerError::UnexpectedTermination {
                    port,
                    reason: "exited during startup".to_string(),
                }));
            }
            Err(_) => {
                task.abort();
                let _ = (&mut task).await;
                return Err(self.startup_failed(ServerError::StartTimeout {
                    port,
                    timeout_ms: self.start_timeout.as_millis() as u64,
                }));
            }
        };

        {
            let mut inner = self.state.lock();
            inner.session = Some(Session {
                addr: bound,
                root: root.to_path_buf(),
                shutdown: Some(shutdown_tx),
                task,
            });
            inner.phase = Phase::Running;
            inner.unexpected = None;
        }

        tracing::info!(%bound, root = %root.display(), "server started");
        self.sink.emit(&format!(
            "Serving {} at http://{}/",
            root.display(),
            bound
        ));
        Ok(bound)
    }

    /// Stop the server. Safe to call when nothing is running.
    ///
    /// Waits up to the stop timeout for a graceful shutdown, then aborts the
    /// server task. Either way the socket is closed on return.
    pub async fn stop(&self) -> StopOutcome {
        let _lifecycle = self.lifecycle.lock().await;

        let session = {
            let mut inner = self.state.lock();
            let session = inner.session.take();
            inner.phase = if session.is_some() {
                Phase::Stopping
            } else {
                Phase::Stopped
            };
            session
        };

        let Some(session) = session else {
            return StopOutcome::NotRunning;
        };

        let port = session.addr.port();
        let outcome = self.shutdown_session(session).await;
        self.set_phase(Phase::Stopped);

        match outcome {
            StopOutcome::Forced => {
                tracing::warn!(port, "server did not stop in time; aborted");
                self.sink
                    .emit(&format!("Server on port {} aborted after timeout", port));
            }
            _ => {
                tracing::info!(port, "server stopped");
                self.sink.emit(&format!("Server on port {} stopped", port));
            }
        }
        outcome
    }

    /// Stop with the log sink muted, restoring it afterwards.
    pub async fn shutdown(&self) -> StopOutcome {
        let _mute = self.sink.mute();
        self.stop().await
    }

    /// Whether a session is running. Notices a silently dead server.
    pub fn is_running(&self) -> bool {
        self.status().is_running()
    }

    pub fn status(&self) -> ServerStatus {
        let (status, reaped) = {
            let mut inner = self.state.lock();
            let reaped = reap(&mut inner);
            let status = ServerStatus {
                phase: inner.phase,
                addr: inner.session.as_ref().map(|s| s.addr),
                root: inner.session.as_ref().map(|s| s.root.clone()),
            };
            (status, reaped)
        };
        if let Some(message) = reaped {
            self.sink.emit(&message);
        }
        status
    }

    /// The unexpected stop noticed since the last call, if any.
    pub fn take_unexpected_stop(&self) -> Option<ServerError> {
        let _ = self.status();
        self.state.lock().unexpected.take()
    }

    async fn shutdown_session(&self, mut session: Session) -> StopOutcome {
        if let Some(tx) = session.shutdown.take() {
            // Fails if the task already ended on its own
            let _ = tx.send(());
        }

        match tokio::time::timeout(self.stop_timeout, &mut session.task).await {
            Ok(Ok(Ok(()))) => StopOutcome::Clean,
            Ok(Ok(Err(e))) => {
                tracing::warn!(error = %e, "server exited with an error");
                StopOutcome::Clean
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "server task did not finish normally");
                StopOutcome::Clean
            }
            Err(_) => {
                session.task.abort();
                let _ = (&mut session.task).await;
                StopOutcome::Forced
            }
        }
    }

    fn startup_failed(&self, error: ServerError) -> CliError {
        self.set_phase(Phase::Stopped);
        tracing::error!(%error, "server failed to start");
        self.sink.emit(&error.to_string());
        error.into()
    }

    fn set_phase(&self, phase: Phase) {
        self.state.lock().phase = phase;
    }

    #[cfg(test)]
    fn kill_task(&self) {
        if let Some(session) = self.state.lock().session.as_ref() {
            session.task.abort();
        }
    }
}

/// Retire a running session whose task has already finished.
fn reap(inner: &mut Inner) -> Option<String> {
    if inner.phase != Phase::Running
        || !inner.session.as_ref().is_some_and(|s| s.task.is_finished())
    {
        return None;
    }

    let session = inner.session.take()?;
    inner.phase = Phase::Stopped;

    let port = session.addr.port();
    let error = ServerError::UnexpectedTermination {
        port,
        reason: "the server task exited".to_string(),
    };
    tracing::warn!(port, "server stopped unexpectedly");
    let message = error.to_string();
    inner.unexpected = Some(error);
    Some(message)
}

impl Drop for ServerManager {
    fn drop(&mut self) {
        let _mute = self.sink.mute();
        if let Some(mut session) = self.state.get_mut().session.take() {
            if let Some(tx) = session.shutdown.take() {
                let _ = tx.send(());
            }
            session.task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlatenConfig;
    use crate::dev::generator::CommandGenerator;
    use std::net::Ipv4Addr;
    use tempfile::TempDir;

    fn manager(temp: &TempDir) -> ServerManager {
        let paths = PlatenConfig::default().paths(temp.path());
        let builder = SiteBuilder::new(
            paths,
            Arc::new(CommandGenerator::new("platen-test-no-such-generator")),
        );
        ServerManager::new(IpAddr::V4(Ipv4Addr::LOCALHOST), Arc::new(builder))
    }

    #[tokio::test]
    async fn test_missing_root_outside_output_is_not_built() {
        let temp = TempDir::new().unwrap();
        let manager = manager(&temp);
        let elsewhere = temp.path().join("elsewhere");

        let result = manager.start(0, &elsewhere, Profile::Development).await;
        assert!(matches!(result, Err(CliError::FileNotFound(path)) if path == elsewhere));
        assert_eq!(manager.status().phase, Phase::Stopped);
        assert!(!temp.path().join("output").exists());
    }

    #[tokio::test]
    async fn test_dead_server_is_detected_once() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("output")).unwrap();
        let manager = manager(&temp);

        manager
            .start(0, &temp.path().join("output"), Profile::Development)
            .await
            .unwrap();
        assert!(manager.is_running());

        manager.kill_task();
        for _ in 0..50 {
            if !manager.is_running() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert!(!manager.is_running());
        assert_eq!(manager.status().phase, Phase::Stopped);
        assert!(matches!(
            manager.take_unexpected_stop(),
            Some(ServerError::UnexpectedTermination { .. })
        ));
        assert!(manager.take_unexpected_stop().is_none());
        assert_eq!(manager.stop().await, StopOutcome::NotRunning);
    }

    #[tokio::test]
    async fn test_missing_root_build_failure_propagates() {
        let temp = TempDir::new().unwrap();
        let manager = manager(&temp);

        let result = manager
            .start(0, &temp.path().join("output"), Profile::Development)
            .await;
        assert!(result.is_err());
        assert_eq!(manager.status().phase, Phase::Stopped);
    }
}
