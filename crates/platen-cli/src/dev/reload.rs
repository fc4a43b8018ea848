//! Watch mode: rebuild and restart the server when content changes.
//!
//! Each detected change runs one cycle: stop the server, rebuild (clean +
//! build), then start it again on the same port. A failed rebuild ends the
//! loop with that error; shutdown stops the server without rebuilding.
//!
//! While the loop runs it owns the stop/start cycle. Callers that want a
//! rebuild on demand go through a [`RefreshHandle`] so the loop never sees
//! a stop it didn't make.

use crate::cli::Profile;
use crate::dev::builder::SiteBuilder;
use crate::dev::manager::ServerManager;
use crate::dev::snapshot::ContentSnapshot;
use crate::dev::watcher::{FileChange, FileWatcher};
use crate::error::{CliError, Result, ServerError};
use std::future::Future;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Interval, MissedTickBehavior};

/// Quiet period that groups a burst of native events into one rebuild.
const EVENT_SETTLE: Duration = Duration::from_millis(200);

/// Where change notifications come from.
pub enum ChangeSource {
    /// Re-scan the content tree every interval
    Poll { interval: Duration },
    /// Native file system events
    Events {
        watcher: FileWatcher,
        changes: mpsc::Receiver<FileChange>,
    },
}

impl ChangeSource {
    pub fn poll(interval: Duration) -> Self {
        ChangeSource::Poll { interval }
    }

    /// Start a native watcher on `content_dir`.
    pub fn events(content_dir: &Path, ignore: Vec<PathBuf>, debounce: Duration) -> Result<Self> {
        let (watcher, changes) = FileWatcher::new(content_dir.to_path_buf(), ignore, debounce)?;
        Ok(ChangeSource::Events { watcher, changes })
    }
}

/// Summary of a finished watch session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchSummary {
    pub rebuilds: usize,
}

/// The rebuild-on-change loop around a running server.
pub struct WatchLoop {
    manager: Arc<ServerManager>,
    builder: Arc<SiteBuilder>,
    profile: Profile,
    port: u16,
    source: ChangeSource,
    requests: Option<mpsc::Receiver<RefreshRequest>>,
}

struct RefreshRequest {
    profile: Profile,
    reply: oneshot::Sender<Result<SocketAddr>>,
}

/// Asks a running [`WatchLoop`] for an immediate rebuild and restart.
#[derive(Clone)]
pub struct RefreshHandle(mpsc::Sender<RefreshRequest>);

impl RefreshHandle {
    /// Rebuild with `profile` and restart on the watched port.
    ///
    /// `None` when the loop has already ended and can't take the request.
    pub async fn refresh(&self, profile: Profile) -> Option<Result<SocketAddr>> {
        let (reply, response) = oneshot::channel();
        self.0.send(RefreshRequest { profile, reply }).await.ok()?;
        response.await.ok()
    }
}

/// What woke the loop up.
enum Trigger {
    Shutdown,
    Refresh(RefreshRequest),
    Change(Option<String>),
}

/// Turns a [`ChangeSource`] into "something changed" signals, ticking at
/// least once per interval so the loop can check on the server.
struct Detector {
    ticker: Interval,
    kind: DetectorKind,
    content_dir: PathBuf,
    /// A skipped rebuild to retry on the next tick
    retry: bool,
}

enum DetectorKind {
    Poll {
        ignore: Vec<PathBuf>,
        snapshot: ContentSnapshot,
    },
    Events {
        _watcher: FileWatcher,
        changes: mpsc::Receiver<FileChange>,
    },
}

impl WatchLoop {
    /// `port` should be the port the server is currently bound to.
    pub fn new(
        manager: Arc<ServerManager>,
        profile: Profile,
        port: u16,
        source: ChangeSource,
    ) -> Self {
        let builder = Arc::clone(manager.builder());
        Self {
            manager,
            builder,
            profile,
            port,
            source,
            requests: None,
        }
    }

    /// A handle for on-demand refreshes while this loop runs.
    pub fn refresh_handle(&mut self) -> RefreshHandle {
        let (sender, requests) = mpsc::channel(1);
        self.requests = Some(requests);
        RefreshHandle(sender)
    }

    /// Run until `shutdown` resolves, a rebuild fails, or the server dies.
    pub async fn run<F>(self, shutdown: F) -> Result<WatchSummary>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let WatchLoop {
            manager,
            builder,
            mut profile,
            port,
            source,
            mut requests,
        } = self;

        let paths = builder.paths().clone();
        let mut detector = Detector::new(source, &paths.content_dir, &paths.collection_json).await;
        let mut summary = WatchSummary::default();

        tracing::info!(content = %paths.content_dir.display(), "watching for changes");

        loop {
            let trigger = tokio::select! {
                _ = &mut shutdown => Trigger::Shutdown,
                request = next_request(&mut requests) => Trigger::Refresh(request),
                change = detector.next() => Trigger::Change(change?),
            };

            let (notice, reply) = match trigger {
                Trigger::Shutdown => {
                    manager.stop().await;
                    return Ok(summary);
                }
                Trigger::Refresh(request) => {
                    profile = request.profile;
                    ("Refresh requested; rebuilding...".to_string(), Some(request.reply))
                }
                Trigger::Change(Some(description)) => (
                    format!("Change detected ({}); rebuilding...", description),
                    None,
                ),
                Trigger::Change(None) => {
                    if !manager.is_running() {
                        let error = manager.take_unexpected_stop().unwrap_or(
                            ServerError::UnexpectedTermination {
                                port,
                                reason: "the server is no longer running".to_string(),
                            },
                        );
                        return Err(error.into());
                    }
                    continue;
                }
            };

            manager.sink().emit(&notice);
            tracing::info!(trigger = %notice, "rebuilding");

            manager.stop().await;
            let started = Instant::now();
            match builder.rebuild(profile).await {
                Ok(_) => {
                    summary.rebuilds += 1;
                    let addr = match manager.start(port, &paths.output_dir, profile).await {
                        Ok(addr) => addr,
                        Err(e) => return Err(answer(reply, e)),
                    };
                    manager.sink().emit(&format!(
                        "Rebuilt in {}",
                        crate::ui::format_duration(started.elapsed())
                    ));
                    if let Some(reply) = reply {
                        let _ = reply.send(Ok(addr));
                    }
                }
                Err(CliError::Busy(reason)) => {
                    // Another build holds the output directory; serve it and retry
                    tracing::warn!(%reason, "rebuild skipped");
                    let restarted = manager.start(port, &paths.output_dir, profile).await;
                    match reply {
                        Some(reply) => {
                            let _ = reply.send(Err(CliError::Busy(reason)));
                        }
                        None => detector.retry = true,
                    }
                    restarted?;
                }
                Err(e) => {
                    manager.sink().emit(&format!("Rebuild failed: {}", e));
                    return Err(answer(reply, e));
                }
            }
        }
    }
}

/// Next queued refresh request. Pends forever once every handle is gone.
async fn next_request(requests: &mut Option<mpsc::Receiver<RefreshRequest>>) -> RefreshRequest {
    if let Some(receiver) = requests.as_mut() {
        if let Some(request) = receiver.recv().await {
            return request;
        }
        *requests = None;
    }
    std::future::pending().await
}

/// Hand `error` to the waiting caller, if any, and return what ends the loop.
fn answer(reply: Option<oneshot::Sender<Result<SocketAddr>>>, error: CliError) -> CliError {
    match reply {
        Some(reply) => {
            let message = error.to_string();
            let _ = reply.send(Err(error));
            CliError::Custom(format!("refresh failed: {}", message))
        }
        None => error,
    }
}

impl Detector {
    async fn new(source: ChangeSource, content_dir: &Path, generated: &Path) -> Self {
        let ignore = vec![generated.to_path_buf()];
        let (period, kind) = match source {
            ChangeSource::Poll { interval } => (
                interval,
                DetectorKind::Poll {
                    snapshot: capture(content_dir, &ignore).await,
                    ignore,
                },
            ),
            ChangeSource::Events { watcher, changes } => (
                Duration::from_secs(1),
                DetectorKind::Events {
                    _watcher: watcher,
                    changes,
                },
            ),
        };

        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Self {
            ticker,
            kind,
            content_dir: content_dir.to_path_buf(),
            retry: false,
        }
    }

    /// Wait for the next tick or change batch. `Some` describes a change.
    async fn next(&mut self) -> Result<Option<String>> {
        match &mut self.kind {
            DetectorKind::Poll { ignore, snapshot } => {
                self.ticker.tick().await;
                let newer = capture(&self.content_dir, ignore).await;
                if newer != *snapshot {
                    let diff = snapshot.diff(&newer);
                    *snapshot = newer;
                    self.retry = false;
                    let first = diff.first().map(|p| relative(p, &self.content_dir));
                    return Ok(Some(describe(diff.len(), first)));
                }
            }
            DetectorKind::Events { changes, .. } => {
                tokio::select! {
                    change = changes.recv() => {
                        let Some(change) = change else {
                            return Err(CliError::Custom("file watcher stopped".to_string()));
                        };
                        tokio::time::sleep(EVENT_SETTLE).await;
                        let mut count = 1;
                        while changes.try_recv().is_ok() {
                            count += 1;
                        }
                        self.retry = false;
                        let first = relative(change.path(), &self.content_dir);
                        return Ok(Some(describe(count, Some(first))));
                    }
                    _ = self.ticker.tick() => {}
                }
            }
        }

        if std::mem::take(&mut self.retry) {
            return Ok(Some("retrying skipped rebuild".to_string()));
        }
        Ok(None)
    }
}

fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

fn describe(count: usize, first: Option<String>) -> String {
    match (count, first) {
        (1, Some(path)) => path,
        (n, Some(path)) => format!("{} files, including {}", n, path),
        (n, None) => format!("{} files", n),
    }
}

async fn capture(content_dir: &Path, ignore: &[PathBuf]) -> ContentSnapshot {
    let content_dir = content_dir.to_path_buf();
    let ignore = ignore.to_vec();
    tokio::task::spawn_blocking(move || ContentSnapshot::capture(&content_dir, &ignore))
        .await
        .unwrap_or_default()
}
