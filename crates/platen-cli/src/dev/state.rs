//! Lifecycle state shared between the server manager and its callers.

use std::fmt;
use std::net::SocketAddr;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Server lifecycle phase.
///
/// `Stopped → Starting → Running → Stopping → Stopped`, plus
/// `Running → Stopped` when the background server dies on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Stopped,
    Starting,
    Running,
    Stopping,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Stopped => "stopped",
            Phase::Starting => "starting",
            Phase::Running => "running",
            Phase::Stopping => "stopping",
        };
        f.write_str(name)
    }
}

/// Point-in-time view of a server manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerStatus {
    pub phase: Phase,
    /// Bound address while running
    pub addr: Option<SocketAddr>,
    /// Directory being served while running
    pub root: Option<PathBuf>,
}

impl ServerStatus {
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn url(&self) -> Option<String> {
        self.addr.map(|addr| format!("http://{}/", addr))
    }
}

/// How `stop` ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// No session was active
    NotRunning,
    /// The server shut down within the grace period
    Clean,
    /// The grace period ran out and the server task was aborted
    Forced,
}

type SinkFn = dyn Fn(&str) + Send + Sync;

/// Destination for human-readable lifecycle messages.
///
/// A panicking sink is contained: the panic is swallowed and logged. The sink
/// can be muted during teardown.
#[derive(Clone)]
pub struct LogSink {
    sink: Option<Arc<SinkFn>>,
    muted: Arc<AtomicBool>,
}

impl LogSink {
    pub fn new(sink: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Self {
            sink: Some(Arc::new(sink)),
            muted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A sink that drops every message.
    pub fn discard() -> Self {
        Self {
            sink: None,
            muted: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn emit(&self, message: &str) {
        if self.muted.load(Ordering::Acquire) {
            return;
        }
        let Some(sink) = &self.sink else {
            return;
        };
        if catch_unwind(AssertUnwindSafe(|| sink(message))).is_err() {
            tracing::debug!(message, "log sink panicked; message dropped");
        }
    }

    /// Mute until the returned guard is dropped. Returns whether the sink was
    /// already muted, so nested mutes restore correctly.
    pub fn mute(&self) -> MuteGuard {
        let was_muted = self.muted.swap(true, Ordering::AcqRel);
        MuteGuard {
            muted: Arc::clone(&self.muted),
            restore: was_muted,
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::Acquire)
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::discard()
    }
}

impl fmt::Debug for LogSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogSink")
            .field("attached", &self.sink.is_some())
            .field("muted", &self.is_muted())
            .finish()
    }
}

/// Restores the sink's previous mute state on drop.
pub struct MuteGuard {
    muted: Arc<AtomicBool>,
    restore: bool,
}

impl Drop for MuteGuard {
    fn drop(&mut self) {
        self.muted.store(self.restore, Ordering::Release);
    }
}
