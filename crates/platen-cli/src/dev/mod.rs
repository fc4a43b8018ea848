//! Build and preview machinery.
//!
//! - [`generator`] runs the external site generator
//! - [`builder`] wraps it with the collection hook, clean, and rebuild
//! - [`server`] serves the output directory over HTTP
//! - [`manager`] owns the background server's lifecycle
//! - [`reload`] rebuilds and restarts on content changes
//! - [`controller`] bundles all of the above for interactive front ends

pub mod builder;
pub mod controller;
pub mod generator;
pub mod manager;
pub mod reload;
pub mod server;
pub mod snapshot;
pub mod state;
pub mod watcher;

// Re-exports
pub use builder::{BuildReport, CleanOutcome, HookStatus, SiteBuilder, SiteStats, site_stats};
pub use controller::{Controller, ControllerStatus};
pub use generator::{CommandGenerator, GenerateRequest, SiteGenerator};
pub use manager::{START_TIMEOUT, STOP_TIMEOUT, ServerManager};
pub use reload::{ChangeSource, WatchLoop, WatchSummary};
pub use snapshot::{ContentSnapshot, SnapshotDiff};
pub use state::{LogSink, MuteGuard, Phase, ServerStatus, StopOutcome};
pub use watcher::{FileChange, FileWatcher};
