//! Native file system watcher for the `events` watch mode.
//!
//! Watches the content directory recursively and forwards relevant changes
//! through a channel. Hidden files and explicitly ignored paths are dropped.

use crate::error::{CliError, Result};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// File change event type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    Modified(PathBuf),
    Created(PathBuf),
    Removed(PathBuf),
}

impl FileChange {
    /// Get the path affected by this change.
    pub fn path(&self) -> &Path {
        match self {
            FileChange::Modified(p) | FileChange::Created(p) | FileChange::Removed(p) => p,
        }
    }
}

/// File watcher with per-path debouncing and filtering.
///
/// Dropping the watcher stops event delivery and closes the channel.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Start watching `root`.
    ///
    /// Repeated events for the same path within `debounce` are collapsed.
    pub fn new(
        root: PathBuf,
        ignore: Vec<PathBuf>,
        debounce: Duration,
    ) -> Result<(Self, mpsc::Receiver<FileChange>)> {
        if !root.is_dir() {
            return Err(CliError::FileNotFound(root));
        }

        let (tx, rx) = mpsc::channel(100);
        let mut last_event: Option<(PathBuf, Instant)> = None;
        let content_root = root.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    tracing::debug!(error = %e, "watch error");
                    return;
                }
            };

            for path in &event.paths {
                if Self::should_ignore(path, &content_root, &ignore) {
                    continue;
                }

                let now = Instant::now();
                if let Some((last_path, last_time)) = &last_event {
                    if last_path == path && now.duration_since(*last_time) < debounce {
                        continue;
                    }
                }
                last_event = Some((path.clone(), now));

                let change = match event.kind {
                    notify::EventKind::Create(_) => FileChange::Created(path.clone()),
                    notify::EventKind::Modify(_) => FileChange::Modified(path.clone()),
                    notify::EventKind::Remove(_) => FileChange::Removed(path.clone()),
                    _ => continue,
                };

                // A full channel means a rebuild is already pending
                let _ = tx.try_send(change);
            }
        })?;

        watcher.watch(&root, RecursiveMode::Recursive)?;

        Ok((Self { _watcher: watcher }, rx))
    }

    /// Paths outside the root, hidden paths, and ignored paths are skipped.
    fn should_ignore(path: &Path, root: &Path, ignore: &[PathBuf]) -> bool {
        let Ok(rel_path) = path.strip_prefix(root) else {
            return true;
        };

        if ignore.iter().any(|ignored| path == ignored) {
            return true;
        }

        rel_path.components().any(|component| {
            component
                .as_os_str()
                .to_str()
                .is_some_and(|name| name.starts_with('.') && name != "." && name != "..")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_ignore_hidden_files() {
        let root = PathBuf::from("/site/content");

        assert!(FileWatcher::should_ignore(
            Path::new("/site/content/.git/config"),
            &root,
            &[]
        ));
        assert!(FileWatcher::should_ignore(
            Path::new("/site/content/posts/.first.md.swp"),
            &root,
            &[]
        ));
        assert!(!FileWatcher::should_ignore(
            Path::new("/site/content/posts/first.md"),
            &root,
            &[]
        ));
    }

    #[test]
    fn test_should_ignore_listed_paths() {
        let root = PathBuf::from("/site/content");
        let ignore = vec![PathBuf::from("/site/content/extra/typewriters.json")];

        assert!(FileWatcher::should_ignore(
            Path::new("/site/content/extra/typewriters.json"),
            &root,
            &ignore
        ));
        assert!(!FileWatcher::should_ignore(
            Path::new("/site/content/extra/robots.txt"),
            &root,
            &ignore
        ));
    }

    #[test]
    fn test_should_ignore_outside_root() {
        let root = PathBuf::from("/site/content");
        assert!(FileWatcher::should_ignore(
            Path::new("/site/output/index.html"),
            &root,
            &[]
        ));
    }

    #[test]
    fn test_missing_root_is_rejected() {
        let temp = tempfile::TempDir::new().unwrap();
        let result = FileWatcher::new(temp.path().join("missing"), vec![], Duration::ZERO);
        assert!(matches!(result, Err(CliError::FileNotFound(_))));
    }

    #[test]
    fn test_file_change_path() {
        let path = PathBuf::from("/site/content/pages/about.md");
        assert_eq!(FileChange::Created(path.clone()).path(), path.as_path());
        assert_eq!(FileChange::Removed(path.clone()).path(), path.as_path());
    }
}
