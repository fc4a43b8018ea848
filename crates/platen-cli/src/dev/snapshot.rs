//! Modification-time snapshots of the content tree for polling watch mode.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::{DirEntry, WalkDir};

/// Path → last-modified time for every non-hidden file under a root.
///
/// Two snapshots are equal exactly when the same files exist with the same
/// modification times.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentSnapshot {
    files: BTreeMap<PathBuf, SystemTime>,
}

/// Differences between two snapshots, for logging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    pub added: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
    pub modified: Vec<PathBuf>,
}

impl SnapshotDiff {
    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Any one changed path, for a short log line.
    pub fn first(&self) -> Option<&Path> {
        self.modified
            .first()
            .or_else(|| self.added.first())
            .or_else(|| self.removed.first())
            .map(PathBuf::as_path)
    }
}

impl ContentSnapshot {
    /// Scan `root` from scratch.
    ///
    /// Hidden files and directories (any component starting with `.`) are
    /// skipped, as are the paths in `ignore`. Entries that vanish or can't be
    /// read mid-scan are left out; a missing root yields an empty snapshot.
    pub fn capture(root: &Path, ignore: &[PathBuf]) -> Self {
        let files = WalkDir::new(root)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unreadable entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| !ignore.iter().any(|p| entry.path() == p))
            .filter_map(|entry| {
                let modified = entry.metadata().ok()?.modified().ok()?;
                Some((entry.into_path(), modified))
            })
            .collect();

        Self { files }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    /// What changed going from `self` to `newer`.
    pub fn diff(&self, newer: &ContentSnapshot) -> SnapshotDiff {
        let mut diff = SnapshotDiff::default();

        for (path, modified) in &newer.files {
            match self.files.get(path) {
                None => diff.added.push(path.clone()),
                Some(old) if old != modified => diff.modified.push(path.clone()),
                Some(_) => {}
            }
        }
        diff.removed = self
            .files
            .keys()
            .filter(|path| !newer.files.contains_key(*path))
            .cloned()
            .collect();

        diff
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::time::Duration;
    use tempfile::TempDir;

    fn touch(path: &Path, offset_secs: u64) {
        let file = File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000 + offset_secs))
            .unwrap();
    }

    #[test]
    fn test_capture_skips_hidden_and_ignored() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("posts")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::create_dir_all(root.join("extra")).unwrap();
        fs::write(root.join("posts/first.md"), "hello").unwrap();
        fs::write(root.join(".git/HEAD"), "ref").unwrap();
        fs::write(root.join("posts/.draft.md.swp"), "x").unwrap();
        fs::write(root.join("extra/typewriters.json"), "[]").unwrap();

        let snapshot = ContentSnapshot::capture(root, &[root.join("extra/typewriters.json")]);
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.contains(&root.join("posts/first.md")));
    }

    #[test]
    fn test_unchanged_tree_is_equal() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.md"), "a").unwrap();

        let first = ContentSnapshot::capture(temp.path(), &[]);
        let second = ContentSnapshot::capture(temp.path(), &[]);
        assert_eq!(first, second);
        assert!(first.diff(&second).is_empty());
    }

    #[test]
    fn test_diff_detects_changes() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("a.md"), "a").unwrap();
        fs::write(root.join("b.md"), "b").unwrap();
        touch(&root.join("a.md"), 0);
        let before = ContentSnapshot::capture(root, &[]);

        touch(&root.join("a.md"), 10);
        fs::remove_file(root.join("b.md")).unwrap();
        fs::write(root.join("c.md"), "c").unwrap();
        let after = ContentSnapshot::capture(root, &[]);

        assert_ne!(before, after);
        let diff = before.diff(&after);
        assert_eq!(diff.modified, vec![root.join("a.md")]);
        assert_eq!(diff.removed, vec![root.join("b.md")]);
        assert_eq!(diff.added, vec![root.join("c.md")]);
        assert_eq!(diff.len(), 3);
        assert_eq!(diff.first(), Some(root.join("a.md").as_path()));
    }

    #[test]
    fn test_missing_root_is_empty() {
        let temp = TempDir::new().unwrap();
        assert!(ContentSnapshot::capture(&temp.path().join("nope"), &[]).is_empty());
    }
}
