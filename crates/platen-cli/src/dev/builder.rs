//! Build invoker: projection hook, generator run, clean, and rebuild.
//!
//! Only one build runs at a time per builder; a second request while one is
//! in flight is rejected with [`CliError::Busy`] instead of queueing.

use crate::cli::Profile;
use crate::config::SitePaths;
use crate::dev::generator::{GenerateRequest, SiteGenerator};
use crate::error::{BuildError, CliError, Result};
use platen_collection::ProjectionOutcome;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use walkdir::WalkDir;

/// What the CSV-to-JSON hook did before the generator ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookStatus {
    Ran(ProjectionOutcome),
    /// The projection failed; the build carried on without it
    Failed(String),
}

/// Result of a successful build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub profile: Profile,
    /// Captured generator output
    pub output: String,
    pub elapsed: Duration,
    pub hook: HookStatus,
}

/// What `clean` found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanOutcome {
    Removed,
    /// Nothing to remove
    Absent,
}

/// File count and total size of a generated site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SiteStats {
    pub files: usize,
    pub bytes: u64,
}

/// Runs builds for one project layout.
pub struct SiteBuilder {
    paths: SitePaths,
    generator: Arc<dyn SiteGenerator>,
    building: AtomicBool,
}

/// Releases the build slot on drop.
struct BuildGuard<'a>(&'a AtomicBool);

impl Drop for BuildGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SiteBuilder {
    pub fn new(paths: SitePaths, generator: Arc<dyn SiteGenerator>) -> Self {
        Self {
            paths,
            generator,
            building: AtomicBool::new(false),
        }
    }

    pub fn paths(&self) -> &SitePaths {
        &self.paths
    }

    pub fn generator(&self) -> &dyn SiteGenerator {
        self.generator.as_ref()
    }

    /// Whether a build, clean, or rebuild is running right now.
    pub fn is_busy(&self) -> bool {
        self.building.load(Ordering::Acquire)
    }

    fn acquire(&self) -> Result<BuildGuard<'_>> {
        self.building
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| BuildGuard(&self.building))
            .map_err(|_| CliError::Busy("a build is already in progress".to_string()))
    }

    /// Refresh the collection JSON, then run the generator.
    pub async fn build(&self, profile: Profile) -> Result<BuildReport> {
        let _guard = self.acquire()?;
        self.build_unguarded(profile).await
    }

    /// Remove the output directory. Absent output is a successful no-op.
    pub async fn clean(&self) -> Result<CleanOutcome> {
        let _guard = self.acquire()?;
        self.clean_unguarded().await
    }

    /// `clean`, then `build`; a failed clean skips the build.
    pub async fn rebuild(&self, profile: Profile) -> Result<BuildReport> {
        let _guard = self.acquire()?;
        self.clean_unguarded().await?;
        self.build_unguarded(profile).await
    }

    async fn build_unguarded(&self, profile: Profile) -> Result<BuildReport> {
        let start = Instant::now();
        let hook = self.run_projection_hook().await;

        let request = GenerateRequest {
            cwd: self.paths.root.clone(),
            content_dir: self.paths.content_dir.clone(),
            settings: self.paths.settings(profile).to_path_buf(),
            output_dir: self.paths.output_dir.clone(),
        };

        tracing::info!(%profile, generator = self.generator.name(), "building site");
        let output = self.generator.generate(&request).await?;

        Ok(BuildReport {
            profile,
            output,
            elapsed: start.elapsed(),
            hook,
        })
    }

    async fn clean_unguarded(&self) -> Result<CleanOutcome> {
        let output_dir = &self.paths.output_dir;
        match tokio::fs::remove_dir_all(output_dir).await {
            Ok(()) => {
                tracing::info!(path = %output_dir.display(), "removed output directory");
                Ok(CleanOutcome::Removed)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(CleanOutcome::Absent),
            Err(source) => Err(BuildError::CleanFailed {
                path: output_dir.clone(),
                source,
            }
            .into()),
        }
    }

    async fn run_projection_hook(&self) -> HookStatus {
        let csv = self.paths.collection_csv.clone();
        let json = self.paths.collection_json.clone();

        let result =
            tokio::task::spawn_blocking(move || platen_collection::project(&csv, &json)).await;

        match result {
            Ok(Ok(outcome)) => HookStatus::Ran(outcome),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "collection JSON not refreshed");
                HookStatus::Failed(e.to_string())
            }
            Err(e) => {
                tracing::warn!(error = %e, "collection projection task failed");
                HookStatus::Failed(e.to_string())
            }
        }
    }
}

/// Count files and bytes under a directory. Missing directories count as empty.
pub fn site_stats(dir: &Path) -> SiteStats {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .fold(SiteStats::default(), |mut stats, entry| {
            stats.files += 1;
            stats.bytes += entry.metadata().map(|m| m.len()).unwrap_or(0);
            stats
        })
}
