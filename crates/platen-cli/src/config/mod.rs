//! Configuration system for Platen with multi-source loading.
//!
//! Merges settings from CLI args, environment variables, and config files.
//! Priority: CLI > Environment (`PLATEN_*`) > `platen.config.json` > Defaults
//!
//! Relative paths are resolved against the project root when the config is
//! turned into [`SitePaths`].

mod defaults;
mod loading;
mod tests;
mod validation;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::{Profile, WatchMode};
pub use defaults::*;
pub use loading::{CONFIG_FILE_NAME, ConfigOverrides};

/// Platen configuration - loaded from platen.config.json, env, and CLI args.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PlatenConfig {
    /// Site generator command (program plus optional leading arguments)
    #[serde(default = "default_generator")]
    pub generator: String,

    /// Content directory passed to the generator
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,

    /// Output directory written by the generator and served
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Settings file for the development profile
    #[serde(default = "default_development_settings")]
    pub development_settings: PathBuf,

    /// Settings file for the production profile
    #[serde(default = "default_production_settings")]
    pub production_settings: PathBuf,

    /// Address the preview server binds to
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port the preview server binds to
    #[serde(default = "default_port")]
    pub port: u16,

    /// Watch-mode poll interval in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Watch-mode change detection
    #[serde(default)]
    pub watch_mode: WatchMode,

    /// Collection pipeline paths
    #[serde(default)]
    pub collection: CollectionConfig,
}

/// Paths used by the typewriter collection pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CollectionConfig {
    /// Source CSV
    #[serde(default = "default_collection_csv")]
    pub csv: PathBuf,

    /// JSON written for the templates on every build
    #[serde(default = "default_collection_json")]
    pub json: PathBuf,

    /// Directory receiving one page per collection entry
    #[serde(default = "default_pages_dir")]
    pub pages_dir: PathBuf,

    /// Fixed date for new pages; today when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_date: Option<NaiveDate>,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            csv: default_collection_csv(),
            json: default_collection_json(),
            pages_dir: default_pages_dir(),
            page_date: None,
        }
    }
}

impl Default for PlatenConfig {
    fn default() -> Self {
        Self {
            generator: default_generator(),
            content_dir: default_content_dir(),
            output_dir: default_output_dir(),
            development_settings: default_development_settings(),
            production_settings: default_production_settings(),
            host: default_host(),
            port: default_port(),
            poll_interval_ms: default_poll_interval_ms(),
            watch_mode: WatchMode::default(),
            collection: CollectionConfig::default(),
        }
    }
}

impl PlatenConfig {
    /// Watch-mode poll interval.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Resolve every configured path against `root`.
    pub fn paths(&self, root: &Path) -> SitePaths {
        let resolve = |p: &Path| crate::commands::resolve_path(p, root);

        SitePaths {
            root: root.to_path_buf(),
            content_dir: resolve(&self.content_dir),
            output_dir: resolve(&self.output_dir),
            development_settings: resolve(&self.development_settings),
            production_settings: resolve(&self.production_settings),
            collection_csv: resolve(&self.collection.csv),
            collection_json: resolve(&self.collection.json),
            pages_dir: resolve(&self.collection.pages_dir),
        }
    }
}

/// Absolute locations of everything a build touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitePaths {
    pub root: PathBuf,
    pub content_dir: PathBuf,
    pub output_dir: PathBuf,
    pub development_settings: PathBuf,
    pub production_settings: PathBuf,
    pub collection_csv: PathBuf,
    pub collection_json: PathBuf,
    pub pages_dir: PathBuf,
}

impl SitePaths {
    /// Settings file for a profile.
    pub fn settings(&self, profile: Profile) -> &Path {
        match profile {
            Profile::Development => &self.development_settings,
            Profile::Production => &self.production_settings,
        }
    }
}
