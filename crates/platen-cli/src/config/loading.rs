use crate::cli::WatchMode;
use crate::config::PlatenConfig;
use crate::error::{ConfigError, Result};
use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized},
};
use serde::Serialize;
use std::path::Path;

/// Name of the config file looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "platen.config.json";

/// Values given on the command line. Unset fields leave lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll_interval_ms: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch_mode: Option<WatchMode>,
}

impl PlatenConfig {
    /// Load configuration from multiple sources.
    /// Priority: CLI args > environment variables > config file > defaults
    ///
    /// `config_path` is resolved against `root`. An explicit path that does
    /// not exist is an error; a missing default file is not.
    pub fn load(
        root: &Path,
        config_path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let config_file = match config_path {
            Some(path) => {
                let path = crate::commands::resolve_path(path, root);
                if !path.exists() {
                    return Err(ConfigError::NotFound(path).into());
                }
                Some(path)
            }
            None => {
                let default_path = root.join(CONFIG_FILE_NAME);
                default_path.exists().then_some(default_path)
            }
        };

        if let Some(path) = config_file {
            tracing::debug!(path = %path.display(), "loading config file");
            figment = figment.merge(Json::file(path));
        }

        // PLATEN_OUTPUT_DIR -> outputDir, PLATEN_COLLECTION__PAGES_DIR -> collection.pagesDir
        figment = figment.merge(
            Env::prefixed("PLATEN_")
                .lowercase(false)
                .map(|key| env_key_path(key.as_str()).into()),
        );

        figment = figment.merge(Serialized::defaults(overrides));

        let config: Self = figment.extract().map_err(|e| ConfigError::InvalidValue {
            field: "configuration".to_string(),
            value: e.to_string(),
            hint: format!("Check {} syntax and field types", CONFIG_FILE_NAME),
        })?;

        config.validate()?;
        Ok(config)
    }
}

/// Turn an environment key suffix into a dotted camelCase config path.
pub(crate) fn env_key_path(raw: &str) -> String {
    raw.split("__")
        .map(|segment| {
            let mut out = String::with_capacity(segment.len());
            let mut upper = false;
            for c in segment.chars() {
                if c == '_' {
                    upper = !out.is_empty();
                } else if upper {
                    out.extend(c.to_uppercase());
                    upper = false;
                } else {
                    out.extend(c.to_lowercase());
                }
            }
            out
        })
        .collect::<Vec<_>>()
        .join(".")
}
