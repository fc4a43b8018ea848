use crate::config::PlatenConfig;
use crate::error::{ConfigError, Result};

impl PlatenConfig {
    /// Validate configuration for logical consistency.
    pub fn validate(&self) -> Result<()> {
        if self.generator.split_whitespace().next().is_none() {
            return Err(ConfigError::MissingField {
                field: "generator".to_string(),
                hint: "Set the site generator command, e.g. \"pelican\"".to_string(),
            }
            .into());
        }

        if self.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "port".to_string(),
                value: "0".to_string(),
                hint: "Use a port between 1 and 65535".to_string(),
            }
            .into());
        }

        if self.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pollIntervalMs".to_string(),
                value: "0".to_string(),
                hint: "The poll interval must be at least 1 millisecond".to_string(),
            }
            .into());
        }

        if self.output_dir.as_os_str().is_empty() || self.output_dir == self.content_dir {
            return Err(ConfigError::InvalidValue {
                field: "outputDir".to_string(),
                value: self.output_dir.display().to_string(),
                hint: "The output directory is deleted by clean; it must differ from contentDir"
                    .to_string(),
            }
            .into());
        }

        if self.content_dir.starts_with(&self.output_dir) {
            return Err(ConfigError::ConflictingOptions(format!(
                "contentDir '{}' is inside outputDir '{}'",
                self.content_dir.display(),
                self.output_dir.display()
            ))
            .into());
        }

        Ok(())
    }
}
