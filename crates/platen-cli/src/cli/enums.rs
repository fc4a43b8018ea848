use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Build profile selecting which generator settings file is used.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Local preview settings (`pelicanconf.py` by default)
    #[default]
    #[value(name = "development")]
    Development,

    /// Publish settings (`publishconf.py` by default)
    ///
    /// Absolute URLs, feeds, and anything else that only makes sense on the
    /// deployed site.
    #[value(name = "production")]
    Production,
}

impl Profile {
    /// Pick the profile from a `--production` flag.
    pub fn from_flag(production: bool) -> Self {
        if production {
            Profile::Production
        } else {
            Profile::Development
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Development => f.write_str("development"),
            Profile::Production => f.write_str("production"),
        }
    }
}

/// How watch mode detects content changes.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchMode {
    /// Re-scan modification times every poll interval
    ///
    /// Works everywhere, including network drives and editors that replace
    /// files atomically.
    #[default]
    #[value(name = "poll")]
    Poll,

    /// Use native file system notifications
    #[value(name = "events")]
    Events,
}
