#[cfg(test)]
mod tests {
    use crate::cli::{Profile, WatchMode};
    use crate::config::loading::env_key_path;
    use crate::config::*;
    use serial_test::serial;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn clear_env() {
        unsafe {
            std::env::remove_var("PLATEN_PORT");
            std::env::remove_var("PLATEN_OUTPUT_DIR");
            std::env::remove_var("PLATEN_COLLECTION__PAGES_DIR");
        }
    }

    #[test]
    fn test_serialization_uses_camel_case() {
        let json = serde_json::to_value(PlatenConfig::default()).unwrap();

        assert_eq!(json["generator"], "pelican");
        assert_eq!(json["outputDir"], "output");
        assert_eq!(json["pollIntervalMs"], 1000);
        assert_eq!(json["watchMode"], "poll");
        assert_eq!(json["collection"]["pagesDir"], "content/typewriters");
        assert!(json["collection"].get("pageDate").is_none());
        assert!(json.get("output_dir").is_none());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<PlatenConfig, _> = serde_json::from_str(r#"{"outDir": "dist"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validation() {
        assert!(PlatenConfig::default().validate().is_ok());

        assert!(PlatenConfig {
            port: 0,
            ..PlatenConfig::default()
        }
        .validate()
        .is_err());

        assert!(PlatenConfig {
            poll_interval_ms: 0,
            ..PlatenConfig::default()
        }
        .validate()
        .is_err());

        assert!(PlatenConfig {
            generator: "   ".to_string(),
            ..PlatenConfig::default()
        }
        .validate()
        .is_err());

        assert!(PlatenConfig {
            output_dir: PathBuf::from("content"),
            ..PlatenConfig::default()
        }
        .validate()
        .is_err());

        assert!(PlatenConfig {
            output_dir: PathBuf::from("site"),
            content_dir: PathBuf::from("site/content"),
            ..PlatenConfig::default()
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_paths_resolve_against_root() {
        let config = PlatenConfig {
            output_dir: PathBuf::from("/var/www/site"),
            ..PlatenConfig::default()
        };
        let paths = config.paths(Path::new("/home/me/blog"));

        assert_eq!(paths.content_dir, PathBuf::from("/home/me/blog/content"));
        assert_eq!(paths.output_dir, PathBuf::from("/var/www/site"));
        assert_eq!(
            paths.settings(Profile::Production),
            Path::new("/home/me/blog/publishconf.py")
        );
        assert_eq!(
            paths.collection_json,
            PathBuf::from("/home/me/blog/content/extra/typewriters.json")
        );
    }

    #[test]
    fn test_env_key_path() {
        assert_eq!(env_key_path("PORT"), "port");
        assert_eq!(env_key_path("OUTPUT_DIR"), "outputDir");
        assert_eq!(env_key_path("POLL_INTERVAL_MS"), "pollIntervalMs");
        assert_eq!(env_key_path("COLLECTION__PAGES_DIR"), "collection.pagesDir");
    }

    #[test]
    #[serial]
    fn test_load_defaults_without_file() {
        clear_env();
        let temp = TempDir::new().unwrap();

        let config = PlatenConfig::load(temp.path(), None, &ConfigOverrides::default()).unwrap();
        assert_eq!(config, PlatenConfig::default());
    }

    #[test]
    #[serial]
    fn test_load_priority() {
        clear_env();
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            r#"{
                "port": 8100,
                "outputDir": "public",
                "watchMode": "events",
                "collection": { "pageDate": "2025-02-10" }
            }"#,
        )
        .unwrap();

        let config = PlatenConfig::load(temp.path(), None, &ConfigOverrides::default()).unwrap();
        assert_eq!(config.port, 8100);
        assert_eq!(config.output_dir, PathBuf::from("public"));
        assert_eq!(config.watch_mode, WatchMode::Events);
        assert_eq!(
            config.collection.page_date,
            chrono::NaiveDate::from_ymd_opt(2025, 2, 10)
        );
        assert_eq!(config.collection.csv, default_collection_csv());

        unsafe {
            std::env::set_var("PLATEN_PORT", "8200");
            std::env::set_var("PLATEN_COLLECTION__PAGES_DIR", "pages");
        }
        let config = PlatenConfig::load(temp.path(), None, &ConfigOverrides::default()).unwrap();
        assert_eq!(config.port, 8200);
        assert_eq!(config.collection.pages_dir, PathBuf::from("pages"));

        let overrides = ConfigOverrides {
            port: Some(8300),
            ..ConfigOverrides::default()
        };
        let config = PlatenConfig::load(temp.path(), None, &overrides).unwrap();
        assert_eq!(config.port, 8300);
        assert_eq!(config.output_dir, PathBuf::from("public"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_load_explicit_missing_file() {
        clear_env();
        let temp = TempDir::new().unwrap();

        let err = PlatenConfig::load(
            temp.path(),
            Some(Path::new("nope.json")),
            &ConfigOverrides::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    #[serial]
    fn test_load_rejects_invalid_values() {
        clear_env();
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), r#"{ "port": "eighty" }"#).unwrap();
        assert!(PlatenConfig::load(temp.path(), None, &ConfigOverrides::default()).is_err());

        fs::write(temp.path().join(CONFIG_FILE_NAME), r#"{ "pollIntervalMs": 0 }"#).unwrap();
        assert!(PlatenConfig::load(temp.path(), None, &ConfigOverrides::default()).is_err());
    }
}
