//! Launcher configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Settings for launching and querying the engine.
///
/// Every field has a default, so a config file only needs the keys it
/// overrides:
///
/// ```json
/// { "engine": "/opt/zeno/bin/zeno", "query_args": ["--dump-descriptors"] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Engine executable.
    pub engine: PathBuf,

    /// Arguments that put the engine into query mode.
    pub query_args: Vec<String>,

    /// Name prefix for workspace directories.
    pub workspace_prefix: String,

    /// Parent directory for workspaces (system temp dir if unset).
    pub workspace_root: Option<PathBuf>,

    /// Job file name inside the workspace.
    pub job_file_name: String,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            engine: PathBuf::from("zeno"),
            query_args: vec!["--dump-descriptors".to_string()],
            workspace_prefix: "zlaunch-".to_string(),
            workspace_root: None,
            job_file_name: "job.json".to_string(),
        }
    }
}

impl LauncherConfig {
    /// Default configuration for the given engine executable.
    pub fn for_engine(engine: impl Into<PathBuf>) -> Self {
        Self {
            engine: engine.into(),
            ..Self::default()
        }
    }

    /// Load a JSON config file.
    ///
    /// Keys missing from the file take their defaults; the result records
    /// whether the file named an engine itself.
    pub fn load(path: &Path) -> Result<LoadedConfig> {
        let invalid = |message: String| Error::Config {
            path: path.to_path_buf(),
            message,
        };

        let text = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        let value: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| invalid(e.to_string()))?;
        let engine_set = value.get("engine").is_some();
        let config = serde_json::from_value(value).map_err(|e| invalid(e.to_string()))?;

        Ok(LoadedConfig { config, engine_set })
    }
}

/// A config file as read by [`LauncherConfig::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub config: LauncherConfig,
    /// The file contained an `engine` key, even one equal to the default.
    pub engine_set: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "engine": "/opt/zeno/bin/zeno" }"#).unwrap();

        let loaded = LauncherConfig::load(&path).unwrap();
        assert!(loaded.engine_set);
        let config = loaded.config;
        assert_eq!(config.engine, PathBuf::from("/opt/zeno/bin/zeno"));
        assert_eq!(config.query_args, vec!["--dump-descriptors"]);
        assert_eq!(config.job_file_name, "job.json");
        assert!(config.workspace_root.is_none());
    }

    #[test]
    fn test_engine_equal_to_default_counts_as_set() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "engine": "zeno" }"#).unwrap();

        let loaded = LauncherConfig::load(&path).unwrap();
        assert!(loaded.engine_set);
        assert_eq!(loaded.config, LauncherConfig::default());
    }

    #[test]
    fn test_config_without_engine() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "job_file_name": "scene.zsg" }"#).unwrap();

        let loaded = LauncherConfig::load(&path).unwrap();
        assert!(!loaded.engine_set);
        assert_eq!(loaded.config.job_file_name, "scene.zsg");
    }

    #[test]
    fn test_invalid_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "query_args": "not-a-list" }"#).unwrap();
        assert!(matches!(LauncherConfig::load(&path), Err(Error::Config { .. })));
    }

    #[test]
    fn test_missing_config() {
        let dir = TempDir::new().unwrap();
        let err = LauncherConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("absent.json"));
    }
}
