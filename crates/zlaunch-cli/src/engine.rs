//! Engine and config resolution for the CLI.

use std::path::{Path, PathBuf};

use anyhow::Context;
use zlaunch_core::LauncherConfig;

/// Environment variable naming the engine executable.
const ENGINE_ENV: &str = "ZLAUNCH_ENGINE";

/// Build the launcher config from flags, config files and the environment.
///
/// The config comes from `--config`, else `<config_dir>/zlaunch/config.json`
/// when that file exists, else defaults. The engine executable is taken from
/// the first of: `--engine`, the config file, `ZLAUNCH_ENGINE`, or the
/// default engine name looked up on `PATH`.
pub fn resolve_config(
    engine_flag: Option<PathBuf>,
    config_path: Option<&Path>,
) -> anyhow::Result<LauncherConfig> {
    let loaded = match config_path {
        Some(path) => Some(LauncherConfig::load(path)?),
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => {
                tracing::debug!("Using config {}", path.display());
                Some(LauncherConfig::load(&path)?)
            }
            None => None,
        },
    };

    let (mut config, engine_set) = match loaded {
        Some(loaded) => (loaded.config, loaded.engine_set),
        None => (LauncherConfig::default(), false),
    };

    if let Some(engine) = engine_flag {
        config.engine = engine;
    } else if !engine_set {
        config.engine = find_engine(&config.engine)?;
    }

    tracing::debug!("Engine: {}", config.engine.display());
    Ok(config)
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("zlaunch").join("config.json"))
}

/// Find the engine binary.
///
/// Looks in the following order:
/// 1. `ZLAUNCH_ENGINE` environment variable
/// 2. `default` as an existing path, or searched on the system PATH
fn find_engine(default: &Path) -> anyhow::Result<PathBuf> {
    if let Ok(path) = std::env::var(ENGINE_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Ok(path);
        }
        tracing::warn!("{} points to missing file {}", ENGINE_ENV, path.display());
    }

    if default.components().count() > 1 && default.exists() {
        return Ok(default.to_path_buf());
    }

    which::which(default).with_context(|| {
        format!(
            "Could not find engine '{}'. Pass --engine, set {} or add it to PATH.",
            default.display(),
            ENGINE_ENV
        )
    })
}
