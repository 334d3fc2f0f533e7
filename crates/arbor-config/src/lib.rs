//! Configuration management for the arbor installation.
//!
//! Settings live in a TOML file. Every section and every field is optional;
//! anything left out falls back to the tuned defaults in [`config`].
//!
//! Lookup order used by [`load`]:
//! 1. An explicit path (from the command line)
//! 2. The file named by `ARBOR_CONFIG`
//! 3. `./arbor.toml` in the working directory
//! 4. `arbor.toml` in the platform config directory
//!
//! No file at all is not an error: the defaults are returned.

pub mod config;

use std::path::{Path, PathBuf};

pub use config::{
    ArborConfig, ControllerConfig, DisplayConfig, FormationMode, GestureConfig, LoggingConfig,
    MotionConfig, PhotoConfig, SceneConfig,
};

/// File name searched for in the working and platform config directories
pub const CONFIG_FILE_NAME: &str = "arbor.toml";

/// Environment variable that points at a config file
pub const CONFIG_ENV_VAR: &str = "ARBOR_CONFIG";

/// Error types for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Load configuration, searching the standard locations.
///
/// `explicit` wins when given and must exist. Otherwise `ARBOR_CONFIG`,
/// the working directory and the platform config directory are tried in
/// that order.
pub fn load(explicit: Option<&Path>) -> Result<ArborConfig> {
    if let Some(path) = explicit {
        return load_from_path(path);
    }

    for candidate in candidate_paths() {
        if candidate.is_file() {
            return load_from_path(&candidate);
        }
    }

    tracing::debug!("No config file found, using defaults");
    Ok(ArborConfig::default())
}

/// Load and validate a config file at `path`.
pub fn load_from_path(path: &Path) -> Result<ArborConfig> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config = ArborConfig::from_toml_str(&contents).map_err(|err| match err {
        ConfigError::Parse { source, .. } => ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;

    tracing::info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Paths tried by [`load`] when no explicit path is given
pub fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(from_env) = std::env::var_os(CONFIG_ENV_VAR) {
        paths.push(PathBuf::from(from_env));
    }

    paths.push(PathBuf::from(CONFIG_FILE_NAME));

    if let Some(dirs) = directories::ProjectDirs::from("dev", "arbor", "arbor") {
        paths.push(dirs.config_dir().join(CONFIG_FILE_NAME));
    }

    paths
}
