//! Configuration loading and setting resolution
//!
//! Every setting is resolved in this priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (clap `env` fallback on the same argument)
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "HALUNDER_CONFIG";

/// Default address of the corpus store
pub const DEFAULT_STORE_URL: &str = "http://127.0.0.1:8000";

/// Default port for the corpus store service
pub const DEFAULT_PORT: u16 = 8000;

/// Default request timeout for remote calls
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings read from the TOML config file
///
/// All keys are optional; absent keys fall through to compiled defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    /// Base URL of the corpus store
    pub store_url: Option<String>,
    /// Base URL of the processing engine (defaults to the store URL)
    pub engine_url: Option<String>,
    /// Directory receiving CSV exports
    pub export_dir: Option<PathBuf>,
    /// SQLite database path for the store service
    pub database_path: Option<PathBuf>,
    /// Listen port for the store service
    pub port: Option<u16>,
    /// Operators seeded into the store's user list
    pub users: Option<Vec<String>>,
    /// Timeout for remote calls in seconds
    pub request_timeout_secs: Option<u64>,
}

/// Load the config file from its standard location
///
/// A missing file is not an error and yields an empty config; a file that
/// exists but fails to parse is.
pub fn load_file_config() -> Result<FileConfig> {
    match config_file_path() {
        Some(path) if path.exists() => load_file_config_from(&path),
        Some(path) => {
            debug!("No config file at {}", path.display());
            Ok(FileConfig::default())
        }
        None => Ok(FileConfig::default()),
    }
}

/// Load the config file at an explicit path
pub fn load_file_config_from(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: FileConfig = toml::from_str(&content)?;
    debug!("Loaded config file {}", path.display());
    Ok(config)
}

/// Pick the first available value: CLI/env, then config file, then default
pub fn resolve<T>(cli: Option<T>, file: Option<T>, default: impl FnOnce() -> T) -> T {
    cli.or(file).unwrap_or_else(default)
}

/// Normalize a base URL by trimming trailing slashes and validating the scheme
pub fn normalize_base_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(Error::Config(format!(
            "Base URL must start with http:// or https://: {}",
            url
        )));
    }
    Ok(trimmed.to_string())
}

/// Get the config file path for the platform
///
/// `$HALUNDER_CONFIG` wins; otherwise `<config_dir>/halunder/config.toml`,
/// and on Linux `/etc/halunder/config.toml` when the user file is absent.
fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }

    let user_config = dirs::config_dir().map(|d| d.join("halunder").join("config.toml"));

    if cfg!(target_os = "linux") {
        if let Some(path) = &user_config {
            if path.exists() {
                return user_config;
            }
        }
        let system_config = PathBuf::from("/etc/halunder/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    user_config
}

/// Get OS-dependent default database path for the store service
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("halunder").join("corpus.db"))
        .unwrap_or_else(|| PathBuf::from("./halunder_data/corpus.db"))
}
