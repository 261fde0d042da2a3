//! Workbench settings
//!
//! Command-line/env overrides first, then the shared TOML file, then
//! compiled defaults.

use halunder_common::config::{self, FileConfig, DEFAULT_STORE_URL, DEFAULT_TIMEOUT_SECS};
use std::path::PathBuf;
use std::time::Duration;

/// Export directory used when nothing else is configured
pub const DEFAULT_EXPORT_DIR: &str = "exports";

/// Values supplied on the command line (or through clap `env` fallbacks)
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub store_url: Option<String>,
    pub engine_url: Option<String>,
    pub export_dir: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewConfig {
    pub store_url: String,
    /// Processing engine; the corpus store does not process text, so there
    /// is no default
    pub engine_url: Option<String>,
    pub export_dir: PathBuf,
    pub timeout: Duration,
}

impl ReviewConfig {
    pub fn resolve(overrides: Overrides, file: FileConfig) -> halunder_common::Result<Self> {
        let store_url = config::resolve(overrides.store_url, file.store_url, || {
            DEFAULT_STORE_URL.to_string()
        });
        let store_url = config::normalize_base_url(&store_url)?;

        let engine_url = overrides
            .engine_url
            .or(file.engine_url)
            .map(|url| config::normalize_base_url(&url))
            .transpose()?;

        let export_dir = config::resolve(overrides.export_dir, file.export_dir, || {
            PathBuf::from(DEFAULT_EXPORT_DIR)
        });
        let timeout_secs = config::resolve(
            overrides.timeout_secs,
            file.request_timeout_secs,
            || DEFAULT_TIMEOUT_SECS,
        );

        Ok(Self {
            store_url,
            engine_url,
            export_dir,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Engine URL, or a `Config` error naming how to set it
    pub fn require_engine_url(&self) -> halunder_common::Result<&str> {
        self.engine_url.as_deref().ok_or_else(|| {
            halunder_common::Error::Config(
                "no processing engine configured: pass --engine-url, set HALUNDER_ENGINE_URL, \
                 or add engine_url to the config file"
                    .to_string(),
            )
        })
    }
}
