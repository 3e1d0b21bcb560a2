//! Loader configuration with sensible defaults and RON persistence.
//!
//! Asset locations differ between a development server and a deployed build
//! (e.g. `/static/...` versus `/hello-earth/static/...`). Descriptors only hold
//! relative URLs; [`LoaderConfig::public_path`] supplies the prefix.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// What the group loader does when one model fails to build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Cancel everything scheduled so far and fail the whole entity.
    #[default]
    Abort,
    /// Log the failure and keep loading the remaining models.
    Skip,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directory native builds read assets from.
    pub asset_root: PathBuf,
    /// Prefix joined to every relative asset URL.
    pub public_path: String,
    pub failure_policy: FailurePolicy,
    /// Log level used by [`crate::init_logger`] when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("./assets"),
            public_path: String::new(),
            failure_policy: FailurePolicy::Abort,
            log_level: "info".to_string(),
        }
    }
}

impl LoaderConfig {
    pub fn from_ron_str(ron_str: &str) -> Result<Self, ConfigError> {
        ron::from_str(ron_str).map_err(ConfigError::ParseError)
    }

    /// Loads the config from `path`, falling back to defaults when the file
    /// does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("no loader config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        Self::from_ron_str(&contents)
    }

    /// Joins a descriptor URL to [`Self::public_path`].
    ///
    /// Absolute URLs (`http://`, `https://`, `data:`) pass through unchanged.
    pub fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") || url.starts_with("data:") {
            return url.to_string();
        }
        let prefix = self.public_path.trim_end_matches('/');
        let path = url.trim_start_matches('/');
        if prefix.is_empty() {
            format!("/{path}")
        } else {
            format!("{prefix}/{path}")
        }
    }
}
