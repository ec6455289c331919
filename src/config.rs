//! Runtime configuration
//!
//! Defaults can be overridden by environment variables:
//! - `HAVENLY_STORE_DIR`: directory of the file-backed profile store
//! - `HAVENLY_CATALOG`: JSON catalog to use instead of the built-in one
//! - `HAVENLY_LOG`: tracing filter directive

use std::ffi::OsString;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const STORE_DIR_VAR: &str = "HAVENLY_STORE_DIR";
pub const CATALOG_VAR: &str = "HAVENLY_CATALOG";
pub const LOG_VAR: &str = "HAVENLY_LOG";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Where favorites and bookings are persisted
    pub store_dir: PathBuf,
    /// Catalog asset; `None` uses the built-in listings
    pub catalog_path: Option<PathBuf>,
    /// Log filter, e.g. `havenly=debug`
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from(".havenly"),
            catalog_path: None,
            log_filter: "havenly=info".to_string(),
        }
    }
}

impl Config {
    /// Defaults overlaid with the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var_os(var))
    }

    /// Defaults overlaid with whatever `lookup` returns for each variable
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<OsString>,
    {
        let mut config = Self::default();

        if let Some(dir) = non_empty(STORE_DIR_VAR, lookup(STORE_DIR_VAR))? {
            config.store_dir = PathBuf::from(dir);
        }
        if let Some(path) = non_empty(CATALOG_VAR, lookup(CATALOG_VAR))? {
            config.catalog_path = Some(PathBuf::from(path));
        }
        if let Some(filter) = non_empty(LOG_VAR, lookup(LOG_VAR))? {
            config.log_filter = filter
                .into_string()
                .map_err(|_| ConfigError::NotUnicode(LOG_VAR))?;
        }

        Ok(config)
    }
}

fn non_empty(var: &'static str, value: Option<OsString>) -> Result<Option<OsString>, ConfigError> {
    match value {
        Some(v) if v.is_empty() => Err(ConfigError::Empty(var)),
        other => Ok(other),
    }
}
