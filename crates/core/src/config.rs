//! Runtime configuration for the helpers.
//!
//! Everything here has a sensible default; the environment can override the
//! defaults once per process through [`UtilsConfig::global`].

use crate::constants::{
    COMMONUTIL_JSON_SKIP_NULLS_VAR, COMMONUTIL_LOG_VAR, COMMONUTIL_ZIP_BUFFER_SIZE_VAR,
    DEFAULT_LOG_FILTER, DEFAULT_ZIP_BUFFER_SIZE,
};
use crate::errors::{Error, Result};
use once_cell::sync::Lazy;
use std::env;

static GLOBAL: Lazy<UtilsConfig> = Lazy::new(|| match UtilsConfig::from_env() {
    Ok(config) => config,
    Err(e) => {
        tracing::warn!(error = %e, "ignoring invalid environment configuration");
        UtilsConfig::default()
    }
});

/// Settings shared by the file, archive and JSON helpers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtilsConfig {
    /// Default `tracing` filter directive when no env filter is set
    pub log_filter: String,
    /// Buffer size used when copying data into and out of archives
    pub zip_buffer_size: usize,
    /// Drop `null` object members when serializing JSON
    pub json_skip_nulls: bool,
}

impl Default for UtilsConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            zip_buffer_size: DEFAULT_ZIP_BUFFER_SIZE,
            json_skip_nulls: true,
        }
    }
}

impl UtilsConfig {
    /// Process-wide configuration, read from the environment on first use
    pub fn global() -> &'static UtilsConfig {
        &GLOBAL
    }

    /// Build a configuration from `COMMONUTIL_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup
    ///
    /// Missing keys keep their defaults; present but malformed values are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(filter) = lookup(COMMONUTIL_LOG_VAR) {
            let filter = filter.trim();
            if !filter.is_empty() {
                config.log_filter = filter.to_string();
            }
        }

        if let Some(raw) = lookup(COMMONUTIL_ZIP_BUFFER_SIZE_VAR) {
            let size: usize = raw.trim().parse().map_err(|e| {
                Error::configuration(format!(
                    "{COMMONUTIL_ZIP_BUFFER_SIZE_VAR} must be a positive integer, got '{raw}': {e}"
                ))
            })?;
            config = config.with_zip_buffer_size(size)?;
        }

        if let Some(raw) = lookup(COMMONUTIL_JSON_SKIP_NULLS_VAR) {
            config.json_skip_nulls = parse_bool(&raw).ok_or_else(|| {
                Error::configuration(format!(
                    "{COMMONUTIL_JSON_SKIP_NULLS_VAR} must be a boolean, got '{raw}'"
                ))
            })?;
        }

        Ok(config)
    }

    /// Set the fallback `tracing` filter directive
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Set the archive copy buffer size; zero is rejected
    pub fn with_zip_buffer_size(mut self, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::configuration("zip buffer size must be greater than zero"));
        }
        self.zip_buffer_size = size;
        Ok(self)
    }

    /// Choose whether `null` object members are dropped when serializing
    pub fn with_json_skip_nulls(mut self, skip: bool) -> Self {
        self.json_skip_nulls = skip;
        self
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
