//! Service configuration.
//!
//! The only setting is `service.url`, read from a TOML `[service]` table and
//! optionally overridden by the `SERVICE_URL` environment variable.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

pub const SERVICE_URL_ENV: &str = "SERVICE_URL";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub service: ServiceSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceSection {
    /// Base URL of the remote service.
    #[serde(default)]
    pub url: Option<String>,
}

impl ServiceConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            service: ServiceSection { url: Some(url.into()) },
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Read `path` and apply the environment override.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&raw)?;
        config.apply_env();
        Ok(config)
    }

    /// Replace `service.url` with `SERVICE_URL` when that is set and non-empty.
    pub fn apply_env(&mut self) {
        self.apply_override(std::env::var(SERVICE_URL_ENV).ok());
    }

    fn apply_override(&mut self, value: Option<String>) {
        if let Some(url) = value.filter(|v| !v.is_empty()) {
            self.service.url = Some(url);
        }
    }

    pub fn service_url(&self) -> Result<&str, ConfigError> {
        self.service
            .url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingUrl)
    }
}
