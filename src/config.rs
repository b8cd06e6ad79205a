//! Harvest configuration: serialized defaults, then an optional TOML file,
//! then `HARVESTER_`-prefixed environment variables.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::executor::HarvestSettings;
use crate::harvest::normalize::DEFAULT_RECOGNIZED_HOST;
use crate::harvest::npms::DEFAULT_REGISTRY_URL;

/// Filter excluding deprecated, unstable and insecure packages.
pub const DEFAULT_QUERY: &str = "not:deprecated not:unstable not:insecure";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    /// Base URL of the npms.io API, without the endpoint path.
    pub registry_url: String,
    pub query: String,
    pub page_size: usize,
    /// Number of distinct repositories after which the harvest stops.
    pub target_count: usize,
    pub recognized_host: String,
    pub output_path: PathBuf,
    /// Upper bound on detail fetches per run. `None` means unbounded.
    pub max_detail_fetches: Option<usize>,
    pub request_timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            query: DEFAULT_QUERY.to_string(),
            page_size: 100,
            target_count: 100,
            recognized_host: DEFAULT_RECOGNIZED_HOST.to_string(),
            output_path: PathBuf::from("repos.json"),
            max_detail_fetches: None,
            request_timeout_secs: None,
            user_agent: concat!("repo-harvester/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HarvestConfig {
    /// Loads defaults, merges `path` when it exists, then the environment.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_figment(
            Figment::from(Serialized::defaults(HarvestConfig::default()))
                .merge(Toml::file(path))
                .merge(Env::prefixed("HARVESTER_")),
        )
    }

    /// Parses a TOML document over the defaults (useful for testing).
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Self::from_figment(
            Figment::from(Serialized::defaults(HarvestConfig::default()))
                .merge(Toml::string(toml)),
        )
    }

    fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: HarvestConfig = figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        HarvestSettings::from(self).validate()?;
        if self.registry_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "registry_url must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
