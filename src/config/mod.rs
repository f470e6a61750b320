//! Configuration management for the security checker

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::error::ValidationError;
use crate::filter::Pipeline;
use crate::guard::{FilterKind, GuardConfig, RequestGuard};
use crate::redirect::{PathRedirector, ASSETS_PATH, RESOURCE_PATH};

pub mod loader;
pub mod validation;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub redirect: RedirectConfig,

    #[serde(default)]
    pub guard: GuardConfig,

    /// Filters applied to every request, in order
    #[serde(default = "default_pipeline")]
    pub pipeline: Vec<FilterKind>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

/// Path redirection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectConfig {
    /// Public prefixes rewritten to the asset path
    #[serde(default = "default_redirect_paths")]
    pub paths: Vec<String>,

    /// Internal static asset path
    #[serde(default = "default_asset_path")]
    pub asset_path: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server port
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Server host
    #[serde(default = "default_server_host")]
    pub host: String,
}

// Default value functions
fn default_redirect_paths() -> Vec<String> { vec![RESOURCE_PATH.to_string()] }
fn default_asset_path() -> String { ASSETS_PATH.to_string() }
fn default_pipeline() -> Vec<FilterKind> { vec![FilterKind::RedirectPaths] }
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }
fn default_server_port() -> u16 { 8080 }
fn default_server_host() -> String { "0.0.0.0".to_string() }

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            paths: default_redirect_paths(),
            asset_path: default_asset_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            host: default_server_host(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::error::Result<Self> {
        let config = loader::load_config(path)?;
        validation::validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn from_file_with_env<P: AsRef<Path>>(path: P) -> crate::error::Result<Self> {
        let config = loader::load_config_with_env(path)?;
        validation::validate_config(&config)?;
        Ok(config)
    }

    /// Validate this configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_config(self)
    }

    /// Create default configuration
    pub fn default_config() -> Self {
        Self {
            redirect: RedirectConfig::default(),
            guard: GuardConfig::default(),
            pipeline: default_pipeline(),
            logging: LoggingConfig::default(),
            server: ServerConfig::default(),
        }
    }

    /// Assemble the configured filters into a pipeline
    pub fn build_pipeline(&self) -> Result<Pipeline, ValidationError> {
        let guard = Arc::new(RequestGuard::new(self.guard.clone()));
        self.build_pipeline_with_guard(guard)
    }

    /// Assemble the pipeline around an existing guard, e.g. one with an injected clock
    pub fn build_pipeline_with_guard(
        &self,
        guard: Arc<RequestGuard>,
    ) -> Result<Pipeline, ValidationError> {
        let mut pipeline = Pipeline::new();

        for kind in &self.pipeline {
            match guard.filter(*kind) {
                Some(filter) => pipeline.push(filter),
                None => {
                    let redirector = PathRedirector::new(self.redirect.paths.clone())?
                        .with_asset_path(self.redirect.asset_path.clone());
                    pipeline.push(Box::new(redirector));
                }
            }
        }

        Ok(pipeline)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.redirect.paths, vec!["/shopback/resource".to_string()]);
    }

    #[test]
    fn test_build_pipeline_order() {
        let mut config = Config::default_config();
        config.pipeline = vec![
            FilterKind::TrimQueryString,
            FilterKind::RedirectPaths,
            FilterKind::CheckTimestamp,
        ];

        let pipeline = config.build_pipeline().unwrap();
        assert_eq!(
            pipeline.names(),
            vec!["trim_query_string", "redirect_paths", "check_timestamp"]
        );
    }

    #[test]
    fn test_build_pipeline_empty_paths() {
        let mut config = Config::default_config();
        config.redirect.paths.clear();
        assert!(config.build_pipeline().is_err());

        // unused redirector does not need paths
        config.pipeline = vec![FilterKind::CheckHost];
        assert!(config.build_pipeline().is_ok());
    }
}
