//! Configuration validation

use super::*;
use crate::guard::MAX_TIMESTAMP_WINDOW_MS;

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<(), ValidationError> {
    if config.pipeline.contains(&FilterKind::RedirectPaths) {
        validate_redirect_config(&config.redirect)?;
    }
    validate_guard_config(&config.guard)?;
    validate_logging_config(&config.logging)?;
    validate_server_config(&config.server)?;
    Ok(())
}

/// Validate redirect configuration
fn validate_redirect_config(config: &RedirectConfig) -> Result<(), ValidationError> {
    if config.paths.is_empty() {
        return Err(ValidationError::new(format!(
            "paths should insert at least one, value:{:?}",
            config.paths
        )));
    }

    if config.paths.iter().any(|p| p.is_empty()) {
        return Err(ValidationError::new(format!(
            "paths should not contain empty prefixes, value:{:?}",
            config.paths
        )));
    }

    if config.asset_path.is_empty() {
        return Err(ValidationError::new("Asset path cannot be empty"));
    }

    Ok(())
}

/// Validate guard configuration
fn validate_guard_config(config: &GuardConfig) -> Result<(), ValidationError> {
    if config.shopback_agent.is_empty() {
        return Err(ValidationError::new("Shopback agent value cannot be empty"));
    }

    if config.domain_name.is_empty() {
        return Err(ValidationError::new("Domain name cannot be empty"));
    }

    if config.timestamp_window_ms <= 0 || config.timestamp_window_ms > MAX_TIMESTAMP_WINDOW_MS {
        return Err(ValidationError::new(format!(
            "Timestamp window must be between 1 and {} ms, got {}",
            MAX_TIMESTAMP_WINDOW_MS, config.timestamp_window_ms
        )));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &LoggingConfig) -> Result<(), ValidationError> {
    match config.format.as_str() {
        "json" | "compact" | "pretty" => Ok(()),
        other => Err(ValidationError::new(format!(
            "Unknown log format '{}' (expected json, compact or pretty)",
            other
        ))),
    }
}

/// Validate server configuration
fn validate_server_config(config: &ServerConfig) -> Result<(), ValidationError> {
    if config.port == 0 {
        return Err(ValidationError::new("Server port must be greater than 0"));
    }

    if config.host.is_empty() {
        return Err(ValidationError::new("Server host cannot be empty"));
    }

    Ok(())
}
