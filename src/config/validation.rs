//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::utils::errors::{Result, SigoError};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_database_config(&settings.database)?;
    validate_redis_config(&settings.redis)?;
    validate_geocoding_config(&settings.geocoding)?;
    validate_events_config(&settings.events)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(SigoError::Config("Database URL is required".to_string()));
    }

    if config.max_connections == 0 {
        return Err(SigoError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(SigoError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

/// Validate Redis configuration
fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(SigoError::Config("Redis URL is required".to_string()));
    }

    Ok(())
}

/// Validate geocoding configuration
fn validate_geocoding_config(config: &super::GeocodingConfig) -> Result<()> {
    if config.api_url.is_empty() {
        return Err(SigoError::Config(
            "Geocoding API URL is required".to_string(),
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(SigoError::Config(
            "Geocoding timeout must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate event query configuration
fn validate_events_config(config: &super::EventsConfig) -> Result<()> {
    if config.default_window_days <= 0 {
        return Err(SigoError::Config(
            "Default event window must be at least one day".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(SigoError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(SigoError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_zero_window_is_rejected() {
        let mut settings = Settings::default();
        settings.events.default_window_days = 0;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_bad_log_level_is_rejected() {
        let mut settings = Settings::default();
        settings.logging.level = "loud".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_zero_geocode_timeout_is_rejected() {
        let mut settings = Settings::default();
        settings.geocoding.timeout_seconds = 0;
        assert!(validate_settings(&settings).is_err());
    }
}
