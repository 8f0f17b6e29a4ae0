//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{SkillflowError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_database_config(&settings.database)?;
    validate_search_config(&settings.search)?;
    validate_logging_config(&settings.logging)?;
    validate_skills_config(&settings.skills)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(SkillflowError::Config(
            "Bot token is required".to_string()
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(SkillflowError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(SkillflowError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(SkillflowError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate search configuration
fn validate_search_config(config: &super::SearchConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(SkillflowError::Config(
            "Search URL is required".to_string()
        ));
    }

    url::Url::parse(&config.url)?;

    if config.index.is_empty() {
        return Err(SkillflowError::Config(
            "Search index is required".to_string()
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(SkillflowError::Config(
            "Search timeout must be greater than 0".to_string()
        ));
    }

    if config.username.is_some() != config.password.is_some() {
        return Err(SkillflowError::Config(
            "Search username and password must be set together".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(SkillflowError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(SkillflowError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

/// Validate skill hosting configuration
fn validate_skills_config(config: &super::SkillsConfig) -> Result<()> {
    if config.default_package.is_empty() {
        return Err(SkillflowError::Config(
            "Default package is required".to_string()
        ));
    }

    if config.session_idle_minutes == 0 {
        return Err(SkillflowError::Config(
            "Session idle timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}
