//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub bot: BotConfig,
    pub database: DatabaseConfig,
    pub search: SearchConfig,
    pub logging: LoggingConfig,
    pub skills: SkillsConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    pub token: String,
    pub webhook_url: Option<String>,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Search service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub index: String,
    pub timeout_seconds: u64,
    pub keyword_field: String,
    pub keyword_size: u32,
    pub keyword_min_doc_count: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
}

/// Skill hosting configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SkillsConfig {
    /// Package that handles plain text messages
    pub default_package: String,
    /// Conversations idle this long are dropped from memory
    pub session_idle_minutes: u64,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    ///
    /// Values missing from both sources fall back to [`Settings::default`].
    pub fn new() -> Result<Self, config::ConfigError> {
        let defaults = config::Config::try_from(&Settings::default())?;

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("SKILLFLOW").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::SkillflowError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                token: String::new(),
                webhook_url: None,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/skillflow".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            search: SearchConfig {
                url: "http://localhost:9200".to_string(),
                username: None,
                password: None,
                index: "products".to_string(),
                timeout_seconds: 5,
                keyword_field: "Reviews.Body".to_string(),
                keyword_size: 2500,
                keyword_min_doc_count: 3,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "/var/log/skillflow".to_string(),
            },
            skills: SkillsConfig {
                default_package: "preferences".to_string(),
                session_idle_minutes: 30,
            },
        }
    }
}
