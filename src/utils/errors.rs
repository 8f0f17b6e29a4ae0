//! Error handling for Skillflow
//!
//! This module defines the main error types used throughout the crate
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for Skillflow
#[derive(Error, Debug)]
pub enum SkillflowError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Memory store error: {0}")]
    Store(String),

    #[error("Unknown skill: {0}")]
    UnknownSkill(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Search service specific errors
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Search request failed: {0}")]
    RequestFailed(String),

    #[error("Search request timed out")]
    Timeout,

    #[error("Invalid search response: {0}")]
    InvalidResponse(String),

    #[error("Search service unavailable")]
    ServiceUnavailable,
}

/// Result type alias for Skillflow operations
pub type Result<T> = std::result::Result<T, SkillflowError>;

/// Result type alias for search operations
pub type SearchResult<T> = std::result::Result<T, SearchError>;

impl SkillflowError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            SkillflowError::Database(_) => false,
            SkillflowError::Migration(_) => false,
            SkillflowError::Telegram(_) => true,
            SkillflowError::Search(_) => true,
            SkillflowError::Config(_) => false,
            SkillflowError::Store(_) => true,
            SkillflowError::UnknownSkill(_) => false,
            SkillflowError::Http(_) => true,
            SkillflowError::Serialization(_) => false,
            SkillflowError::Io(_) => true,
            SkillflowError::UrlParse(_) => false,
            SkillflowError::InvalidInput(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SkillflowError::Database(_) => ErrorSeverity::Critical,
            SkillflowError::Migration(_) => ErrorSeverity::Critical,
            SkillflowError::Config(_) => ErrorSeverity::Critical,
            SkillflowError::UnknownSkill(_) => ErrorSeverity::Warning,
            SkillflowError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_critical() {
        let err = SkillflowError::Config("missing token".to_string());
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(!err.is_recoverable());
        assert_eq!(err.to_string(), "Configuration error: missing token");
    }

    #[test]
    fn test_search_errors_are_recoverable() {
        let err: SkillflowError = SearchError::Timeout.into();
        assert!(err.is_recoverable());
        assert_eq!(err.severity(), ErrorSeverity::Error);
        assert_eq!(format!("{}", ErrorSeverity::Warning), "WARN");
    }
}
