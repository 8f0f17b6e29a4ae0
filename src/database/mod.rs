//! Database module
//!
//! This module handles database connections and migrations

pub mod connection;

// Re-export commonly used database components
pub use connection::{DatabasePool, DatabaseConfig, create_pool, run_migrations, health_check};
