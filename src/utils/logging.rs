//! Logging configuration and setup
//!
//! This module provides logging initialization and the structured logging
//! helpers used by the sequencer and the transport layer.

use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::{Result, SkillflowError};

/// Initialize logging based on configuration
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "skillflow.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(non_blocking))
        .try_init()
        .map_err(|e| SkillflowError::Config(format!("Failed to install subscriber: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log a step transition inside a package
pub fn log_step_transition(pkg: &str, user_id: i64, from: usize, to: usize) {
    debug!(
        pkg = pkg,
        user_id = user_id,
        from = from,
        to = to,
        "Step transition"
    );
}

/// Log a sequence reset
pub fn log_sequence_reset(pkg: &str, user_id: i64) {
    debug!(pkg = pkg, user_id = user_id, "Sequence reset");
}

/// Log a step skipped because a remembered preference satisfies it
pub fn log_memory_skip(pkg: &str, user_id: i64, step: usize, key: &str) {
    info!(
        pkg = pkg,
        user_id = user_id,
        step = step,
        key = key,
        "Step satisfied from memory, skipping"
    );
}

/// Log an entry hook that produced no prompt
pub fn log_empty_prompt(pkg: &str, step: usize) {
    warn!(pkg = pkg, state = step, "OnEntry returned \"\"");
}
