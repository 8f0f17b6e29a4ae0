//! Test helpers module
//!
//! Shared steps, stores and setup for the integration tests.

#![allow(dead_code)]

pub mod recording;
pub mod stores;

pub use recording::*;
pub use stores::*;

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize test environment
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("skillflow=debug")
            .with_test_writer()
            .try_init();
    });
}

pub fn test_user_id() -> i64 {
    987654321
}
