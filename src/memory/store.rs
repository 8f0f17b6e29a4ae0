//! Memory store abstraction
//!
//! A memory store persists opaque values addressed by
//! `(package, user, key)`. Writes are upserts: the last write wins.

use async_trait::async_trait;
use crate::utils::errors::Result;

/// Keyed persistent store for per-user skill preferences
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Read the value stored for `(package, user, key)`
    async fn get(&self, package: &str, user_id: i64, key: &str) -> Result<Option<Vec<u8>>>;

    /// Insert or replace the value stored for `(package, user, key)`
    async fn set(&self, package: &str, user_id: i64, key: &str, value: &[u8]) -> Result<()>;

    /// Remove every value a user has stored for a package.
    /// Returns the number of removed entries.
    async fn forget_all(&self, package: &str, user_id: i64) -> Result<u64>;
}
