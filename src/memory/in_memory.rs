//! In-process memory store
//!
//! Keeps entries in a map guarded by an async lock. Used for tests and
//! for running skills without a database.

use std::collections::HashMap;
use async_trait::async_trait;
use tokio::sync::RwLock;
use crate::utils::errors::Result;
use super::store::MemoryStore;

type EntryKey = (String, i64, String);

#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<EntryKey, Vec<u8>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries across all packages and users
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl MemoryStore for InMemoryStore {
    async fn get(&self, package: &str, user_id: i64, key: &str) -> Result<Option<Vec<u8>>> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(&(package.to_string(), user_id, key.to_string()))
            .cloned())
    }

    async fn set(&self, package: &str, user_id: i64, key: &str, value: &[u8]) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert((package.to_string(), user_id, key.to_string()), value.to_vec());
        Ok(())
    }

    async fn forget_all(&self, package: &str, user_id: i64) -> Result<u64> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|(pkg, user, _), _| !(pkg == package && *user == user_id));
        Ok((before - entries.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_last_write_wins() {
        let store = InMemoryStore::new();
        store.set("pkg", 1, "color", b"\"red\"").await.unwrap();
        store.set("pkg", 1, "color", b"\"blue\"").await.unwrap();

        assert_eq!(store.get("pkg", 1, "color").await.unwrap(), Some(b"\"blue\"".to_vec()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_entries_are_namespaced() {
        let store = InMemoryStore::new();
        store.set("pkg", 1, "color", b"\"red\"").await.unwrap();

        assert_eq!(store.get("other", 1, "color").await.unwrap(), None);
        assert_eq!(store.get("pkg", 2, "color").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_forget_all_only_touches_one_user() {
        let store = InMemoryStore::new();
        store.set("pkg", 1, "color", b"1").await.unwrap();
        store.set("pkg", 1, "size", b"2").await.unwrap();
        store.set("pkg", 2, "color", b"3").await.unwrap();

        assert_eq!(store.forget_all("pkg", 1).await.unwrap(), 2);
        assert_eq!(store.len().await, 1);
    }
}
