//! Package-scoped memory handle
//!
//! [`Memory`] is what skills and the sequencer talk to. It serializes
//! values, namespaces them by package, and swallows store failures: a failed
//! write is logged and dropped, a failed read looks exactly like a missing
//! value.

use std::sync::Arc;
use serde::Serialize;
use tracing::error;
use crate::models::{MemoryEntry, Message};
use super::store::MemoryStore;

#[derive(Clone)]
pub struct Memory {
    store: Arc<dyn MemoryStore>,
    package_id: String,
}

impl Memory {
    pub fn new(store: Arc<dyn MemoryStore>, package_id: impl Into<String>) -> Self {
        Self {
            store,
            package_id: package_id.into(),
        }
    }

    pub fn package_id(&self) -> &str {
        &self.package_id
    }

    /// Underlying store, shared with other packages
    pub fn store(&self) -> Arc<dyn MemoryStore> {
        Arc::clone(&self.store)
    }

    /// Persist `value` under `key` for the message author
    pub async fn remember<T: Serialize + ?Sized>(&self, msg: &Message, key: &str, value: &T) {
        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(pkg = %self.package_id, key = key, error = %e, "marshalling memory value to json");
                return;
            }
        };

        if let Err(e) = self.store.set(&self.package_id, msg.user.id, key, &bytes).await {
            error!(pkg = %self.package_id, user_id = msg.user.id, key = key, error = %e,
                   "setting memory");
        }
    }

    /// Read the entry stored under `key`; empty when missing or unreadable
    pub async fn recall(&self, msg: &Message, key: &str) -> MemoryEntry {
        match self.store.get(&self.package_id, msg.user.id, key).await {
            Ok(Some(value)) => MemoryEntry::new(key, value),
            Ok(None) => MemoryEntry::empty(key),
            Err(e) => {
                error!(pkg = %self.package_id, user_id = msg.user.id, key = key, error = %e,
                       "getting memory");
                MemoryEntry::empty(key)
            }
        }
    }

    pub async fn has_memory(&self, msg: &Message, key: &str) -> bool {
        !self.recall(msg, key).await.is_empty()
    }

    /// Drop everything the message author has stored for this package
    pub async fn forget_all(&self, msg: &Message) {
        if let Err(e) = self.store.forget_all(&self.package_id, msg.user.id).await {
            error!(pkg = %self.package_id, user_id = msg.user.id, error = %e, "clearing memory");
        }
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory")
            .field("package_id", &self.package_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use crate::memory::InMemoryStore;
    use crate::utils::errors::{Result, SkillflowError};

    struct BrokenStore;

    #[async_trait]
    impl MemoryStore for BrokenStore {
        async fn get(&self, _: &str, _: i64, _: &str) -> Result<Option<Vec<u8>>> {
            Err(SkillflowError::Store("connection refused".to_string()))
        }

        async fn set(&self, _: &str, _: i64, _: &str, _: &[u8]) -> Result<()> {
            Err(SkillflowError::Store("connection refused".to_string()))
        }

        async fn forget_all(&self, _: &str, _: i64) -> Result<u64> {
            Err(SkillflowError::Store("connection refused".to_string()))
        }
    }

    struct NotSerializable;

    impl Serialize for NotSerializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> std::result::Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("refusing to serialize"))
        }
    }

    fn memory() -> (Arc<InMemoryStore>, Memory) {
        let store = Arc::new(InMemoryStore::new());
        let memory = Memory::new(store.clone(), "shop");
        (store, memory)
    }

    #[tokio::test]
    async fn test_remember_then_recall() {
        let (_, memory) = memory();
        let msg = Message::new(7, "blue");

        memory.remember(&msg, "color", "blue").await;

        let entry = memory.recall(&msg, "color").await;
        assert_eq!(entry.key, "color");
        assert_eq!(entry.decode::<String>().unwrap(), Some("blue".to_string()));
        assert!(memory.has_memory(&msg, "color").await);
    }

    #[tokio::test]
    async fn test_remember_structured_value() {
        let (_, memory) = memory();
        let msg = Message::new(7, "");
        let mut sizes = HashMap::new();
        sizes.insert("shirt".to_string(), "M".to_string());

        memory.remember(&msg, "sizes", &sizes).await;

        let decoded: HashMap<String, String> = memory.recall(&msg, "sizes").await.decode().unwrap().unwrap();
        assert_eq!(decoded, sizes);
    }

    #[tokio::test]
    async fn test_missing_memory_is_empty() {
        let (_, memory) = memory();
        let msg = Message::new(7, "");

        assert!(memory.recall(&msg, "color").await.is_empty());
        assert!(!memory.has_memory(&msg, "color").await);
    }

    #[tokio::test]
    async fn test_memory_is_scoped_to_package() {
        let (store, memory) = memory();
        let other = Memory::new(store, "weather");
        let msg = Message::new(7, "");

        memory.remember(&msg, "color", "blue").await;
        assert!(!other.has_memory(&msg, "color").await);
    }

    #[tokio::test]
    async fn test_serialization_failure_aborts_write() {
        let (store, memory) = memory();
        let msg = Message::new(7, "");

        memory.remember(&msg, "color", &NotSerializable).await;

        assert!(store.is_empty().await);
        assert!(!memory.has_memory(&msg, "color").await);
    }

    #[tokio::test]
    async fn test_store_failures_degrade_to_absence() {
        let memory = Memory::new(Arc::new(BrokenStore), "shop");
        let msg = Message::new(7, "");

        memory.remember(&msg, "color", "blue").await;
        memory.forget_all(&msg).await;

        let entry = memory.recall(&msg, "color").await;
        assert_eq!(entry, MemoryEntry::empty("color"));
        assert!(!memory.has_memory(&msg, "color").await);
    }
}
