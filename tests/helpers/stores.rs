//! Memory stores and sequencer setup for tests

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use async_trait::async_trait;
use skillflow::{InMemoryStore, MemoryStore, Result, Sequencer, SkillflowError};
use super::recording::RecordingStep;

/// Store whose every call fails, counting attempts
#[derive(Debug, Default)]
pub struct UnreachableStore {
    pub calls: AtomicUsize,
}

impl UnreachableStore {
    fn fail<T>(&self) -> Result<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(SkillflowError::Store("connection refused".to_string()))
    }
}

#[async_trait]
impl MemoryStore for UnreachableStore {
    async fn get(&self, _package: &str, _user_id: i64, _key: &str) -> Result<Option<Vec<u8>>> {
        self.fail()
    }

    async fn set(&self, _package: &str, _user_id: i64, _key: &str, _value: &[u8]) -> Result<()> {
        self.fail()
    }

    async fn forget_all(&self, _package: &str, _user_id: i64) -> Result<u64> {
        self.fail()
    }
}

/// Sequencer over a fresh in-memory store with the given steps
pub fn recording_sequencer(package: &str, steps: &[&RecordingStep]) -> (Arc<InMemoryStore>, Sequencer) {
    let store = Arc::new(InMemoryStore::new());
    let mut sequencer = Sequencer::new(package, store.clone());
    sequencer.set_steps([steps.iter().map(|s| s.boxed()).collect::<Vec<_>>()]);
    (store, sequencer)
}
