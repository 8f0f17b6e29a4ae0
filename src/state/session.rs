//! Conversation sessions
//!
//! Holds one [`Sequencer`] per (package, user) and serializes calls to it.
//! Sequencers are built on first contact from a registered [`Skill`] and
//! dropped again by [`SessionRegistry::evict_idle`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use crate::memory::{Memory, MemoryStore};
use crate::models::Message;
use crate::utils::errors::{Result, SkillflowError};
use super::sequencer::Sequencer;

/// A pluggable conversational capability
pub trait Skill: Send + Sync {
    /// Package identifier, also the memory namespace
    fn package_id(&self) -> &str;

    /// Register steps, and optionally a reset hook, on a fresh sequencer
    fn build(&self, sequencer: &mut Sequencer);
}

type SessionKey = (String, i64);

/// One live conversation
struct Session {
    sequencer: Mutex<Sequencer>,
    last_seen: StdMutex<Instant>,
}

impl Session {
    fn new(sequencer: Sequencer) -> Self {
        Self {
            sequencer: Mutex::new(sequencer),
            last_seen: StdMutex::new(Instant::now()),
        }
    }

    fn touch(&self) {
        *self.last_seen.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = Instant::now();
    }

    fn idle_for(&self) -> Duration {
        self.last_seen.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).elapsed()
    }
}

/// Registry of skills and their live conversations
pub struct SessionRegistry {
    store: Arc<dyn MemoryStore>,
    skills: HashMap<String, Arc<dyn Skill>>,
    sessions: RwLock<HashMap<SessionKey, Arc<Session>>>,
}

impl SessionRegistry {
    pub fn new(store: Arc<dyn MemoryStore>) -> Self {
        Self {
            store,
            skills: HashMap::new(),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Register a skill; a skill with the same package id is replaced
    pub fn register(&mut self, skill: Arc<dyn Skill>) {
        info!(pkg = skill.package_id(), "Skill registered");
        self.skills.insert(skill.package_id().to_string(), skill);
    }

    pub fn has_skill(&self, package: &str) -> bool {
        self.skills.contains_key(package)
    }

    /// Drive the user's conversation with `package` by one message
    pub async fn drive(&self, package: &str, msg: &Message) -> Result<String> {
        let session = self.session(package, msg.user.id).await?;
        let mut sequencer = session.sequencer.lock().await;
        session.touch();
        Ok(sequencer.next(msg).await)
    }

    /// Start the user's conversation with `package` over
    pub async fn reset(&self, package: &str, msg: &Message) -> Result<()> {
        let session = self.session(package, msg.user.id).await?;
        session.sequencer.lock().await.reset(msg);
        session.touch();
        Ok(())
    }

    /// Drop the user's conversation with `package`; returns whether one existed
    pub async fn end(&self, package: &str, user_id: i64) -> bool {
        let removed = self.sessions.write().await
            .remove(&(package.to_string(), user_id))
            .is_some();
        if removed {
            debug!(pkg = package, user_id = user_id, "Session ended");
        }
        removed
    }

    /// Forget the user's remembered answers for `package` and end the session
    pub async fn forget(&self, package: &str, msg: &Message) {
        Memory::new(Arc::clone(&self.store), package).forget_all(msg).await;
        self.end(package, msg.user.id).await;
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop sessions without activity for at least `max_idle`; returns how many
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.idle_for() < max_idle);

        let evicted = before - sessions.len();
        if evicted > 0 {
            info!(evicted = evicted, remaining = sessions.len(), "Idle sessions evicted");
        }
        evicted
    }

    async fn session(&self, package: &str, user_id: i64) -> Result<Arc<Session>> {
        let key = (package.to_string(), user_id);

        if let Some(session) = self.sessions.read().await.get(&key) {
            return Ok(Arc::clone(session));
        }

        let skill = self.skills.get(package)
            .ok_or_else(|| SkillflowError::UnknownSkill(package.to_string()))?;

        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(key).or_insert_with(|| {
            debug!(pkg = package, user_id = user_id, "Session started");
            Arc::new(Session::new(build_sequencer(skill, Arc::clone(&self.store))))
        });

        Ok(Arc::clone(session))
    }
}

fn build_sequencer(skill: &Arc<dyn Skill>, store: Arc<dyn MemoryStore>) -> Sequencer {
    let mut sequencer = Sequencer::new(skill.package_id(), store);
    skill.build(&mut sequencer);
    sequencer
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("skills", &self.skills.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
