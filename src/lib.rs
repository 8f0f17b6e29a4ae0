//! Skillflow
//!
//! Step-sequenced conversational skills. A skill is an ordered list of
//! steps; the [`Sequencer`] drives one user through them one message at a
//! time, and per-user memory lets returning users skip steps they have
//! already answered.

pub mod config;
pub mod database;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod search;
pub mod skills;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{SkillflowError, Result};

// Re-export main components for easy access
pub use memory::{Memory, MemoryStore, InMemoryStore, PgMemoryStore};
pub use models::{MemoryEntry, Message};
pub use search::SearchClient;
pub use state::{Completion, Sequencer, SessionRegistry, Skill, Step, StepRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
