//! State management module
//!
//! This module handles step sequencing and per-user conversation sessions

pub mod sequencer;
pub mod session;
pub mod step;

// Re-export commonly used state components
pub use sequencer::{ResetHook, Sequencer};
pub use session::{SessionRegistry, Skill};
pub use step::{Completion, Step, StepRecord};
