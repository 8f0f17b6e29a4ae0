//! Bundled skills
//!
//! Skills hosted by the bot binary

pub mod preferences;

pub use preferences::PreferencesSkill;
