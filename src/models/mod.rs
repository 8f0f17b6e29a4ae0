//! Data models module
//!
//! This module contains all data structures used throughout the crate

pub mod memory;
pub mod message;
pub mod product;

// Re-export commonly used models
pub use memory::{MemoryEntry, StoredMemory};
pub use message::{Message, MessageUser};
pub use product::{Bucket, Product};
