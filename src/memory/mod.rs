//! Memory module
//!
//! Persisted per-user preferences that let skills skip steps the user has
//! already answered.

pub mod handle;
pub mod in_memory;
pub mod postgres;
pub mod store;

pub use handle::Memory;
pub use in_memory::InMemoryStore;
pub use postgres::PgMemoryStore;
pub use store::MemoryStore;
