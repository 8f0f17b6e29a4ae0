//! Search module
//!
//! Client for the product search service used by shopping skills

pub mod client;

pub use client::SearchClient;
