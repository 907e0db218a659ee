//! Postboard Shared Types and Storage
//!
//! This crate contains the post model, store errors, and the post store
//! adapter used by the API server.

pub mod db;
pub mod error;
pub mod store;
pub mod types;

pub use db::*;
pub use error::*;
pub use store::{MemoryPostStore, PgPostStore, PostStore};
pub use types::*;
