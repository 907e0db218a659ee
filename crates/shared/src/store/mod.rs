//! Post store adapter
//!
//! A thin wrapper over a persistent collection of posts. The WebSocket
//! layer is its only caller and only ever needs three operations: insert,
//! delete by id, and list newest first.
//!
//! - [`PgPostStore`]: PostgreSQL through a shared `sqlx` pool
//! - [`MemoryPostStore`]: in-process collection, used by tests and local runs

mod memory;
mod postgres;

pub use memory::MemoryPostStore;
pub use postgres::PgPostStore;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::{NewPost, Post, PostId};

/// Persistent collection of posts
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Persist a post, assigning its id and creation time
    async fn insert(&self, post: NewPost) -> StoreResult<Post>;

    /// Delete a post. Deleting an id that does not exist is a no-op.
    async fn delete_by_id(&self, id: PostId) -> StoreResult<()>;

    /// Posts ordered by `created_at` descending, capped at `limit` when given
    async fn find_recent(&self, limit: Option<usize>) -> StoreResult<Vec<Post>>;

    /// Check that the backing store is reachable
    async fn ping(&self) -> StoreResult<()>;
}

/// Reject posts the collection would refuse to hold
pub(crate) fn validate_new_post(post: &NewPost) -> StoreResult<()> {
    if post.message.is_empty() {
        return Err(crate::StoreError::ValidationFailed(
            "message must not be empty".to_string(),
        ));
    }
    Ok(())
}
