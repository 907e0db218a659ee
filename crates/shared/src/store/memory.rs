use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::{validate_new_post, PostStore};
use crate::error::StoreResult;
use crate::types::{NewPost, Post, PostId};

/// In-process post store
///
/// Posts live for the lifetime of the process. Creation timestamps never go
/// backwards, even if the wall clock does.
#[derive(Default)]
pub struct MemoryPostStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    /// Posts in insertion order
    posts: Vec<Post>,
    last_created_at: Option<OffsetDateTime>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored posts
    pub async fn len(&self) -> usize {
        self.inner.read().await.posts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn insert(&self, post: NewPost) -> StoreResult<Post> {
        validate_new_post(&post)?;

        let mut inner = self.inner.write().await;
        let now = OffsetDateTime::now_utc();
        let created_at = match inner.last_created_at {
            Some(last) if last > now => last,
            _ => now,
        };
        inner.last_created_at = Some(created_at);

        let stored = Post {
            id: PostId::new(),
            author: post.author_or_default().to_string(),
            title: post.title_or_empty().to_string(),
            message: post.message,
            created_at,
        };
        inner.posts.push(stored.clone());

        Ok(stored)
    }

    async fn delete_by_id(&self, id: PostId) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        let before = inner.posts.len();
        inner.posts.retain(|p| p.id != id);

        if inner.posts.len() == before {
            tracing::debug!(post_id = %id, "Delete matched no post");
        }

        Ok(())
    }

    async fn find_recent(&self, limit: Option<usize>) -> StoreResult<Vec<Post>> {
        let inner = self.inner.read().await;

        // Newest insert first; the stable sort keeps that order for equal timestamps
        let mut posts: Vec<Post> = inner.posts.iter().rev().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        if let Some(limit) = limit {
            posts.truncate(limit);
        }

        Ok(posts)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
