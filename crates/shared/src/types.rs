//! Board types shared between the store and the WebSocket layer

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Author stored when a post is created without one
pub const DEFAULT_AUTHOR: &str = "Anonymous";

// =============================================================================
// ID Wrappers
// =============================================================================

/// Post ID wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub Uuid);

impl PostId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PostId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for PostId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// =============================================================================
// Posts
// =============================================================================

/// A post as persisted by the store and delivered to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub author: String,
    pub title: String,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A post that has not been persisted yet
///
/// The store assigns `id` and `created_at`. A missing author is stored as
/// [`DEFAULT_AUTHOR`] and a missing title as an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewPost {
    pub author: Option<String>,
    pub title: Option<String>,
    pub message: String,
}

impl NewPost {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            author: None,
            title: None,
            message: message.into(),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Author to persist, falling back to [`DEFAULT_AUTHOR`]
    pub fn author_or_default(&self) -> &str {
        match self.author.as_deref() {
            Some(author) if !author.is_empty() => author,
            _ => DEFAULT_AUTHOR,
        }
    }

    /// Title to persist (empty when absent)
    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_post_serializes_camel_case() {
        let post = Post {
            id: PostId(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap()),
            author: "Ana".to_string(),
            title: String::new(),
            message: "hi".to_string(),
            created_at: datetime!(2025-11-02 10:20:35 UTC),
        };

        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["id"], "550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(value["author"], "Ana");
        assert_eq!(value["title"], "");
        assert_eq!(value["createdAt"], "2025-11-02T10:20:35Z");
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn test_new_post_defaults() {
        let post = NewPost::new("hello");
        assert_eq!(post.author_or_default(), DEFAULT_AUTHOR);
        assert_eq!(post.title_or_empty(), "");

        let post = NewPost::new("hello").with_author("").with_title("Greeting");
        assert_eq!(post.author_or_default(), DEFAULT_AUTHOR);
        assert_eq!(post.title_or_empty(), "Greeting");
    }
}
