//! WebSocket event types and serialization
//!
//! Defines all client-to-server and server-to-client event types
//! with type-safe serde serialization.

use postboard_shared::{NewPost, Post, PostId};
use serde::{Deserialize, Serialize};

use crate::error::{EventError, EventResult};

// =============================================================================
// Client-to-Server Events
// =============================================================================

/// Events sent from client to server
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Create a post and broadcast it to everyone
    SubmitPost(SubmitPost),

    /// Delete a post and broadcast its removal
    DeletePost { id: PostId },

    /// Ask for the recent posts again
    RequestSnapshot,

    /// Heartbeat ping to keep connection alive
    Ping,
}

impl ClientEvent {
    /// Wire name of the event
    pub fn kind(&self) -> &'static str {
        match self {
            ClientEvent::SubmitPost(_) => "submit_post",
            ClientEvent::DeletePost { .. } => "delete_post",
            ClientEvent::RequestSnapshot => "request_snapshot",
            ClientEvent::Ping => "ping",
        }
    }
}

/// Payload of a `submit_post` event
///
/// Every field may be absent on the wire; presence is checked by
/// [`SubmitPost::validate`] so that a missing field is a silent rejection
/// rather than a malformed frame.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitPost {
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl SubmitPost {
    /// Presence checks on the submitted fields
    pub fn validate(self, require_title: bool) -> EventResult<NewPost> {
        let author = non_blank(self.author).ok_or_else(|| missing("author"))?;
        let message = non_blank(self.message).ok_or_else(|| missing("message"))?;
        let title = non_blank(self.title);
        if require_title && title.is_none() {
            return Err(missing("title"));
        }

        Ok(NewPost {
            author: Some(author),
            title,
            message,
        })
    }
}

fn non_blank(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}

fn missing(field: &str) -> EventError {
    EventError::Validation(format!("{field} is required"))
}

// =============================================================================
// Server-to-Client Events
// =============================================================================

/// Events sent from server to client
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Recent posts, newest first (sent to one client)
    Snapshot { posts: Vec<Post> },

    /// A post was created
    PostAdded { post: Post },

    /// A post was deleted
    PostRemoved { id: PostId },

    /// Heartbeat response
    Pong,
}

impl ServerEvent {
    /// Wire name of the event
    pub fn kind(&self) -> &'static str {
        match self {
            ServerEvent::Snapshot { .. } => "snapshot",
            ServerEvent::PostAdded { .. } => "post_added",
            ServerEvent::PostRemoved { .. } => "post_removed",
            ServerEvent::Pong => "pong",
        }
    }
}
