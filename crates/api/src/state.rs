//! Shared application state

use std::sync::Arc;

use postboard_shared::{MemoryPostStore, PostStore};

use crate::config::Config;
use crate::websocket::WebSocketState;

/// State handed to every route and WebSocket connection
#[derive(Clone)]
pub struct AppState {
    /// Post store, created once at startup
    pub store: Arc<dyn PostStore>,
    /// Registry of live WebSocket connections
    pub ws_state: WebSocketState,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn PostStore>, config: Config) -> Self {
        Self {
            store,
            ws_state: WebSocketState::new(),
            config: Arc::new(config),
        }
    }

    /// Board backed by a fresh in-memory store, for tests
    pub fn in_memory(config: Config) -> Self {
        Self::new(Arc::new(MemoryPostStore::new()), config)
    }
}
