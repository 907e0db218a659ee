//! Global WebSocket state management
//!
//! Maintains the registry of live connections and fans events out to them.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::connection::Connection;
use super::events::ServerEvent;

/// Global WebSocket state shared across all connections
#[derive(Clone)]
pub struct WebSocketState {
    /// All active connections indexed by session_id
    pub connections: Arc<RwLock<HashMap<Uuid, Arc<Connection>>>>,
}

impl WebSocketState {
    /// Create new WebSocket state
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Add a connection
    pub async fn add_connection(&self, conn: Connection) -> Arc<Connection> {
        let conn = Arc::new(conn);
        let mut connections = self.connections.write().await;
        connections.insert(conn.session_id, Arc::clone(&conn));

        tracing::info!(
            session_id = %conn.session_id,
            total_connections = connections.len(),
            "WebSocket connection added"
        );

        conn
    }

    /// Remove a connection
    pub async fn remove_connection(&self, session_id: &Uuid) {
        let mut connections = self.connections.write().await;
        if let Some(conn) = connections.remove(session_id) {
            let open_for = time::OffsetDateTime::now_utc() - conn.connected_at;
            tracing::info!(
                session_id = %session_id,
                remaining_connections = connections.len(),
                open_secs = open_for.whole_seconds(),
                "WebSocket connection removed"
            );
        }
    }

    /// Get a connection by session ID
    pub async fn get_connection(&self, session_id: &Uuid) -> Option<Arc<Connection>> {
        let connections = self.connections.read().await;
        connections.get(session_id).cloned()
    }

    /// Broadcast an event to every connection
    ///
    /// Silently ignores send errors (closed connections are removed by their
    /// own reader loop). Returns the number of connections that accepted
    /// the event.
    pub async fn broadcast(&self, event: ServerEvent) -> usize {
        let connections = self.connections.read().await;
        let mut success_count = 0;
        let mut failed_count = 0;

        for conn in connections.values() {
            match conn.send(event.clone()) {
                Ok(()) => success_count += 1,
                Err(_) => {
                    failed_count += 1;
                    tracing::warn!(
                        session_id = %conn.session_id,
                        "Failed to send event to connection (likely closed)"
                    );
                }
            }
        }

        tracing::debug!(
            event_type = event.kind(),
            recipients = success_count,
            failed = failed_count,
            "Broadcast event to all connections"
        );

        success_count
    }

    /// Get total number of active connections
    pub async fn connection_count(&self) -> usize {
        let connections = self.connections.read().await;
        connections.len()
    }

    /// Get statistics about the WebSocket state
    pub async fn get_stats(&self) -> WebSocketStats {
        WebSocketStats {
            active_connections: self.connection_count().await,
        }
    }
}

impl Default for WebSocketState {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about WebSocket connections
#[derive(Debug, Clone)]
pub struct WebSocketStats {
    /// Number of active connections
    pub active_connections: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_add_and_remove_connection() {
        let state = WebSocketState::new();
        let (tx, _rx) = mpsc::unbounded_channel();

        let conn = Connection::new(tx);
        let session_id = conn.session_id;

        // Add connection
        let added_conn = state.add_connection(conn).await;
        assert_eq!(state.connection_count().await, 1);
        assert_eq!(added_conn.session_id, session_id);
        assert!(state.get_connection(&session_id).await.is_some());

        // Remove connection
        state.remove_connection(&session_id).await;
        assert_eq!(state.connection_count().await, 0);
        assert!(state.get_connection(&session_id).await.is_none());

        // Removing twice is harmless
        state.remove_connection(&session_id).await;
    }

    #[tokio::test]
    async fn test_broadcast_reaches_every_connection_once() {
        let state = WebSocketState::new();

        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        state.add_connection(Connection::new(tx1)).await;
        state.add_connection(Connection::new(tx2)).await;

        let delivered = state.broadcast(ServerEvent::Pong).await;
        assert_eq!(delivered, 2);

        assert_eq!(rx1.try_recv().unwrap(), ServerEvent::Pong);
        assert_eq!(rx2.try_recv().unwrap(), ServerEvent::Pong);
        assert!(rx1.try_recv().is_err());
        assert!(rx2.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_skips_closed_connections() {
        let state = WebSocketState::new();

        let (tx1, rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        state.add_connection(Connection::new(tx1)).await;
        state.add_connection(Connection::new(tx2)).await;
        drop(rx1);

        let delivered = state.broadcast(ServerEvent::Pong).await;
        assert_eq!(delivered, 1);
        assert!(rx2.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_stats() {
        let state = WebSocketState::new();
        let (tx, _rx) = mpsc::unbounded_channel();

        state.add_connection(Connection::new(tx)).await;

        let stats = state.get_stats().await;
        assert_eq!(stats.active_connections, 1);
    }
}
