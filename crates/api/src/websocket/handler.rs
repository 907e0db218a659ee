//! WebSocket handler for Axum
//!
//! Bridges client channels to the post store: snapshot on connect,
//! persist-then-broadcast on submit, delete-then-broadcast on delete.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{stream::StreamExt, SinkExt};
use postboard_shared::{Post, PostId, StoreError};
use std::sync::Arc;
use tokio::{sync::mpsc, task::JoinHandle};
use uuid::Uuid;

use crate::error::EventResult;
use crate::state::AppState;

use super::{
    connection::Connection,
    events::{ClientEvent, ServerEvent, SubmitPost},
};

/// WebSocket handler - upgrades HTTP connection to WebSocket
pub async fn ws_handler(ws: WebSocketUpgrade, State(app_state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, app_state))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, app_state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    // Create channel for sending events to this connection
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();
    let conn = on_connect(&app_state, tx).await;
    let session_id = conn.session_id;

    // Spawn task to send messages to client
    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if sender.send(Message::Text(json)).await.is_err() {
                        break; // Connection closed
                    }
                }
                Err(e) => {
                    tracing::error!(error = ?e, "Failed to serialize WebSocket event");
                }
            }
        }
    });

    // Handle incoming messages
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                handle_text_frame(&text, &conn, &app_state);
            }
            Ok(Message::Close(_)) => {
                tracing::info!(session_id = %session_id, "WebSocket close frame received");
                break;
            }
            Ok(_) => {} // Ping/pong frames are answered by axum; binary is ignored
            Err(e) => {
                tracing::debug!(session_id = %session_id, error = %e, "WebSocket read error");
                break;
            }
        }
    }

    on_disconnect(&app_state, &session_id).await;
    send_task.abort();
}

/// Register a new connection and send it the recent posts
///
/// A store failure is logged and leaves the client without a snapshot; the
/// connection itself stays registered.
pub async fn on_connect(
    app_state: &AppState,
    sender: mpsc::UnboundedSender<ServerEvent>,
) -> Arc<Connection> {
    let conn = app_state.ws_state.add_connection(Connection::new(sender)).await;

    if let Err(e) = send_snapshot(app_state, &conn).await {
        tracing::error!(
            session_id = %conn.session_id,
            error = %e,
            "Failed to load posts for snapshot"
        );
    }

    conn
}

/// Release a connection. Nothing else is held per client.
pub async fn on_disconnect(app_state: &AppState, session_id: &Uuid) {
    tracing::info!(session_id = %session_id, "WebSocket connection closing");
    app_state.ws_state.remove_connection(session_id).await;
}

/// Parse a text frame and run it as a client event
///
/// Frames that are not a known client event are logged and dropped; the
/// connection stays open.
pub fn handle_text_frame(
    text: &str,
    conn: &Arc<Connection>,
    app_state: &AppState,
) -> Option<JoinHandle<()>> {
    match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => Some(spawn_client_event(
            event,
            Arc::clone(conn),
            app_state.clone(),
        )),
        Err(e) => {
            tracing::warn!(
                session_id = %conn.session_id,
                error = %e,
                frame = %text,
                "Failed to parse client event"
            );
            None
        }
    }
}

/// Run a client event on its own task
///
/// The task is not tied to the connection: an event still completes and
/// broadcasts if its sender disconnects in the meantime.
pub fn spawn_client_event(
    event: ClientEvent,
    conn: Arc<Connection>,
    app_state: AppState,
) -> JoinHandle<()> {
    tokio::spawn(async move { dispatch_client_event(event, conn, app_state).await })
}

/// Handle a client event, turning any failure into a log line
pub async fn dispatch_client_event(event: ClientEvent, conn: Arc<Connection>, app_state: AppState) {
    let event_type = event.kind();

    if let Err(e) = handle_client_event(event, &conn, &app_state).await {
        if e.is_client_error() {
            tracing::debug!(
                session_id = %conn.session_id,
                event_type,
                reason = %e,
                "Dropped client event"
            );
        } else {
            tracing::error!(
                session_id = %conn.session_id,
                event_type,
                error = %e,
                "Failed to handle client event"
            );
        }
    }
}

/// Handle client event
async fn handle_client_event(
    event: ClientEvent,
    conn: &Arc<Connection>,
    app_state: &AppState,
) -> EventResult<()> {
    match event {
        ClientEvent::SubmitPost(payload) => {
            submit_post(app_state, payload).await?;
        }

        ClientEvent::DeletePost { id } => {
            delete_post(app_state, id).await?;
        }

        ClientEvent::RequestSnapshot => {
            send_snapshot(app_state, conn).await?;
        }

        ClientEvent::Ping => {
            let _ = conn.send(ServerEvent::Pong);
        }
    }

    Ok(())
}

// =============================================================================
// Board Operations
// =============================================================================

/// Send the recent posts to one connection
pub async fn send_snapshot(app_state: &AppState, conn: &Connection) -> EventResult<()> {
    let posts = app_state
        .store
        .find_recent(app_state.config.snapshot_limit)
        .await?;

    tracing::debug!(
        session_id = %conn.session_id,
        post_count = posts.len(),
        "Sending snapshot"
    );

    if conn.send(ServerEvent::Snapshot { posts }).is_err() {
        tracing::debug!(session_id = %conn.session_id, "Connection closed before snapshot");
    }

    Ok(())
}

/// Validate and persist a post, then broadcast it to every connection
pub async fn submit_post(app_state: &AppState, payload: SubmitPost) -> EventResult<Post> {
    let new_post = payload.validate(app_state.config.require_title)?;
    let post = app_state.store.insert(new_post).await?;

    tracing::info!(post_id = %post.id, author = %post.author, "Post created");

    app_state
        .ws_state
        .broadcast(ServerEvent::PostAdded { post: post.clone() })
        .await;

    Ok(post)
}

/// Delete a post and broadcast its removal, whether or not it existed
pub async fn delete_post(app_state: &AppState, id: PostId) -> EventResult<()> {
    match app_state.store.delete_by_id(id).await {
        Ok(()) | Err(StoreError::NotFound) => {}
        Err(e) => return Err(e.into()),
    }

    tracing::info!(post_id = %id, "Post deleted");

    app_state
        .ws_state
        .broadcast(ServerEvent::PostRemoved { id })
        .await;

    Ok(())
}
