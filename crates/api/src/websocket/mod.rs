//! WebSocket support for the live board
//!
//! Every client holds one WebSocket. On connect it receives the recent
//! posts; after that it sees every post added or removed by any client.
//!
//! # Architecture
//!
//! - **Connection**: one client channel and its outbound sender
//! - **State**: registry of all connections, used for broadcasting
//! - **Handler**: Axum WebSocket route handler and board operations
//! - **Events**: Type-safe event definitions for client/server communication

pub mod connection;
pub mod events;
pub mod handler;
pub mod state;

pub use handler::ws_handler;
pub use state::WebSocketState;
