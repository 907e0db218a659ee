//! Postboard API Library
//!
//! This crate contains the server components for Postboard: a message board
//! whose posts are pushed to every connected browser over WebSockets.

pub mod config;
pub mod error;
pub mod routes;
pub mod security;
pub mod state;
pub mod websocket;

pub use config::Config;
pub use error::{EventError, EventResult};
pub use state::AppState;
