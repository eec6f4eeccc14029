//! HTTP API and live preview server for tessera.
//!
//! Serves the component listing, render and export endpoints, hosts the
//! static builder UI, and pushes fragment changes over a websocket.

pub mod error;
pub mod server;
pub mod watcher;
pub mod websocket;

pub use error::ApiError;
pub use server::{router, AppState, Server, ServerConfig, ServerError};
pub use watcher::{FileWatcher, WatchEvent};
pub use websocket::{LiveHub, LiveMessage};
