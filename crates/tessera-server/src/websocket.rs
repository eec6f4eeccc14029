//! Websocket notifications about fragment and template changes.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Messages pushed to connected builder clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveMessage {
    /// Connection established
    Connected,

    /// A fragment was added, edited or removed; the library should reload
    ComponentsChanged {
        /// Changed file
        path: String,
    },

    /// A template changed; the preview should re-render
    TemplatesChanged {
        /// Changed file
        path: String,
    },
}

/// Hub for broadcasting change messages to all connected clients.
#[derive(Debug, Clone)]
pub struct LiveHub {
    sender: broadcast::Sender<LiveMessage>,
}

impl LiveHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    /// Send a message to all connected clients.
    pub fn send(&self, msg: LiveMessage) {
        // No receivers is fine
        let _ = self.sender.send(msg);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LiveMessage> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for LiveHub {
    fn default() -> Self {
        Self::new()
    }
}
