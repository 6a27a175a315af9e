//! Subsystem change notifications.

use super::ConnectionId;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::trace;

/// Subsystems the server knows about. `idle` accepts other names too.
pub const SUBSYSTEMS: &[&str] = &[
    "database",
    "update",
    "stored_playlist",
    "playlist",
    "player",
    "mixer",
    "output",
    "options",
    "partition",
    "sticker",
    "subscription",
    "message",
];

/// Fans subsystem events out to every connected session.
///
/// Each session owns the receiving half of an unbounded channel, so
/// publishing never blocks the engine.
#[derive(Debug, Default)]
pub struct EventHub {
    subscribers: DashMap<ConnectionId, mpsc::UnboundedSender<String>>,
}

impl EventHub {
    /// Register a connection and return the stream of its events.
    pub fn subscribe(&self, id: ConnectionId) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.insert(id, tx);
        rx
    }

    pub fn unsubscribe(&self, id: ConnectionId) {
        self.subscribers.remove(&id);
    }

    /// Publish a change of `subsystem` to every subscriber.
    pub fn notify(&self, subsystem: &str) {
        let mut stale = Vec::new();
        for entry in self.subscribers.iter() {
            if entry.value().send(subsystem.to_owned()).is_err() {
                stale.push(*entry.key());
            }
        }
        // Receivers dropped without unsubscribing. Removing while iterating
        // would deadlock the shard.
        for id in stale {
            self.subscribers.remove(&id);
        }
        trace!(subsystem, "Event published");
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
