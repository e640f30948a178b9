//! Mutation notification bus.
//!
//! Every successful write against a record collection publishes exactly one
//! notification carrying the collection tag, after the transaction commits
//! and before the write returns to its caller. The bus is a single tokio
//! broadcast channel; publishing with no subscribers is a no-op.

use tokio::sync::broadcast;

use crate::records::Collection;

/// Channel capacity for mutation notifications.
const CHANNEL_CAPACITY: usize = 100;

/// Broadcast bus for `mutated(collection)` notifications.
#[derive(Debug, Clone)]
pub struct MutationBus {
    sender: broadcast::Sender<Collection>,
}

impl MutationBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Publishes a mutation notification for `collection`.
    ///
    /// A send with no live receivers is fine; nothing is listening yet.
    pub fn publish(&self, collection: Collection) {
        let _ = self.sender.send(collection);
    }

    /// Subscribes to mutation notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<Collection> {
        self.sender.subscribe()
    }
}

impl Default for MutationBus {
    fn default() -> Self {
        Self::new()
    }
}
