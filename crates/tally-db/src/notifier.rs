//! # Broadcast Change Notifier
//!
//! A `ChangeNotifier` implementation over a tokio broadcast channel.
//! UI panels and report builders subscribe and re-query whatever entity
//! kinds they display; the engine never waits on them.
//!
//! Losing a notification is acceptable (the channel is bounded and lagging
//! receivers skip ahead); the stores remain the source of truth.

use tokio::sync::broadcast;
use tracing::trace;

use tally_core::{ChangeNotifier, EntityKind};

/// Default capacity of the broadcast channel. Change events are tiny and
/// consumers only use them as refresh hints, so a small buffer suffices.
const DEFAULT_CAPACITY: usize = 64;

/// Fan-out notifier backed by `tokio::sync::broadcast`.
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<EntityKind>,
}

impl BroadcastNotifier {
    /// Creates a notifier with the default buffer capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a notifier with an explicit buffer capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        BroadcastNotifier { sender }
    }

    /// Subscribes an observer. Each receiver sees every event sent after
    /// the subscription, modulo lag.
    pub fn subscribe(&self) -> broadcast::Receiver<EntityKind> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeNotifier for BroadcastNotifier {
    fn changed(&self, entity: EntityKind) {
        trace!(entity = %entity, "change notification");
        // send only fails when there are no receivers; that is fine.
        let _ = self.sender.send(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_sees_changes() {
        let notifier = BroadcastNotifier::new();
        let mut rx = notifier.subscribe();

        notifier.changed(EntityKind::Accounts);
        notifier.changed(EntityKind::LedgerEntries);

        assert_eq!(rx.recv().await.unwrap(), EntityKind::Accounts);
        assert_eq!(rx.recv().await.unwrap(), EntityKind::LedgerEntries);
    }

    #[tokio::test]
    async fn test_no_subscribers_is_not_an_error() {
        let notifier = BroadcastNotifier::new();
        // Must not panic or block.
        notifier.changed(EntityKind::Deletions);
        assert_eq!(notifier.receiver_count(), 0);
    }
}
