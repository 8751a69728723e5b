use crate::domain::event::{EventKind, TransactionEvent};
use crate::domain::ports::EventNotifier;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, info};

pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Fans events out to every subscriber over a `tokio::sync::broadcast` channel.
///
/// Publishing never blocks the engine. With no subscribers the event is
/// dropped; slow subscribers lag and lose the oldest events.
pub struct BroadcastNotifier {
    sender: broadcast::Sender<TransactionEvent>,
    published: AtomicU64,
}

impl BroadcastNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            published: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TransactionEvent> {
        self.sender.subscribe()
    }

    pub fn events_published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl EventNotifier for BroadcastNotifier {
    fn notify(&self, event: TransactionEvent) {
        self.published.fetch_add(1, Ordering::Relaxed);
        match self.sender.send(event) {
            Ok(receivers) => debug!(receivers, "transaction event delivered"),
            Err(_) => debug!("transaction event dropped, no subscribers"),
        }
    }
}

/// Writes every event to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl EventNotifier for TracingNotifier {
    fn notify(&self, event: TransactionEvent) {
        let kind = match event.kind {
            EventKind::Buy => "buy",
            EventKind::Sell => "sell",
        };
        info!(
            kind,
            identity = %event.identity,
            tag_id = %event.tag_id,
            "tag transaction"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ownership::Identity;
    use crate::domain::tag::TagId;

    #[tokio::test]
    async fn test_broadcast_reaches_subscribers() {
        let notifier = BroadcastNotifier::new();
        let mut rx = notifier.subscribe();

        notifier.notify(TransactionEvent::buy(Identity::new("alice"), TagId(1)));

        let event = rx.recv().await.unwrap();
        assert_eq!(event.kind, EventKind::Buy);
        assert_eq!(event.tag_id, TagId(1));
        assert_eq!(notifier.events_published(), 1);
    }

    #[test]
    fn test_notify_without_subscribers_is_silent() {
        let notifier = BroadcastNotifier::new();
        notifier.notify(TransactionEvent::sell(Identity::new("bob"), TagId(0)));
        assert_eq!(notifier.events_published(), 1);
    }
}
