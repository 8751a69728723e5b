use super::ownership::Identity;
use super::tag::TagId;
use std::time::SystemTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Buy,
    Sell,
}

/// Emitted once per committed transaction and consumed by the notifier.
#[derive(Debug, Clone)]
pub struct TransactionEvent {
    pub kind: EventKind,
    pub identity: Identity,
    pub tag_id: TagId,
    pub timestamp: SystemTime,
}

impl TransactionEvent {
    pub fn buy(identity: Identity, tag_id: TagId) -> Self {
        Self::now(EventKind::Buy, identity, tag_id)
    }

    pub fn sell(identity: Identity, tag_id: TagId) -> Self {
        Self::now(EventKind::Sell, identity, tag_id)
    }

    fn now(kind: EventKind, identity: Identity, tag_id: TagId) -> Self {
        Self {
            kind,
            identity,
            tag_id,
            timestamp: SystemTime::now(),
        }
    }
}
