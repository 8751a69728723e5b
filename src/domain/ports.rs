use super::coins::Coins;
use super::event::TransactionEvent;
use super::ownership::{Identity, OwnershipRecord};
use super::tag::TagId;
use crate::error::AdapterResult;
use async_trait::async_trait;
use std::sync::Arc;

/// Asynchronous identity → tag key-value store.
#[async_trait]
pub trait OwnershipStore: Send + Sync {
    async fn get_tag(&self, identity: &Identity) -> AdapterResult<Option<TagId>>;
    /// Inserts the row if absent, otherwise updates it.
    async fn set_tag(&self, identity: &Identity, tag_id: TagId) -> AdapterResult<()>;
    async fn clear_tag(&self, identity: &Identity) -> AdapterResult<()>;
    async fn all_records(&self) -> AdapterResult<Vec<OwnershipRecord>>;
}

/// External balance service. There is no compare-and-swap, so callers
/// compose a read and a write as two separate calls.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn balance(&self, identity: &Identity) -> AdapterResult<Coins>;
    async fn add(&self, identity: &Identity, amount: Coins) -> AdapterResult<()>;
    async fn subtract(&self, identity: &Identity, amount: Coins) -> AdapterResult<()>;
}

/// Fire-and-forget delivery of transaction events to observers.
pub trait EventNotifier: Send + Sync {
    fn notify(&self, event: TransactionEvent);
}

impl<T: EventNotifier + ?Sized> EventNotifier for Arc<T> {
    fn notify(&self, event: TransactionEvent) {
        (**self).notify(event);
    }
}

pub type OwnershipStoreBox = Box<dyn OwnershipStore>;
pub type LedgerBox = Box<dyn Ledger>;
pub type EventNotifierBox = Box<dyn EventNotifier>;
