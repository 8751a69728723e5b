use crate::domain::coins::Coins;
use crate::domain::ownership::{Identity, OwnershipRecord};
use crate::domain::ports::{Ledger, OwnershipStore};
use crate::domain::tag::TagId;
use crate::error::{AdapterError, AdapterResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// A thread-safe in-memory ownership store.
///
/// Uses `Arc<RwLock<HashMap<String, TagId>>>` keyed by the case-folded identity.
/// Clones share the same map, so a test can keep a handle after boxing one.
#[derive(Default, Clone)]
pub struct InMemoryOwnershipStore {
    tags: Arc<RwLock<HashMap<String, TagId>>>,
    latency: Option<Duration>,
}

impl InMemoryOwnershipStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every call, so completions interleave across tasks.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    async fn pause(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl OwnershipStore for InMemoryOwnershipStore {
    async fn get_tag(&self, identity: &Identity) -> AdapterResult<Option<TagId>> {
        self.pause().await;
        let tags = self.tags.read().await;
        Ok(tags.get(identity.key()).copied())
    }

    async fn set_tag(&self, identity: &Identity, tag_id: TagId) -> AdapterResult<()> {
        self.pause().await;
        let mut tags = self.tags.write().await;
        tags.insert(identity.key().to_string(), tag_id);
        Ok(())
    }

    async fn clear_tag(&self, identity: &Identity) -> AdapterResult<()> {
        self.pause().await;
        let mut tags = self.tags.write().await;
        tags.remove(identity.key());
        Ok(())
    }

    async fn all_records(&self) -> AdapterResult<Vec<OwnershipRecord>> {
        let tags = self.tags.read().await;
        let mut records: Vec<_> = tags
            .iter()
            .map(|(identity, tag_id)| OwnershipRecord {
                identity: identity.clone(),
                tag_id: *tag_id,
            })
            .collect();
        records.sort_by(|a, b| a.identity.cmp(&b.identity));
        Ok(records)
    }
}

/// A thread-safe in-memory ledger.
///
/// Unknown identities have a zero balance. Subtracting more than the current
/// balance fails instead of going negative.
#[derive(Default, Clone)]
pub struct InMemoryLedger {
    balances: Arc<RwLock<HashMap<String, Coins>>>,
    latency: Option<Duration>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Seeds a balance.
    pub async fn deposit(&self, identity: &Identity, amount: Coins) {
        let mut balances = self.balances.write().await;
        *balances.entry(identity.key().to_string()).or_default() += amount;
    }

    async fn pause(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl Ledger for InMemoryLedger {
    async fn balance(&self, identity: &Identity) -> AdapterResult<Coins> {
        self.pause().await;
        let balances = self.balances.read().await;
        Ok(balances.get(identity.key()).copied().unwrap_or_default())
    }

    async fn add(&self, identity: &Identity, amount: Coins) -> AdapterResult<()> {
        self.pause().await;
        let mut balances = self.balances.write().await;
        *balances.entry(identity.key().to_string()).or_default() += amount;
        Ok(())
    }

    async fn subtract(&self, identity: &Identity, amount: Coins) -> AdapterResult<()> {
        self.pause().await;
        let mut balances = self.balances.write().await;
        let balance = balances.get(identity.key()).copied().unwrap_or_default();
        let remaining = balance.checked_sub(amount).ok_or_else(|| {
            AdapterError::Ledger(format!(
                "cannot subtract {amount} from {balance} for {}",
                identity.key()
            ))
        })?;
        balances.insert(identity.key().to_string(), remaining);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_ownership_store() {
        let store = InMemoryOwnershipStore::new();
        let alice = Identity::new("Alice");

        assert_eq!(store.get_tag(&alice).await.unwrap(), None);

        store.set_tag(&alice, TagId(0)).await.unwrap();
        store.set_tag(&Identity::new("ALICE"), TagId(1)).await.unwrap();
        assert_eq!(store.get_tag(&alice).await.unwrap(), Some(TagId(1)));

        let all = store.all_records().await.unwrap();
        assert_eq!(all, vec![OwnershipRecord::new(&alice, TagId(1))]);

        store.clear_tag(&alice).await.unwrap();
        assert_eq!(store.get_tag(&alice).await.unwrap(), None);
        assert!(store.all_records().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_in_memory_ledger() {
        let ledger = InMemoryLedger::new();
        let bob = Identity::new("bob");

        assert_eq!(ledger.balance(&bob).await.unwrap(), Coins::ZERO);

        ledger.deposit(&bob, Coins::new(150)).await;
        ledger.subtract(&bob, Coins::new(100)).await.unwrap();
        ledger.add(&bob, Coins::new(20)).await.unwrap();
        assert_eq!(ledger.balance(&bob).await.unwrap(), Coins::new(70));
    }

    #[tokio::test]
    async fn test_in_memory_ledger_refuses_overdraft() {
        let ledger = InMemoryLedger::new();
        let bob = Identity::new("bob");
        ledger.deposit(&bob, Coins::new(10)).await;

        let result = ledger.subtract(&bob, Coins::new(11)).await;
        assert!(matches!(result, Err(AdapterError::Ledger(_))));
        assert_eq!(ledger.balance(&bob).await.unwrap(), Coins::new(10));
    }
}
