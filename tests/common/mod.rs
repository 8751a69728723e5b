#![allow(dead_code)]

use async_trait::async_trait;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tagshop::domain::coins::Coins;
use tagshop::domain::ownership::{Identity, OwnershipRecord};
use tagshop::domain::ports::{Ledger, OwnershipStore};
use tagshop::domain::tag::TagId;
use tagshop::error::AdapterResult;
use tempfile::NamedTempFile;

pub fn write_config(yaml: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file
}

pub fn write_requests(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "action, identity, tag").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file
}

/// Counts every call that reaches the wrapped port.
#[derive(Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct CountingStore<S> {
    pub inner: S,
    pub calls: CallCounter,
}

#[async_trait]
impl<S: OwnershipStore> OwnershipStore for CountingStore<S> {
    async fn get_tag(&self, identity: &Identity) -> AdapterResult<Option<TagId>> {
        self.calls.hit();
        self.inner.get_tag(identity).await
    }

    async fn set_tag(&self, identity: &Identity, tag_id: TagId) -> AdapterResult<()> {
        self.calls.hit();
        self.inner.set_tag(identity, tag_id).await
    }

    async fn clear_tag(&self, identity: &Identity) -> AdapterResult<()> {
        self.calls.hit();
        self.inner.clear_tag(identity).await
    }

    async fn all_records(&self) -> AdapterResult<Vec<OwnershipRecord>> {
        self.calls.hit();
        self.inner.all_records().await
    }
}

pub struct CountingLedger<L> {
    pub inner: L,
    pub calls: CallCounter,
}

#[async_trait]
impl<L: Ledger> Ledger for CountingLedger<L> {
    async fn balance(&self, identity: &Identity) -> AdapterResult<Coins> {
        self.calls.hit();
        self.inner.balance(identity).await
    }

    async fn add(&self, identity: &Identity, amount: Coins) -> AdapterResult<()> {
        self.calls.hit();
        self.inner.add(identity, amount).await
    }

    async fn subtract(&self, identity: &Identity, amount: Coins) -> AdapterResult<()> {
        self.calls.hit();
        self.inner.subtract(identity, amount).await
    }
}
