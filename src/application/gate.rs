use crate::domain::ownership::Identity;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

type Slots = DashMap<String, Arc<Mutex<()>>>;

/// Serializes transactions per identity.
///
/// At most one permit per identity is outstanding; transactions for different
/// identities proceed in parallel. Slots are dropped once nobody holds or
/// waits on them, so the map only grows with in-flight identities.
#[derive(Default, Clone)]
pub struct IdentityGate {
    slots: Arc<Slots>,
}

impl IdentityGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other transaction for `identity` is in flight.
    pub async fn acquire(&self, identity: &Identity) -> IdentityPermit {
        let slot = self
            .slots
            .entry(identity.key().to_string())
            .or_default()
            .clone();
        let guard = slot.lock_owned().await;

        IdentityPermit {
            key: identity.key().to_string(),
            slots: Arc::clone(&self.slots),
            guard: Some(guard),
        }
    }

    /// Number of identities currently holding or waiting on a permit.
    pub fn in_flight(&self) -> usize {
        self.slots.len()
    }
}

pub struct IdentityPermit {
    key: String,
    slots: Arc<Slots>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for IdentityPermit {
    fn drop(&mut self) {
        // Release the lock before checking whether anyone else still refers to the slot.
        drop(self.guard.take());
        self.slots
            .remove_if(&self.key, |_, slot| Arc::strong_count(slot) == 1);
    }
}
