use crate::application::context::{ShopContext, ShopSettings};
use crate::application::gate::IdentityGate;
use crate::application::reconciliation::{ReconciliationEntry, ReconciliationLog};
use crate::domain::coins::Coins;
use crate::domain::event::{EventKind, TransactionEvent};
use crate::domain::label::LabelUpdate;
use crate::domain::ownership::Identity;
use crate::domain::ports::{EventNotifierBox, LedgerBox, OwnershipStoreBox};
use crate::domain::tag::{Catalog, TagDefinition, TagId};
use crate::error::{AdapterError, Result, ShopError};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::SystemTime;
use tracing::{debug, info, instrument, warn};

/// Version of the public operations below. Bump on any breaking change.
pub const API_VERSION: &str = "2.0";

/// Outcome of a committed purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Purchase {
    pub tag_id: TagId,
    /// Zero when the ledger is disabled.
    pub price_paid: Coins,
    pub label: LabelUpdate,
}

/// Outcome of a committed sale.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Sale {
    pub tag_id: TagId,
    /// Zero when the ledger is disabled or the tag left the catalog.
    pub refund: Coins,
    /// Resets the caller's label to the bare identity.
    pub label: LabelUpdate,
}

/// Orchestrates tag purchases and sales across the ownership store and the ledger.
///
/// The store and the ledger share no transaction. Transactions for the same
/// identity are serialized through an [`IdentityGate`] so the ownership check
/// and the writes that follow it cannot interleave with a second request.
/// Once a step has been issued, earlier mutations are never rolled back; a
/// ledger failure after the ownership write lands in the reconciliation log.
pub struct TagShopEngine {
    catalog: RwLock<Arc<Catalog>>,
    settings: ShopSettings,
    store: OwnershipStoreBox,
    ledger: Option<LedgerBox>,
    notifier: EventNotifierBox,
    gate: IdentityGate,
    reconciliation: ReconciliationLog,
}

impl TagShopEngine {
    /// Creates a new engine.
    ///
    /// # Arguments
    ///
    /// * `context` - Catalog and settings, fixed for the engine's lifetime
    ///   except through [`TagShopEngine::reload_catalog`].
    /// * `store` - Identity to tag ownership store.
    /// * `ledger` - Balance service, `None` when the economy is disabled.
    /// * `notifier` - Receives an event for every committed transaction.
    pub fn new(
        context: ShopContext,
        store: OwnershipStoreBox,
        ledger: Option<LedgerBox>,
        notifier: EventNotifierBox,
    ) -> Self {
        Self {
            catalog: RwLock::new(Arc::new(context.catalog)),
            settings: context.settings,
            store,
            ledger,
            notifier,
            gate: IdentityGate::new(),
            reconciliation: ReconciliationLog::new(),
        }
    }

    /// Buys `tag_id` for `identity`, replacing any tag it currently owns.
    ///
    /// `base_label` is the caller's base (untagged) label, never one already
    /// decorated by an earlier purchase. The returned [`LabelUpdate`] replaces
    /// the display label and must be applied once this returns `Ok`.
    #[instrument(skip_all, fields(identity = %identity, tag_id = %tag_id))]
    pub async fn buy(
        &self,
        identity: &Identity,
        tag_id: TagId,
        base_label: &str,
    ) -> Result<Purchase> {
        let tag = self
            .catalog()
            .get(tag_id)
            .cloned()
            .ok_or(ShopError::NotFound(tag_id))?;

        let _permit = self.gate.acquire(identity).await;

        if self.store.get_tag(identity).await? == Some(tag_id) {
            debug!("rejected, tag already owned");
            return Err(ShopError::AlreadyOwned(tag_id));
        }

        let price = match &self.ledger {
            Some(ledger) => {
                let balance = ledger.balance(identity).await?;
                if balance < tag.price {
                    let deficit = balance.shortfall_to(tag.price);
                    debug!(%balance, price = %tag.price, "rejected, insufficient funds");
                    return Err(ShopError::InsufficientFunds { deficit });
                }
                tag.price
            }
            None => Coins::ZERO,
        };

        // A failed write leaves nothing changed and skips every later step.
        self.store.set_tag(identity, tag_id).await?;

        if let Some(ledger) = &self.ledger
            && let Err(err) = ledger.subtract(identity, price).await
        {
            self.record_ledger_failure(EventKind::Buy, identity, tag_id, price, err);
        }

        self.notifier
            .notify(TransactionEvent::buy(identity.clone(), tag_id));

        let label = self
            .settings
            .name_format
            .render(base_label, &tag.display_text);
        info!(price = %price, "tag purchased");

        Ok(Purchase {
            tag_id,
            price_paid: price,
            label: LabelUpdate::new(label),
        })
    }

    /// Sells the tag `identity` currently owns, refunding its catalog price.
    #[instrument(skip_all, fields(identity = %identity))]
    pub async fn sell(&self, identity: &Identity) -> Result<Sale> {
        let _permit = self.gate.acquire(identity).await;

        let Some(tag_id) = self.store.get_tag(identity).await? else {
            debug!("rejected, no tag owned");
            return Err(ShopError::NoTag);
        };

        let refund = match &self.ledger {
            Some(_) => self.catalog().price(tag_id).unwrap_or_else(|| {
                warn!(%tag_id, "owned tag is no longer in the catalog, refunding nothing");
                Coins::ZERO
            }),
            None => Coins::ZERO,
        };

        // Clearing first means a failed write never refunds a tag that is still owned.
        self.store.clear_tag(identity).await?;

        if let Some(ledger) = &self.ledger
            && let Err(err) = ledger.add(identity, refund).await
        {
            self.record_ledger_failure(EventKind::Sell, identity, tag_id, refund, err);
        }

        self.notifier
            .notify(TransactionEvent::sell(identity.clone(), tag_id));
        info!(%tag_id, refund = %refund, "tag sold");

        Ok(Sale {
            tag_id,
            refund,
            label: LabelUpdate::new(identity.name()),
        })
    }

    fn record_ledger_failure(
        &self,
        kind: EventKind,
        identity: &Identity,
        tag_id: TagId,
        amount: Coins,
        err: AdapterError,
    ) {
        self.reconciliation.record(ReconciliationEntry {
            kind,
            identity: identity.key().to_string(),
            tag_id,
            amount,
            reason: err.to_string(),
            recorded_at: SystemTime::now(),
        });
    }

    /// Current tag of `identity`, `None` when it owns nothing.
    pub async fn player_tag(&self, identity: &Identity) -> Result<Option<TagId>> {
        Ok(self.store.get_tag(identity).await?)
    }

    /// Every ownership row keyed by case-folded identity. Empty when the store is.
    pub async fn all_data(&self) -> Result<BTreeMap<String, TagId>> {
        let records = self.store.all_records().await?;
        Ok(records
            .into_iter()
            .map(|record| (record.identity, record.tag_id))
            .collect())
    }

    /// The catalog snapshot current at call time.
    pub fn catalog(&self) -> Arc<Catalog> {
        let catalog = self
            .catalog
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&catalog)
    }

    /// Swaps in a new catalog. Transactions already past their lookup keep
    /// the snapshot they started with.
    pub fn reload_catalog(&self, catalog: Catalog) {
        info!(tags = catalog.len(), "catalog reloaded");
        *self
            .catalog
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Arc::new(catalog);
    }

    pub fn all_tags(&self) -> Vec<TagDefinition> {
        self.catalog().all_tags().to_vec()
    }

    /// Price of a tag, `None` if it doesn't exist or the ledger is disabled.
    pub fn tag_price(&self, tag_id: TagId) -> Option<Coins> {
        self.ledger.as_ref()?;
        self.catalog().price(tag_id)
    }

    pub fn tag_name(&self, tag_id: TagId) -> Option<String> {
        self.catalog().name(tag_id).map(str::to_string)
    }

    pub fn tag_exists(&self, tag_id: TagId) -> bool {
        self.catalog().exists(tag_id)
    }

    pub fn display_name_format(&self) -> &str {
        self.settings.name_format.as_str()
    }

    /// Path hint for the backing store. No format is implied.
    pub fn data_location(&self) -> &Path {
        &self.settings.data_location
    }

    pub fn ledger_enabled(&self) -> bool {
        self.ledger.is_some()
    }

    pub fn pending_reconciliations(&self) -> Vec<ReconciliationEntry> {
        self.reconciliation.pending()
    }

    pub fn drain_reconciliations(&self) -> Vec<ReconciliationEntry> {
        self.reconciliation.drain()
    }
}
