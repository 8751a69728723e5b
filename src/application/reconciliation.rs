use crate::domain::coins::Coins;
use crate::domain::event::EventKind;
use crate::domain::tag::TagId;
use std::sync::Mutex;
use std::time::SystemTime;

/// A ledger adjustment that failed after ownership was already committed.
///
/// The engine does not roll these back; they are kept for an operator to settle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationEntry {
    pub kind: EventKind,
    /// Case-folded identity key.
    pub identity: String,
    pub tag_id: TagId,
    pub amount: Coins,
    pub reason: String,
    pub recorded_at: SystemTime,
}

#[derive(Debug, Default)]
pub struct ReconciliationLog {
    entries: Mutex<Vec<ReconciliationEntry>>,
}

impl ReconciliationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: ReconciliationEntry) {
        tracing::error!(
            identity = %entry.identity,
            tag_id = %entry.tag_id,
            amount = %entry.amount,
            kind = ?entry.kind,
            reason = %entry.reason,
            "ledger adjustment failed after ownership commit; manual reconciliation required"
        );
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(entry);
    }

    pub fn pending(&self) -> Vec<ReconciliationEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Removes and returns every pending entry.
    pub fn drain(&self) -> Vec<ReconciliationEntry> {
        std::mem::take(
            &mut *self
                .entries
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        )
    }
}
