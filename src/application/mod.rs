//! Application layer containing the tag transaction workflow.
//!
//! `TagShopEngine` is the entry point for buying and selling tags. Requests for
//! the same identity are funnelled through an `IdentityGate`, so the engine can
//! compose the ownership store and the ledger without a shared transaction.

pub mod context;
pub mod engine;
pub mod gate;
pub mod reconciliation;
