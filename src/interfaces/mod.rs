//! Batch interfaces used by the `tagshop` binary.

pub mod csv;
