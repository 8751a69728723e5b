//! Domain layer: value objects, the tag catalog and the outbound ports the
//! transaction engine talks to.

pub mod coins;
pub mod event;
pub mod label;
pub mod ownership;
pub mod ports;
pub mod tag;
