//! Domain models for the MRP Requirements Consolidation Platform

mod ledger;
mod order;
mod snapshot;

pub use ledger::*;
pub use order::*;
pub use snapshot::*;
