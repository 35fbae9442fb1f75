//! HTTP handlers for the MRP Requirements Consolidation Platform

pub mod health;
pub mod plan;
pub mod snapshot;

pub use health::*;
pub use plan::*;
pub use snapshot::*;
