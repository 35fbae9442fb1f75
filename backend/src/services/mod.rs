//! Business logic services for the MRP Requirements Consolidation Platform

pub mod export;
pub mod plan;
pub mod snapshot;

pub use plan::PlanService;
pub use snapshot::SnapshotService;
