//! Domain models for the MRP Requirements Consolidation Platform
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
