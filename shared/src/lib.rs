//! Shared types and models for the MRP Requirements Consolidation Platform
//!
//! This crate contains the requirement ledger engine and the types shared
//! between the backend and the browser frontend (via WASM).

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
