//! Validation and normalization helpers for the requirement ledger

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::LineItem;

/// Normalize a material name into its ledger identity.
///
/// Trim plus uppercase is the sole identity key: two differently cased or
/// differently spaced names that normalize identically are the same material.
pub fn normalize_name(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Why a scanned line item was rejected during ingestion
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    MissingName,
    MissingQuantity,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::MissingName => "missing_name",
            RejectReason::MissingQuantity => "missing_quantity",
        }
    }
}

/// Validate a scanned line item, returning its normalized name and quantity.
///
/// A blank name or a missing quantity rejects the item; the rest of the
/// scanned batch is unaffected.
pub fn validate_line_item(item: &LineItem) -> Result<(String, Decimal), RejectReason> {
    let name = item
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or(RejectReason::MissingName)?;
    let quantity = item.quantity.ok_or(RejectReason::MissingQuantity)?;
    Ok((normalize_name(name), quantity))
}
