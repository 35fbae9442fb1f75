//! The working plan state and its persisted snapshots

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{IngestReport, Ledger, ParsedOrder, StockMergePolicy};

/// A scanned order image kept alongside the plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OpImage {
    pub order_id: String,
    pub image_ref: String,
}

/// The working plan: the requirement ledger plus the gallery of scanned
/// order images that produced it
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlanState {
    pub ledger: Ledger,
    pub images: Vec<OpImage>,
}

impl PlanState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a parsed order and keep its source image in the gallery.
    ///
    /// The image stays even when every line item was rejected: the scan
    /// happened and remains reviewable.
    pub fn ingest(
        &mut self,
        order: &ParsedOrder,
        image_ref: impl Into<String>,
        policy: StockMergePolicy,
    ) -> IngestReport {
        self.images.push(OpImage {
            order_id: order.order_id.clone(),
            image_ref: image_ref.into(),
        });
        self.ledger.ingest(order, policy)
    }

    /// Swap in a restored snapshot wholesale. Never a merge; ingestions after
    /// a restore resume from the restored baseline.
    pub fn replace(&mut self, other: PlanState) {
        *self = other;
    }

    pub fn clear(&mut self) {
        self.ledger.clear();
        self.images.clear();
    }
}

/// A named, persisted copy of the plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSnapshot {
    pub id: Uuid,
    pub name: String,
    pub rows: Ledger,
    pub images: Vec<OpImage>,
    pub created_at: DateTime<Utc>,
}

impl PlanSnapshot {
    /// The plan state this snapshot restores to
    pub fn state(&self) -> PlanState {
        PlanState {
            ledger: self.rows.clone(),
            images: self.images.clone(),
        }
    }
}

/// Listing entry for the saved-plans picker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
