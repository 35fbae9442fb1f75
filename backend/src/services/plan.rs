//! In-memory plan service: the single writer over the requirement ledger

use std::sync::Arc;

use shared::{
    CategoryGroup, FieldEdit, IngestReport, ParsedOrder, PlanState, RenameError,
    StockMergePolicy, ViewFilter,
};
use tokio::sync::Mutex;
use uuid::Uuid;

/// Holds the working plan behind a single-writer lock.
///
/// Extraction and persistence calls happen outside the lock; each merge loop
/// runs to completion under it, so rapid successive scans apply one at a
/// time and the breakdown totals stay consistent.
#[derive(Clone, Default)]
pub struct PlanService {
    state: Arc<Mutex<PlanState>>,
}

impl PlanService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one extracted order into the plan and record its source image
    pub async fn ingest(
        &self,
        order: &ParsedOrder,
        image_ref: String,
        policy: StockMergePolicy,
    ) -> IngestReport {
        let mut state = self.state.lock().await;
        state.ingest(order, image_ref, policy)
    }

    /// Grouped coverage view under the active filters
    pub async fn view_grouped(&self, filter: &ViewFilter) -> Vec<CategoryGroup> {
        self.state.lock().await.ledger.view_grouped(filter)
    }

    /// Distinct source-order ids, in first-seen order
    pub async fn order_ids(&self) -> Vec<String> {
        self.state.lock().await.ledger.order_ids()
    }

    /// Apply a manual edit to the row with the given stable id
    pub async fn set_field(&self, row_id: Uuid, edit: FieldEdit) -> bool {
        self.state.lock().await.ledger.set_field_by_id(row_id, edit)
    }

    /// Rename a row, rejecting collisions with a different row
    pub async fn rename(&self, row_id: Uuid, new_name: &str) -> Result<(), RenameError> {
        self.state.lock().await.ledger.rename(row_id, new_name)
    }

    /// Drop every row and image
    pub async fn clear(&self) {
        self.state.lock().await.clear();
    }

    /// A copy of the current state, for export and snapshot save
    pub async fn current(&self) -> PlanState {
        self.state.lock().await.clone()
    }

    /// Swap in a restored snapshot wholesale
    pub async fn replace(&self, state: PlanState) {
        self.state.lock().await.replace(state);
    }
}
