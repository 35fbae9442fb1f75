//! WebAssembly module for the MRP Requirements Consolidation Platform
//!
//! Runs the requirement ledger engine client-side so the dashboard can
//! merge scanned orders and recompute coverage without a server round trip.

use wasm_bindgen::prelude::*;

use shared::{
    FieldEdit, Ledger, OrderData, OrderFilter, ParsedOrder, PurchaseRefFilter, RenameError,
    StockMergePolicy, ViewFilter,
};

/// The requirement plan held on the browser side.
///
/// All inputs and outputs cross the boundary as JSON strings; the engine
/// itself is the same one the backend runs.
#[wasm_bindgen]
pub struct RequirementPlan {
    ledger: Ledger,
    policy: StockMergePolicy,
}

impl Default for RequirementPlan {
    fn default() -> Self {
        Self {
            ledger: Ledger::new(),
            policy: StockMergePolicy::default(),
        }
    }
}

#[wasm_bindgen]
impl RequirementPlan {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch how detected stock merges: "accumulate" or "overwrite"
    pub fn set_stock_policy(&mut self, policy: &str) -> Result<(), JsValue> {
        self.policy = match policy {
            "accumulate" => StockMergePolicy::Accumulate,
            "overwrite" => StockMergePolicy::Overwrite,
            other => {
                return Err(JsValue::from_str(&format!(
                    "Unknown stock policy: {}",
                    other
                )))
            }
        };
        Ok(())
    }

    /// Merge one extracted order (the extraction service's `datos` payload)
    /// into the plan. Returns the ingest report as JSON.
    pub fn ingest(&mut self, order_json: &str) -> Result<String, JsValue> {
        let data: OrderData = serde_json::from_str(order_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid order JSON: {}", e)))?;
        let order: ParsedOrder = data.into();
        let report = self.ledger.ingest(&order, self.policy);
        serde_json::to_string(&report).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Coverage view grouped by category, as JSON. Pass "TODAS" (or null)
    /// to leave a filter open.
    pub fn view(&self, op: Option<String>, oc: Option<String>) -> Result<String, JsValue> {
        let filter = ViewFilter {
            order: OrderFilter::parse(op.as_deref()),
            purchase_ref: PurchaseRefFilter::parse(oc.as_deref()),
        };
        let groups = self.ledger.view_grouped(&filter);
        serde_json::to_string(&groups).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Distinct source-order ids, in first-seen order, as a JSON array
    pub fn order_ids(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.ledger.order_ids())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Apply a manual field edit to the row with the given display name.
    /// Returns whether a row matched; a stale name misses without error.
    pub fn set_field(&mut self, name: &str, edit_json: &str) -> Result<bool, JsValue> {
        let edit: FieldEdit = serde_json::from_str(edit_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid edit JSON: {}", e)))?;
        Ok(self.ledger.set_field(name, edit))
    }

    /// Rename a row. Collisions with a different row are rejected.
    pub fn rename(&mut self, name: &str, new_name: &str) -> Result<(), JsValue> {
        self.ledger
            .rename_by_name(name, new_name)
            .map_err(|e: RenameError| JsValue::from_str(&e.to_string()))
    }

    /// Number of requirement rows currently in the plan
    pub fn row_count(&self) -> usize {
        self.ledger.len()
    }

    /// Serialize the whole ledger, for stashing in browser storage
    pub fn to_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.ledger).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Replace the ledger wholesale from a serialized snapshot
    pub fn load_json(&mut self, json: &str) -> Result<(), JsValue> {
        self.ledger = serde_json::from_str(json)
            .map_err(|e| JsValue::from_str(&format!("Invalid ledger JSON: {}", e)))?;
        Ok(())
    }

    /// Drop every row
    pub fn clear(&mut self) {
        self.ledger.clear();
    }
}
