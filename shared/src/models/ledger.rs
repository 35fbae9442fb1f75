//! The requirement ledger: accumulates material requirements across scanned
//! production orders and computes purchasing coverage.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::types::{OrderFilter, PurchaseRefFilter, ViewFilter};
use crate::validation::{normalize_name, validate_line_item, RejectReason};

use super::{LineItem, ParsedOrder};

/// Material categories as classified on the source production orders
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MaterialCategory {
    #[default]
    RawMaterial,
    Packaging,
}

impl MaterialCategory {
    /// All categories, in display order
    pub const ALL: [MaterialCategory; 2] = [MaterialCategory::RawMaterial, MaterialCategory::Packaging];

    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialCategory::RawMaterial => "raw_material",
            MaterialCategory::Packaging => "packaging",
        }
    }

    /// Label as printed on the source documents
    pub fn label_es(&self) -> &'static str {
        match self {
            MaterialCategory::RawMaterial => "INSUMO",
            MaterialCategory::Packaging => "EMPAQUE",
        }
    }

    /// Parse the classifier tag reported by the extraction service.
    /// Unknown tags fall back to raw material.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_uppercase().as_str() {
            "EMPAQUE" => MaterialCategory::Packaging,
            _ => MaterialCategory::RawMaterial,
        }
    }
}

/// Procurement status of a requirement row
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    #[default]
    Pending,
    PurchaseOrderSent,
    AwaitingDelivery,
    Complete,
}

impl RowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowStatus::Pending => "pending",
            RowStatus::PurchaseOrderSent => "purchase_order_sent",
            RowStatus::AwaitingDelivery => "awaiting_delivery",
            RowStatus::Complete => "complete",
        }
    }

    /// Label as shown on the procurement board
    pub fn label_es(&self) -> &'static str {
        match self {
            RowStatus::Pending => "Pendiente",
            RowStatus::PurchaseOrderSent => "OC enviada",
            RowStatus::AwaitingDelivery => "Por entregar",
            RowStatus::Complete => "Completo",
        }
    }
}

/// How stock detected on successive scans merges into an existing row
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StockMergePolicy {
    /// Stock read off each scanned order adds up (the historical behavior;
    /// double-counts stock reported on more than one order).
    #[default]
    Accumulate,
    /// A scan that reports stock replaces the stored value.
    Overwrite,
}

/// One row per distinct normalized material name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequirementRow {
    /// Stable identity, independent of the editable display name
    pub id: Uuid,
    /// Normalized material name; unique within a ledger
    pub name: String,
    pub category: MaterialCategory,
    pub total_required: Decimal,
    /// Quantity contributed by each source order; values always sum to
    /// `total_required`
    pub per_order_breakdown: BTreeMap<String, Decimal>,
    pub unit: String,
    pub on_hand_stock: Decimal,
    pub purchase_order_ref: String,
    pub delivery_date: Option<NaiveDate>,
    pub status: RowStatus,
    /// Source orders in first-seen order, for display
    pub source_orders: Vec<String>,
    /// When set, supersedes the computed amount to purchase, verbatim
    pub manual_purchase_override: Option<Decimal>,
}

impl RequirementRow {
    fn from_item(name: String, order_id: &str, quantity: Decimal, item: &LineItem) -> Self {
        let mut per_order_breakdown = BTreeMap::new();
        per_order_breakdown.insert(order_id.to_string(), quantity);
        Self {
            id: Uuid::new_v4(),
            name,
            category: item.category.unwrap_or_default(),
            total_required: quantity,
            per_order_breakdown,
            unit: item.unit.clone().unwrap_or_default(),
            on_hand_stock: item.detected_stock.unwrap_or(Decimal::ZERO),
            purchase_order_ref: String::new(),
            delivery_date: None,
            status: RowStatus::Pending,
            source_orders: vec![order_id.to_string()],
            manual_purchase_override: None,
        }
    }

    /// Amount still to purchase for a given displayed requirement. A manual
    /// override is used verbatim, negative adjustments included; the computed
    /// value is clamped at zero.
    pub fn amount_to_purchase(&self, required: Decimal) -> Decimal {
        match self.manual_purchase_override {
            Some(v) => v,
            None => (required - self.on_hand_stock).max(Decimal::ZERO),
        }
    }

    fn apply(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::OnHandStock(v) => self.on_hand_stock = v,
            FieldEdit::PurchaseOrderRef(v) => self.purchase_order_ref = v,
            FieldEdit::DeliveryDate(v) => self.delivery_date = v,
            FieldEdit::Status(v) => self.status = v,
            FieldEdit::ManualPurchaseOverride(v) => self.manual_purchase_override = v,
        }
    }
}

/// The user-editable subset of a requirement row. Totals and breakdowns are
/// never edited directly; they only change through ingestion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FieldEdit {
    OnHandStock(Decimal),
    PurchaseOrderRef(String),
    DeliveryDate(Option<NaiveDate>),
    Status(RowStatus),
    ManualPurchaseOverride(Option<Decimal>),
}

/// Outcome of merging one parsed order into the ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    pub order_id: String,
    pub merged_items: usize,
    pub rejected: Vec<RejectedItem>,
    pub unit_mismatches: Vec<UnitMismatch>,
}

/// A line item skipped during ingestion, with the reason
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedItem {
    pub name: Option<String>,
    pub reason: RejectReason,
}

/// A merge that reported a different unit than the one already on the row.
/// The stored unit is kept; units are never reconciled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitMismatch {
    pub name: String,
    pub kept: String,
    pub reported: String,
}

/// Rename failure modes
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenameError {
    #[error("row not found")]
    NotFound,
    #[error("material name cannot be empty")]
    EmptyName,
    #[error("a row named {0} already exists")]
    Collision(String),
}

/// One row of the coverage view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayRow {
    pub id: Uuid,
    pub name: String,
    pub category: MaterialCategory,
    /// Total requirement, or a single order's contribution when an order
    /// filter is active
    pub required: Decimal,
    pub unit: String,
    pub on_hand_stock: Decimal,
    pub amount_to_purchase: Decimal,
    pub covered: bool,
    pub purchase_order_ref: String,
    pub delivery_date: Option<NaiveDate>,
    pub status: RowStatus,
    pub source_orders: Vec<String>,
}

/// Rows of one material category, in ledger order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub category: MaterialCategory,
    pub rows: Vec<DisplayRow>,
}

/// The aggregated requirements table. Rows keep insertion order for display;
/// identity is the normalized material name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Ledger {
    rows: Vec<RequirementRow>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[RequirementRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up a row by display name (normalized before comparison)
    pub fn get(&self, name: &str) -> Option<&RequirementRow> {
        let norm = normalize_name(name);
        self.rows.iter().find(|r| r.name == norm)
    }

    pub fn get_by_id(&self, id: Uuid) -> Option<&RequirementRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    /// Distinct source-order ids across all rows, in first-seen order.
    /// Drives the order filter dropdown.
    pub fn order_ids(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for row in &self.rows {
            for op in &row.source_orders {
                if !seen.contains(op) {
                    seen.push(op.clone());
                }
            }
        }
        seen
    }

    /// Merge one parsed order into the ledger.
    ///
    /// Invalid line items are skipped and reported; the rest of the batch
    /// still merges. When the same order lists a material twice, the
    /// contributions accumulate into a single breakdown entry.
    pub fn ingest(&mut self, order: &ParsedOrder, policy: StockMergePolicy) -> IngestReport {
        let mut report = IngestReport {
            order_id: order.order_id.clone(),
            merged_items: 0,
            rejected: Vec::new(),
            unit_mismatches: Vec::new(),
        };

        for item in &order.items {
            let (name, quantity) = match validate_line_item(item) {
                Ok(parts) => parts,
                Err(reason) => {
                    report.rejected.push(RejectedItem {
                        name: item.name.clone(),
                        reason,
                    });
                    continue;
                }
            };

            match self.rows.iter_mut().find(|r| r.name == name) {
                Some(row) => {
                    row.total_required += quantity;
                    *row
                        .per_order_breakdown
                        .entry(order.order_id.clone())
                        .or_insert(Decimal::ZERO) += quantity;
                    if !row.source_orders.contains(&order.order_id) {
                        row.source_orders.push(order.order_id.clone());
                    }
                    if let Some(stock) = item.detected_stock {
                        match policy {
                            StockMergePolicy::Accumulate => row.on_hand_stock += stock,
                            StockMergePolicy::Overwrite => row.on_hand_stock = stock,
                        }
                    }
                    if let Some(unit) = item.unit.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
                        if row.unit.is_empty() {
                            row.unit = unit.to_string();
                        } else if unit != row.unit {
                            report.unit_mismatches.push(UnitMismatch {
                                name: name.clone(),
                                kept: row.unit.clone(),
                                reported: unit.to_string(),
                            });
                        }
                    }
                }
                None => {
                    self.rows
                        .push(RequirementRow::from_item(name, &order.order_id, quantity, item));
                }
            }
            report.merged_items += 1;
        }

        report
    }

    /// Project the ledger through the active filters. Pure: never mutates.
    ///
    /// An order filter changes both which rows appear and which requirement
    /// is shown: the filtered order's contribution, not the total.
    pub fn view(&self, filter: &ViewFilter) -> Vec<DisplayRow> {
        self.rows
            .iter()
            .filter_map(|row| {
                let required = match &filter.order {
                    OrderFilter::All => row.total_required,
                    OrderFilter::Order(op) => *row.per_order_breakdown.get(op)?,
                };
                if let PurchaseRefFilter::Ref(oc) = &filter.purchase_ref {
                    if row.purchase_order_ref != *oc {
                        return None;
                    }
                }
                let amount_to_purchase = row.amount_to_purchase(required);
                Some(DisplayRow {
                    id: row.id,
                    name: row.name.clone(),
                    category: row.category,
                    required,
                    unit: row.unit.clone(),
                    on_hand_stock: row.on_hand_stock,
                    amount_to_purchase,
                    covered: amount_to_purchase <= Decimal::ZERO,
                    purchase_order_ref: row.purchase_order_ref.clone(),
                    delivery_date: row.delivery_date,
                    status: row.status,
                    source_orders: row.source_orders.clone(),
                })
            })
            .collect()
    }

    /// Same rows as [`Ledger::view`], partitioned into the fixed category
    /// groups (raw materials first, then packaging).
    pub fn view_grouped(&self, filter: &ViewFilter) -> Vec<CategoryGroup> {
        let rows = self.view(filter);
        MaterialCategory::ALL
            .iter()
            .map(|&category| CategoryGroup {
                category,
                rows: rows.iter().filter(|r| r.category == category).cloned().collect(),
            })
            .collect()
    }

    /// Apply a manual edit to the row with the given display name. Stale
    /// names miss silently; the caller learns whether anything was touched.
    pub fn set_field(&mut self, name: &str, edit: FieldEdit) -> bool {
        let norm = normalize_name(name);
        match self.rows.iter_mut().find(|r| r.name == norm) {
            Some(row) => {
                row.apply(edit);
                true
            }
            None => false,
        }
    }

    /// Apply a manual edit addressed by stable row id
    pub fn set_field_by_id(&mut self, id: Uuid, edit: FieldEdit) -> bool {
        match self.rows.iter_mut().find(|r| r.id == id) {
            Some(row) => {
                row.apply(edit);
                true
            }
            None => false,
        }
    }

    /// Rename a row, keeping its stable id. The new name is normalized before
    /// the collision check; renaming a row to itself is a no-op. A collision
    /// with a different row is rejected, never silently merged.
    pub fn rename(&mut self, id: Uuid, new_name: &str) -> Result<(), RenameError> {
        let norm = normalize_name(new_name);
        if norm.is_empty() {
            return Err(RenameError::EmptyName);
        }
        let idx = self
            .rows
            .iter()
            .position(|r| r.id == id)
            .ok_or(RenameError::NotFound)?;
        if self.rows[idx].name == norm {
            return Ok(());
        }
        if self.rows.iter().any(|r| r.name == norm) {
            return Err(RenameError::Collision(norm));
        }
        self.rows[idx].name = norm;
        Ok(())
    }

    /// Rename addressed by current display name. Prefer [`Ledger::rename`]
    /// when a stable id is at hand; names can go stale under filtered views.
    pub fn rename_by_name(&mut self, old_name: &str, new_name: &str) -> Result<(), RenameError> {
        let norm = normalize_name(old_name);
        let id = self
            .rows
            .iter()
            .find(|r| r.name == norm)
            .map(|r| r.id)
            .ok_or(RenameError::NotFound)?;
        self.rename(id, new_name)
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }
}
