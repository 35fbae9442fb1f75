//! CSV export of the requirement plan

use shared::{Ledger, ViewFilter};

use crate::error::{AppError, AppResult};

const HEADERS: [&str; 9] = [
    "category",
    "name",
    "total_required",
    "unit",
    "on_hand_stock",
    "amount_to_purchase",
    "purchase_order_ref",
    "status",
    "source_orders",
];

/// Serialize the full ledger to CSV, one line per requirement row.
///
/// A pure projection of ledger state: the unfiltered view, with category and
/// status printed the way the procurement board shows them.
pub fn export_csv(ledger: &Ledger) -> AppResult<String> {
    let mut writer = csv::Writer::from_writer(vec![]);

    writer
        .write_record(HEADERS)
        .map_err(|e| AppError::Internal(format!("CSV write failed: {}", e)))?;

    for row in ledger.view(&ViewFilter::default()) {
        writer
            .write_record(&[
                row.category.label_es().to_string(),
                row.name,
                row.required.to_string(),
                row.unit,
                row.on_hand_stock.to_string(),
                row.amount_to_purchase.to_string(),
                row.purchase_order_ref,
                row.status.label_es().to_string(),
                row.source_orders.join(", "),
            ])
            .map_err(|e| AppError::Internal(format!("CSV write failed: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV write failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("CSV encoding failed: {}", e)))
}
