//! Parsed production orders as reported by the optical extraction service

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::NO_ORDER_ID;

use super::MaterialCategory;

/// One material line read off a scanned production order.
///
/// Fields stay optional until validated: the extraction service returns
/// whatever it managed to read, and a half-legible line must not block the
/// rest of the document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    pub name: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit: Option<String>,
    pub category: Option<MaterialCategory>,
    pub detected_stock: Option<Decimal>,
}

/// A production order after extraction, ready for ingestion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParsedOrder {
    pub order_id: String,
    pub items: Vec<LineItem>,
}

impl ParsedOrder {
    /// Build an order, falling back to the no-id sentinel when the service
    /// could not read an order number off the document.
    pub fn new(order_id: Option<String>, items: Vec<LineItem>) -> Self {
        let order_id = order_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| NO_ORDER_ID.to_string());
        Self { order_id, items }
    }
}

/// Wire shape of an extracted order. Earlier service versions report line
/// items under `insumos`, later ones under `items`; both decode here.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderData {
    #[serde(default)]
    pub numero_op: Option<String>,
    #[serde(default, alias = "insumos")]
    pub items: Vec<LineItemData>,
}

/// Wire shape of one extracted line item
#[derive(Debug, Clone, Deserialize)]
pub struct LineItemData {
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub cantidad: Option<Decimal>,
    #[serde(default)]
    pub unidad: Option<String>,
    #[serde(default)]
    pub categoria: Option<String>,
    #[serde(default)]
    pub stock_detectado: Option<Decimal>,
}

impl From<LineItemData> for LineItem {
    fn from(data: LineItemData) -> Self {
        LineItem {
            name: data.nombre,
            quantity: data.cantidad,
            unit: data.unidad,
            category: data.categoria.as_deref().map(MaterialCategory::from_tag),
            detected_stock: data.stock_detectado,
        }
    }
}

impl From<OrderData> for ParsedOrder {
    fn from(data: OrderData) -> Self {
        ParsedOrder::new(
            data.numero_op,
            data.items.into_iter().map(Into::into).collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_order_number_falls_back_to_sentinel() {
        assert_eq!(ParsedOrder::new(None, vec![]).order_id, NO_ORDER_ID);
        assert_eq!(
            ParsedOrder::new(Some("  ".to_string()), vec![]).order_id,
            NO_ORDER_ID
        );
        assert_eq!(
            ParsedOrder::new(Some(" OP-42 ".to_string()), vec![]).order_id,
            "OP-42"
        );
    }

    #[test]
    fn test_category_tag_decodes_with_default() {
        let data = LineItemData {
            nombre: Some("Pote HDPE 310".to_string()),
            cantidad: Some(Decimal::from(200)),
            unidad: Some("und".to_string()),
            categoria: Some("empaque".to_string()),
            stock_detectado: None,
        };
        let item: LineItem = data.into();
        assert_eq!(item.category, Some(MaterialCategory::Packaging));

        let data = LineItemData {
            nombre: Some("Harina".to_string()),
            cantidad: Some(Decimal::from(50)),
            unidad: Some("kg".to_string()),
            categoria: Some("misc".to_string()),
            stock_detectado: None,
        };
        let item: LineItem = data.into();
        assert_eq!(item.category, Some(MaterialCategory::RawMaterial));
    }
}
