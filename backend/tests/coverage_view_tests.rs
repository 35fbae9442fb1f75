//! Coverage and filtered view tests
//!
//! Tests for the plan projection including:
//! - Filter consistency: the unfiltered view shows every row exactly once
//! - Coverage clamp: computed purchase amounts never go negative
//! - Manual override bypass: overrides are used verbatim, never clamped

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::{
    FieldEdit, Ledger, LineItem, OrderFilter, ParsedOrder, PurchaseRefFilter, StockMergePolicy,
    ViewFilter,
};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn item(name: &str, quantity: &str, unit: &str) -> LineItem {
    LineItem {
        name: Some(name.to_string()),
        quantity: Some(dec(quantity)),
        unit: Some(unit.to_string()),
        category: None,
        detected_stock: None,
    }
}

fn order(id: &str, items: Vec<LineItem>) -> ParsedOrder {
    ParsedOrder::new(Some(id.to_string()), items)
}

fn order_filter(op: &str) -> ViewFilter {
    ViewFilter {
        order: OrderFilter::Order(op.to_string()),
        purchase_ref: PurchaseRefFilter::All,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// The unfiltered view includes every ledger row exactly once
    #[test]
    fn test_unfiltered_view_is_complete() {
        let mut ledger = Ledger::new();
        ledger.ingest(
            &order(
                "OP-1",
                vec![
                    item("Harina", "50", "kg"),
                    item("Azucar", "8", "kg"),
                    item("Sal", "2", "kg"),
                ],
            ),
            StockMergePolicy::Accumulate,
        );

        let rows = ledger.view(&ViewFilter::default());
        assert_eq!(rows.len(), 3);
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["HARINA", "AZUCAR", "SAL"]);
    }

    /// An order filter changes both row selection and the displayed quantity
    #[test]
    fn test_order_filter_switches_displayed_requirement() {
        let mut ledger = Ledger::new();
        ledger.ingest(
            &order(
                "OP-1",
                vec![item("Harina", "50", "kg"), item("Azucar", "8", "kg")],
            ),
            StockMergePolicy::Accumulate,
        );
        ledger.ingest(
            &order("OP-2", vec![item("Harina", "20", "kg")]),
            StockMergePolicy::Accumulate,
        );

        let rows = ledger.view(&order_filter("OP-2"));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "HARINA");
        assert_eq!(rows[0].required, dec("20"));

        let rows = ledger.view(&order_filter("OP-1"));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].required, dec("50"));
    }

    /// Coverage clamp: 100 required, 30 on hand buys 70; 150 on hand is covered
    #[test]
    fn test_coverage_clamp() {
        let mut ledger = Ledger::new();
        ledger.ingest(
            &order("OP-1", vec![item("Harina", "100", "kg")]),
            StockMergePolicy::Accumulate,
        );

        ledger.set_field("Harina", FieldEdit::OnHandStock(dec("30")));
        let rows = ledger.view(&ViewFilter::default());
        assert_eq!(rows[0].amount_to_purchase, dec("70"));
        assert!(!rows[0].covered);

        ledger.set_field("Harina", FieldEdit::OnHandStock(dec("150")));
        let rows = ledger.view(&ViewFilter::default());
        assert_eq!(rows[0].amount_to_purchase, dec("0"));
        assert!(rows[0].covered);
    }

    /// A manual override is shown verbatim, negative values included
    #[test]
    fn test_manual_override_is_verbatim() {
        let mut ledger = Ledger::new();
        ledger.ingest(
            &order("OP-1", vec![item("Harina", "100", "kg")]),
            StockMergePolicy::Accumulate,
        );
        ledger.set_field("Harina", FieldEdit::OnHandStock(dec("30")));
        ledger.set_field(
            "Harina",
            FieldEdit::ManualPurchaseOverride(Some(dec("-5"))),
        );

        let rows = ledger.view(&ViewFilter::default());
        assert_eq!(rows[0].amount_to_purchase, dec("-5"));
        assert!(rows[0].covered);
    }

    /// The purchase-order filter matches exactly, the empty string included
    #[test]
    fn test_purchase_ref_filter_exact_match() {
        let mut ledger = Ledger::new();
        ledger.ingest(
            &order(
                "OP-1",
                vec![item("Harina", "50", "kg"), item("Azucar", "8", "kg")],
            ),
            StockMergePolicy::Accumulate,
        );
        ledger.set_field("Harina", FieldEdit::PurchaseOrderRef("OC-900".to_string()));

        let assigned = ViewFilter {
            order: OrderFilter::All,
            purchase_ref: PurchaseRefFilter::Ref("OC-900".to_string()),
        };
        let rows = ledger.view(&assigned);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "HARINA");

        // The empty string selects rows without a purchase order yet
        let unassigned = ViewFilter {
            order: OrderFilter::All,
            purchase_ref: PurchaseRefFilter::Ref(String::new()),
        };
        let rows = ledger.view(&unassigned);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "AZUCAR");
    }

    /// Both filters apply together as a logical AND
    #[test]
    fn test_filters_combine_as_and() {
        let mut ledger = Ledger::new();
        ledger.ingest(
            &order(
                "OP-1",
                vec![item("Harina", "50", "kg"), item("Azucar", "8", "kg")],
            ),
            StockMergePolicy::Accumulate,
        );
        ledger.ingest(
            &order("OP-2", vec![item("Azucar", "4", "kg")]),
            StockMergePolicy::Accumulate,
        );
        ledger.set_field("Harina", FieldEdit::PurchaseOrderRef("OC-900".to_string()));

        let filter = ViewFilter {
            order: OrderFilter::Order("OP-1".to_string()),
            purchase_ref: PurchaseRefFilter::Ref("OC-900".to_string()),
        };
        let rows = ledger.view(&filter);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "HARINA");
    }

    /// Grouping partitions the filtered rows without losing any
    #[test]
    fn test_grouped_view_partitions_rows() {
        let mut ledger = Ledger::new();
        let mut pote = item("Pote HDPE 310", "200", "und");
        pote.category = Some(shared::MaterialCategory::Packaging);
        ledger.ingest(
            &order(
                "OP-1",
                vec![item("Harina", "50", "kg"), item("Azucar", "8", "kg"), pote],
            ),
            StockMergePolicy::Accumulate,
        );

        let flat = ledger.view(&ViewFilter::default());
        let groups = ledger.view_grouped(&ViewFilter::default());
        let grouped_count: usize = groups.iter().map(|g| g.rows.len()).sum();
        assert_eq!(flat.len(), grouped_count);
        for group in &groups {
            for row in &group.rows {
                assert_eq!(row.category, group.category);
            }
        }
    }
}

// ============================================================================
// Property Tests
// ============================================================================

mod property_tests {
    use super::*;

    fn name_strategy() -> impl Strategy<Value = &'static str> {
        prop::sample::select(vec!["harina", "azucar", "sal", "bolsa", "pote"])
    }

    fn order_id_strategy() -> impl Strategy<Value = &'static str> {
        prop::sample::select(vec!["OP-1", "OP-2", "OP-3"])
    }

    fn orders_strategy() -> impl Strategy<Value = Vec<(String, Vec<(String, i64)>)>> {
        prop::collection::vec(
            (
                order_id_strategy().prop_map(String::from),
                prop::collection::vec(
                    (name_strategy().prop_map(String::from), 1i64..1000),
                    1..5,
                ),
            ),
            1..10,
        )
    }

    fn build_ledger(orders: &[(String, Vec<(String, i64)>)]) -> Ledger {
        let mut ledger = Ledger::new();
        for (op, lines) in orders {
            let items = lines
                .iter()
                .map(|(name, qty)| LineItem {
                    name: Some(name.clone()),
                    quantity: Some(Decimal::from(*qty)),
                    unit: Some("kg".to_string()),
                    category: None,
                    detected_stock: None,
                })
                .collect();
            ledger.ingest(
                &ParsedOrder::new(Some(op.clone()), items),
                StockMergePolicy::Accumulate,
            );
        }
        ledger
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The unfiltered view lists every ledger row exactly once
        #[test]
        fn prop_view_all_is_the_whole_ledger(orders in orders_strategy()) {
            let ledger = build_ledger(&orders);
            let rows = ledger.view(&ViewFilter::default());
            prop_assert_eq!(rows.len(), ledger.len());
            for (display, row) in rows.iter().zip(ledger.rows()) {
                prop_assert_eq!(&display.name, &row.name);
                prop_assert_eq!(display.required, row.total_required);
            }
        }

        /// An order filter selects exactly the rows that order contributed to,
        /// and shows that order's contribution as the requirement
        #[test]
        fn prop_order_filter_selects_contributors(orders in orders_strategy()) {
            let ledger = build_ledger(&orders);
            for op in ledger.order_ids() {
                let rows = ledger.view(&order_filter(&op));
                let expected: Vec<&str> = ledger
                    .rows()
                    .iter()
                    .filter(|r| r.source_orders.contains(&op))
                    .map(|r| r.name.as_str())
                    .collect();
                let shown: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
                prop_assert_eq!(shown, expected);
                for display in &rows {
                    let row = ledger.get(&display.name).unwrap();
                    prop_assert_eq!(
                        display.required,
                        *row.per_order_breakdown.get(&op).unwrap()
                    );
                }
            }
        }

        /// Without an override the purchase amount is the clamped shortfall
        #[test]
        fn prop_amount_to_purchase_is_clamped_shortfall(
            orders in orders_strategy(),
            stock in 0i64..2000,
        ) {
            let mut ledger = build_ledger(&orders);
            let first = ledger.rows().first().map(|r| r.name.clone());
            if let Some(name) = first {
                ledger.set_field(&name, FieldEdit::OnHandStock(Decimal::from(stock)));
            }
            for display in ledger.view(&ViewFilter::default()) {
                let shortfall = display.required - display.on_hand_stock;
                let expected = if shortfall > Decimal::ZERO { shortfall } else { Decimal::ZERO };
                prop_assert_eq!(display.amount_to_purchase, expected);
                prop_assert_eq!(display.covered, display.amount_to_purchase <= Decimal::ZERO);
            }
        }
    }
}
