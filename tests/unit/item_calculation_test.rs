// Estimation item calculation tests.
//
// Worked examples follow the billing rules end to end: area pricing, item
// discounts before service charges, service-charge discounts on the charges
// alone, pay-to-vendor categories, and GST on the pre-tax amount.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use interiopay::bizmodels::models::CategoryDefinition;
use interiopay::estimations::models::{EstimationItem, EstimationItemInput, ItemTotals};
use interiopay::estimations::services::ItemCalculator;

fn category(json: serde_json::Value) -> CategoryDefinition {
    serde_json::from_value(json).unwrap()
}

fn woodwork() -> CategoryDefinition {
    category(serde_json::json!({
        "id": "woodwork",
        "category_name": "Woodwork",
        "sort_order": 1,
        "kg_percentage": 10,
        "max_kg_discount_percentage": 50,
        "max_item_discount_percentage": 20
    }))
}

fn shopping() -> CategoryDefinition {
    category(serde_json::json!({
        "id": "shopping",
        "category_name": "Shopping",
        "sort_order": 3,
        "kg_percentage": 5,
        "pay_to_vendor_directly": true,
        "max_kg_discount_percentage": 30,
        "max_item_discount_percentage": 20
    }))
}

fn item(json: serde_json::Value) -> EstimationItemInput {
    serde_json::from_value(json).unwrap()
}

#[test]
fn test_full_billing_item() {
    let input = item(serde_json::json!({
        "category": "woodwork",
        "room_name": "Foyer",
        "item_name": "Base Unit",
        "quantity": 0,
        "unit": "sqft",
        "unit_price": 4000,
        "width": 20,
        "height": 5,
        "item_discount_percentage": 10
    }));

    let totals = ItemCalculator::calculate_item(&input, &woodwork(), dec!(18)).unwrap();

    assert_eq!(totals.subtotal, dec!(400000));
    assert_eq!(totals.item_discount_amount, dec!(40000));
    assert_eq!(totals.kg_charges_amount, dec!(40000));
    assert_eq!(totals.amount_before_gst, dec!(400000));
    assert_eq!(totals.gst_amount, dec!(72000));
    assert_eq!(totals.item_total, dec!(472000));
}

#[test]
fn test_pay_to_vendor_item_bills_service_charge_only() {
    let input = item(serde_json::json!({
        "category": "shopping",
        "room_name": "Living",
        "item_name": "Sofa",
        "quantity": 1,
        "unit": "nos",
        "unit_price": 150000
    }));

    let totals = ItemCalculator::calculate_item(&input, &shopping(), dec!(18)).unwrap();

    // 5% of 150000, plus GST on that alone
    assert_eq!(totals.amount_before_gst, dec!(7500));
    assert_eq!(totals.gst_amount, dec!(1350));
    assert_eq!(totals.item_total, dec!(8850));
}

#[test]
fn test_rounding_to_paise() {
    let input = item(serde_json::json!({
        "category": "woodwork",
        "room_name": "Kitchen",
        "item_name": "Handle",
        "quantity": 3,
        "unit": "nos",
        "unit_price": 33.33
    }));

    let totals = ItemCalculator::calculate_item(&input, &woodwork(), dec!(18)).unwrap();

    assert_eq!(totals.subtotal, dec!(99.99));
    // 10% charges: 9.999 rounds to 10.00 in the report
    assert_eq!(totals.kg_charges_amount, dec!(10.00));
    // 109.989 × 18% = 19.79802, reported as 19.80
    assert_eq!(totals.gst_amount, dec!(19.80));
    assert_eq!(totals.item_total, dec!(129.79));
}

#[test]
fn test_aggregate_keeps_final_value_pre_gst() {
    let inputs = vec![
        item(serde_json::json!({
            "category": "woodwork",
            "room_name": "Foyer",
            "item_name": "Base Unit",
            "quantity": 1,
            "unit": "nos",
            "unit_price": 100000
        })),
        item(serde_json::json!({
            "category": "shopping",
            "room_name": "Living",
            "item_name": "Sofa",
            "quantity": 1,
            "unit": "nos",
            "unit_price": 150000
        })),
    ];

    let categories = vec![woodwork(), shopping()];
    let items: Vec<EstimationItem> = inputs
        .iter()
        .map(|input| {
            let cat = categories.iter().find(|c| c.id == input.category).unwrap();
            let totals = ItemCalculator::calculate_item(input, cat, dec!(18)).unwrap();
            stored_item(&input.category, totals)
        })
        .collect();

    let totals = ItemCalculator::aggregate(&items, &categories);

    // woodwork: 110000 before GST; shopping: 7500 before GST
    assert_eq!(totals.final_value, dec!(117500));
    assert_eq!(totals.gst_amount, dec!(21150));
    assert_eq!(totals.grand_total(), dec!(138650));

    let woodwork_entry = totals.category_breakdown.0.get("woodwork").unwrap();
    assert_eq!(woodwork_entry.total, dec!(129800));
    let shopping_entry = totals.category_breakdown.0.get("shopping").unwrap();
    assert_eq!(shopping_entry.total, dec!(8850));
}

fn stored_item(category: &str, totals: ItemTotals) -> EstimationItem {
    EstimationItem {
        id: None,
        estimation_id: None,
        stable_item_id: "test".to_string(),
        category: category.to_string(),
        room_name: "Room".to_string(),
        item_name: "Item".to_string(),
        unit: "nos".to_string(),
        unit_price: Decimal::ZERO,
        status: Default::default(),
        totals,
        created_at: None,
    }
}

proptest! {
    #[test]
    fn test_gst_is_proportional_to_pre_tax_amount(
        quantity in 1u32..1000u32,
        unit_price in 1u32..100_000u32,
        gst_pct in 0u8..=28u8
    ) {
        let input = item(serde_json::json!({
            "category": "woodwork",
            "room_name": "Room",
            "item_name": "Item",
            "quantity": quantity,
            "unit": "nos",
            "unit_price": unit_price,
            "gst_percentage": gst_pct
        }));

        let totals = ItemCalculator::calculate_item(&input, &woodwork(), dec!(18)).unwrap();

        let expected = totals.amount_before_gst * Decimal::from(gst_pct) / Decimal::ONE_HUNDRED;
        let diff = (totals.gst_amount - expected).abs();
        prop_assert!(diff < dec!(0.01), "gst {} vs expected {}", totals.gst_amount, expected);
    }

    #[test]
    fn test_item_total_is_pre_tax_plus_gst(
        quantity in 1u32..1000u32,
        unit_price in 1u32..100_000u32,
        item_discount in 0u8..=20u8,
        kg_discount in 0u8..=50u8
    ) {
        let input = item(serde_json::json!({
            "category": "woodwork",
            "room_name": "Room",
            "item_name": "Item",
            "quantity": quantity,
            "unit": "nos",
            "unit_price": unit_price,
            "item_discount_percentage": item_discount,
            "kg_discount_percentage": kg_discount
        }));

        let totals = ItemCalculator::calculate_item(&input, &woodwork(), dec!(18)).unwrap();

        let diff = (totals.item_total - totals.amount_before_gst - totals.gst_amount).abs();
        prop_assert!(diff <= dec!(0.01));
        prop_assert!(totals.item_total >= Decimal::ZERO);
    }
}
