// Purchase-request allocation validation scenarios.
//
// Component fulfilment is weightage-based (fractions of one unit across
// requests must stay within 100%); full-unit fulfilment is quantity-based
// (units requested must fit what confirmed and draft requests left over).

use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use interiopay::purchases::models::{EstimationLink, ItemAllocation, LinkedItem};
use interiopay::purchases::services::AllocationValidator;

fn allocation(stable_id: &str, total_qty: Decimal) -> ItemAllocation {
    ItemAllocation {
        stable_item_id: stable_id.to_string(),
        item_name: "Wardrobe".to_string(),
        category: "woodwork".to_string(),
        room_name: "Bedroom".to_string(),
        unit: "nos".to_string(),
        total_qty,
        ..Default::default()
    }
}

fn link(stable_id: &str, linked_qty: Decimal, weightage: Decimal) -> EstimationLink {
    EstimationLink {
        stable_estimation_item_id: stable_id.to_string(),
        linked_qty,
        weightage,
    }
}

fn request_item(name: &str, links: Vec<EstimationLink>) -> LinkedItem {
    LinkedItem {
        item_name: name.to_string(),
        links,
    }
}

#[test]
fn test_components_fill_one_unit_exactly() {
    // Carcass 40% + shutters 40% + hardware 20% of one wardrobe
    let allocations: HashMap<String, ItemAllocation> =
        [("w-1".to_string(), allocation("w-1", dec!(1)))].into();

    let items = vec![
        request_item("Carcass", vec![link("w-1", dec!(1), dec!(0.4))]),
        request_item("Shutters", vec![link("w-1", dec!(1), dec!(0.4))]),
        request_item("Hardware", vec![link("w-1", dec!(1), dec!(0.2))]),
    ];

    assert!(AllocationValidator::validate(&items, &allocations).is_empty());
}

#[test]
fn test_component_over_allocation_across_requests() {
    let mut alloc = allocation("w-1", dec!(1));
    alloc.confirmed_weightage = dec!(0.5);
    alloc.draft_weightage = dec!(0.4);
    let allocations: HashMap<String, ItemAllocation> = [("w-1".to_string(), alloc)].into();

    let items = vec![request_item(
        "Hardware",
        vec![link("w-1", dec!(1), dec!(0.2))],
    )];

    let errors = AllocationValidator::validate(&items, &allocations);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Component weightage exceeds 100%"));
    assert!(errors[0].contains("woodwork - Bedroom - Wardrobe"));
}

#[test]
fn test_component_usage_does_not_touch_quantity() {
    // A fully quantity-allocated item can still take component links
    let mut alloc = allocation("w-1", dec!(2));
    alloc.confirmed_qty = dec!(2);
    let allocations: HashMap<String, ItemAllocation> = [("w-1".to_string(), alloc)].into();

    let items = vec![request_item(
        "Edge banding",
        vec![link("w-1", dec!(1), dec!(0.1))],
    )];

    assert!(AllocationValidator::validate(&items, &allocations).is_empty());
}

#[test]
fn test_full_units_within_remaining() {
    let mut alloc = allocation("w-1", dec!(5));
    alloc.confirmed_qty = dec!(2);
    alloc.draft_qty = dec!(1);
    let allocations: HashMap<String, ItemAllocation> = [("w-1".to_string(), alloc)].into();

    let items = vec![request_item(
        "Wardrobes",
        vec![link("w-1", dec!(2), dec!(1))],
    )];

    assert!(AllocationValidator::validate(&items, &allocations).is_empty());
}

#[test]
fn test_full_units_beyond_remaining() {
    let mut alloc = allocation("w-1", dec!(5));
    alloc.confirmed_qty = dec!(2);
    alloc.draft_qty = dec!(1);
    let allocations: HashMap<String, ItemAllocation> = [("w-1".to_string(), alloc)].into();

    let items = vec![request_item(
        "Wardrobes",
        vec![link("w-1", dec!(3), dec!(1))],
    )];

    let errors = AllocationValidator::validate(&items, &allocations);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Requested 3.00 nos exceeds available 2.00 nos"));
}

#[test]
fn test_quantity_accumulates_across_items_in_request() {
    let allocations: HashMap<String, ItemAllocation> =
        [("w-1".to_string(), allocation("w-1", dec!(3)))].into();

    let items = vec![
        request_item("Batch A", vec![link("w-1", dec!(2), dec!(1))]),
        request_item("Batch B", vec![link("w-1", dec!(2), dec!(1))]),
    ];

    let errors = AllocationValidator::validate(&items, &allocations);
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_mixed_component_and_full_unit_links() {
    let allocations: HashMap<String, ItemAllocation> = [
        ("w-1".to_string(), allocation("w-1", dec!(2))),
        ("w-2".to_string(), allocation("w-2", dec!(1))),
    ]
    .into();

    let items = vec![
        request_item("Wardrobes", vec![link("w-1", dec!(2), dec!(1))]),
        request_item("Carcass only", vec![link("w-2", dec!(1), dec!(0.5))]),
    ];

    assert!(AllocationValidator::validate(&items, &allocations).is_empty());
}

#[test]
fn test_all_violations_reported_not_just_first() {
    let allocations: HashMap<String, ItemAllocation> =
        [("w-1".to_string(), allocation("w-1", dec!(1)))].into();

    let items = vec![
        request_item("Too many", vec![link("w-1", dec!(5), dec!(1))]),
        request_item("Unknown", vec![link("w-404", dec!(1), dec!(1))]),
        request_item("Blank", vec![link("", dec!(1), dec!(1))]),
    ];

    let errors = AllocationValidator::validate(&items, &allocations);
    assert_eq!(errors.len(), 3);
}
