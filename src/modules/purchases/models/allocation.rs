// Allocation tracking between purchase requests and estimation items.
//
// A purchase-request item consumes an estimation item either as a component
// (weightage < 1.0 of one unit) or as full units (weightage = 1.0, tracked
// by quantity). Availability counts confirmed PRs and other draft PRs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

fn full_weightage() -> Decimal {
    Decimal::ONE
}

/// Link from a purchase-request item to the estimation item it fulfils
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimationLink {
    pub stable_estimation_item_id: String,
    #[serde(default)]
    pub linked_qty: Decimal,
    /// Fraction of one estimation unit this link consumes
    #[serde(default = "full_weightage")]
    pub weightage: Decimal,
}

/// A purchase-request item together with its estimation links
#[derive(Debug, Clone, Deserialize)]
pub struct LinkedItem {
    pub item_name: String,
    #[serde(default)]
    pub links: Vec<EstimationLink>,
}

/// Current allocation state of one estimation item
#[derive(Debug, Clone, Default)]
pub struct ItemAllocation {
    pub stable_item_id: String,
    pub item_name: String,
    pub category: String,
    pub room_name: String,
    pub unit: String,
    pub total_qty: Decimal,
    /// Component weightage consumed by confirmed PRs
    pub confirmed_weightage: Decimal,
    /// Component weightage consumed by other draft PRs
    pub draft_weightage: Decimal,
    /// Full units consumed by confirmed PRs
    pub confirmed_qty: Decimal,
    /// Full units consumed by other draft PRs
    pub draft_qty: Decimal,
}

impl ItemAllocation {
    pub fn label(&self) -> String {
        format!("{} - {} - {}", self.category, self.room_name, self.item_name)
    }
}

/// Availability row for the purchase-request item picker
#[derive(Debug, Clone, Serialize)]
pub struct AllocationSummary {
    pub stable_item_id: String,
    pub item_name: String,
    pub category: String,
    pub room_name: String,
    pub unit: String,
    pub total_qty: Decimal,
    pub confirmed_allocated: Decimal,
    pub draft_allocated: Decimal,
    pub available_qty: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_link_defaults_to_full_weightage() {
        let link: EstimationLink = serde_json::from_str(
            r#"{"stable_estimation_item_id": "abc", "linked_qty": 2}"#,
        )
        .unwrap();

        assert_eq!(link.weightage, Decimal::ONE);
        assert_eq!(link.linked_qty, dec!(2));
    }

    #[test]
    fn test_allocation_label() {
        let allocation = ItemAllocation {
            category: "woodwork".to_string(),
            room_name: "Foyer".to_string(),
            item_name: "Base Unit".to_string(),
            ..Default::default()
        };
        assert_eq!(allocation.label(), "woodwork - Foyer - Base Unit");
    }
}
