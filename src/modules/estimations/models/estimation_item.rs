use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Procurement status of an estimation line item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Available for purchase requests
    Queued,
    /// Referenced by a purchase request
    PrRaised,
    /// Fully procured
    Purchased,
}

impl Default for ItemStatus {
    fn default() -> Self {
        ItemStatus::Queued
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemStatus::Queued => write!(f, "queued"),
            ItemStatus::PrRaised => write!(f, "pr_raised"),
            ItemStatus::Purchased => write!(f, "purchased"),
        }
    }
}

impl std::str::FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "queued" => Ok(ItemStatus::Queued),
            "pr_raised" => Ok(ItemStatus::PrRaised),
            "purchased" => Ok(ItemStatus::Purchased),
            _ => Err(format!("Invalid estimation item status: {}", s)),
        }
    }
}

/// Raw line item as submitted for an estimation
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EstimationItemInput {
    /// Category id from the project's business model
    pub category: String,
    pub room_name: String,
    pub item_name: String,
    /// Ignored for area-priced items, where quantity = width × height
    #[serde(default)]
    pub quantity: Decimal,
    pub unit: String,
    pub unit_price: Decimal,
    #[serde(default)]
    pub width: Option<Decimal>,
    #[serde(default)]
    pub height: Option<Decimal>,
    #[serde(default)]
    pub item_discount_percentage: Decimal,
    #[serde(default)]
    pub kg_discount_percentage: Decimal,
    /// Overrides the business model's GST rate for this item
    #[serde(default)]
    pub gst_percentage: Option<Decimal>,
}

impl EstimationItemInput {
    pub fn is_area_priced(&self) -> bool {
        self.unit == "sqft"
    }
}

/// Amounts computed for one line item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemTotals {
    pub quantity: Decimal,
    pub subtotal: Decimal,
    pub kg_charges_percentage: Decimal,
    pub kg_charges_amount: Decimal,
    pub item_discount_percentage: Decimal,
    pub item_discount_amount: Decimal,
    pub kg_discount_percentage: Decimal,
    pub kg_discount_amount: Decimal,
    pub gst_percentage: Decimal,
    pub gst_amount: Decimal,
    pub amount_before_gst: Decimal,
    pub item_total: Decimal,
}

/// A stored estimation line item with computed totals
#[derive(Debug, Clone, Serialize)]
pub struct EstimationItem {
    pub id: Option<i32>,
    pub estimation_id: Option<i32>,
    /// Durable identifier surviving estimation re-uploads and versioning;
    /// purchase-request links reference this, not the row id
    pub stable_item_id: String,
    pub category: String,
    pub room_name: String,
    pub item_name: String,
    pub unit: String,
    pub unit_price: Decimal,
    pub status: ItemStatus,
    #[serde(flatten)]
    pub totals: ItemTotals,
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_item_status_round_trip() {
        assert_eq!(ItemStatus::from_str("queued").unwrap(), ItemStatus::Queued);
        assert_eq!(
            ItemStatus::from_str("pr_raised").unwrap(),
            ItemStatus::PrRaised
        );
        assert_eq!(ItemStatus::PrRaised.to_string(), "pr_raised");
        assert!(ItemStatus::from_str("ordered").is_err());
    }

    #[test]
    fn test_input_defaults() {
        let input: EstimationItemInput = serde_json::from_str(
            r#"{
                "category": "woodwork",
                "room_name": "Foyer",
                "item_name": "Base Unit",
                "unit": "sqft",
                "unit_price": 4000,
                "width": 20,
                "height": 5
            }"#,
        )
        .unwrap();

        assert!(input.is_area_priced());
        assert_eq!(input.item_discount_percentage, Decimal::ZERO);
        assert_eq!(input.gst_percentage, None);
    }
}
