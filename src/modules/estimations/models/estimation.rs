// Estimation model with per-category breakdown.
//
// An estimation is one versioned costing of a project. Versions are numbered
// per project starting at 1; finalizing freezes the numbers that payment
// milestones are calculated against.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::modules::bizmodels::models::CategoryDefinition;

/// Estimation lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimationStatus {
    Draft,
    Finalized,
    Approved,
}

impl Default for EstimationStatus {
    fn default() -> Self {
        EstimationStatus::Draft
    }
}

impl std::fmt::Display for EstimationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EstimationStatus::Draft => write!(f, "draft"),
            EstimationStatus::Finalized => write!(f, "finalized"),
            EstimationStatus::Approved => write!(f, "approved"),
        }
    }
}

impl std::str::FromStr for EstimationStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "draft" => Ok(EstimationStatus::Draft),
            "finalized" => Ok(EstimationStatus::Finalized),
            "approved" => Ok(EstimationStatus::Approved),
            _ => Err(format!("Invalid estimation status: {}", s)),
        }
    }
}

/// Accumulated amounts for one category of an estimation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    #[serde(default)]
    pub subtotal: Decimal,
    #[serde(default)]
    pub item_discount_amount: Decimal,
    #[serde(default)]
    pub kg_charges_amount: Decimal,
    #[serde(default)]
    pub kg_discount_amount: Decimal,
    #[serde(default)]
    pub amount_before_gst: Decimal,
    #[serde(default)]
    pub gst_amount: Decimal,
    /// GST-inclusive category total, the base for milestone targets
    #[serde(default)]
    pub total: Decimal,
}

/// Per-category breakdown of one estimation, keyed by breakdown key.
///
/// Keys are normally category ids; breakdowns written before the ids were
/// unified may carry legacy keys instead, which is why lookups go through
/// the category's ordered alias list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryBreakdown(pub HashMap<String, BreakdownEntry>);

impl CategoryBreakdown {
    /// Resolve a category to its breakdown entry: the exact id first, then
    /// the category's fallback keys, stopping at the first present key.
    pub fn resolve(&self, category: &CategoryDefinition) -> Option<&BreakdownEntry> {
        category
            .breakdown_keys()
            .into_iter()
            .find_map(|key| self.0.get(key))
    }

    /// GST-inclusive total for a category, 0 when unresolved
    pub fn total_for(&self, category: &CategoryDefinition) -> Decimal {
        self.resolve(category)
            .map(|entry| entry.total)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn insert(&mut self, key: String, entry: BreakdownEntry) {
        self.0.insert(key, entry);
    }
}

/// One versioned costing of a project
#[derive(Debug, Clone, Serialize)]
pub struct Estimation {
    pub id: i32,
    pub project_id: i32,
    pub version: i32,
    pub status: EstimationStatus,
    /// Sum of item subtotals before discounts and service charges
    pub items_value: Decimal,
    pub kg_charges: Decimal,
    pub items_discount: Decimal,
    pub kg_discount: Decimal,
    pub gst_amount: Decimal,
    /// Pre-GST value; the customer-facing grand total adds `gst_amount`
    pub final_value: Decimal,
    pub category_breakdown: CategoryBreakdown,
    pub created_at: Option<DateTime<Utc>>,
}

impl Estimation {
    /// GST-inclusive grand total
    pub fn grand_total(&self) -> Decimal {
        self.final_value + self.gst_amount
    }
}
