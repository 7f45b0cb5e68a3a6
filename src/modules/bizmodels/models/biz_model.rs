// Business model configuration: cost categories and their billing rules.
//
// A business model is a template applied to a class of projects. Its
// category list drives every downstream calculation — estimation breakdowns,
// milestone targets, discount limits — so nothing in the system hardcodes
// category names.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Business model publication lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BizModelStatus {
    /// Editable, not yet usable by new projects
    Draft,
    /// Frozen and available for project assignment
    Published,
}

impl std::fmt::Display for BizModelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BizModelStatus::Draft => write!(f, "draft"),
            BizModelStatus::Published => write!(f, "published"),
        }
    }
}

impl std::str::FromStr for BizModelStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "draft" => Ok(BizModelStatus::Draft),
            "published" => Ok(BizModelStatus::Published),
            _ => Err(format!("Invalid biz model status: {}", s)),
        }
    }
}

/// One configured cost category of a business model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDefinition {
    /// Stable key used to join estimation breakdowns and milestone percentages
    pub id: String,

    pub category_name: String,

    /// Position of the category in every ordered listing and summation
    pub sort_order: i32,

    /// Label shown for the service-charge line of this category
    #[serde(default)]
    pub kg_label: Option<String>,

    /// Service-charge percentage billed on top of item subtotals
    #[serde(default)]
    pub kg_percentage: Decimal,

    /// When set, the customer settles items with the vendor directly and
    /// only the service charge is billed
    #[serde(default)]
    pub pay_to_vendor_directly: bool,

    #[serde(default)]
    pub max_kg_discount_percentage: Decimal,

    #[serde(default)]
    pub max_item_discount_percentage: Decimal,

    /// Ordered fallback keys for resolving this category in estimation
    /// breakdowns written before the category ids were unified
    #[serde(default)]
    pub breakdown_aliases: Vec<String>,
}

impl CategoryDefinition {
    /// Breakdown keys to try for this category, in resolution order: the
    /// canonical id first, then configured aliases, then known legacy keys.
    pub fn breakdown_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = vec![self.id.as_str()];
        if self.breakdown_aliases.is_empty() {
            keys.extend(legacy_aliases(&self.id));
        } else {
            keys.extend(self.breakdown_aliases.iter().map(|s| s.as_str()));
        }
        keys
    }
}

/// Legacy breakdown keys for category ids that predate the unified naming.
fn legacy_aliases(category_id: &str) -> &'static [&'static str] {
    match category_id {
        "misc" => &["misc_external", "misc_internal"],
        "shopping" => &["shopping_service"],
        _ => &[],
    }
}

/// The `category_rates` document stored on a business model
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryRates {
    pub categories: Vec<CategoryDefinition>,
}

impl CategoryRates {
    /// Categories in ascending `sort_order`
    pub fn sorted_categories(&self) -> Vec<&CategoryDefinition> {
        let mut cats: Vec<&CategoryDefinition> = self.categories.iter().collect();
        cats.sort_by_key(|c| c.sort_order);
        cats
    }

    pub fn find(&self, category_id: &str) -> Option<&CategoryDefinition> {
        self.categories.iter().find(|c| c.id == category_id)
    }
}

/// A configurable business model
#[derive(Debug, Clone, Serialize)]
pub struct BizModel {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub status: BizModelStatus,
    pub is_active: bool,
    /// GST percentage applied when an item does not carry its own
    pub gst_percentage: Decimal,
    pub category_rates: CategoryRates,
    pub created_at: Option<DateTime<Utc>>,
}
