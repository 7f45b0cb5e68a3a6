use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Payment direction of a milestone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneDirection {
    /// Customer collections
    Inflow,
    /// Vendor disbursements
    Outflow,
}

impl std::fmt::Display for MilestoneDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MilestoneDirection::Inflow => write!(f, "inflow"),
            MilestoneDirection::Outflow => write!(f, "outflow"),
        }
    }
}

impl std::str::FromStr for MilestoneDirection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "inflow" => Ok(MilestoneDirection::Inflow),
            "outflow" => Ok(MilestoneDirection::Outflow),
            _ => Err(format!("Invalid milestone direction: {}", s)),
        }
    }
}

/// A payment checkpoint configured on a business model.
///
/// `category_percentages` maps category id to the percentage of that
/// category's estimation total due at this milestone. Categories absent
/// from the map are due 0% here; the percentages are independent per
/// category and carry no cross-category sum constraint.
#[derive(Debug, Clone, Serialize)]
pub struct Milestone {
    pub id: i32,
    pub biz_model_id: i32,
    pub milestone_code: String,
    pub milestone_name: String,
    pub direction: MilestoneDirection,
    /// Project stage this milestone is collectable in (`ANY` = no gate)
    pub stage_code: String,
    pub sequence_order: i32,
    pub category_percentages: HashMap<String, Decimal>,
}

impl Milestone {
    /// Percentage due for a category at this milestone, defaulting to 0
    pub fn percentage_for(&self, category_id: &str) -> Decimal {
        self.category_percentages
            .get(category_id)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}
