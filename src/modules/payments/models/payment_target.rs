use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

/// Target amounts for one category at a milestone
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTarget {
    pub category_name: String,
    pub sort_order: i32,
    /// GST-inclusive estimation total resolved for this category
    pub total: Decimal,
    pub target_percentage: Decimal,
    pub target_amount: Decimal,
}

/// Payment due at a milestone, per category and in aggregate.
///
/// The `categories` map is keyed by category id and carries one entry per
/// configured category — including those that resolved to zero — so callers
/// can render N categories without any fixed field names.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentTargetReport {
    pub milestone_type: String,
    pub milestone_code: String,
    pub milestone_name: String,
    pub categories: BTreeMap<String, CategoryTarget>,
    pub target_total: Decimal,
    pub collected_total: Decimal,
    pub expected_total: Decimal,
}
