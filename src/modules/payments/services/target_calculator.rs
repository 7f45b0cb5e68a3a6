// Milestone payment-target calculation.
//
// Pure computation over already-fetched data: the business model's category
// list, the finalized estimation's category breakdown, the milestone's
// percentage map, and the amount collected so far. Holds no state and
// performs no I/O; data retrieval belongs to the TargetDataSource
// collaborator.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::debug;

use crate::core::money;
use crate::core::{AppError, Result};
use crate::modules::bizmodels::models::{CategoryDefinition, Milestone};
use crate::modules::estimations::models::CategoryBreakdown;
use crate::modules::payments::models::{CategoryTarget, PaymentTargetReport};

/// Calculator for milestone payment targets
pub struct PaymentTargetCalculator;

impl PaymentTargetCalculator {
    /// Compute the per-category and aggregate amounts due at a milestone.
    ///
    /// Categories are processed in ascending `sort_order`. Each resolves to
    /// a breakdown entry through its ordered key list (total 0 when nothing
    /// resolves, never dropped from the output), takes its milestone
    /// percentage (0 when absent from the map), and contributes
    /// `total × percentage / 100` to the target. Amounts round to paise only
    /// in the emitted report; the running sums keep full precision.
    ///
    /// `expected_total` is the remaining due: collections can exceed the
    /// target, the due amount never goes negative.
    ///
    /// An empty category list yields a zero-total report rather than an
    /// error.
    pub fn calculate(
        categories: &[CategoryDefinition],
        breakdown: &CategoryBreakdown,
        milestone: &Milestone,
        collected_total: Decimal,
    ) -> Result<PaymentTargetReport> {
        money::ensure_non_negative("collected_total", collected_total)?;

        let mut sorted: Vec<&CategoryDefinition> = categories.iter().collect();
        sorted.sort_by_key(|c| c.sort_order);

        let mut category_targets = BTreeMap::new();
        let mut target_total = Decimal::ZERO;

        for category in sorted {
            let percentage = milestone.percentage_for(&category.id);
            money::ensure_percentage(
                &format!("target percentage for category '{}'", category.id),
                percentage,
            )?;

            let entry = breakdown.resolve(category);
            if entry.is_none() {
                debug!(
                    category = %category.id,
                    milestone = %milestone.milestone_code,
                    "No breakdown entry resolved, using zero total"
                );
            }
            let total = entry.map(|e| e.total).unwrap_or(Decimal::ZERO);
            money::ensure_non_negative(
                &format!("breakdown total for category '{}'", category.id),
                total,
            )?;

            let target_amount = money::percent_of(total, percentage);
            target_total += target_amount;

            let previous = category_targets.insert(
                category.id.clone(),
                CategoryTarget {
                    category_name: category.category_name.clone(),
                    sort_order: category.sort_order,
                    total: money::round(total),
                    target_percentage: percentage,
                    target_amount: money::round(target_amount),
                },
            );
            if previous.is_some() {
                return Err(AppError::validation(format!(
                    "Duplicate category id '{}' in business model configuration",
                    category.id
                )));
            }
        }

        let expected_total = (target_total - collected_total).max(Decimal::ZERO);

        Ok(PaymentTargetReport {
            milestone_type: "regular".to_string(),
            milestone_code: milestone.milestone_code.clone(),
            milestone_name: milestone.milestone_name.clone(),
            categories: category_targets,
            target_total: money::round(target_total),
            collected_total: money::round(collected_total),
            expected_total: money::round(expected_total),
        })
    }
}
