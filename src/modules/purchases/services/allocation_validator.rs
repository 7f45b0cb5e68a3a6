// Purchase-request allocation validation.
//
// Component fulfilment (weightage < 1.0) is validated on weightage alone:
// the combined weightage over one estimation item must stay within 100%.
// Full-unit fulfilment (weightage = 1.0) is validated on quantity against
// what remains unallocated. Pure over pre-fetched allocations; every
// violation is collected, not just the first.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::modules::purchases::models::{ItemAllocation, LinkedItem};

/// Absolute tolerance applied to weightage and quantity comparisons
fn tolerance() -> Decimal {
    Decimal::new(1, 3) // 0.001
}

pub struct AllocationValidator;

impl AllocationValidator {
    /// Validate requested links against current allocations.
    ///
    /// Items without links are direct purchases and skip validation.
    /// Returns one message per violation; an empty vec means the request
    /// fits the available allocations.
    pub fn validate(
        items: &[LinkedItem],
        allocations: &HashMap<String, ItemAllocation>,
    ) -> Vec<String> {
        let mut errors = Vec::new();

        // Weightage and quantity already requested earlier in this request,
        // per estimation item
        let mut weightage_usage: HashMap<&str, Decimal> = HashMap::new();
        let mut qty_usage: HashMap<&str, Decimal> = HashMap::new();

        for item in items {
            for link in &item.links {
                if link.stable_estimation_item_id.is_empty() {
                    errors.push(format!(
                        "Item \"{}\": Missing estimation item reference",
                        item.item_name
                    ));
                    continue;
                }

                let Some(allocation) = allocations.get(&link.stable_estimation_item_id) else {
                    errors.push(format!(
                        "Item \"{}\": Linked estimation item not found",
                        item.item_name
                    ));
                    continue;
                };

                let stable_id = link.stable_estimation_item_id.as_str();

                // Component fulfilment: weightage only
                if link.weightage < Decimal::ONE {
                    let previous = weightage_usage.get(stable_id).copied().unwrap_or_default();
                    let requested = previous + link.weightage;
                    let already =
                        allocation.confirmed_weightage + allocation.draft_weightage;

                    if already + requested > Decimal::ONE + tolerance() {
                        errors.push(format!(
                            "Item \"{}\" linked to \"{}\": Component weightage exceeds 100%. \
                             (Already allocated: {:.1}%, This request: {:.1}%)",
                            item.item_name,
                            allocation.label(),
                            already * Decimal::ONE_HUNDRED,
                            requested * Decimal::ONE_HUNDRED,
                        ));
                    }

                    weightage_usage.insert(stable_id, requested);
                    continue;
                }

                // Full-unit fulfilment: quantity against remaining units
                let qty_used = allocation.confirmed_qty + allocation.draft_qty;
                let previous = qty_usage.get(stable_id).copied().unwrap_or_default();
                let requested = previous + link.linked_qty;
                let available = allocation.total_qty - qty_used;

                if requested > available + tolerance() {
                    errors.push(format!(
                        "Item \"{}\" linked to \"{}\": Requested {:.2} {} exceeds available {:.2} {}. \
                         (Total: {}, Already allocated: {:.2})",
                        item.item_name,
                        allocation.label(),
                        requested,
                        allocation.unit,
                        available,
                        allocation.unit,
                        allocation.total_qty,
                        qty_used,
                    ));
                }

                qty_usage.insert(stable_id, requested);
            }
        }

        errors
    }
}
