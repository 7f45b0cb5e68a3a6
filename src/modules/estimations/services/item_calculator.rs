use rust_decimal::Decimal;
use tracing::debug;

use crate::core::money;
use crate::core::{AppError, Result};
use crate::modules::bizmodels::models::CategoryDefinition;
use crate::modules::estimations::models::{
    BreakdownEntry, CategoryBreakdown, EstimationItem, EstimationItemInput, ItemTotals,
};

/// Result of checking an item's discounts against category limits
#[derive(Debug, Clone, Default)]
pub struct DiscountCheck {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl DiscountCheck {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Aggregate totals over all items of an estimation
#[derive(Debug, Clone, Default)]
pub struct EstimationTotals {
    pub category_breakdown: CategoryBreakdown,
    pub items_value: Decimal,
    pub kg_charges: Decimal,
    pub items_discount: Decimal,
    pub kg_discount: Decimal,
    pub gst_amount: Decimal,
    /// Pre-GST value across all items
    pub final_value: Decimal,
}

impl EstimationTotals {
    pub fn grand_total(&self) -> Decimal {
        self.final_value + self.gst_amount
    }
}

/// Calculator for estimation line items and their category rollup
pub struct ItemCalculator;

impl ItemCalculator {
    /// Calculate all amounts for one line item.
    ///
    /// Order of operations:
    /// 1. quantity × unit price (width × height for area-priced items)
    /// 2. item discount on the subtotal
    /// 3. service charges on the undiscounted subtotal, then the service
    ///    charge discount on the charges only
    /// 4. pay-to-vendor categories bill the service charges alone
    /// 5. GST on the pre-tax amount (item override, else the model's rate)
    pub fn calculate_item(
        input: &EstimationItemInput,
        category: &CategoryDefinition,
        default_gst_percentage: Decimal,
    ) -> Result<ItemTotals> {
        let quantity = if input.is_area_priced() {
            let width = input.width.ok_or_else(|| {
                AppError::validation(format!(
                    "Item '{}' is priced per sqft and requires a width",
                    input.item_name
                ))
            })?;
            let height = input.height.ok_or_else(|| {
                AppError::validation(format!(
                    "Item '{}' is priced per sqft and requires a height",
                    input.item_name
                ))
            })?;
            width * height
        } else {
            input.quantity
        };

        money::ensure_non_negative("quantity", quantity)?;
        money::ensure_non_negative("unit_price", input.unit_price)?;
        money::ensure_percentage("item_discount_percentage", input.item_discount_percentage)?;
        money::ensure_percentage("kg_discount_percentage", input.kg_discount_percentage)?;

        let gst_percentage = input.gst_percentage.unwrap_or(default_gst_percentage);
        money::ensure_percentage("gst_percentage", gst_percentage)?;

        let subtotal = quantity * input.unit_price;

        let item_discount_amount = money::percent_of(subtotal, input.item_discount_percentage);
        let discounted_subtotal = subtotal - item_discount_amount;

        let kg_charges_gross = money::percent_of(subtotal, category.kg_percentage);
        let kg_discount_amount =
            money::percent_of(kg_charges_gross, input.kg_discount_percentage);
        let kg_charges_net = kg_charges_gross - kg_discount_amount;

        let amount_before_gst = if category.pay_to_vendor_directly {
            // Customer settles items with the vendor; only charges are billed
            kg_charges_net
        } else {
            discounted_subtotal + kg_charges_net
        };

        let gst_amount = money::percent_of(amount_before_gst, gst_percentage);
        let item_total = amount_before_gst + gst_amount;

        Ok(ItemTotals {
            quantity,
            subtotal: money::round(subtotal),
            kg_charges_percentage: category.kg_percentage,
            kg_charges_amount: money::round(kg_charges_gross),
            item_discount_percentage: input.item_discount_percentage,
            item_discount_amount: money::round(item_discount_amount),
            kg_discount_percentage: input.kg_discount_percentage,
            kg_discount_amount: money::round(kg_discount_amount),
            gst_percentage,
            gst_amount: money::round(gst_amount),
            amount_before_gst: money::round(amount_before_gst),
            item_total: money::round(item_total),
        })
    }

    /// Check an item's discount percentages against the category's limits.
    ///
    /// Returns every violation rather than stopping at the first; discounts
    /// within 80% of a limit produce a warning.
    pub fn validate_discounts(
        input: &EstimationItemInput,
        category: &CategoryDefinition,
    ) -> DiscountCheck {
        let mut check = DiscountCheck::default();

        let item_discount = input.item_discount_percentage;
        let kg_discount = input.kg_discount_percentage;

        if item_discount > category.max_item_discount_percentage {
            check.errors.push(format!(
                "Item discount {}% exceeds maximum {}% for {}",
                item_discount, category.max_item_discount_percentage, category.category_name
            ));
        }

        if kg_discount > category.max_kg_discount_percentage {
            check.errors.push(format!(
                "Service charge discount {}% exceeds maximum {}% for {}",
                kg_discount, category.max_kg_discount_percentage, category.category_name
            ));
        }

        let warning_threshold = category.max_item_discount_percentage * Decimal::new(8, 1);
        if item_discount <= category.max_item_discount_percentage
            && item_discount > warning_threshold
        {
            check.warnings.push(format!(
                "Item discount {}% is close to the maximum limit",
                item_discount
            ));
        }

        check
    }

    /// Roll item totals up into per-category and estimation-wide totals.
    ///
    /// Breakdown entries are created for every configured category, so
    /// downstream consumers see categories with no items as explicit zeros.
    pub fn aggregate(
        items: &[EstimationItem],
        categories: &[CategoryDefinition],
    ) -> EstimationTotals {
        let mut totals = EstimationTotals::default();

        for category in categories {
            totals
                .category_breakdown
                .insert(category.id.clone(), BreakdownEntry::default());
        }

        for item in items {
            let Some(entry) = totals.category_breakdown.0.get_mut(&item.category) else {
                debug!(
                    category = %item.category,
                    item = %item.item_name,
                    "Skipping item with unconfigured category"
                );
                continue;
            };

            entry.subtotal += item.totals.subtotal;
            entry.item_discount_amount += item.totals.item_discount_amount;
            entry.kg_charges_amount += item.totals.kg_charges_amount;
            entry.kg_discount_amount += item.totals.kg_discount_amount;
            entry.amount_before_gst += item.totals.amount_before_gst;
            entry.gst_amount += item.totals.gst_amount;
            entry.total += item.totals.item_total;

            totals.items_value += item.totals.subtotal;
            totals.kg_charges += item.totals.kg_charges_amount;
            totals.items_discount += item.totals.item_discount_amount;
            totals.kg_discount += item.totals.kg_discount_amount;
            totals.gst_amount += item.totals.gst_amount;
            totals.final_value += item.totals.amount_before_gst;
        }

        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn woodwork() -> CategoryDefinition {
        serde_json::from_value(serde_json::json!({
            "id": "woodwork",
            "category_name": "Woodwork",
            "sort_order": 1,
            "kg_percentage": 10,
            "pay_to_vendor_directly": false,
            "max_kg_discount_percentage": 50,
            "max_item_discount_percentage": 20
        }))
        .unwrap()
    }

    fn shopping() -> CategoryDefinition {
        serde_json::from_value(serde_json::json!({
            "id": "shopping",
            "category_name": "Shopping",
            "sort_order": 3,
            "kg_percentage": 5,
            "pay_to_vendor_directly": true,
            "max_kg_discount_percentage": 30,
            "max_item_discount_percentage": 20
        }))
        .unwrap()
    }

    fn base_unit_input() -> EstimationItemInput {
        serde_json::from_value(serde_json::json!({
            "category": "woodwork",
            "room_name": "Foyer",
            "item_name": "Base Unit",
            "quantity": 0,
            "unit": "sqft",
            "unit_price": 4000,
            "width": 20,
            "height": 5,
            "item_discount_percentage": 10
        }))
        .unwrap()
    }

    #[test]
    fn test_area_priced_item() {
        let totals =
            ItemCalculator::calculate_item(&base_unit_input(), &woodwork(), dec!(18)).unwrap();

        // 20 × 5 sqft at 4000/sqft
        assert_eq!(totals.quantity, dec!(100));
        assert_eq!(totals.subtotal, dec!(400000));
        assert_eq!(totals.item_discount_amount, dec!(40000));
        // Charges on the undiscounted subtotal
        assert_eq!(totals.kg_charges_amount, dec!(40000));
        // 400000 - 40000 + 40000
        assert_eq!(totals.amount_before_gst, dec!(400000));
        assert_eq!(totals.gst_amount, dec!(72000));
        assert_eq!(totals.item_total, dec!(472000));
    }

    #[test]
    fn test_sqft_item_requires_dimensions() {
        let mut input = base_unit_input();
        input.height = None;

        let err = ItemCalculator::calculate_item(&input, &woodwork(), dec!(18)).unwrap_err();
        assert!(err.to_string().contains("requires a height"));
    }

    #[test]
    fn test_pay_to_vendor_bills_charges_only() {
        let input: EstimationItemInput = serde_json::from_value(serde_json::json!({
            "category": "shopping",
            "room_name": "Living",
            "item_name": "Floor Lamp",
            "quantity": 2,
            "unit": "nos",
            "unit_price": 10000
        }))
        .unwrap();

        let totals = ItemCalculator::calculate_item(&input, &shopping(), dec!(18)).unwrap();

        assert_eq!(totals.subtotal, dec!(20000));
        // Only the 5% service charge is billed
        assert_eq!(totals.amount_before_gst, dec!(1000));
        assert_eq!(totals.gst_amount, dec!(180));
        assert_eq!(totals.item_total, dec!(1180));
    }

    #[test]
    fn test_kg_discount_applies_to_charges_only() {
        let input: EstimationItemInput = serde_json::from_value(serde_json::json!({
            "category": "woodwork",
            "room_name": "Kitchen",
            "item_name": "Tall Unit",
            "quantity": 1,
            "unit": "nos",
            "unit_price": 100000,
            "kg_discount_percentage": 50
        }))
        .unwrap();

        let totals = ItemCalculator::calculate_item(&input, &woodwork(), dec!(18)).unwrap();

        assert_eq!(totals.kg_charges_amount, dec!(10000));
        assert_eq!(totals.kg_discount_amount, dec!(5000));
        // 100000 + (10000 - 5000)
        assert_eq!(totals.amount_before_gst, dec!(105000));
    }

    #[test]
    fn test_item_gst_override() {
        let input: EstimationItemInput = serde_json::from_value(serde_json::json!({
            "category": "woodwork",
            "room_name": "Study",
            "item_name": "Bookshelf",
            "quantity": 1,
            "unit": "nos",
            "unit_price": 50000,
            "gst_percentage": 12
        }))
        .unwrap();

        let totals = ItemCalculator::calculate_item(&input, &woodwork(), dec!(18)).unwrap();

        assert_eq!(totals.gst_percentage, dec!(12));
        // 55000 × 12%
        assert_eq!(totals.gst_amount, dec!(6600));
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut input = base_unit_input();
        input.unit = "nos".to_string();
        input.quantity = dec!(1);
        input.unit_price = dec!(-5);

        let err = ItemCalculator::calculate_item(&input, &woodwork(), dec!(18)).unwrap_err();
        assert!(matches!(err, AppError::Computation(_)));
    }

    #[test]
    fn test_discount_over_limit_is_error() {
        let mut input = base_unit_input();
        input.item_discount_percentage = dec!(25); // max is 20

        let check = ItemCalculator::validate_discounts(&input, &woodwork());
        assert!(!check.is_valid());
        assert!(check.errors[0].contains("exceeds maximum 20%"));
    }

    #[test]
    fn test_discount_near_limit_is_warning() {
        let mut input = base_unit_input();
        input.item_discount_percentage = dec!(18); // 90% of the 20% max

        let check = ItemCalculator::validate_discounts(&input, &woodwork());
        assert!(check.is_valid());
        assert_eq!(check.warnings.len(), 1);
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

    #[test]
    fn test_aggregate_builds_entries_for_all_categories() {
        let categories = vec![woodwork(), shopping()];
        let items = vec![stored_item(
            "woodwork",
            ItemTotals {
                subtotal: dec!(400000),
                kg_charges_amount: dec!(40000),
                item_discount_amount: dec!(40000),
                amount_before_gst: dec!(400000),
                gst_amount: dec!(72000),
                item_total: dec!(472000),
                ..Default::default()
            },
        )];

        let totals = ItemCalculator::aggregate(&items, &categories);

        // Category without items is present as explicit zeros
        let shopping_entry = totals.category_breakdown.0.get("shopping").unwrap();
        assert_eq!(shopping_entry.total, Decimal::ZERO);

        let woodwork_entry = totals.category_breakdown.0.get("woodwork").unwrap();
        assert_eq!(woodwork_entry.total, dec!(472000));

        assert_eq!(totals.items_value, dec!(400000));
        assert_eq!(totals.final_value, dec!(400000));
        assert_eq!(totals.gst_amount, dec!(72000));
        assert_eq!(totals.grand_total(), dec!(472000));
    }
}
