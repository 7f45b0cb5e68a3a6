use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::error::{AppError, Result};

/// Decimal places used for monetary amounts (INR, paise precision).
pub const MONEY_DP: u32 = 2;

/// Rounds a monetary amount to paise precision, half away from zero.
///
/// Rounding happens at reporting boundaries only; intermediate arithmetic
/// keeps full precision.
pub fn round(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Applies a 0-100 percentage to an amount, unrounded.
pub fn percent_of(amount: Decimal, percentage: Decimal) -> Decimal {
    amount * percentage / Decimal::ONE_HUNDRED
}

/// Validates that an amount is a non-negative decimal.
pub fn ensure_non_negative(label: &str, amount: Decimal) -> Result<()> {
    if amount < Decimal::ZERO {
        return Err(AppError::computation(format!(
            "{} cannot be negative, got {}",
            label, amount
        )));
    }
    Ok(())
}

/// Validates that a percentage lies within 0-100.
pub fn ensure_percentage(label: &str, value: Decimal) -> Result<()> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(AppError::validation(format!(
            "{} must be between 0 and 100, got {}",
            label, value
        )));
    }
    Ok(())
}
