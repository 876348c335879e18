//! Currency amounts held as decimals rounded to cents.

use super::error::InvalidInputError;
use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};

/// Currency amount in dollars, always rounded to cents.
pub type Money = Decimal;

/// Rounds a decimal amount to cents, half away from zero.
pub fn round_cents(amount: Decimal) -> Money {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a decimal amount up to the next whole cent.
pub fn round_cents_up(amount: Decimal) -> Money {
    amount.round_dp_with_strategy(2, RoundingStrategy::AwayFromZero)
}

/// Converts a validated float amount into `Money`.
///
/// Fails when the value cannot be represented as a decimal (too large).
pub fn to_money(field: &'static str, amount: f64) -> Result<Money, InvalidInputError> {
    Decimal::from_f64(amount)
        .map(round_cents)
        .ok_or_else(|| InvalidInputError::OutOfRange {
            field,
            reason: format!("{amount} cannot be represented as a currency amount"),
        })
}
