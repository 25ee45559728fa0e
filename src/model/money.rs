//! Conversion between decimal prices and the gateway's integer minor units.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Minor units per major unit (paise per rupee, cents per dollar).
pub const MINOR_PER_MAJOR: u32 = 100;

/// Converts a major-unit amount to minor units, rounding half away from zero.
///
/// Returns `None` for negative amounts or values that do not fit in a `u64`.
pub fn to_minor_units(amount: Decimal) -> Option<u64> {
    amount
        .checked_mul(Decimal::from(MINOR_PER_MAJOR))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
}

/// Whether `amount` is expressible in whole minor units (at most two decimal places).
pub fn is_whole_minor_units(amount: Decimal) -> bool {
    amount.normalize().scale() <= 2
}

/// `price × quantity`, or `None` on overflow.
pub fn line_total(price: Decimal, quantity: u32) -> Option<Decimal> {
    price.checked_mul(Decimal::from(quantity))
}
