//! Divide-by-zero guard shared by every percentage in the engine
//!
//! Amounts can be as large as `Decimal::MAX`, so every operation here is
//! checked and reports overflow as an error instead of panicking.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{Error, Result};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

fn overflow(op: &str) -> Error {
    Error::InvalidInput(format!("amount overflow in {}", op))
}

/// `numerator / denominator`, or zero when the denominator is zero
pub fn safe_ratio(numerator: Decimal, denominator: Decimal) -> Result<Decimal> {
    if denominator.is_zero() {
        return Ok(Decimal::ZERO);
    }
    numerator
        .checked_div(denominator)
        .ok_or_else(|| overflow("division"))
}

/// `safe_ratio * 100`, unrounded
pub fn raw_percentage(numerator: Decimal, denominator: Decimal) -> Result<Decimal> {
    safe_ratio(numerator, denominator)?
        .checked_mul(HUNDRED)
        .ok_or_else(|| overflow("percentage"))
}

/// `safe_ratio * 100` rounded to 2 decimal places (half away from zero)
pub fn percentage(numerator: Decimal, denominator: Decimal) -> Result<Decimal> {
    Ok(round2(raw_percentage(numerator, denominator)?))
}

/// Round to 2 decimal places (half away from zero)
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `a + b`, failing on overflow
pub fn add(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_add(b).ok_or_else(|| overflow("sum"))
}

/// `a - b`, failing on overflow
pub fn sub(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_sub(b).ok_or_else(|| overflow("difference"))
}
