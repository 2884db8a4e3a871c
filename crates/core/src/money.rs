//! Money and quantity arithmetic.
//!
//! Backend rows carry amounts as floating point numbers. Reports convert them
//! to [`Decimal`] once, accumulate exactly, and round only when formatting.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places used for currency output.
pub const CURRENCY_PLACES: u32 = 2;

/// Decimal places used for weighable quantities.
pub const WEIGHT_PLACES: u32 = 3;

/// Convert a backend float into a [`Decimal`].
///
/// Non-finite values (NaN, ±inf) cannot be represented and collapse to zero.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Render `value` with exactly `places` fractional digits.
///
/// Midpoints round away from zero, and a value that rounds to zero never
/// renders with a minus sign.
pub fn format_decimal(value: Decimal, places: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    rounded.rescale(places);
    rounded.to_string()
}

/// Render a currency amount, e.g. `"100.00 TL"`.
pub fn format_amount(value: Decimal, currency: &str) -> String {
    let amount = format_decimal(value, CURRENCY_PLACES);
    if currency.is_empty() {
        amount
    } else {
        format!("{amount} {currency}")
    }
}

/// Render a quantity: 3 decimals for weighable products, whole units otherwise.
pub fn format_quantity(value: Decimal, weighable: bool) -> String {
    let places = if weighable { WEIGHT_PLACES } else { 0 };
    format_decimal(value, places)
}
