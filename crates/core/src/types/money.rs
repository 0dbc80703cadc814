//! Monetary amounts using decimal arithmetic.
//!
//! Upstream balances are decimal strings (`"25.00"`). They are parsed into
//! [`Decimal`] so that summing dozens of cards never accumulates binary
//! floating point error; conversion to a JSON number happens only once, at
//! serialization time.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serializer;

/// Number of decimal places used for currency display.
pub const CURRENCY_SCALE: u32 = 2;

/// Parse an upstream amount, treating missing or unparseable values as zero.
///
/// ```
/// use giftcard_lookup_core::parse_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_amount(Some("25.00")), Decimal::new(2500, 2));
/// assert_eq!(parse_amount(Some("n/a")), Decimal::ZERO);
/// assert_eq!(parse_amount(None), Decimal::ZERO);
/// ```
#[must_use]
pub fn parse_amount(raw: Option<&str>) -> Decimal {
    raw.map(str::trim)
        .and_then(|s| {
            Decimal::from_str(s)
                .or_else(|_| Decimal::from_scientific(s))
                .ok()
        })
        .unwrap_or(Decimal::ZERO)
}

/// Round an amount to two decimal places, midpoint away from zero.
#[must_use]
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Serialize a decimal as a JSON number.
///
/// Whole amounts are written as integers (`0`, `40`) and everything else as
/// the shortest float representation (`125.5`), which is what a JavaScript
/// client would see for the same value.
///
/// # Errors
///
/// Propagates serializer errors.
pub fn serialize_amount<S: Serializer>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    if amount.fract().is_zero()
        && let Some(whole) = amount.to_i64()
    {
        return serializer.serialize_i64(whole);
    }

    // Parsing the decimal text gives the nearest f64, unlike `to_f64`.
    let text = amount.to_string();
    match text.parse::<f64>() {
        Ok(value) => serializer.serialize_f64(value),
        Err(_) => serializer.serialize_str(&text),
    }
}
