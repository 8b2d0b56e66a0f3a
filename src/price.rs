//! Price normalization: currency strings in, amounts and discounts out.
//!
//! Storefront prices arrive as display strings (`"$1,299.00"`, `"Now $45"`,
//! `"RRP $60.00"`). Amounts are handled as [`Decimal`] so that discount
//! arithmetic does not pick up binary floating point noise before rounding.

use regex::Regex;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use std::sync::LazyLock;

/// Placeholder emitted when a listing has no usable price string.
pub const NOT_AVAILABLE: &str = "N/A";

/// A dollar amount as it appears in storefront markup.
static DISPLAY_PRICE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$[\d,]+\.?\d*").expect("valid display price pattern"));

/// The numeric part of a price once symbols are ignored.
static AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*(?:\.\d+)?|\.\d+").expect("valid amount pattern"));

/// Parses a currency-formatted string into an amount.
///
/// Currency symbols, surrounding words and thousands separators are ignored;
/// the first run of digits (with an optional decimal part) is the amount.
/// Returns `None` when the text holds no digits at all. Amounts too large
/// for [`Decimal`] saturate at [`Decimal::MAX`].
pub fn parse_price(text: &str) -> Option<Decimal> {
    let amount = AMOUNT.find(text)?.as_str().replace(',', "");
    let amount = if amount.starts_with('.') {
        format!("0{}", amount)
    } else {
        amount
    };

    match Decimal::from_str(&amount) {
        Ok(value) => Some(value),
        Err(_) => Some(
            amount
                .parse::<f64>()
                .ok()
                .and_then(Decimal::from_f64)
                .unwrap_or(Decimal::MAX),
        ),
    }
}

/// Extracts the first `$` amount from display text, e.g. `"Was $89.95"` →
/// `"$89.95"`. Returns [`NOT_AVAILABLE`] when there is none.
pub fn clean_price(text: &str) -> String {
    DISPLAY_PRICE
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// True when `text` contains something shaped like a dollar amount.
pub fn looks_like_price(text: &str) -> bool {
    DISPLAY_PRICE.is_match(text)
}

/// Percentage saved going from `original` to `current`, rounded to one
/// decimal place with halves rounded away from zero.
///
/// Returns `0.0` whenever the original price is missing, unparsable, or not
/// strictly positive, and whenever the current price is unparsable. A current
/// price above the original yields a negative discount.
pub fn discount_percent(current: &str, original: &str) -> f64 {
    let Some(original) = parse_price(original).filter(|amount| *amount > Decimal::ZERO) else {
        return 0.0;
    };
    let Some(current) = parse_price(current) else {
        return 0.0;
    };

    current
        .checked_div(original)
        .and_then(|ratio| (Decimal::ONE - ratio).checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|percent| {
            percent
                .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
                .to_f64()
        })
        .unwrap_or(0.0)
}
