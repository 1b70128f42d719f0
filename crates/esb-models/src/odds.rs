//! Odds conversions used when pricing exchange payloads.
//!
//! Probabilities arrive on a 0..100 scale from the upstream feed; the
//! exchange wants decimal odds and fractional odds strings.

use anyhow::{Context, Result};
use rust_decimal::{Decimal, RoundingStrategy};

/// Converts a probability into decimal odds against the given normalization
/// base (usually 100, or the sum of all probabilities of a match), rounded
/// to two places.
pub fn normalize_decimal_odds(probability: Decimal, normal: Decimal) -> Decimal {
    if probability.is_zero() {
        return Decimal::ZERO;
    }
    (normal / probability).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts an implied probability (0..100) to a fractional odds string.
pub fn implied_probability_to_fractional_odds(probability: Decimal) -> Result<String> {
    if probability.is_zero() {
        return Ok("0".to_string());
    }
    let decimal_part = (Decimal::ONE_HUNDRED / probability - Decimal::ONE)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    decimal_to_fraction(decimal_part)
}

/// Renders a decimal as a reduced fraction string, e.g. `1.25` -> `"5/4"`.
/// Whole numbers collapse to `"1/1"`.
pub fn decimal_to_fraction(number: Decimal) -> Result<String> {
    let text = number.to_string();
    let Some(point) = text.find('.') else {
        return Ok("1/1".to_string());
    };

    let whole: i64 = text[..point]
        .parse()
        .with_context(|| format!("bad whole part in '{text}'"))?;
    let numerator: i64 = text[point + 1..]
        .parse()
        .with_context(|| format!("bad fractional part in '{text}'"))?;
    let denominator = 10i64.pow((text.len() - point - 1) as u32);

    let cf = gcf(numerator, denominator);
    Ok(format!(
        "{}/{}",
        ((whole + 1) * numerator) / cf,
        denominator / cf
    ))
}

fn gcf(a: i64, b: i64) -> i64 {
    if a < b {
        return gcf(b, a);
    }
    if b == 0 {
        return a;
    }
    gcf(b, a % b)
}
