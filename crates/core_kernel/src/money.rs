//! Amount helpers with precise decimal arithmetic
//!
//! All monetary values in the system are INR and flow as [`rust_decimal::Decimal`].
//! This module provides the shared rounding and display rules: premiums are
//! rounded half-up to cents (never banker's rounding, which would turn
//! 8.865 into 8.86), clamped to the storage precision ceiling, and rendered
//! with Indian digit grouping.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// The largest amount the store can hold: NUMERIC(10,2).
///
/// Any computed premium above this is clamped down to exactly this value.
pub fn premium_cap() -> Decimal {
    dec!(99999999.99)
}

/// Rounds an amount half-up to two decimal places.
pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps an amount to [`premium_cap`].
pub fn clamp_to_premium_cap(amount: Decimal) -> Decimal {
    amount.min(premium_cap())
}

/// Formats an amount as INR with Indian digit grouping.
///
/// The last three integer digits form the first group, every group after
/// that has two digits: `4432.50` renders as `₹4,432.50` and `12345678.90`
/// as `₹1,23,45,678.90`.
pub fn format_inr(amount: Decimal) -> String {
    let rounded = round_to_cents(amount);
    let negative = rounded.is_sign_negative();
    let abs = rounded.abs();

    let as_text = format!("{:.2}", abs);
    let (int_part, frac_part) = as_text
        .split_once('.')
        .unwrap_or((as_text.as_str(), "00"));

    let grouped = group_indian(int_part);
    let sign = if negative { "-" } else { "" };
    format!("{}₹{}.{}", sign, grouped, frac_part)
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}
