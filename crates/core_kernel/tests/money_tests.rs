//! Tests for amount helpers

use core_kernel::{clamp_to_premium_cap, format_inr, premium_cap, round_to_cents};
use rust_decimal_macros::dec;

#[test]
fn premium_cap_matches_storage_precision() {
    assert_eq!(premium_cap(), dec!(99999999.99));
}

#[test]
fn example_premium_rounds_to_cents() {
    // 45 * 98.50 * 0.002 = 8.865, which must round up to 8.87
    let raw = dec!(45) * dec!(98.50) * dec!(0.002);
    assert_eq!(raw, dec!(8.865));
    assert_eq!(round_to_cents(raw), dec!(8.87));
}

#[test]
fn oversized_amounts_clamp_exactly_to_cap() {
    let oversized = dec!(5000000000) * dec!(98.50) * dec!(0.002);
    assert_eq!(clamp_to_premium_cap(oversized), dec!(99999999.99));
}

#[test]
fn inr_formatting_uses_indian_grouping() {
    assert_eq!(format_inr(dec!(98.50)), "₹98.50");
    assert_eq!(format_inr(dec!(4432.50)), "₹4,432.50");
    assert_eq!(format_inr(dec!(250000)), "₹2,50,000.00");
}
