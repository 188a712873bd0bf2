//! Premium calculation
//!
//! The premium is 0.2% of the consignment value (quantity x rate), rounded
//! half-up to cents and clamped to the storage precision ceiling. The
//! calculation is pure and deterministic; it runs once at submission
//! (provisional) and once at approval (finalization).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{clamp_to_premium_cap, round_to_cents};

/// Premium rate applied to the consignment value (0.2%).
pub fn premium_rate() -> Decimal {
    dec!(0.002)
}

/// Computes the premium for a quantity/rate pair.
///
/// A missing rate counts as zero, so the premium is zero until the rate is
/// known. The result is never negative and never exceeds the cap.
pub fn compute_premium(quantity: u32, rate: Option<Decimal>) -> Decimal {
    let rate = rate.unwrap_or(Decimal::ZERO);
    let raw = Decimal::from(quantity) * rate * premium_rate();
    clamp_to_premium_cap(round_to_cents(raw))
}

/// Finalizes the premium at approval time.
///
/// Reuses the provisional value stored at submission when present (the
/// quote shown to the submitter does not silently change at decision
/// time), recomputes only when none was stored. Either way the result is
/// re-clamped to the cap.
pub fn finalize_premium(stored: Option<Decimal>, quantity: u32, rate: Option<Decimal>) -> Decimal {
    match stored {
        Some(provisional) => clamp_to_premium_cap(provisional),
        None => compute_premium(quantity, rate),
    }
}

/// Total consignment value (quantity x rate), rounded to cents.
///
/// Rendered in the invoice line item and totals block.
pub fn line_total(quantity: u32, rate: Option<Decimal>) -> Decimal {
    round_to_cents(Decimal::from(quantity) * rate.unwrap_or(Decimal::ZERO))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use core_kernel::premium_cap;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn premium_is_bounded(quantity in 1u32..=u32::MAX, rate_cents in 0i64..10_000_000_000i64) {
            let rate = Decimal::new(rate_cents, 2);
            let premium = compute_premium(quantity, Some(rate));

            prop_assert!(premium >= Decimal::ZERO);
            prop_assert!(premium <= premium_cap());
        }

        #[test]
        fn premium_matches_formula_below_cap(quantity in 1u32..100_000u32, rate_cents in 0i64..1_000_000i64) {
            let rate = Decimal::new(rate_cents, 2);
            let expected = core_kernel::round_to_cents(
                Decimal::from(quantity) * rate * premium_rate(),
            );
            prop_assert!(expected <= premium_cap());
            prop_assert_eq!(compute_premium(quantity, Some(rate)), expected);
        }
    }
}
