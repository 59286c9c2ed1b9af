//! Integer money arithmetic in pence.
//!
//! Every figure the engine produces is a whole number of pence. Rates are held
//! in basis points and applied with `i128` intermediates so that no binary
//! floating point is involved anywhere between input and result.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Minor currency units (1/100 of a pound).
pub type Pence = i64;

/// Basis points in one whole (100%).
pub const BPS_SCALE: i128 = 10_000;

/// Upper clamp for a single converted input (£10 trillion).
pub const MAX_PENCE: Pence = 1_000_000_000_000_000;

/// Convert a pound amount to pence, rounding half away from zero and clamping
/// into `0..=MAX_PENCE`.
pub fn to_pence(pounds: Decimal) -> Pence {
    let scaled = pounds
        .checked_mul(Decimal::ONE_HUNDRED)
        .unwrap_or(if pounds.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        })
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    if scaled <= Decimal::ZERO {
        return 0;
    }
    scaled.to_i64().map_or(MAX_PENCE, |p| p.min(MAX_PENCE))
}

/// Exact pound value of a pence amount, always with two decimal places.
pub fn pounds(pence: Pence) -> Decimal {
    Decimal::new(pence, 2)
}

/// Apply a basis-point rate to an amount, rounding half up.
pub fn apply_rate(amount: Pence, rate_bps: u32) -> Pence {
    let product = i128::from(amount) * i128::from(rate_bps);
    let rounded = (product + BPS_SCALE / 2).div_euclid(BPS_SCALE);
    narrow(rounded)
}

/// Divide with half-up rounding for non-negative amounts: half the divisor is
/// added, then the quotient truncates toward zero.
pub fn div_round(amount: Pence, divisor: i64) -> Pence {
    debug_assert!(divisor > 0);
    let amount = i128::from(amount);
    let divisor = i128::from(divisor);
    narrow((amount + divisor / 2) / divisor)
}

/// Ratio of two amounts in basis points, half up. Zero when `whole` is zero.
pub fn ratio_bps(part: Pence, whole: Pence) -> i64 {
    if whole == 0 {
        return 0;
    }
    let part = i128::from(part) * BPS_SCALE;
    let whole = i128::from(whole);
    narrow((part + whole / 2).div_euclid(whole))
}

fn narrow(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn to_pence_whole_and_fractional_pounds() {
        assert_eq!(to_pence(dec!(0)), 0);
        assert_eq!(to_pence(dec!(50000)), 5_000_000);
        assert_eq!(to_pence(dec!(12.34)), 1234);
    }

    #[test]
    fn to_pence_rounds_half_away_from_zero() {
        assert_eq!(to_pence(dec!(0.005)), 1);
        assert_eq!(to_pence(dec!(0.004)), 0);
        assert_eq!(to_pence(dec!(1.015)), 102);
        assert_eq!(to_pence(dec!(1.0149)), 101);
    }

    #[test]
    fn to_pence_clamps_negative_to_zero() {
        assert_eq!(to_pence(dec!(-1)), 0);
        assert_eq!(to_pence(dec!(-0.004)), 0);
    }

    #[test]
    fn to_pence_clamps_huge_amounts() {
        assert_eq!(to_pence(Decimal::MAX), MAX_PENCE);
        assert_eq!(to_pence(dec!(100000000000000000000)), MAX_PENCE);
    }

    #[test]
    fn apply_rate_rounds_half_up() {
        // 4,500.00 @ 8.75% = 393.75
        assert_eq!(apply_rate(450_000, 875), 39_375);
        // 1p @ 50% = 0.5p -> 1p
        assert_eq!(apply_rate(1, 5000), 1);
        // 1p @ 49.99% = 0.4999p -> 0p
        assert_eq!(apply_rate(1, 4999), 0);
        assert_eq!(apply_rate(0, 4500), 0);
    }

    #[test]
    fn apply_rate_large_amounts_do_not_overflow() {
        assert_eq!(apply_rate(MAX_PENCE, 10_000), MAX_PENCE);
        assert_eq!(apply_rate(MAX_PENCE, 4500), 450_000_000_000_000);
    }

    #[test]
    fn div_round_half_up() {
        assert_eq!(div_round(12, 12), 1);
        assert_eq!(div_round(17, 12), 1);
        assert_eq!(div_round(18, 12), 2);
    }

    #[test]
    fn div_round_truncates_negative_amounts() {
        // -19 + 6 = -13, truncated toward zero
        assert_eq!(div_round(-19, 12), -1);
        assert_eq!(div_round(-18, 12), -1);
        assert_eq!(div_round(-6, 12), 0);
        assert_eq!(div_round(-7, 12), 0);
        assert_eq!(div_round(-30, 12), -2);
    }

    #[test]
    fn ratio_bps_of_gross() {
        assert_eq!(ratio_bps(1, 3), 3333);
        assert_eq!(ratio_bps(2, 3), 6667);
        assert_eq!(ratio_bps(5, 0), 0);
    }

    #[test]
    fn pounds_keeps_two_places() {
        assert_eq!(pounds(123_456).to_string(), "1234.56");
        assert_eq!(pounds(100).to_string(), "1.00");
    }
}
