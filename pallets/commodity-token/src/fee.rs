//! Transfer fee arithmetic.
//!
//! A rate is a fixed-point fraction `rate / 10^decimals`. With 18 decimals a
//! rate of `200_000_000_000_000` is 0.0002 (0.02%). Fees round down, so the
//! receiver never gets less than `amount - floor(amount * rate)`.

use sp_runtime::{helpers_128bit::multiply_by_rational_with_rounding, Rounding};

/// `10^decimals`, or `None` if it does not fit in a `u128`.
pub fn scale(decimals: u8) -> Option<u128> {
    10u128.checked_pow(decimals as u32)
}

/// A rate is valid when it is representable and does not exceed 100%.
pub fn is_valid_rate(rate: u128, decimals: u8) -> bool {
    scale(decimals).is_some_and(|scale| rate <= scale)
}

/// Split `amount` into `(net, fee)` at the given rate.
///
/// The product `amount * rate` is computed in 256 bits, so large transfers at
/// 18 fee decimals do not overflow. Returns `None` only for an invalid rate.
pub fn split(amount: u128, rate: u128, decimals: u8) -> Option<(u128, u128)> {
    if rate == 0 || amount == 0 {
        return Some((amount, 0));
    }
    let scale = scale(decimals)?;
    if rate > scale {
        return None;
    }
    let fee = multiply_by_rational_with_rounding(amount, rate, scale, Rounding::Down)?;
    Some((amount.checked_sub(fee)?, fee))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE: u128 = 1_000_000_000_000_000_000;

    #[test]
    fn zero_rate_charges_nothing() {
        assert_eq!(split(ONE, 0, 18), Some((ONE, 0)));
    }

    #[test]
    fn global_rate_of_two_basis_points() {
        // 0.0002 at 18 decimals
        let (net, fee) = split(ONE, 200_000_000_000_000, 18).unwrap();
        assert_eq!(fee, 200_000_000_000_000);
        assert_eq!(net, 999_800_000_000_000_000);
    }

    #[test]
    fn custom_rate_of_one_basis_point() {
        let (net, fee) = split(ONE, 100_000_000_000_000, 18).unwrap();
        assert_eq!(net, 999_900_000_000_000_000);
        assert_eq!(net + fee, ONE);
    }

    #[test]
    fn fee_rounds_down() {
        // 1% of 150 units is 1.5, floored to 1
        assert_eq!(split(150, 1, 2), Some((149, 1)));
        // dust transfers pay no fee
        assert_eq!(split(99, 1, 2), Some((99, 0)));
    }

    #[test]
    fn full_rate_takes_everything() {
        assert_eq!(split(500, 100, 2), Some((0, 500)));
    }

    #[test]
    fn large_amounts_do_not_overflow() {
        let amount = u128::MAX / 2;
        let (net, fee) = split(amount, 5 * ONE / 10, 18).unwrap();
        assert_eq!(net + fee, amount);
        assert_eq!(fee, amount / 2);
    }

    #[test]
    fn rates_above_one_are_rejected() {
        assert!(!is_valid_rate(101, 2));
        assert!(is_valid_rate(100, 2));
        assert_eq!(split(10, 101, 2), None);
    }

    #[test]
    fn oversized_decimals_are_rejected() {
        assert_eq!(scale(38), Some(10u128.pow(38)));
        assert_eq!(scale(39), None);
        assert!(!is_valid_rate(1, 39));
    }
}
