//! Exact conversion of IEEE doubles to integer magnitudes
//!
//! Only the integral part of `|f|` is converted; the caller applies the sign.
//! Every finite double converts exactly, including values far beyond 64 bits.

// The f64 to u64 and f64 to u8 casts only see non-negative integral values
// already range-checked against 2^64 and 256.
#![allow(clippy::cast_sign_loss)]

use num_bigint::BigUint;

/// 2^64 as a double; integral values below this fit in a machine word.
const WORD_LIMIT: f64 = 18_446_744_073_709_551_616.0;

/// Number of base-256 digits in the largest finite double's integral part.
const MAX_DIGITS: usize = 128;

/// Integral part of `|f|`, or zero for NaN and infinities.
pub fn integral_part(f: f64) -> f64 {
    if f.is_finite() {
        f.abs().floor()
    } else {
        0.0
    }
}

/// Convert the integral part of `|f|` to an exact magnitude.
///
/// Non-finite input yields zero.
pub fn float_to_magnitude(f: f64) -> BigUint {
    let i = integral_part(f);

    if i < WORD_LIMIT {
        return BigUint::from(i as u64);
    }

    BigUint::from_bytes_be(&base256_digits(i))
}

/// Decompose a non-negative integral double into base-256 digits,
/// most-significant first.
///
/// `fmod` and the division by 256 are exact for doubles, the rounding only
/// absorbs residue. The buffer grows as needed, so no digit is dropped.
fn base256_digits(mut q: f64) -> Vec<u8> {
    let mut digits = Vec::with_capacity(MAX_DIGITS);

    while q >= 1.0 {
        let r = q % 256.0;
        digits.push(r as u8);
        q = ((q - r) / 256.0).round();
    }

    digits.reverse();
    digits
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::{One, Zero};

    #[test]
    fn test_small_values_take_word_path() {
        assert_eq!(float_to_magnitude(0.0), BigUint::zero());
        assert_eq!(float_to_magnitude(1.0), BigUint::one());
        assert_eq!(float_to_magnitude(255.9), BigUint::from(255u32));
        assert_eq!(float_to_magnitude(-42.5), BigUint::from(42u32));
    }

    #[test]
    fn test_largest_word_value() {
        // 2^64 - 2048 is the largest double below 2^64
        let f = 18_446_744_073_709_549_568.0_f64;
        assert_eq!(float_to_magnitude(f), BigUint::from(18_446_744_073_709_549_568u64));
    }

    #[test]
    fn test_two_pow_64_uses_digit_path() {
        let expected = BigUint::from(2u32).pow(64u32);
        assert_eq!(float_to_magnitude(WORD_LIMIT), expected);
    }

    #[test]
    fn test_two_pow_70() {
        let expected = BigUint::from(2u32).pow(70u32);
        assert_eq!(float_to_magnitude(2f64.powi(70)), expected);
        assert_eq!(expected.to_string(), "1180591620717411303424");
    }

    #[test]
    fn test_beyond_256_bits_is_not_truncated() {
        // 2^300 needs 38 base-256 digits
        let expected = BigUint::from(2u32).pow(300u32);
        assert_eq!(float_to_magnitude(2f64.powi(300)), expected);
    }

    #[test]
    fn test_f64_max_is_exact() {
        // f64::MAX = (2^53 - 1) * 2^971
        let mantissa = BigUint::from((1u64 << 53) - 1);
        let expected = mantissa * BigUint::from(2u32).pow(971u32);
        assert_eq!(float_to_magnitude(f64::MAX), expected);
        assert_eq!(base256_digits(f64::MAX).len(), MAX_DIGITS);
    }

    #[test]
    fn test_mixed_digits_round_trip_through_bytes() {
        // 49 significant bits shifted past 2^64, exactly representable
        let f = 0x1234_5678_9ABC_D000_u64 as f64 * 65536.0;
        let expected = BigUint::from(0x1234_5678_9ABC_D000_u64) << 16;
        assert_eq!(float_to_magnitude(f), expected);
    }

    #[test]
    fn test_non_finite_is_zero() {
        assert!(float_to_magnitude(f64::NAN).is_zero());
        assert!(float_to_magnitude(f64::INFINITY).is_zero());
        assert!(float_to_magnitude(f64::NEG_INFINITY).is_zero());
    }

    #[test]
    fn test_fraction_below_one_is_zero() {
        assert!(float_to_magnitude(0.999).is_zero());
        assert!(float_to_magnitude(-0.0).is_zero());
    }
}
