//! Owned big-integer cells
//!
//! A [`BigNum`] exclusively owns one arbitrary-precision integer handle.
//! Handles are never shared between two live cells: cloning a cell allocates
//! a new handle. Release is deterministic and idempotent.

use std::cmp::Ordering;
use std::fmt;

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{Signed, Zero};

use crate::config::NonFinitePolicy;
use crate::error::{BignumError, BignumResult};
use crate::float;

/// Owning cell for one arbitrary-precision integer; empty once released
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigNum {
    handle: Option<BigInt>,
}

impl BigNum {
    /// New cell holding zero
    pub fn new() -> Self {
        Self::from_bigint(BigInt::zero())
    }

    pub fn from_bigint(value: BigInt) -> Self {
        Self {
            handle: Some(value),
        }
    }

    /// Parse canonical signed decimal text.
    ///
    /// Accepts an optional leading `+` or `-` followed by ASCII digits.
    /// Empty or malformed text fails with `InvalidOperand`.
    pub fn from_dec(text: &str) -> BignumResult<Self> {
        parse_decimal(text, 1).map(Self::from_bigint)
    }

    /// Non-negative value from big-endian magnitude bytes
    pub fn from_be_bytes(bytes: &[u8]) -> Self {
        Self::from_bigint(BigInt::from_bytes_be(Sign::Plus, bytes))
    }

    /// Value from a sign flag and big-endian magnitude bytes.
    ///
    /// The sign flag is ignored when the magnitude is zero.
    pub fn from_sign_magnitude(negative: bool, bytes: &[u8]) -> Self {
        let magnitude = BigUint::from_bytes_be(bytes);
        Self::from_bigint(apply_sign(negative, magnitude))
    }

    /// Exact integral part of `f`, signed by its sign bit.
    pub fn from_f64(f: f64, policy: NonFinitePolicy) -> BignumResult<Self> {
        float_to_bigint(f, policy, 1).map(Self::from_bigint)
    }

    /// Borrow the handle; fails once the cell has been released.
    pub fn get(&self) -> BignumResult<&BigInt> {
        self.handle
            .as_ref()
            .ok_or_else(|| BignumError::invalid_operand(1, "bignum has been released"))
    }

    pub(crate) fn get_mut(&mut self) -> BignumResult<&mut BigInt> {
        self.handle
            .as_mut()
            .ok_or_else(|| BignumError::invalid_operand(1, "bignum has been released"))
    }

    /// Take the handle out of the cell
    pub fn into_inner(self) -> BignumResult<BigInt> {
        self.handle
            .ok_or_else(|| BignumError::invalid_operand(1, "bignum has been released"))
    }

    /// Release the handle now. Returns `true` the first time, `false` after.
    pub fn release(&mut self) -> bool {
        self.handle.take().is_some()
    }

    pub fn is_released(&self) -> bool {
        self.handle.is_none()
    }

    pub fn is_negative(&self) -> BignumResult<bool> {
        Ok(self.get()?.is_negative())
    }

    /// Big-endian magnitude bytes without a sign; zero yields no bytes.
    pub fn to_be_bytes(&self) -> BignumResult<Vec<u8>> {
        let value = self.get()?;
        if value.is_zero() {
            return Ok(Vec::new());
        }
        Ok(value.magnitude().to_bytes_be())
    }

    /// Canonical decimal text: no leading zeros, `-` only for negative values.
    pub fn to_dec(&self) -> BignumResult<String> {
        Ok(self.get()?.to_string())
    }

    /// Three-way comparison by sign and magnitude
    pub fn compare(&self, other: &BigNum) -> BignumResult<Ordering> {
        Ok(self.get()?.cmp(other.get()?))
    }
}

impl Default for BigNum {
    fn default() -> Self {
        Self::new()
    }
}

impl From<BigInt> for BigNum {
    fn from(value: BigInt) -> Self {
        Self::from_bigint(value)
    }
}

impl From<i64> for BigNum {
    fn from(value: i64) -> Self {
        Self::from_bigint(BigInt::from(value))
    }
}

impl fmt::Display for BigNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.handle {
            Some(value) => write!(f, "{}", value),
            None => write!(f, "<released bignum>"),
        }
    }
}

/// Parse decimal text for argument `position`.
pub(crate) fn parse_decimal(text: &str, position: usize) -> BignumResult<BigInt> {
    if text.is_empty() {
        return Err(BignumError::invalid_operand(
            position,
            "invalid big number string",
        ));
    }

    let (negative, digits) = match text.as_bytes()[0] {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(BignumError::invalid_operand(
            position,
            format!("invalid big number string: {:?}", text),
        ));
    }

    let magnitude = BigUint::parse_bytes(digits.as_bytes(), 10).ok_or_else(|| {
        BignumError::invalid_operand(position, format!("invalid big number string: {:?}", text))
    })?;

    Ok(apply_sign(negative, magnitude))
}

/// Convert a float for argument `position`, honoring the non-finite policy.
pub(crate) fn float_to_bigint(
    f: f64,
    policy: NonFinitePolicy,
    position: usize,
) -> BignumResult<BigInt> {
    if !f.is_finite() && policy == NonFinitePolicy::Reject {
        return Err(BignumError::invalid_operand(
            position,
            format!("cannot convert non-finite number {} to bignum", f),
        ));
    }

    let magnitude = float::float_to_magnitude(f);
    Ok(apply_sign(f.is_sign_negative(), magnitude))
}

/// Zero collapses to an unsigned value regardless of `negative`.
fn apply_sign(negative: bool, magnitude: BigUint) -> BigInt {
    let sign = if negative { Sign::Minus } else { Sign::Plus };
    BigInt::from_biguint(sign, magnitude)
}
