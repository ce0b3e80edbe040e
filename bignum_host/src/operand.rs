//! Operand coercion
//!
//! Call arguments arrive as an existing handle, decimal text, or a float
//! literal. [`coerce`] turns each into a canonical handle. Only text and
//! float operands produce a freshly owned value; an existing handle is
//! borrowed and never mutated.

use num_bigint::BigInt;

use crate::config::NonFinitePolicy;
use crate::error::{BignumError, BignumResult};
use crate::value::{float_to_bigint, parse_decimal, BigNum};

/// A call argument awaiting coercion
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a> {
    Handle(&'a BigNum),
    DecimalText(&'a str),
    FloatLiteral(f64),
}

impl Operand<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            Operand::Handle(_) => "bignum",
            Operand::DecimalText(_) => "string",
            Operand::FloatLiteral(_) => "number",
        }
    }

    pub fn is_handle(&self) -> bool {
        matches!(self, Operand::Handle(_))
    }
}

impl<'a> From<&'a BigNum> for Operand<'a> {
    fn from(value: &'a BigNum) -> Self {
        Operand::Handle(value)
    }
}

impl<'a> From<&'a str> for Operand<'a> {
    fn from(value: &'a str) -> Self {
        Operand::DecimalText(value)
    }
}

impl<'a> From<&'a String> for Operand<'a> {
    fn from(value: &'a String) -> Self {
        Operand::DecimalText(value.as_str())
    }
}

impl From<f64> for Operand<'_> {
    fn from(value: f64) -> Self {
        Operand::FloatLiteral(value)
    }
}

/// A coerced operand: either borrowed from the caller or freshly owned.
#[derive(Debug)]
pub enum Coerced<'a> {
    Preexisting(&'a BigInt),
    Fresh(BigNum),
}

impl Coerced<'_> {
    pub fn was_preexisting(&self) -> bool {
        matches!(self, Coerced::Preexisting(_))
    }

    pub fn value(&self) -> BignumResult<&BigInt> {
        match self {
            Coerced::Preexisting(value) => Ok(*value),
            Coerced::Fresh(cell) => cell.get(),
        }
    }
}

/// Normalize argument `position` (1-based) into a canonical handle.
pub fn coerce<'a>(
    operand: Operand<'a>,
    position: usize,
    policy: NonFinitePolicy,
) -> BignumResult<Coerced<'a>> {
    let coerced = match operand {
        Operand::Handle(cell) => {
            let value = cell
                .get()
                .map_err(|_| BignumError::invalid_operand(position, "bignum has been released"))?;
            Coerced::Preexisting(value)
        }
        Operand::DecimalText(text) => Coerced::Fresh(BigNum::from_bigint(parse_decimal(
            text, position,
        )?)),
        Operand::FloatLiteral(f) => {
            Coerced::Fresh(BigNum::from_bigint(float_to_bigint(f, policy, position)?))
        }
    };

    tracing::trace!(
        position,
        kind = operand.kind(),
        preexisting = coerced.was_preexisting(),
        "coerced operand"
    );

    Ok(coerced)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_is_preexisting() {
        let n = BigNum::from(12);
        let coerced = coerce(Operand::from(&n), 1, NonFinitePolicy::Zero).unwrap();
        assert!(coerced.was_preexisting());
        assert_eq!(coerced.value().unwrap(), &BigInt::from(12));
    }

    #[test]
    fn test_text_is_fresh() {
        let coerced = coerce(Operand::from("-77"), 1, NonFinitePolicy::Zero).unwrap();
        assert!(!coerced.was_preexisting());
        assert_eq!(coerced.value().unwrap(), &BigInt::from(-77));
    }

    #[test]
    fn test_float_is_fresh_and_truncated() {
        let coerced = coerce(Operand::from(-9.99), 2, NonFinitePolicy::Zero).unwrap();
        assert!(!coerced.was_preexisting());
        assert_eq!(coerced.value().unwrap(), &BigInt::from(-9));
    }

    #[test]
    fn test_errors_report_position() {
        let err = coerce(Operand::from(""), 2, NonFinitePolicy::Zero).unwrap_err();
        assert!(matches!(err, BignumError::InvalidOperand { position: 2, .. }));

        let err = coerce(Operand::from(f64::NAN), 1, NonFinitePolicy::Reject).unwrap_err();
        assert!(matches!(err, BignumError::InvalidOperand { position: 1, .. }));
    }

    #[test]
    fn test_released_handle_is_rejected() {
        let mut n = BigNum::from(1);
        n.release();
        let err = coerce(Operand::from(&n), 2, NonFinitePolicy::Zero).unwrap_err();
        assert!(matches!(err, BignumError::InvalidOperand { position: 2, .. }));
    }

    #[test]
    fn test_operand_kinds() {
        let n = BigNum::new();
        assert_eq!(Operand::from(&n).kind(), "bignum");
        assert_eq!(Operand::from("1").kind(), "string");
        assert_eq!(Operand::from(1.0).kind(), "number");
        assert!(Operand::from(&n).is_handle());
    }
}
