//! Arithmetic dispatch
//!
//! Binary operators coerce both operands left to right, pick an output slot,
//! and delegate to the big-integer primitives. For the commutative operators
//! (`+` and `*`) a freshly coerced operand is consumed as the output slot,
//! saving one allocation. A caller's existing handle is only ever borrowed.
//!
//! Comparators work on canonical handles only; they never coerce.

use std::cmp::Ordering;

use num_bigint::BigInt;

use crate::env::Environment;
use crate::error::{BignumError, BignumResult, LibraryError, Reason};
use crate::operand::{coerce, Coerced, Operand};
use crate::scratch::{self, PowLimits, PrimitiveFailed};
use crate::value::BigNum;

/// Binary arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

/// Operators allowed to overwrite a fresh operand in place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InPlace {
    Add,
    Mul,
}

impl BinOp {
    /// Metamethod name in the bignum class table
    pub fn metamethod(&self) -> &'static str {
        match self {
            BinOp::Add => "__add",
            BinOp::Sub => "__sub",
            BinOp::Mul => "__mul",
            BinOp::Div => "__div",
            BinOp::Mod => "__mod",
            BinOp::Pow => "__pow",
        }
    }

    /// Operator name used to tag library failures
    pub fn method_name(&self) -> &'static str {
        match self {
            BinOp::Add => "bignum:__add",
            BinOp::Sub => "bignum:__sub",
            BinOp::Mul => "bignum:__mul",
            BinOp::Div => "bignum:__div",
            BinOp::Mod => "bignum:__mod",
            BinOp::Pow => "bignum:__pow",
        }
    }

    pub fn is_commutative(&self) -> bool {
        self.in_place().is_some()
    }

    /// Whether the primitive borrows the scratch context
    pub fn uses_scratch(&self) -> bool {
        !matches!(self, BinOp::Add | BinOp::Sub)
    }

    fn in_place(&self) -> Option<InPlace> {
        match self {
            BinOp::Add => Some(InPlace::Add),
            BinOp::Mul => Some(InPlace::Mul),
            _ => None,
        }
    }
}

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Lt,
    Le,
}

impl CmpOp {
    pub fn metamethod(&self) -> &'static str {
        match self {
            CmpOp::Eq => "__eq",
            CmpOp::Lt => "__lt",
            CmpOp::Le => "__le",
        }
    }

    pub fn method_name(&self) -> &'static str {
        match self {
            CmpOp::Eq => "bignum:__eq",
            CmpOp::Lt => "bignum:__lt",
            CmpOp::Le => "bignum:__le",
        }
    }

    /// Whether a three-way comparison result satisfies this operator
    pub fn holds(&self, ordering: Ordering) -> bool {
        match self {
            CmpOp::Eq => ordering == Ordering::Equal,
            CmpOp::Lt => ordering == Ordering::Less,
            CmpOp::Le => ordering != Ordering::Greater,
        }
    }
}

/// Output slot decisions made by the dispatcher
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Results written to a newly allocated value
    pub fresh_slots: u64,
    /// Results written over a freshly coerced operand
    pub reused_slots: u64,
}

enum Slot<'a> {
    Reuse {
        kind: InPlace,
        out: BigNum,
        other: Coerced<'a>,
    },
    Fresh {
        a: Coerced<'a>,
        b: Coerced<'a>,
    },
}

/// The first fresh operand of a commutative operator becomes the output.
fn select_slot<'a>(op: BinOp, a: Coerced<'a>, b: Coerced<'a>) -> Slot<'a> {
    let Some(kind) = op.in_place() else {
        return Slot::Fresh { a, b };
    };

    match (a, b) {
        (Coerced::Fresh(out), other) => Slot::Reuse { kind, out, other },
        (other, Coerced::Fresh(out)) => Slot::Reuse { kind, out, other },
        (a, b) => Slot::Fresh { a, b },
    }
}

impl Environment {
    pub fn add<'a>(
        &mut self,
        a: impl Into<Operand<'a>>,
        b: impl Into<Operand<'a>>,
    ) -> BignumResult<BigNum> {
        self.arith(BinOp::Add, a.into(), b.into())
    }

    pub fn sub<'a>(
        &mut self,
        a: impl Into<Operand<'a>>,
        b: impl Into<Operand<'a>>,
    ) -> BignumResult<BigNum> {
        self.arith(BinOp::Sub, a.into(), b.into())
    }

    pub fn mul<'a>(
        &mut self,
        a: impl Into<Operand<'a>>,
        b: impl Into<Operand<'a>>,
    ) -> BignumResult<BigNum> {
        self.arith(BinOp::Mul, a.into(), b.into())
    }

    /// Truncating division; the remainder is discarded.
    pub fn div<'a>(
        &mut self,
        a: impl Into<Operand<'a>>,
        b: impl Into<Operand<'a>>,
    ) -> BignumResult<BigNum> {
        self.arith(BinOp::Div, a.into(), b.into())
    }

    /// Remainder of truncating division, signed like the dividend.
    pub fn rem<'a>(
        &mut self,
        a: impl Into<Operand<'a>>,
        b: impl Into<Operand<'a>>,
    ) -> BignumResult<BigNum> {
        self.arith(BinOp::Mod, a.into(), b.into())
    }

    pub fn pow<'a>(
        &mut self,
        a: impl Into<Operand<'a>>,
        b: impl Into<Operand<'a>>,
    ) -> BignumResult<BigNum> {
        self.arith(BinOp::Pow, a.into(), b.into())
    }

    /// Apply `op` to two operands of any kind.
    pub fn arith(&mut self, op: BinOp, a: Operand<'_>, b: Operand<'_>) -> BignumResult<BigNum> {
        let policy = self.config().non_finite;
        let a = coerce(a, 1, policy)?;
        let b = coerce(b, 2, policy)?;

        match select_slot(op, a, b) {
            Slot::Reuse {
                kind,
                mut out,
                other,
            } => {
                self.stats.reused_slots += 1;
                tracing::debug!(op = op.method_name(), "reusing coerced operand as result");

                let rhs = other.value()?;
                let r = out.get_mut()?;
                match kind {
                    InPlace::Add => *r += rhs,
                    InPlace::Mul => {
                        let outcome = scratch::mul_assign(r, rhs, self.scratch());
                        self.check(op, outcome)?;
                    }
                }
                Ok(out)
            }
            Slot::Fresh { a, b } => {
                self.stats.fresh_slots += 1;
                tracing::debug!(op = op.method_name(), "allocating result slot");

                let mut out = BigNum::new();
                let r = out.get_mut()?;
                self.apply(op, r, a.value()?, b.value()?)?;
                Ok(out)
            }
        }
    }

    fn apply(&mut self, op: BinOp, r: &mut BigInt, x: &BigInt, y: &BigInt) -> BignumResult<()> {
        let outcome = match op {
            BinOp::Add => {
                *r = x + y;
                Ok(())
            }
            BinOp::Sub => {
                *r = x - y;
                Ok(())
            }
            BinOp::Mul => scratch::mul(r, x, y, self.scratch()),
            BinOp::Div => scratch::div(r, x, y, self.scratch()),
            BinOp::Mod => scratch::rem(r, x, y, self.scratch()),
            BinOp::Pow => {
                let limits = PowLimits {
                    max_exponent: self.config().max_exponent,
                    max_result_bits: self.config().max_result_bits,
                };
                scratch::exp(r, x, y, limits, self.scratch())
            }
        };
        self.check(op, outcome)
    }

    /// Turn a primitive failure into `LibraryFailure`, draining the queue.
    fn check(&mut self, op: BinOp, outcome: Result<(), PrimitiveFailed>) -> BignumResult<()> {
        let Err(PrimitiveFailed) = outcome else {
            return Ok(());
        };

        let error = self
            .scratch()
            .errors_mut()
            .take_first()
            .unwrap_or_else(|| LibraryError::raise(Reason::Internal));
        tracing::debug!(op = op.method_name(), error = %error, "primitive failed");
        Err(BignumError::library(op.method_name(), error))
    }

    /// Three-way comparison of two canonical handles.
    pub fn compare<'a>(
        &self,
        a: impl Into<Operand<'a>>,
        b: impl Into<Operand<'a>>,
    ) -> BignumResult<Ordering> {
        compare_handles("bignum:compare", a.into(), b.into())
    }

    pub fn compare_op(&self, op: CmpOp, a: Operand<'_>, b: Operand<'_>) -> BignumResult<bool> {
        compare_handles(op.method_name(), a, b).map(|ordering| op.holds(ordering))
    }

    pub fn eq<'a>(&self, a: impl Into<Operand<'a>>, b: impl Into<Operand<'a>>) -> BignumResult<bool> {
        self.compare_op(CmpOp::Eq, a.into(), b.into())
    }

    pub fn lt<'a>(&self, a: impl Into<Operand<'a>>, b: impl Into<Operand<'a>>) -> BignumResult<bool> {
        self.compare_op(CmpOp::Lt, a.into(), b.into())
    }

    pub fn le<'a>(&self, a: impl Into<Operand<'a>>, b: impl Into<Operand<'a>>) -> BignumResult<bool> {
        self.compare_op(CmpOp::Le, a.into(), b.into())
    }
}

fn compare_handles(op: &str, a: Operand<'_>, b: Operand<'_>) -> BignumResult<Ordering> {
    let a = canonical(op, a, 1)?;
    let b = canonical(op, b, 2)?;
    Ok(a.cmp(b))
}

fn canonical<'a>(op: &str, operand: Operand<'a>, position: usize) -> BignumResult<&'a BigInt> {
    match operand {
        Operand::Handle(cell) => cell
            .get()
            .map_err(|_| BignumError::invalid_operand(position, "bignum has been released")),
        other => Err(BignumError::unsupported(format!(
            "{}: argument #{} is a {}; comparison requires two bignums",
            op,
            position,
            other.kind()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: &BigNum) -> String {
        n.to_dec().unwrap()
    }

    #[test]
    fn test_add_strings() {
        let mut env = Environment::new();
        assert_eq!(dec(&env.add("5", "3").unwrap()), "8");
    }

    #[test]
    fn test_mul_large() {
        let mut env = Environment::new();
        let r = env.mul("1000000000000000000000", "2").unwrap();
        assert_eq!(dec(&r), "2000000000000000000000");
    }

    #[test]
    fn test_commutative_reuses_fresh_left() {
        let mut env = Environment::new();
        let x = BigNum::from(10);
        env.add("1", &x).unwrap();
        env.mul(&x, 2.0).unwrap();
        assert_eq!(
            env.stats(),
            DispatchStats {
                fresh_slots: 0,
                reused_slots: 2
            }
        );
    }

    #[test]
    fn test_two_handles_allocate() {
        let mut env = Environment::new();
        let x = BigNum::from(10);
        let y = BigNum::from(4);
        let r = env.add(&x, &y).unwrap();
        assert_eq!(dec(&r), "14");
        assert_eq!(env.stats().fresh_slots, 1);
        assert_eq!(dec(&x), "10");
        assert_eq!(dec(&y), "4");
    }

    #[test]
    fn test_non_commutative_always_allocates() {
        let mut env = Environment::new();
        env.sub("9", "4").unwrap();
        env.div("9", "4").unwrap();
        env.rem("9", "4").unwrap();
        env.pow("9", "4").unwrap();
        assert_eq!(
            env.stats(),
            DispatchStats {
                fresh_slots: 4,
                reused_slots: 0
            }
        );
    }

    #[test]
    fn test_sub_order_matters() {
        let mut env = Environment::new();
        let x = BigNum::from(3);
        assert_eq!(dec(&env.sub(&x, "10").unwrap()), "-7");
        assert_eq!(dec(&env.sub("10", &x).unwrap()), "7");
    }

    #[test]
    fn test_add_does_not_create_scratch() {
        let mut env = Environment::new();
        env.add("1", "2").unwrap();
        env.sub("1", "2").unwrap();
        assert!(!env.has_scratch());
        env.mul("1", "2").unwrap();
        assert!(env.has_scratch());
    }

    #[test]
    fn test_scratch_is_shared_across_calls() {
        let mut env = Environment::new();
        env.mul("3", "4").unwrap();
        env.div("12", "4").unwrap();
        env.pow("2", "8").unwrap();
        assert_eq!(env.scratch().borrows(), 3);
        assert_eq!(env.scratch().id(), 1);
    }

    #[test]
    fn test_div_and_mod_truncate() {
        let mut env = Environment::new();
        assert_eq!(dec(&env.div("-7", "2").unwrap()), "-3");
        assert_eq!(dec(&env.rem("-7", "2").unwrap()), "-1");
        assert_eq!(dec(&env.rem("7", "-2").unwrap()), "1");
    }

    #[test]
    fn test_div_by_zero_is_library_failure() {
        let mut env = Environment::new();
        let err = env.div("1", "0").unwrap_err();
        assert_eq!(err.reason(), Some(Reason::DivByZero));
        assert!(err.to_string().starts_with("bignum:__div: "));
        assert!(env.scratch().errors().is_empty());
    }

    #[test]
    fn test_failure_does_not_pollute_next_call() {
        let mut env = Environment::new();
        assert!(env.rem("5", "0").is_err());
        assert_eq!(dec(&env.rem("5", "3").unwrap()), "2");
        assert!(env.scratch().errors().is_empty());
    }

    #[test]
    fn test_stale_queue_entries_are_cleared() {
        let mut env = Environment::new();
        env.scratch()
            .errors_mut()
            .push(LibraryError::raise(Reason::Internal));
        let err = env.div("1", "0").unwrap_err();
        // the oldest entry wins and the rest are dropped
        assert_eq!(err.reason(), Some(Reason::Internal));
        assert!(env.scratch().errors().is_empty());
    }

    #[test]
    fn test_pow() {
        let mut env = Environment::new();
        assert_eq!(dec(&env.pow("2", "70").unwrap()), "1180591620717411303424");
        let err = env.pow("2", "-1").unwrap_err();
        assert_eq!(err.reason(), Some(Reason::NegativeExponent));
        assert!(err.to_string().starts_with("bignum:__pow: "));
    }

    #[test]
    fn test_pow_respects_configured_cap() {
        let mut env = Environment::with_config(crate::config::FacadeConfig {
            max_exponent: 16,
            ..Default::default()
        });
        assert_eq!(dec(&env.pow("3", "16").unwrap()), "43046721");
        let err = env.pow("3", "17").unwrap_err();
        assert_eq!(err.reason(), Some(Reason::ExponentTooLarge));
    }

    #[test]
    fn test_default_config_bounds_pow_result() {
        let mut env = Environment::new();
        let err = env.pow("3", "4294967295").unwrap_err();
        assert_eq!(err.reason(), Some(Reason::ExponentTooLarge));
        assert!(err.to_string().ends_with("bignum routines:bignum too long"));
        assert!(env.scratch().errors().is_empty());

        assert_eq!(dec(&env.pow("-1", "4294967295").unwrap()), "-1");
        assert_eq!(dec(&env.pow("1", "4294967295").unwrap()), "1");
    }

    #[test]
    fn test_result_cap_from_config() {
        let mut env = Environment::with_config(crate::config::FacadeConfig {
            max_result_bits: 128,
            ..Default::default()
        });
        // bits(255) * 16 == 128
        assert_eq!(env.pow("255", "16").unwrap().to_be_bytes().unwrap().len(), 16);
        let err = env.pow("255", "17").unwrap_err();
        assert_eq!(err.reason(), Some(Reason::ExponentTooLarge));
    }

    #[test]
    fn test_coercion_errors_name_position() {
        let mut env = Environment::new();
        let err = env.add("1", "x").unwrap_err();
        assert!(matches!(err, BignumError::InvalidOperand { position: 2, .. }));
        let err = env.mul("", "1").unwrap_err();
        assert!(matches!(err, BignumError::InvalidOperand { position: 1, .. }));
        assert_eq!(env.stats(), DispatchStats::default());
    }

    #[test]
    fn test_comparators() {
        let env = Environment::new();
        let a = BigNum::from(-2);
        let b = BigNum::from(5);
        assert!(env.lt(&a, &b).unwrap());
        assert!(env.le(&a, &b).unwrap());
        assert!(env.le(&a, &a).unwrap());
        assert!(!env.lt(&a, &a).unwrap());
        assert!(env.eq(&b, &b.clone()).unwrap());
        assert!(!env.eq(&a, &b).unwrap());
        assert_eq!(env.compare(&b, &a).unwrap(), Ordering::Greater);
    }

    #[test]
    fn test_comparators_reject_raw_operands() {
        let env = Environment::new();
        let a = BigNum::from(1);
        let err = env.eq(&a, "1").unwrap_err();
        assert!(matches!(err, BignumError::Unsupported(_)));
        let err = env.lt(1.0, &a).unwrap_err();
        assert!(err.to_string().contains("argument #1 is a number"));
    }

    #[test]
    fn test_float_operands() {
        let mut env = Environment::new();
        let r = env.add(2f64.powi(70), -0.0).unwrap();
        assert_eq!(dec(&r), "1180591620717411303424");
        let r = env.mul(-1.5, "4").unwrap();
        assert_eq!(dec(&r), "-4");
    }
}
