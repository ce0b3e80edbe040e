//! Scratch context and the workspace-borrowing primitives
//!
//! Multiply, divide, modulo and exponentiation run against a
//! [`ScratchContext`] owned by the calling [`crate::env::Environment`]. The
//! context is mutable shared state: the `&mut` borrow each primitive takes is
//! the only serialization it gets.
//!
//! Primitives report failure the way a C big-integer library does: they push
//! a [`LibraryError`] onto the context's [`ErrorQueue`] and return
//! [`PrimitiveFailed`]. The caller drains the queue before raising, so a
//! stale entry never leaks into a later call.

use std::collections::VecDeque;

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::error::{LibraryError, Reason};

/// Marker returned by a primitive whose error details went to the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimitiveFailed;

/// Pending primitive errors, oldest first
#[derive(Debug, Default)]
pub struct ErrorQueue {
    entries: VecDeque<LibraryError>,
}

impl ErrorQueue {
    pub fn push(&mut self, error: LibraryError) {
        self.entries.push_back(error);
    }

    /// Remove and return the oldest error, clearing every other entry.
    pub fn take_first(&mut self) -> Option<LibraryError> {
        let first = self.entries.pop_front();
        self.entries.clear();
        first
    }

    pub fn peek(&self) -> Option<&LibraryError> {
        self.entries.front()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Reusable workspace for multiplicative primitives, one per environment.
#[derive(Debug)]
pub struct ScratchContext {
    id: u64,
    borrows: u64,
    errors: ErrorQueue,
}

impl ScratchContext {
    pub(crate) fn new(id: u64) -> Self {
        Self {
            id,
            borrows: 0,
            errors: ErrorQueue::default(),
        }
    }

    /// Ordinal of this context within its environment
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Number of primitive calls that borrowed this context
    pub fn borrows(&self) -> u64 {
        self.borrows
    }

    pub fn errors(&self) -> &ErrorQueue {
        &self.errors
    }

    pub fn errors_mut(&mut self) -> &mut ErrorQueue {
        &mut self.errors
    }

    fn enter(&mut self) {
        self.borrows += 1;
    }

    #[track_caller]
    fn fail(&mut self, reason: Reason) -> PrimitiveFailed {
        self.errors.push(LibraryError::raise(reason));
        PrimitiveFailed
    }
}

/// `r = a * b`
pub fn mul(
    r: &mut BigInt,
    a: &BigInt,
    b: &BigInt,
    ctx: &mut ScratchContext,
) -> Result<(), PrimitiveFailed> {
    ctx.enter();
    *r = a * b;
    Ok(())
}

/// `r *= b`, reusing the storage already held by `r`
pub fn mul_assign(r: &mut BigInt, b: &BigInt, ctx: &mut ScratchContext) -> Result<(), PrimitiveFailed> {
    ctx.enter();
    *r *= b;
    Ok(())
}

/// `r = a / b`, truncating toward zero; the remainder is discarded.
pub fn div(
    r: &mut BigInt,
    a: &BigInt,
    b: &BigInt,
    ctx: &mut ScratchContext,
) -> Result<(), PrimitiveFailed> {
    ctx.enter();
    if b.is_zero() {
        return Err(ctx.fail(Reason::DivByZero));
    }
    *r = a / b;
    Ok(())
}

/// `r = a mod b`; the remainder takes the sign of the dividend.
pub fn rem(
    r: &mut BigInt,
    a: &BigInt,
    b: &BigInt,
    ctx: &mut ScratchContext,
) -> Result<(), PrimitiveFailed> {
    ctx.enter();
    if b.is_zero() {
        return Err(ctx.fail(Reason::DivByZero));
    }
    *r = a % b;
    Ok(())
}

/// Bounds checked by [`exp`] before it computes anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowLimits {
    pub max_exponent: u32,
    pub max_result_bits: u64,
}

/// `r = a ^ p` for `0 <= p <= max_exponent`.
///
/// Fails before allocating when `bits(a) * p` exceeds `max_result_bits`.
/// Bases of magnitude 0 or 1 are exempt since their powers stay that small.
pub fn exp(
    r: &mut BigInt,
    a: &BigInt,
    p: &BigInt,
    limits: PowLimits,
    ctx: &mut ScratchContext,
) -> Result<(), PrimitiveFailed> {
    ctx.enter();
    if p.is_negative() {
        return Err(ctx.fail(Reason::NegativeExponent));
    }
    let exponent = match p.to_u32() {
        Some(e) if e <= limits.max_exponent => e,
        _ => return Err(ctx.fail(Reason::ExponentTooLarge)),
    };
    let base_bits = a.bits();
    if base_bits > 1 && base_bits.saturating_mul(u64::from(exponent)) > limits.max_result_bits {
        return Err(ctx.fail(Reason::ExponentTooLarge));
    }
    *r = a.pow(exponent);
    Ok(())
}
