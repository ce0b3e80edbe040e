//! Arbitrary-precision integer facade for a host scripting environment
//!
//! This crate wraps `num_bigint::BigInt` behind the surface a scripting
//! host expects. It includes:
//!
//! - `BigNum` owning cells with idempotent release
//! - Operand coercion from bignums, decimal text and floats
//! - Arithmetic dispatch that reuses temporaries for commutative operators
//! - A per-environment scratch context for multiply, divide and power
//! - Method tables with interposition for higher layers
//! - A C ABI (`ffi`) for embedding

#![deny(clippy::print_stderr)]

pub mod config;
pub mod dispatch;
pub mod env;
pub mod error;
pub mod ffi;
pub mod float;
pub mod host;
pub mod interpose;
pub mod operand;
pub mod scratch;
pub mod value;

/// Prelude module for convenient imports
///
/// # Example
/// ```
/// use bignum_host::prelude::*;
///
/// let mut env = Environment::new();
/// let n = env.mul("12345678901234567890", 10.0).unwrap();
/// assert_eq!(n.to_dec().unwrap(), "123456789012345678900");
/// ```
pub mod prelude {
    pub use super::config::{FacadeConfig, NonFinitePolicy};
    pub use super::dispatch::{BinOp, CmpOp, DispatchStats};
    pub use super::env::Environment;
    pub use super::error::{BignumError, BignumResult};
    pub use super::host::{Method, Value};
    pub use super::interpose::MethodTable;
    pub use super::operand::Operand;
    pub use super::value::BigNum;
}

pub use prelude::*;
