//! Error types for the bignum facade
//!
//! Every failure aborts the current call. There is no partial result and
//! nothing is logged-and-swallowed: the caller always receives one of the
//! [`BignumError`] kinds below.

use std::fmt;
use std::panic::Location;

use thiserror::Error;

/// Library code of the big-integer primitives, packed into the high byte of
/// [`LibraryError::code`].
const BN_LIB: u32 = 3;

/// Reason a big-integer primitive refused to produce a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    /// Divisor or modulus is zero
    DivByZero,
    /// Exponentiation with a negative exponent
    NegativeExponent,
    /// Exponent larger than the configured cap
    ExponentTooLarge,
    /// A primitive failed without queueing a reason
    Internal,
}

impl Reason {
    /// Numeric reason code
    pub fn code(&self) -> u32 {
        match self {
            Reason::DivByZero => 103,
            Reason::NegativeExponent => 120,
            Reason::ExponentTooLarge => 114,
            Reason::Internal => 68,
        }
    }

    /// Short human-readable reason text
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::DivByZero => "div by zero",
            Reason::NegativeExponent => "negative exponent",
            Reason::ExponentTooLarge => "bignum too long",
            Reason::Internal => "internal error",
        }
    }
}

/// One entry of a primitive's error queue.
///
/// Carries the packed error code, the source location that raised it, and the
/// reason it maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryError {
    pub reason: Reason,
    pub file: &'static str,
    pub line: u32,
}

impl LibraryError {
    /// Record `reason` at the caller's source location.
    #[track_caller]
    pub fn raise(reason: Reason) -> Self {
        let location = Location::caller();
        Self {
            reason,
            file: location.file(),
            line: location.line(),
        }
    }

    /// Packed error code (library in the high byte, reason in the low bits)
    pub fn code(&self) -> u32 {
        (BN_LIB << 24) | self.reason.code()
    }

    /// Message in `error:<code>:<library>:<reason>` form
    pub fn message(&self) -> String {
        format!(
            "error:{:08X}:bignum routines:{}",
            self.code(),
            self.reason.as_str()
        )
    }
}

impl fmt::Display for LibraryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.message())
    }
}

/// Errors raised by the facade
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BignumError {
    /// Malformed or empty decimal text, a released handle, or an operand kind
    /// the operation cannot coerce
    #[error("bad argument #{position}: {reason}")]
    InvalidOperand { position: usize, reason: String },

    /// The underlying big-integer primitive failed
    #[error("{op}: {error}")]
    LibraryFailure {
        /// Operator name, e.g. `bignum:__div`
        op: &'static str,
        error: LibraryError,
    },

    /// Operation or operand combination the facade does not provide
    #[error("{0}")]
    Unsupported(String),
}

impl BignumError {
    /// Create an invalid operand error for argument `position` (1-based)
    pub fn invalid_operand<S: Into<String>>(position: usize, reason: S) -> Self {
        BignumError::InvalidOperand {
            position,
            reason: reason.into(),
        }
    }

    /// Create a library failure tagged with operator name `op`
    pub fn library(op: &'static str, error: LibraryError) -> Self {
        BignumError::LibraryFailure { op, error }
    }

    /// Create an unsupported-operation error
    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        BignumError::Unsupported(msg.into())
    }

    /// Library reason, when this is a [`BignumError::LibraryFailure`]
    pub fn reason(&self) -> Option<Reason> {
        match self {
            BignumError::LibraryFailure { error, .. } => Some(error.reason),
            _ => None,
        }
    }
}

/// Result type alias for facade operations
pub type BignumResult<T> = Result<T, BignumError>;

/// Errors raised while loading [`crate::config::FacadeConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {message}")]
    Io { path: String, message: String },

    #[error("invalid configuration: {0}")]
    Parse(String),

    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}
