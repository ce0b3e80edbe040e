//! Error types for the X.509 wrappers

use bignum_host::error::BignumError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum X509Error {
    #[error("{op}: {text}: invalid NID")]
    InvalidNid { op: &'static str, text: String },

    #[error("x509.cert:setVersion: {0}: invalid version")]
    InvalidVersion(i64),

    #[error("bad argument #{position}: {reason}")]
    InvalidArgument { position: usize, reason: String },

    #[error("x509.asn1: {0}")]
    Der(String),

    #[error("{0}: no such method")]
    UnknownMethod(String),

    #[error(transparent)]
    Bignum(#[from] BignumError),
}

impl X509Error {
    pub fn invalid_argument<S: Into<String>>(position: usize, reason: S) -> Self {
        X509Error::InvalidArgument {
            position,
            reason: reason.into(),
        }
    }

    pub fn der<S: Into<String>>(msg: S) -> Self {
        X509Error::Der(msg.into())
    }
}

pub type X509Result<T> = Result<T, X509Error>;
