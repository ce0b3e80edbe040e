//! Certificates (`x509.cert`)
//!
//! Only the fields the bignum facade feeds are modelled: version, serial
//! number, issuer and the validity window. Serial numbers move between
//! their ASN.1 form and bignum handles through the core crate's byte and
//! decimal conversions.

use std::time::{Duration, SystemTime};

use bignum_host::host::Value;
use bignum_host::value::BigNum;

use crate::asn1::Asn1Integer;
use crate::class::{method, Class};
use crate::error::{X509Error, X509Result};
use crate::name::X509Name;

pub const CERT_CLASS: &str = "x509.cert";

/// Where a new serial number comes from
#[derive(Debug, Clone, Copy)]
pub enum SerialSource<'a> {
    /// Signed decimal text
    Text(&'a str),
    Handle(&'a BigNum),
}

/// Certificate fields reachable through the `x509.cert` class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    /// Zero-based, as encoded
    version: i64,
    serial: Asn1Integer,
    issuer: X509Name,
    not_before: SystemTime,
    not_after: SystemTime,
}

impl Certificate {
    /// Version 1, serial zero, empty issuer, valid from now until now.
    pub fn new() -> Self {
        let now = SystemTime::now();
        Self {
            version: 0,
            serial: Asn1Integer::zero(),
            issuer: X509Name::new(),
            not_before: now,
            not_after: now,
        }
    }

    /// One-based version number
    pub fn version(&self) -> i64 {
        self.version + 1
    }

    /// Set the one-based version; only 1 through 3 exist.
    pub fn set_version(&mut self, version: i64) -> X509Result<()> {
        if !(1..=3).contains(&version) {
            return Err(X509Error::InvalidVersion(version));
        }
        self.version = version - 1;
        Ok(())
    }

    pub fn serial(&self) -> &Asn1Integer {
        &self.serial
    }

    /// The serial number as a new bignum
    pub fn serial_number(&self) -> BigNum {
        self.serial.to_bignum()
    }

    pub fn set_serial_number(&mut self, source: SerialSource<'_>) -> X509Result<()> {
        let serial = match source {
            SerialSource::Text(text) => Asn1Integer::from_bignum(&BigNum::from_dec(text)?)?,
            SerialSource::Handle(n) => Asn1Integer::from_bignum(n)?,
        };
        tracing::debug!(
            negative = serial.is_negative(),
            bytes = serial.magnitude().len(),
            "set certificate serial number"
        );
        self.serial = serial;
        Ok(())
    }

    /// A duplicate of the issuer name
    pub fn issuer(&self) -> X509Name {
        self.issuer.clone()
    }

    pub fn set_issuer(&mut self, name: &X509Name) {
        self.issuer = name.clone();
    }

    pub fn not_before(&self) -> SystemTime {
        self.not_before
    }

    pub fn not_after(&self) -> SystemTime {
        self.not_after
    }

    /// Set the validity window; `not_after` may not precede `not_before`.
    pub fn set_validity(&mut self, not_before: SystemTime, not_after: SystemTime) -> X509Result<()> {
        if not_after < not_before {
            return Err(X509Error::invalid_argument(
                3,
                "notAfter precedes notBefore",
            ));
        }
        self.not_before = not_before;
        self.not_after = not_after;
        Ok(())
    }

    /// Length of the validity window
    pub fn lifetime(&self) -> Duration {
        self.not_after
            .duration_since(self.not_before)
            .unwrap_or(Duration::ZERO)
    }
}

impl Default for Certificate {
    fn default() -> Self {
        Self::new()
    }
}

fn version_arg(value: &Value) -> X509Result<i64> {
    match value {
        Value::Number(f) if f.is_finite() && f.fract() == 0.0 => Ok(*f as i64),
        other => Err(X509Error::invalid_argument(
            2,
            format!("integer expected, got {}", other.type_name()),
        )),
    }
}

/// The `x509.cert` class
pub fn cert_class() -> Class<Certificate> {
    Class::new(CERT_CLASS)
        .with(
            "getVersion",
            method(|crt: &mut Certificate, _args| Ok(Value::Number(crt.version() as f64))),
        )
        .with(
            "setVersion",
            method(|crt: &mut Certificate, args| {
                let version = version_arg(bignum_host::host::arg(args, 0))?;
                crt.set_version(version)?;
                Ok(Value::Bool(true))
            }),
        )
        .with(
            "getSerialNumber",
            method(|crt: &mut Certificate, _args| Ok(Value::BigNum(crt.serial_number()))),
        )
        .with(
            "setSerialNumber",
            method(|crt: &mut Certificate, args| {
                let source = match bignum_host::host::arg(args, 0) {
                    Value::Str(text) => SerialSource::Text(text),
                    Value::BigNum(n) => SerialSource::Handle(n),
                    other => {
                        return Err(X509Error::invalid_argument(
                            2,
                            format!("bignum or string expected, got {}", other.type_name()),
                        ))
                    }
                };
                crt.set_serial_number(source)?;
                Ok(Value::Bool(true))
            }),
        )
}
