//! ASN.1 INTEGER values
//!
//! Serial numbers are stored the way a certificate carries them: a sign and
//! a minimal big-endian magnitude. [`Asn1Integer::to_der`] produces the DER
//! encoding (tag `0x02`, definite length, minimal two's complement content).

use bignum_host::error::BignumResult;
use bignum_host::value::BigNum;
use num_bigint::{BigInt, Sign};

use crate::error::{X509Error, X509Result};

/// DER tag for INTEGER
pub const INTEGER_TAG: u8 = 0x02;

/// ASN.1 INTEGER held as a sign and a minimal big-endian magnitude
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Asn1Integer {
    negative: bool,
    /// Big-endian with no leading zero bytes; empty for zero
    magnitude: Vec<u8>,
}

impl Asn1Integer {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Build from a sign and big-endian magnitude, normalizing zero.
    pub fn from_sign_magnitude(negative: bool, magnitude: &[u8]) -> Self {
        let start = magnitude
            .iter()
            .position(|&b| b != 0)
            .unwrap_or(magnitude.len());
        let magnitude = magnitude[start..].to_vec();
        Self {
            negative: negative && !magnitude.is_empty(),
            magnitude,
        }
    }

    pub fn from_bignum(value: &BigNum) -> BignumResult<Self> {
        let negative = value.is_negative()?;
        Ok(Self::from_sign_magnitude(negative, &value.to_be_bytes()?))
    }

    pub fn to_bignum(&self) -> BigNum {
        BigNum::from_sign_magnitude(self.negative, &self.magnitude)
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn magnitude(&self) -> &[u8] {
        &self.magnitude
    }

    fn to_bigint(&self) -> BigInt {
        let sign = if self.negative { Sign::Minus } else { Sign::Plus };
        BigInt::from_bytes_be(sign, &self.magnitude)
    }

    fn from_bigint(value: &BigInt) -> Self {
        let (sign, magnitude) = value.to_bytes_be();
        Self::from_sign_magnitude(sign == Sign::Minus, &magnitude)
    }

    /// DER encoding of this integer
    pub fn to_der(&self) -> Vec<u8> {
        let content = self.to_bigint().to_signed_bytes_be();
        let mut out = Vec::with_capacity(content.len() + 6);
        out.push(INTEGER_TAG);
        push_length(&mut out, content.len());
        out.extend_from_slice(&content);
        out
    }

    /// Decode exactly one DER INTEGER from `bytes`.
    pub fn from_der(bytes: &[u8]) -> X509Result<Self> {
        let (&tag, rest) = bytes
            .split_first()
            .ok_or_else(|| X509Error::der("empty input"))?;
        if tag != INTEGER_TAG {
            return Err(X509Error::der(format!(
                "expected INTEGER tag 0x02, found 0x{:02X}",
                tag
            )));
        }

        let (len, rest) = read_length(rest)?;
        if rest.len() != len {
            return Err(X509Error::der(format!(
                "length {} does not match {} content bytes",
                len,
                rest.len()
            )));
        }
        if rest.is_empty() {
            return Err(X509Error::der("INTEGER has no content"));
        }
        if let [first, second, ..] = rest {
            let redundant = (*first == 0x00 && second & 0x80 == 0)
                || (*first == 0xFF && second & 0x80 != 0);
            if redundant {
                return Err(X509Error::der("INTEGER is not minimally encoded"));
            }
        }

        Ok(Self::from_bigint(&BigInt::from_signed_bytes_be(rest)))
    }
}

fn push_length(out: &mut Vec<u8>, len: usize) {
    if len < 0x80 {
        out.push(len as u8);
        return;
    }
    let bytes = len.to_be_bytes();
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len() - 1);
    let significant = &bytes[start..];
    out.push(0x80 | significant.len() as u8);
    out.extend_from_slice(significant);
}

fn read_length(bytes: &[u8]) -> X509Result<(usize, &[u8])> {
    let (&first, rest) = bytes
        .split_first()
        .ok_or_else(|| X509Error::der("missing length"))?;
    if first < 0x80 {
        return Ok((usize::from(first), rest));
    }

    let count = usize::from(first & 0x7F);
    if count == 0 {
        return Err(X509Error::der("indefinite length is not allowed in DER"));
    }
    if count > std::mem::size_of::<usize>() || count > rest.len() {
        return Err(X509Error::der("length octets out of range"));
    }
    let (octets, rest) = rest.split_at(count);
    if octets[0] == 0 {
        return Err(X509Error::der("length is not minimally encoded"));
    }
    let len = octets
        .iter()
        .fold(0usize, |acc, &b| (acc << 8) | usize::from(b));
    if len < 0x80 {
        return Err(X509Error::der("length is not minimally encoded"));
    }
    Ok((len, rest))
}
