//! X.509 name and certificate wrappers
//!
//! A collaborator of `bignum_host`: certificate serial numbers are held as
//! ASN.1 integers and cross into bignum handles only through the core
//! crate's big-endian byte and decimal conversions. Both wrapped types
//! expose method tables that support interposition.

pub mod asn1;
pub mod cert;
pub mod class;
pub mod error;
pub mod name;
pub mod nid;

pub use asn1::Asn1Integer;
pub use cert::{cert_class, Certificate, SerialSource};
pub use class::{Class, Method};
pub use error::{X509Error, X509Result};
pub use name::{name_class, X509Name};
pub use nid::Nid;
