//! Object identifiers for distinguished-name attributes
//!
//! Attribute types are looked up by short name, long name or dotted OID, as
//! `OBJ_txt2nid` does. Matching is case-sensitive.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

/// Numeric identifier of a registered object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Nid(i32);

#[derive(Debug)]
struct ObjectInfo {
    nid: Nid,
    short_name: &'static str,
    long_name: &'static str,
    oid: &'static str,
}

impl Nid {
    pub const COMMON_NAME: Nid = Nid(13);
    pub const COUNTRY_NAME: Nid = Nid(14);
    pub const LOCALITY_NAME: Nid = Nid(15);
    pub const STATE_OR_PROVINCE_NAME: Nid = Nid(16);
    pub const ORGANIZATION_NAME: Nid = Nid(17);
    pub const ORGANIZATIONAL_UNIT_NAME: Nid = Nid(18);
    pub const EMAIL_ADDRESS: Nid = Nid(48);
    pub const GIVEN_NAME: Nid = Nid(99);
    pub const SURNAME: Nid = Nid(100);
    pub const SERIAL_NUMBER: Nid = Nid(105);
    pub const TITLE: Nid = Nid(106);
    pub const DOMAIN_COMPONENT: Nid = Nid(391);
    pub const USER_ID: Nid = Nid(458);

    /// Resolve a short name, long name or dotted OID.
    pub fn from_text(text: &str) -> Option<Nid> {
        BY_TEXT.get(text).copied()
    }

    pub fn value(&self) -> i32 {
        self.0
    }

    pub fn short_name(&self) -> &'static str {
        self.info().map_or("UNDEF", |o| o.short_name)
    }

    pub fn long_name(&self) -> &'static str {
        self.info().map_or("undefined", |o| o.long_name)
    }

    pub fn oid(&self) -> Option<&'static str> {
        self.info().map(|o| o.oid)
    }

    fn info(&self) -> Option<&'static ObjectInfo> {
        BY_NID.get(self).copied()
    }
}

impl fmt::Display for Nid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

const fn obj(
    nid: Nid,
    short_name: &'static str,
    long_name: &'static str,
    oid: &'static str,
) -> ObjectInfo {
    ObjectInfo {
        nid,
        short_name,
        long_name,
        oid,
    }
}

static OBJECTS: &[ObjectInfo] = &[
    obj(Nid::COMMON_NAME, "CN", "commonName", "2.5.4.3"),
    obj(Nid::COUNTRY_NAME, "C", "countryName", "2.5.4.6"),
    obj(Nid::LOCALITY_NAME, "L", "localityName", "2.5.4.7"),
    obj(Nid::STATE_OR_PROVINCE_NAME, "ST", "stateOrProvinceName", "2.5.4.8"),
    obj(Nid::ORGANIZATION_NAME, "O", "organizationName", "2.5.4.10"),
    obj(Nid::ORGANIZATIONAL_UNIT_NAME, "OU", "organizationalUnitName", "2.5.4.11"),
    obj(Nid::EMAIL_ADDRESS, "emailAddress", "emailAddress", "1.2.840.113549.1.9.1"),
    obj(Nid::GIVEN_NAME, "GN", "givenName", "2.5.4.42"),
    obj(Nid::SURNAME, "SN", "surname", "2.5.4.4"),
    obj(Nid::SERIAL_NUMBER, "serialNumber", "serialNumber", "2.5.4.5"),
    obj(Nid::TITLE, "title", "title", "2.5.4.12"),
    obj(Nid::DOMAIN_COMPONENT, "DC", "domainComponent", "0.9.2342.19200300.100.1.25"),
    obj(Nid::USER_ID, "UID", "userId", "0.9.2342.19200300.100.1.1"),
];

static BY_NID: Lazy<HashMap<Nid, &'static ObjectInfo>> =
    Lazy::new(|| OBJECTS.iter().map(|o| (o.nid, o)).collect());

static BY_TEXT: Lazy<HashMap<&'static str, Nid>> = Lazy::new(|| {
    let mut map = HashMap::with_capacity(OBJECTS.len() * 3);
    for o in OBJECTS {
        map.insert(o.short_name, o.nid);
        map.insert(o.long_name, o.nid);
        map.insert(o.oid, o.nid);
    }
    map
});
