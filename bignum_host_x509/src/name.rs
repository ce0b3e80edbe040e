//! Distinguished names (`x509.name`)

use std::fmt;
use std::fmt::Write as _;

use bignum_host::host::Value;

use crate::class::{method, string_arg, Class};
use crate::error::{X509Error, X509Result};
use crate::nid::Nid;

pub const NAME_CLASS: &str = "x509.name";

/// Longest rendering `oneline` produces, in bytes
pub const ONELINE_MAX: usize = 1023;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameEntry {
    pub nid: Nid,
    pub value: String,
}

/// An ordered list of attribute/value entries. `Clone` duplicates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct X509Name {
    entries: Vec<NameEntry>,
}

impl X509Name {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry whose attribute type is given by short name, long
    /// name or dotted OID.
    pub fn add(&mut self, field: &str, text: &str) -> X509Result<()> {
        let nid = Nid::from_text(field).ok_or_else(|| X509Error::InvalidNid {
            op: "x509.name:add",
            text: field.to_string(),
        })?;
        self.add_entry(nid, text);
        Ok(())
    }

    pub fn add_entry(&mut self, nid: Nid, text: &str) {
        self.entries.push(NameEntry {
            nid,
            value: text.to_string(),
        });
    }

    pub fn entries(&self) -> &[NameEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Values stored under `nid`, in insertion order
    pub fn values(&self, nid: Nid) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |e| e.nid == nid)
            .map(|e| e.value.as_str())
    }

    /// Render as `/C=US/O=Example/CN=host`, escaping bytes outside printable
    /// ASCII as `\xHH` and truncating at [`ONELINE_MAX`].
    pub fn oneline(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push('/');
            out.push_str(entry.nid.short_name());
            out.push('=');
            for byte in entry.value.bytes() {
                if (b' '..=b'~').contains(&byte) {
                    out.push(char::from(byte));
                } else {
                    let _ = write!(out, "\\x{:02X}", byte);
                }
            }
            if out.len() > ONELINE_MAX {
                out.truncate(ONELINE_MAX);
                break;
            }
        }
        out
    }
}

impl fmt::Display for X509Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.oneline())
    }
}

/// The `x509.name` class: `add` and `__tostring`
pub fn name_class() -> Class<X509Name> {
    Class::new(NAME_CLASS)
        .with(
            "add",
            method(|name: &mut X509Name, args| {
                let field = string_arg(args, 0)?;
                let text = string_arg(args, 1)?;
                name.add(field, text)?;
                Ok(Value::Bool(true))
            }),
        )
        .with(
            "__tostring",
            method(|name: &mut X509Name, _args| Ok(Value::Str(name.oneline()))),
        )
}
