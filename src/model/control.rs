//! The `Control` envelope (RFC 4511 §4.1.11).

use super::common::LdapOID;
use crate::registry::DecodedValue;
use std::borrow::Cow;

/// `Control ::= SEQUENCE { controlType LDAPOID, criticality BOOLEAN
/// DEFAULT FALSE, controlValue OCTET STRING OPTIONAL }`.
///
/// `control_value` holds the raw, still-encoded inner payload. When a
/// [`crate::registry::CodecRegistry`] passed to decode had a matching
/// [`crate::registry::ControlFactory`] for this OID, `decoded` additionally
/// holds the structured value it produced; `encode` prefers re-encoding
/// `decoded` through that factory over replaying the raw bytes.
///
/// `decoded` is excluded from equality and is purely a cache of what the
/// registry derived from `control_value` — two controls with the same
/// wire-relevant fields are equal regardless of whether either has been
/// run through a registry.
#[derive(Clone, Debug)]
pub struct Control<'a> {
    pub control_type: LdapOID<'a>,
    pub criticality: bool,
    pub control_value: Option<Cow<'a, [u8]>>,
    pub decoded: Option<Box<dyn DecodedValue>>,
}

impl<'a> Control<'a> {
    pub fn oid(&self) -> &str {
        self.control_type.as_str()
    }
}

impl PartialEq for Control<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.control_type == other.control_type
            && self.criticality == other.criticality
            && self.control_value == other.control_value
    }
}

impl Eq for Control<'_> {}
