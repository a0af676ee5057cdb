//! Dotted-decimal OID validation (spec §4.6, §7 `InvalidOid`).
//!
//! `LDAPOID ::= OCTET STRING` on the wire; RFC 4511 constrains its content
//! to the ASN.1 `numericoid` production: one or more arcs separated by
//! dots, each arc a minimal (no leading zero, except the literal `0`)
//! decimal number.

use crate::error::DecodeError;

/// Validates `oid` against `arc (. arc)+` and returns it unchanged if
/// well-formed.
pub fn validate_oid(oid: &str, offset: usize) -> Result<&str, DecodeError> {
    if oid.is_empty() {
        return Err(invalid(oid, offset));
    }
    let mut saw_arc = false;
    for arc in oid.split('.') {
        saw_arc = true;
        if arc.is_empty() || !arc.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid(oid, offset));
        }
        if arc.len() > 1 && arc.starts_with('0') {
            return Err(invalid(oid, offset));
        }
    }
    if !saw_arc || !oid.contains('.') {
        return Err(invalid(oid, offset));
    }
    Ok(oid)
}

fn invalid(oid: &str, offset: usize) -> DecodeError {
    DecodeError::InvalidOid {
        offset,
        value: oid.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_oids() {
        assert!(validate_oid("2.16.840.1.113730.3.4.2", 0).is_ok());
        assert!(validate_oid("1.2.840.113556.1.4.319", 0).is_ok());
        assert!(validate_oid("0.1", 0).is_ok());
    }

    #[test]
    fn rejects_malformed_oids() {
        assert!(validate_oid("", 0).is_err());
        assert!(validate_oid("1", 0).is_err());
        assert!(validate_oid("1..2", 0).is_err());
        assert!(validate_oid("1.02.3", 0).is_err());
        assert!(validate_oid("1.2.a", 0).is_err());
        assert!(validate_oid(".1.2", 0).is_err());
    }
}
