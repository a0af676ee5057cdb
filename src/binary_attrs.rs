//! `BinaryAttributeDetector`: is an attribute's value binary or text?
//! (spec §4.7).
//!
//! The fallback chain, in order: an explicit `;binary` transfer-option
//! suffix on the attribute description; a configured schema's
//! `human_readable` flag (not modeled here — schema semantics are out of
//! scope per spec §1 — so this layer is a no-op stand-in a caller can
//! extend by pre-populating `binary_syntaxes`); the configurable
//! binary-attribute set; finally the built-in default set.

use std::collections::HashSet;
use std::sync::RwLock;

/// Well-known binary attributes (RFC 4523 certificate/CRL attributes plus
/// common directory-server extensions). `userPassword` is deliberately
/// *not* included: many deployments transport it as text, and treating it
/// as binary by default would be surprising — see DESIGN.md.
fn default_binary_attributes() -> HashSet<String> {
    [
        "userCertificate",
        "cACertificate",
        "certificateRevocationList",
        "authorityRevocationList",
        "crossCertificatePair",
        "jpegPhoto",
        "photo",
        "personalSignature",
        "audio",
        "krbPrincipalKey",
        "objectGUID",
        "objectSid",
        "ms-DS-ConsistencyGuid",
        "thumbnailPhoto",
        "thumbnailLogo",
    ]
    .iter()
    .map(|s| s.to_ascii_lowercase())
    .collect()
}

/// Pluggable, concurrently-mutable binary/text classifier for attribute
/// values. Cheap to share across connections behind an `Arc`: queries take
/// a read lock, mutations a write lock.
#[derive(Debug)]
pub struct BinaryAttributeDetector {
    binary_attributes: RwLock<HashSet<String>>,
    binary_syntaxes: RwLock<HashSet<String>>,
}

impl Default for BinaryAttributeDetector {
    fn default() -> Self {
        BinaryAttributeDetector {
            binary_attributes: RwLock::new(default_binary_attributes()),
            binary_syntaxes: RwLock::new(HashSet::new()),
        }
    }
}

impl BinaryAttributeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// `is_binary(attribute_id)`, per spec §4.7's fallback chain.
    pub fn is_binary(&self, attribute_id: &str) -> bool {
        let folded = attribute_id.to_ascii_lowercase();
        if folded.ends_with(";binary") {
            return true;
        }
        // strip any other transfer-option suffix before consulting the sets
        let base = folded.split(';').next().unwrap_or(&folded);
        self.binary_attributes
            .read()
            .expect("lock poisoned")
            .contains(base)
    }

    /// `is_binary_syntax(oid)`: consulted by schema-aware callers that
    /// have already resolved an attribute description to its syntax OID.
    pub fn is_binary_syntax(&self, syntax_oid: &str) -> bool {
        self.binary_syntaxes
            .read()
            .expect("lock poisoned")
            .contains(syntax_oid)
    }

    pub fn add_binary_attribute(&self, name: &str) {
        self.binary_attributes
            .write()
            .expect("lock poisoned")
            .insert(name.to_ascii_lowercase());
    }

    pub fn remove_binary_attribute(&self, name: &str) {
        self.binary_attributes
            .write()
            .expect("lock poisoned")
            .remove(&name.to_ascii_lowercase());
    }

    pub fn replace_binary_attributes<I: IntoIterator<Item = String>>(&self, names: I) {
        let mut set = self.binary_attributes.write().expect("lock poisoned");
        *set = names.into_iter().map(|s| s.to_ascii_lowercase()).collect();
    }

    pub fn add_binary_syntax(&self, oid: &str) {
        self.binary_syntaxes
            .write()
            .expect("lock poisoned")
            .insert(oid.to_string());
    }

    pub fn remove_binary_syntax(&self, oid: &str) {
        self.binary_syntaxes
            .write()
            .expect("lock poisoned")
            .remove(oid);
    }

    pub fn replace_binary_syntaxes<I: IntoIterator<Item = String>>(&self, oids: I) {
        let mut set = self.binary_syntaxes.write().expect("lock poisoned");
        *set = oids.into_iter().collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_binary_suffix_always_wins() {
        let d = BinaryAttributeDetector::new();
        assert!(d.is_binary("cn;binary"));
        assert!(d.is_binary("CN;BINARY"));
    }

    #[test]
    fn default_set_covers_well_known_attributes() {
        let d = BinaryAttributeDetector::new();
        assert!(d.is_binary("userCertificate"));
        assert!(d.is_binary("jpegPhoto"));
        assert!(!d.is_binary("cn"));
    }

    #[test]
    fn user_password_is_not_binary_by_default() {
        let d = BinaryAttributeDetector::new();
        assert!(!d.is_binary("userPassword"));
    }

    #[test]
    fn mutation_is_observed_by_subsequent_queries() {
        let d = BinaryAttributeDetector::new();
        assert!(!d.is_binary("customAttr"));
        d.add_binary_attribute("customAttr");
        assert!(d.is_binary("customAttr"));
        d.remove_binary_attribute("customAttr");
        assert!(!d.is_binary("customAttr"));
    }

    #[test]
    fn replace_overwrites_the_whole_set() {
        let d = BinaryAttributeDetector::new();
        d.replace_binary_attributes(["onlyThis".to_string()]);
        assert!(!d.is_binary("jpegPhoto"));
        assert!(d.is_binary("onlyThis"));
    }
}
