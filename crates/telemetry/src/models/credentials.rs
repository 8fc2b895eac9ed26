use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Placeholder shown in place of sensitive values in masked credential sets.
pub const SECRET_PLACEHOLDER: &str = "****";

/// A flat string-keyed property set with a parallel set of sensitive keys.
///
/// At rest, sensitive values hold cipher-text. The masked form substitutes
/// [`SECRET_PLACEHOLDER`] for display; the decrypted form substitutes
/// plaintext and must only ever live for the duration of one outgoing call.
/// All transforms produce new sets - see `secrets::SecretStore`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct CredentialSet {
    properties: BTreeMap<String, String>,
    sensitive: BTreeSet<String>,
}

impl CredentialSet {
    /// An empty credential set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with a non-sensitive property added.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Returns a copy with a sensitive property added.
    ///
    /// The value may be plaintext (newly supplied, pre-encryption) or
    /// cipher-text (loaded from configuration at rest).
    pub fn with_secret(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.sensitive.insert(key.clone());
        self.properties.insert(key, value.into());
        self
    }

    /// Returns a copy with a key flagged sensitive, whether or not a value
    /// for it is present yet.
    pub fn with_sensitive_key(mut self, key: impl Into<String>) -> Self {
        self.sensitive.insert(key.into());
        self
    }

    /// Look up a property value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Whether a key is flagged sensitive.
    pub fn is_sensitive(&self, key: &str) -> bool {
        self.sensitive.contains(key)
    }

    /// A sensitive value, only when the key is declared sensitive and a
    /// non-empty value is configured. Auth schemes use this to decide
    /// whether credential injection applies at all.
    pub fn secret_value(&self, key: &str) -> Option<&str> {
        if !self.is_sensitive(key) {
            return None;
        }
        self.get(key).filter(|v| !v.is_empty())
    }

    /// All property keys and values.
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// The declared sensitive key names.
    pub fn sensitive_keys(&self) -> &BTreeSet<String> {
        &self.sensitive
    }

    /// Whether the set holds no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Rebuild a set from transformed parts, preserving the sensitive flags.
    pub(crate) fn from_parts(
        properties: BTreeMap<String, String>,
        sensitive: BTreeSet<String>,
    ) -> Self {
        Self {
            properties,
            sensitive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_value_requires_sensitive_flag() {
        let set = CredentialSet::new().with_property("apiKey", "plain-but-not-flagged");
        assert_eq!(set.secret_value("apiKey"), None);
        assert_eq!(set.get("apiKey"), Some("plain-but-not-flagged"));
    }

    #[test]
    fn test_secret_value_skips_empty_values() {
        let set = CredentialSet::new().with_secret("apiKey", "");
        assert!(set.is_sensitive("apiKey"));
        assert_eq!(set.secret_value("apiKey"), None);
    }

    #[test]
    fn test_sensitive_key_without_value() {
        let set = CredentialSet::new().with_sensitive_key("token");
        assert!(set.is_sensitive("token"));
        assert_eq!(set.get("token"), None);
        assert_eq!(set.secret_value("token"), None);
    }
}
