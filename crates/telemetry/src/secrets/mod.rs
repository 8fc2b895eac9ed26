//! Credential handling: masking, decryption, and encryption of sensitive
//! configuration values.
//!
//! All operations are pure - they return new [`CredentialSet`] values and
//! never mutate in place. That makes "never persist decrypted secrets" a
//! structural guarantee: the at-rest set a caller holds is simply never the
//! decrypted one. Decryption is explicit-only; callers request it right
//! before an outgoing call and drop the result afterwards.

mod cipher;

pub use cipher::{is_encrypted, ChaChaCipher, SymmetricCipher, ENCRYPTED_PREFIX};

use std::sync::Arc;

use crate::errors::TelemetryError;
use crate::models::{CredentialSet, SECRET_PLACEHOLDER};

/// Encrypt, decrypt, and mask operations over credential sets.
///
/// Wraps the injected cipher capability; which keys are touched is driven
/// entirely by each set's own sensitive-key flags.
#[derive(Clone)]
pub struct SecretStore {
    cipher: Arc<dyn SymmetricCipher>,
}

impl SecretStore {
    /// Create a store over a cipher capability.
    pub fn new(cipher: Arc<dyn SymmetricCipher>) -> Self {
        Self { cipher }
    }

    /// Replace every sensitive value with the display placeholder.
    ///
    /// Used when exposing configuration back to a caller. Idempotent:
    /// masking a masked set changes nothing.
    pub fn mask(&self, set: &CredentialSet) -> CredentialSet {
        let properties = set
            .properties()
            .iter()
            .map(|(key, value)| {
                let masked = if set.is_sensitive(key) {
                    SECRET_PLACEHOLDER.to_string()
                } else {
                    value.clone()
                };
                (key.clone(), masked)
            })
            .collect();
        CredentialSet::from_parts(properties, set.sensitive_keys().clone())
    }

    /// Produce a transient set with sensitive values decrypted to plaintext.
    ///
    /// Values not in the at-rest encrypted encoding (already plaintext, or
    /// masked) pass through untouched. A value in the encoding that fails to
    /// decrypt is configuration corruption and surfaces immediately as a
    /// [`TelemetryError::Decryption`] naming the key, never the value.
    ///
    /// The result must not be persisted or logged; it exists for the
    /// duration of one outgoing call.
    pub fn decrypt(&self, set: &CredentialSet) -> Result<CredentialSet, TelemetryError> {
        self.transform_sensitive(set, |key, value| {
            if !is_encrypted(value) {
                return Ok(value.to_string());
            }
            self.cipher
                .decrypt(value)
                .map_err(|err| TelemetryError::Decryption {
                    key: key.to_string(),
                    message: err.to_string(),
                })
        })
    }

    /// Produce a set with newly supplied sensitive values encrypted.
    ///
    /// Values already in the at-rest encoding are left as is, so re-saving
    /// a loaded configuration never double-encrypts. The placeholder is also
    /// left alone - a masked set round-trips unchanged.
    pub fn encrypt(&self, set: &CredentialSet) -> Result<CredentialSet, TelemetryError> {
        self.transform_sensitive(set, |_key, value| {
            if is_encrypted(value) || value == SECRET_PLACEHOLDER || value.is_empty() {
                return Ok(value.to_string());
            }
            self.cipher.encrypt(value)
        })
    }

    fn transform_sensitive<F>(
        &self,
        set: &CredentialSet,
        mut transform: F,
    ) -> Result<CredentialSet, TelemetryError>
    where
        F: FnMut(&str, &str) -> Result<String, TelemetryError>,
    {
        let mut properties = std::collections::BTreeMap::new();
        for (key, value) in set.properties() {
            let transformed = if set.is_sensitive(key) {
                transform(key, value)?
            } else {
                value.clone()
            };
            properties.insert(key.clone(), transformed);
        }
        Ok(CredentialSet::from_parts(
            properties,
            set.sensitive_keys().clone(),
        ))
    }
}
