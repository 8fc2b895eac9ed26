//! Symmetric cipher capability for credential values at rest.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};
use rand::{rngs::OsRng, RngCore};

use crate::errors::TelemetryError;

/// Marker prefix on encrypted values so cipher-text and plaintext are
/// distinguishable in a stored credential set.
pub const ENCRYPTED_PREFIX: &str = "enc:v1:";

const NONCE_LEN: usize = 12;

/// Symmetric encrypt/decrypt over single credential values.
///
/// Implementations must be deterministic only in the round-trip sense:
/// `decrypt(encrypt(v)) == v`. The at-rest form carries [`ENCRYPTED_PREFIX`]
/// so re-encrypting an already encrypted value can be skipped.
pub trait SymmetricCipher: Send + Sync {
    /// Encrypt a plaintext value into its at-rest form.
    fn encrypt(&self, plaintext: &str) -> Result<String, TelemetryError>;

    /// Decrypt an at-rest value back to plaintext.
    fn decrypt(&self, ciphertext: &str) -> Result<String, TelemetryError>;
}

/// Whether a stored value is in the at-rest encrypted encoding.
pub fn is_encrypted(value: &str) -> bool {
    value.starts_with(ENCRYPTED_PREFIX)
}

/// ChaCha20-Poly1305 cipher with a random per-value nonce.
///
/// At-rest encoding: `enc:v1:` followed by `base64(nonce || ciphertext)`.
pub struct ChaChaCipher {
    key: [u8; 32],
}

impl ChaChaCipher {
    /// Create a cipher from raw key bytes.
    pub fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    /// Create a cipher from a base64 key, or a 32-byte ascii key.
    pub fn from_key_material(raw: &str) -> Result<Self, TelemetryError> {
        let trimmed = raw.trim();
        let decoded = match BASE64.decode(trimmed) {
            Ok(bytes) => bytes,
            Err(_) if trimmed.len() == 32 => trimmed.as_bytes().to_vec(),
            Err(_) => {
                return Err(TelemetryError::Cipher(
                    "key must be a base64 string or 32-byte ascii value".to_string(),
                ))
            }
        };

        if decoded.len() != 32 {
            return Err(TelemetryError::Cipher(
                "key must decode to exactly 32 bytes".to_string(),
            ));
        }

        let mut key = [0u8; 32];
        key.copy_from_slice(&decoded);
        Ok(Self::new(key))
    }
}

impl SymmetricCipher for ChaChaCipher {
    fn encrypt(&self, plaintext: &str) -> Result<String, TelemetryError> {
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&self.key));
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| TelemetryError::Cipher("encryption failed".to_string()))?;

        let mut combined = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        combined.extend_from_slice(&nonce_bytes);
        combined.extend_from_slice(&ciphertext);
        Ok(format!("{ENCRYPTED_PREFIX}{}", BASE64.encode(combined)))
    }

    fn decrypt(&self, ciphertext: &str) -> Result<String, TelemetryError> {
        let encoded = ciphertext.strip_prefix(ENCRYPTED_PREFIX).ok_or_else(|| {
            TelemetryError::Cipher("value is not in the encrypted encoding".to_string())
        })?;

        let combined = BASE64
            .decode(encoded)
            .map_err(|e| TelemetryError::Cipher(format!("failed to decode cipher-text: {e}")))?;
        if combined.len() <= NONCE_LEN {
            return Err(TelemetryError::Cipher("cipher-text too short".to_string()));
        }

        let (nonce_bytes, payload) = combined.split_at(NONCE_LEN);
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&self.key));
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce_bytes), payload)
            .map_err(|_| TelemetryError::Cipher("failed to decrypt value".to_string()))?;

        String::from_utf8(plaintext)
            .map_err(|_| TelemetryError::Cipher("decrypted value is not utf-8".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let cipher = ChaChaCipher::new([7u8; 32]);
        let encrypted = cipher.encrypt("hunter2").unwrap();

        assert!(is_encrypted(&encrypted));
        assert_ne!(encrypted, "hunter2");
        assert_eq!(cipher.decrypt(&encrypted).unwrap(), "hunter2");
    }

    #[test]
    fn test_decrypt_rejects_plaintext() {
        let cipher = ChaChaCipher::new([7u8; 32]);
        assert!(cipher.decrypt("not-encrypted").is_err());
    }

    #[test]
    fn test_decrypt_rejects_corrupt_payload() {
        let cipher = ChaChaCipher::new([7u8; 32]);
        assert!(cipher.decrypt("enc:v1:AAAA").is_err());
        assert!(cipher.decrypt("enc:v1:!!not-base64!!").is_err());
    }

    #[test]
    fn test_decrypt_rejects_wrong_key() {
        let encrypted = ChaChaCipher::new([7u8; 32]).encrypt("hunter2").unwrap();
        assert!(ChaChaCipher::new([8u8; 32]).decrypt(&encrypted).is_err());
    }

    #[test]
    fn test_key_material_parsing() {
        let base64_key = BASE64.encode([9u8; 32]);
        assert!(ChaChaCipher::from_key_material(&base64_key).is_ok());
        assert!(ChaChaCipher::from_key_material("0123456789abcdef0123456789abcde!").is_ok());
        assert!(ChaChaCipher::from_key_material("too-short").is_err());
    }
}
