//! Field-level encryption
//!
//! XChaCha20-Poly1305 with a fresh random nonce per encryption. The 192-bit
//! nonce space makes random nonces safe for the lifetime of a single key.
//! Blobs are laid out as `nonce || ciphertext` so decryption needs no side
//! channel, and the Poly1305 tag detects any tampering.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use rand::RngCore;
use zeroize::Zeroizing;

use crate::error::{ConfigError, CryptoError};

/// Key length in bytes (256-bit).
pub const KEY_LEN: usize = 32;

/// XChaCha20 nonce length in bytes (192-bit).
const NONCE_LEN: usize = 24;

/// Symmetric authenticated cipher for PII fields.
///
/// Key material is zeroized when the cipher is dropped.
pub struct FieldCipher {
    key: Zeroizing<[u8; KEY_LEN]>,
}

impl FieldCipher {
    /// Build a cipher from a base64-encoded 32-byte key, as supplied by the
    /// `ENCRYPTION_KEY` secret.
    pub fn from_base64(encoded: &str) -> Result<Self, ConfigError> {
        let decoded = Zeroizing::new(
            STANDARD
                .decode(encoded)
                .map_err(|e| ConfigError::InvalidEncryptionKey(e.to_string()))?,
        );

        if decoded.len() != KEY_LEN {
            return Err(ConfigError::InvalidEncryptionKey(format!(
                "expected {} bytes, got {}",
                KEY_LEN,
                decoded.len()
            )));
        }

        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        key.copy_from_slice(&decoded);
        Ok(Self { key })
    }

    /// Build a cipher from raw key bytes.
    pub fn from_bytes(key: [u8; KEY_LEN]) -> Self {
        Self {
            key: Zeroizing::new(key),
        }
    }

    /// Encrypt a plaintext field. Each call draws a fresh random nonce, so
    /// encrypting the same plaintext twice yields different blobs.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let cipher = XChaCha20Poly1305::new((&*self.key).into());

        let mut nonce = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce);

        let ciphertext = cipher
            .encrypt(XNonce::from_slice(&nonce), plaintext)
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

        let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&ciphertext);
        Ok(blob)
    }

    /// Decrypt a `nonce || ciphertext` blob, verifying the authentication
    /// tag.
    pub fn decrypt(&self, blob: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if blob.len() < NONCE_LEN {
            return Err(CryptoError::TruncatedCiphertext);
        }

        let (nonce, ciphertext) = blob.split_at(NONCE_LEN);
        let cipher = XChaCha20Poly1305::new((&*self.key).into());

        cipher
            .decrypt(XNonce::from_slice(nonce), ciphertext)
            .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cipher() -> FieldCipher {
        FieldCipher::from_bytes([7u8; KEY_LEN])
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let cipher = test_cipher();
        let plaintext = b"4111-1111-1111-1111";

        let blob = cipher.encrypt(plaintext).unwrap();
        let decrypted = cipher.decrypt(&blob).unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_encryption_is_randomized() {
        let cipher = test_cipher();
        let plaintext = b"123-45-6789";

        let first = cipher.encrypt(plaintext).unwrap();
        let second = cipher.encrypt(plaintext).unwrap();

        assert_ne!(first, second);
        assert_eq!(cipher.decrypt(&first).unwrap(), plaintext);
        assert_eq!(cipher.decrypt(&second).unwrap(), plaintext);
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let cipher = test_cipher();
        let mut blob = cipher.encrypt(b"sensitive").unwrap();

        let last = blob.len() - 1;
        blob[last] ^= 0xFF;

        assert!(matches!(
            cipher.decrypt(&blob),
            Err(CryptoError::DecryptionFailed(_))
        ));
    }

    #[test]
    fn test_wrong_key_fails() {
        let blob = test_cipher().encrypt(b"sensitive").unwrap();
        let other = FieldCipher::from_bytes([8u8; KEY_LEN]);

        assert!(other.decrypt(&blob).is_err());
    }

    #[test]
    fn test_truncated_blob_rejected() {
        let cipher = test_cipher();
        assert!(matches!(
            cipher.decrypt(&[0u8; 10]),
            Err(CryptoError::TruncatedCiphertext)
        ));
    }

    #[test]
    fn test_key_from_base64() {
        let encoded = STANDARD.encode([9u8; KEY_LEN]);
        let cipher = FieldCipher::from_base64(&encoded).unwrap();

        let blob = cipher.encrypt(b"x").unwrap();
        assert_eq!(cipher.decrypt(&blob).unwrap(), b"x");
    }

    #[test]
    fn test_key_wrong_length_rejected() {
        let encoded = STANDARD.encode([9u8; 16]);
        assert!(matches!(
            FieldCipher::from_base64(&encoded),
            Err(ConfigError::InvalidEncryptionKey(_))
        ));
    }

    #[test]
    fn test_key_bad_encoding_rejected() {
        assert!(FieldCipher::from_base64("not base64!!!").is_err());
    }
}
