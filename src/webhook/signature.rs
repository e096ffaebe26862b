//! Webhook signature computation and verification
//!
//! Signatures are HMAC-SHA256 over the canonical serialization of the full
//! payload, hex-encoded. Canonicalization sorts object keys at every depth,
//! so the signature is reproducible regardless of the field order the
//! sender happened to emit.

use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// Serialize a payload with deterministic field ordering.
///
/// `serde_json`'s default object representation keeps keys sorted, so a
/// compact serialization of any parsed [`Value`] is already canonical.
pub fn canonical_json(payload: &Value) -> Vec<u8> {
    // Serializing an in-memory Value cannot fail: keys are strings and
    // depth is whatever the parser already accepted.
    serde_json::to_vec(payload).expect("JSON value serialization is infallible")
}

/// Keyed signer/verifier for webhook payloads.
pub struct WebhookSigner {
    secret: Zeroizing<Vec<u8>>,
}

impl WebhookSigner {
    /// Build a signer from the shared webhook secret.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            secret: Zeroizing::new(secret.to_vec()),
        }
    }

    fn mac(&self) -> HmacSha256 {
        // HMAC accepts keys of any length.
        HmacSha256::new_from_slice(&self.secret).expect("HMAC key length is unbounded")
    }

    /// Compute the hex-encoded signature for a payload.
    pub fn sign(&self, payload: &Value) -> String {
        let mut mac = self.mac();
        mac.update(&canonical_json(payload));
        hex::encode(mac.finalize().into_bytes())
    }

    /// Verify a caller-supplied signature in constant time.
    ///
    /// Returns `false` for any mismatch, including signatures that are not
    /// valid hex.
    pub fn verify(&self, payload: &Value, signature_hex: &str) -> bool {
        let provided = match hex::decode(signature_hex) {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };

        let mut mac = self.mac();
        mac.update(&canonical_json(payload));
        mac.verify_slice(&provided).is_ok()
    }
}
