//! Error types for datagate
//!
//! This module provides a comprehensive error type hierarchy using `thiserror`
//! for proper error handling across all components.
//!
//! Infrastructure faults (database, API, storage, email) are wrapped with
//! their kind preserved; secret and credential values never appear in error
//! messages or logs.

use thiserror::Error;

/// The main error type for datagate operations
#[derive(Error, Debug)]
pub enum Error {
    /// Startup configuration errors (missing secrets, bad values)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Persistent store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Field encryption and password hashing errors
    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Webhook authentication and processing errors
    #[error("Webhook error: {0}")]
    Webhook(#[from] WebhookError),

    /// Outbound API call errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Object storage errors
    #[error("Cloud storage error: {0}")]
    CloudStorage(#[from] CloudStorageError),

    /// Email relay errors
    #[error("Email error: {0}")]
    Email(#[from] EmailError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while assembling configuration at process start.
///
/// All variants are fatal: the gateway refuses to run with partial
/// credentials or an unusable key.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// One or more required secrets are absent or empty
    #[error("missing required secrets: {0}")]
    MissingSecrets(String),

    /// Lookup of a secret that was never part of the required set
    #[error("unknown secret: {0}")]
    SecretNotFound(&'static str),

    /// The field-encryption key is not valid base64 or has the wrong length
    #[error("invalid encryption key: {0}")]
    InvalidEncryptionKey(String),

    /// A non-secret configuration value failed to parse
    #[error("invalid value for {var}: {reason}")]
    InvalidValue {
        /// Environment variable name
        var: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

/// Field encryption and password hashing errors
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Encryption failed
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption or authentication-tag verification failed
    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    /// Ciphertext blob too short to contain a nonce
    #[error("ciphertext is truncated")]
    TruncatedCiphertext,

    /// Password hashing failed
    #[error("password hashing failed: {0}")]
    HashingFailed(String),

    /// Stored password digest is not a valid PHC string
    #[error("malformed password digest")]
    MalformedDigest,
}

/// Persistent store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Caller-supplied id failed validation; storage was never contacted
    #[error("invalid user id {0}: must be a positive integer")]
    InvalidUserId(i64),

    /// Underlying storage fault. The original error is logged server-side;
    /// the message here is deliberately generic.
    #[error("database operation failed")]
    Database,

    /// PII encryption/decryption fault during a store operation
    #[error("field crypto failed: {0}")]
    Crypto(#[from] CryptoError),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        // Log the driver message server-side only; connection details and
        // query parameters stay out of the propagated error.
        tracing::error!(error = %err, "database operation failed");
        StoreError::Database
    }
}

/// Webhook authentication and processing errors
///
/// Only `InvalidSignature` and `PermissionDenied` are surfaced to callers of
/// the processor; every other failure mode is reported as a structured
/// outcome value instead.
#[derive(Error, Debug)]
pub enum WebhookError {
    /// HMAC signature mismatch. No part of the event was acted upon.
    #[error("invalid webhook signature")]
    InvalidSignature,

    /// The authorization policy denied the requester, or no requester was
    /// supplied. No mutation was performed.
    #[error("requester is not authorized to perform {action}")]
    PermissionDenied {
        /// The action that was denied
        action: String,
    },

    /// The payload is authenticated but malformed (bad id, unknown action)
    #[error("invalid webhook payload: {0}")]
    InvalidPayload(String),

    /// Forwarding the validated event to the downstream endpoint failed
    #[error("relay request failed: {0}")]
    Relay(String),
}

/// Outbound API call errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// The call exceeded the configured deadline
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// Non-2xx response from the API
    #[error("HTTP {status}")]
    Http {
        /// HTTP status code returned by the API
        status: u16,
    },

    /// Transport or connection failure
    #[error("request failed: {0}")]
    Request(String),
}

/// Object storage errors
#[derive(Error, Debug)]
pub enum CloudStorageError {
    /// The local artifact path has no usable base filename
    #[error("invalid artifact path: {0}")]
    InvalidPath(String),

    /// Upload fault, normalized; credential material is never included
    #[error("upload failed: {0}")]
    Upload(String),
}

/// Email relay errors
#[derive(Error, Debug)]
pub enum EmailError {
    /// Recipient failed syntactic validation; no connection was attempted
    #[error("invalid recipient address")]
    InvalidRecipient,

    /// Address could not be parsed into a mailbox
    #[error("malformed address: {0}")]
    Address(String),

    /// SMTP protocol or delivery fault; the credential is never included
    #[error("mail delivery failed: {0}")]
    Transport(String),
}

/// Result type alias for datagate operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingSecrets("API_KEY, WEBHOOK_SECRET".to_string());
        assert!(err.to_string().contains("missing required secrets"));
        assert!(err.to_string().contains("API_KEY"));
    }

    #[test]
    fn test_store_error_is_generic() {
        let err = StoreError::Database;
        assert_eq!(err.to_string(), "database operation failed");
    }

    #[test]
    fn test_invalid_user_id_display() {
        let err = StoreError::InvalidUserId(-3);
        assert!(err.to_string().contains("-3"));
        assert!(err.to_string().contains("positive integer"));
    }

    #[test]
    fn test_api_error_preserves_status() {
        let err = ApiError::Http { status: 503 };
        assert_eq!(err.to_string(), "HTTP 503");
    }

    #[test]
    fn test_permission_denied_names_action() {
        let err = WebhookError::PermissionDenied {
            action: "delete_user".to_string(),
        };
        assert!(err.to_string().contains("delete_user"));
    }

    #[test]
    fn test_top_level_wrapping() {
        let err: Error = ApiError::Timeout(30).into();
        assert!(err.to_string().contains("timed out after 30s"));
    }
}
