//! Store row types

use chrono::{DateTime, Utc};

/// A persisted user row. PII fields are ciphertext blobs; the password is a
/// PHC digest. Plaintext never appears in this type.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Primary key
    pub id: i64,
    /// Login name
    pub username: String,
    /// Adaptive one-way digest of the password
    pub password_hash: String,
    /// Encrypted credit-card number
    pub credit_card_encrypted: Vec<u8>,
    /// Encrypted social-security number
    pub ssn_encrypted: Vec<u8>,
    /// Row creation time
    pub created_at: DateTime<Utc>,
}

/// Input for creating a user. Carries plaintext only in memory; the store
/// hashes and encrypts before anything is persisted.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Login name
    pub username: String,
    /// Plaintext password, hashed before storage
    pub password: String,
    /// Plaintext credit-card number, encrypted before storage
    pub credit_card: String,
    /// Plaintext social-security number, encrypted before storage
    pub ssn: String,
}
