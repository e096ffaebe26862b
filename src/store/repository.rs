//! Store operations
//!
//! All reads and writes over the `user_data` table. Input validation runs
//! before any connection is opened, so malformed ids never touch storage.

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::crypto::{FieldCipher, PasswordHasher};
use crate::error::{ConfigError, CryptoError, StoreError};
use crate::secrets::{SecretName, Secrets};
use crate::store::models::{NewUser, UserRecord};

/// Parameterized data access over the encrypted user table.
///
/// Holds the field cipher and password hasher; both are stateless per call,
/// so the store is safe to share across concurrent requests behind an
/// `Arc`. Each operation opens its own connection.
pub struct EncryptedStore {
    db_path: PathBuf,
    cipher: FieldCipher,
    hasher: PasswordHasher,
}

impl EncryptedStore {
    /// Build a store over the database at `db_path`, taking the
    /// field-encryption key from the resolved secrets.
    pub fn new(db_path: impl AsRef<Path>, secrets: &Secrets) -> Result<Self, ConfigError> {
        let cipher = FieldCipher::from_base64(secrets.get(SecretName::EncryptionKey)?.expose())?;

        Ok(Self {
            db_path: db_path.as_ref().to_path_buf(),
            cipher,
            hasher: PasswordHasher::new(),
        })
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        Ok(Connection::open(&self.db_path)?)
    }

    /// Create the `user_data` table if it does not exist. Safe to call
    /// repeatedly.
    pub fn ensure_schema(&self) -> Result<(), StoreError> {
        let conn = self.connect()?;
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS user_data (
                id                     INTEGER PRIMARY KEY,
                username               TEXT,
                password_hash          TEXT,
                credit_card_encrypted  BLOB,
                ssn_encrypted          BLOB,
                created_at             TIMESTAMP
            );
            ",
        )?;
        tracing::debug!("user_data schema ensured");
        Ok(())
    }

    /// Fetch a user by id.
    ///
    /// Returns `Ok(None)` when no row matches. Ids that are not positive
    /// are rejected with [`StoreError::InvalidUserId`] before any
    /// connection is opened.
    pub fn fetch_user(&self, id: i64) -> Result<Option<UserRecord>, StoreError> {
        validate_user_id(id)?;

        let conn = self.connect()?;
        tracing::debug!(user_id = id, "fetching user");

        let record = conn
            .query_row(
                "SELECT id, username, password_hash, credit_card_encrypted, ssn_encrypted,
                        created_at
                 FROM user_data WHERE id = ?1",
                params![id],
                |row| {
                    Ok(UserRecord {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        password_hash: row.get(2)?,
                        credit_card_encrypted: row.get(3)?,
                        ssn_encrypted: row.get(4)?,
                        created_at: row.get(5)?,
                    })
                },
            )
            .optional()?;

        Ok(record)
    }

    /// Insert a user, hashing the password and encrypting PII fields first.
    /// Returns the new row id.
    pub fn insert_user(&self, user: &NewUser) -> Result<i64, StoreError> {
        let password_hash = self.hasher.hash(&user.password)?;
        let credit_card = self.cipher.encrypt(user.credit_card.as_bytes())?;
        let ssn = self.cipher.encrypt(user.ssn.as_bytes())?;

        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO user_data (username, password_hash, credit_card_encrypted,
                                    ssn_encrypted, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![user.username, password_hash, credit_card, ssn, Utc::now()],
        )?;

        let id = conn.last_insert_rowid();
        tracing::info!(user_id = id, "user created");
        Ok(id)
    }

    /// Delete a user by id. Returns whether a row was removed. The same id
    /// validation applies as for [`EncryptedStore::fetch_user`].
    pub fn delete_user(&self, id: i64) -> Result<bool, StoreError> {
        validate_user_id(id)?;

        let conn = self.connect()?;
        let removed = conn.execute("DELETE FROM user_data WHERE id = ?1", params![id])?;
        tracing::info!(user_id = id, removed, "user delete executed");
        Ok(removed > 0)
    }

    /// Encrypt a sensitive field for storage.
    pub fn encrypt_field(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.cipher.encrypt(plaintext)
    }

    /// Decrypt a sensitive field after retrieval.
    pub fn decrypt_field(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.cipher.decrypt(ciphertext)
    }

    /// Hash a password for storage.
    pub fn hash_password(&self, password: &str) -> Result<String, CryptoError> {
        self.hasher.hash(password)
    }

    /// Verify a password against a stored digest.
    pub fn verify_password(&self, password: &str, digest: &str) -> Result<bool, CryptoError> {
        self.hasher.verify(password, digest)
    }
}

fn validate_user_id(id: i64) -> Result<(), StoreError> {
    if id <= 0 {
        return Err(StoreError::InvalidUserId(id));
    }
    Ok(())
}
