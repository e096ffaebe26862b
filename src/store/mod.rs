//! Encrypted persistent store
//!
//! Owns the `user_data` schema and all query construction. Every query
//! binds caller-supplied values as typed parameters; query text is never
//! assembled from input. PII columns hold ciphertext produced by
//! [`crate::crypto::FieldCipher`], and passwords are stored only as
//! adaptive one-way digests.
//!
//! Connections are opened per operation and released on every exit path,
//! so no connection is held across calls or leaked on error.

pub mod models;
pub mod repository;

pub use models::{NewUser, UserRecord};
pub use repository::EncryptedStore;
