//! At-rest protection primitives
//!
//! - [`FieldCipher`]: symmetric authenticated encryption for PII fields
//!   before they touch storage
//! - [`PasswordHasher`]: adaptive salted one-way hashing for credentials
//!
//! Both are stateless per call and safe for concurrent use. The cipher is
//! the sole holder of the field-encryption key; nothing else in the crate
//! sees the symmetric key material.

pub mod cipher;
pub mod password;

pub use cipher::FieldCipher;
pub use password::PasswordHasher;
