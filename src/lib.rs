//! datagate - Secure Multi-Channel Data Gateway
//!
//! This crate accepts externally-signed webhook events, validates and
//! authorizes them, mutates an encrypted persistent store using
//! parameterized queries, and forwards data to external systems (a remote
//! API, object storage, an email relay) with injected credentials.
//!
//! # Architecture
//!
//! ```text
//! Webhook ──▶ WebhookProcessor ──▶ EncryptedStore (rusqlite)
//!                  │                     │
//!                  │                     ├── FieldCipher (XChaCha20-Poly1305)
//!                  │                     └── PasswordHasher (Argon2id)
//!                  ▼
//!            Relay / ApiClient / CloudUploader / Mailer
//!                  │
//!                  ▼
//!            Secrets (resolved once at startup)
//! ```
//!
//! # Security
//!
//! - All credentials load from a trusted source at process start; a missing
//!   secret aborts startup
//! - Webhook signatures are HMAC-SHA256 over a canonical serialization,
//!   compared in constant time
//! - PII is encrypted and passwords hashed before anything touches storage
//! - Every outbound call is TLS-verified with a hard 30-second deadline
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use datagate::clients::build_http_client;
//! use datagate::config::GatewayConfig;
//! use datagate::secrets::Secrets;
//! use datagate::store::EncryptedStore;
//! use datagate::webhook::{AllowedRequesters, WebhookProcessor};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let secrets = Secrets::from_env()?;
//!     let config = GatewayConfig::from_env()?;
//!
//!     let store = Arc::new(EncryptedStore::new(&config.db_path, &secrets)?);
//!     store.ensure_schema()?;
//!
//!     let processor = WebhookProcessor::new(
//!         &secrets,
//!         &config,
//!         store,
//!         Arc::new(AllowedRequesters::new([9])),
//!         build_http_client(config.request_timeout)?,
//!     )?;
//!
//!     let app = datagate::webhook::webhook_router(Arc::new(processor));
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod clients;
pub mod config;
pub mod crypto;
pub mod error;
pub mod secrets;
pub mod store;
pub mod webhook;

// Re-exports for convenience
pub use clients::{ApiClient, CloudUploader, Mailer};
pub use config::GatewayConfig;
pub use error::{Error, Result};
pub use secrets::{SecretName, Secrets};
pub use store::EncryptedStore;
pub use webhook::{WebhookOutcome, WebhookProcessor};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
