//! Outbound service clients
//!
//! Each client carries injected credentials from [`crate::secrets`] and
//! enforces TLS verification plus a hard timeout on every call. None of
//! them log credential material.

pub mod api;
pub mod email;
pub mod storage;

pub use api::ApiClient;
pub use email::Mailer;
pub use storage::CloudUploader;

use std::time::Duration;

/// Build the HTTP client shared by the gateway's outbound calls.
///
/// Certificate verification stays at reqwest's defaults (always on); the
/// timeout is a hard deadline enforced by the transport. Clones of the
/// returned client share one connection pool.
pub fn build_http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .use_rustls_tls()
        .build()
}
