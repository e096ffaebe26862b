//! Webhook authentication and processing
//!
//! Secure handling of externally-signed webhook events. The pipeline is:
//!
//! ```text
//! Request -> Signature Verify -> Shape Validate -> Authorize -> Apply -> Relay
//!                  |                   |               |
//!                  v                   v               v
//!            401 (reject)     error outcome (200)  403 (deny)
//! ```
//!
//! # Security
//!
//! - HMAC-SHA256 over a canonical (stably key-ordered) serialization of the
//!   payload, so verification is independent of input field order
//! - Constant-time signature comparison to prevent timing attacks
//! - Authorization is deny-by-default: with no explicit policy, every
//!   action is refused
//! - No mutation happens before both the signature and the authorization
//!   decision have passed

pub mod authorizer;
pub mod events;
pub mod handler;
pub mod processor;
pub mod signature;

pub use authorizer::{AllowedRequesters, AuthorizationPolicy, DenyAll};
pub use events::{WebhookAction, WebhookEvent};
pub use handler::{webhook_router, SIGNATURE_HEADER};
pub use processor::{WebhookOutcome, WebhookProcessor};
pub use signature::{canonical_json, WebhookSigner};
