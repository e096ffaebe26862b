//! HTTP surface for webhook delivery
//!
//! A small axum router exposing the webhook intake endpoint and a health
//! probe. Status mapping: signature mismatch is 401, authorization denial
//! is 403, and everything else (including malformed-but-authenticated
//! payloads) is a 200 carrying the structured outcome.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::error::WebhookError;
use crate::webhook::processor::WebhookProcessor;

/// Header carrying the hex-encoded HMAC signature of the payload.
pub const SIGNATURE_HEADER: &str = "x-webhook-signature";

/// Build the gateway router.
pub fn webhook_router(processor: Arc<WebhookProcessor>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/webhook", post(handle_webhook))
        .with_state(processor)
}

async fn health() -> &'static str {
    "ok"
}

async fn handle_webhook(
    State(processor): State<Arc<WebhookProcessor>>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let signature = match headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
    {
        Some(signature) => signature,
        None => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"status": "error", "message": "missing signature"})),
            );
        }
    };

    match processor.process(&payload, signature).await {
        Ok(outcome) => {
            // Outcome values always serialize; both variants are plain data.
            let body = serde_json::to_value(&outcome)
                .expect("outcome serialization is infallible");
            (StatusCode::OK, Json(body))
        }
        Err(WebhookError::InvalidSignature) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"status": "error", "message": "invalid webhook signature"})),
        ),
        Err(WebhookError::PermissionDenied { action }) => (
            StatusCode::FORBIDDEN,
            Json(json!({
                "status": "error",
                "message": format!("not authorized to perform {action}")
            })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "unexpected webhook processing error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"status": "error", "message": "processing failed"})),
            )
        }
    }
}
