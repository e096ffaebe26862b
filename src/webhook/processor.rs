//! Webhook event processing
//!
//! Drives a single event through signature verification, shape validation,
//! authorization, the store mutation, and the downstream relay. Once the
//! signature has verified and the requester is authorized, the processor
//! always returns an outcome value: a malformed or failing event is
//! reported, never raised, so one bad delivery cannot crash the gateway.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::GatewayConfig;
use crate::error::{Error, WebhookError};
use crate::secrets::{SecretName, Secrets};
use crate::store::EncryptedStore;
use crate::webhook::authorizer::AuthorizationPolicy;
use crate::webhook::events::{WebhookAction, WebhookEvent};
use crate::webhook::signature::WebhookSigner;

/// Terminal result of processing one webhook event.
///
/// Serializes as `{"status":"processed","webhook_response":N}` or
/// `{"status":"error","message":"..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WebhookOutcome {
    /// The event was applied and relayed; carries the relay's HTTP status
    Processed {
        /// HTTP status code returned by the downstream endpoint
        webhook_response: u16,
    },
    /// The event was authenticated but could not be processed
    Error {
        /// Stable, non-sensitive description
        message: String,
    },
}

impl WebhookOutcome {
    fn invalid_data() -> Self {
        Self::Error {
            message: "invalid webhook data".to_string(),
        }
    }

    fn processing_failed() -> Self {
        Self::Error {
            message: "processing failed".to_string(),
        }
    }
}

/// Authenticates, authorizes, applies, and relays webhook events.
///
/// Safe for concurrent use: the signer and cipher are stateless per call,
/// the store opens a connection per operation, and the HTTP client is
/// shared by reference.
pub struct WebhookProcessor {
    signer: WebhookSigner,
    policy: Arc<dyn AuthorizationPolicy>,
    store: Arc<EncryptedStore>,
    client: reqwest::Client,
    relay_endpoint: String,
}

impl WebhookProcessor {
    /// Wire a processor from resolved secrets and configuration.
    ///
    /// `client` must already carry the gateway's TLS and timeout settings;
    /// it is shared, not rebuilt per call.
    pub fn new(
        secrets: &Secrets,
        config: &GatewayConfig,
        store: Arc<EncryptedStore>,
        policy: Arc<dyn AuthorizationPolicy>,
        client: reqwest::Client,
    ) -> Result<Self, Error> {
        let signer = WebhookSigner::new(
            secrets
                .get(SecretName::WebhookSecret)?
                .expose()
                .as_bytes(),
        );

        Ok(Self {
            signer,
            policy,
            store,
            client,
            relay_endpoint: config.relay_endpoint.clone(),
        })
    }

    /// Process one signed webhook delivery.
    ///
    /// # Errors
    ///
    /// - [`WebhookError::InvalidSignature`]: the signature did not verify.
    ///   Nothing was validated, mutated, or relayed.
    /// - [`WebhookError::PermissionDenied`]: the authorization policy
    ///   refused the requester, or no requester id was supplied. No
    ///   mutation was performed.
    ///
    /// Every other condition (malformed payload, store or relay fault) is
    /// reported in the returned [`WebhookOutcome`].
    pub async fn process(
        &self,
        payload: &Value,
        signature: &str,
    ) -> Result<WebhookOutcome, WebhookError> {
        if !self.signer.verify(payload, signature) {
            tracing::warn!("invalid webhook signature received");
            return Err(WebhookError::InvalidSignature);
        }

        let event = match WebhookEvent::from_value(payload) {
            Ok(event) => event,
            Err(reason) => {
                tracing::error!(error = %reason, "webhook validation failed");
                return Ok(WebhookOutcome::invalid_data());
            }
        };

        // Deny before the policy runs when no requester was supplied.
        let requester_id = match event.requester_id {
            Some(id) => id,
            None => {
                tracing::warn!(action = %event.action, "webhook carried no requester id");
                return Err(WebhookError::PermissionDenied {
                    action: event.action.as_str().to_string(),
                });
            }
        };

        if !self.policy.authorize(requester_id, event.action) {
            tracing::warn!(
                requester_id,
                action = %event.action,
                "authorization policy denied webhook action"
            );
            return Err(WebhookError::PermissionDenied {
                action: event.action.as_str().to_string(),
            });
        }

        match self.apply_and_relay(&event, payload).await {
            Ok(relay_status) => {
                tracing::info!(
                    user_id = event.user_id,
                    action = %event.action,
                    relay_status,
                    "webhook processed"
                );
                Ok(WebhookOutcome::Processed {
                    webhook_response: relay_status,
                })
            }
            Err(e) => {
                tracing::error!(error = %e, "webhook processing failed");
                Ok(WebhookOutcome::processing_failed())
            }
        }
    }

    /// Apply the store mutation, then forward the validated payload
    /// downstream. Returns the relay's HTTP status code.
    async fn apply_and_relay(&self, event: &WebhookEvent, payload: &Value) -> Result<u16, Error> {
        // delete_user is the only action with a store mutation; the others
        // are forward-only.
        if event.action == WebhookAction::DeleteUser {
            let removed = self.store.delete_user(event.user_id)?;
            tracing::debug!(user_id = event.user_id, removed, "delete applied");
        }

        let response = self
            .client
            .post(&self.relay_endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|e| WebhookError::Relay(e.to_string()))?;

        Ok(response.status().as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webhook::authorizer::{AllowedRequesters, DenyAll};
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde_json::json;
    use std::collections::HashMap;

    const WEBHOOK_SECRET: &str = "abc";

    fn test_secrets() -> Secrets {
        let mut values: HashMap<SecretName, String> = SecretName::ALL
            .iter()
            .map(|name| (*name, "test-value".to_string()))
            .collect();
        values.insert(SecretName::EncryptionKey, STANDARD.encode([1u8; 32]));
        values.insert(SecretName::WebhookSecret, WEBHOOK_SECRET.to_string());
        Secrets::from_values(values).unwrap()
    }

    fn test_processor(
        dir: &tempfile::TempDir,
        policy: Arc<dyn AuthorizationPolicy>,
    ) -> (WebhookProcessor, Arc<EncryptedStore>) {
        let secrets = test_secrets();
        let config = GatewayConfig {
            // Unroutable; tests that reach the relay use the integration
            // suite with a local server instead.
            relay_endpoint: "http://127.0.0.1:1/relay".to_string(),
            db_path: dir.path().join("test.db"),
            ..GatewayConfig::default()
        };

        let store =
            Arc::new(EncryptedStore::new(&config.db_path, &secrets).unwrap());
        store.ensure_schema().unwrap();

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(250))
            .build()
            .unwrap();

        let processor =
            WebhookProcessor::new(&secrets, &config, store.clone(), policy, client).unwrap();
        (processor, store)
    }

    fn signed(payload: &Value) -> String {
        WebhookSigner::new(WEBHOOK_SECRET.as_bytes()).sign(payload)
    }

    #[tokio::test]
    async fn test_bad_signature_is_hard_rejection() {
        let dir = tempfile::tempdir().unwrap();
        let (processor, store) = test_processor(&dir, Arc::new(AllowedRequesters::new([9])));

        let id = store
            .insert_user(&crate::store::NewUser {
                username: "bob".into(),
                password: "pw".into(),
                credit_card: "4111".into(),
                ssn: "123".into(),
            })
            .unwrap();

        let payload = json!({"user_id": id, "action": "delete_user", "requester_id": 9});
        let result = processor.process(&payload, "00ff00ff").await;

        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
        // The record is untouched.
        assert!(store.fetch_user(id).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_unknown_action_is_reported_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let (processor, _) = test_processor(&dir, Arc::new(AllowedRequesters::new([9])));

        let payload = json!({"user_id": 5, "action": "archive_user", "requester_id": 9});
        let outcome = processor.process(&payload, &signed(&payload)).await.unwrap();

        assert_eq!(
            outcome,
            WebhookOutcome::Error {
                message: "invalid webhook data".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_denied_requester_no_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let (processor, store) = test_processor(&dir, Arc::new(DenyAll));

        let id = store
            .insert_user(&crate::store::NewUser {
                username: "carol".into(),
                password: "pw".into(),
                credit_card: "4111".into(),
                ssn: "123".into(),
            })
            .unwrap();

        let payload = json!({"user_id": id, "action": "delete_user", "requester_id": 9});
        let result = processor.process(&payload, &signed(&payload)).await;

        assert!(matches!(result, Err(WebhookError::PermissionDenied { .. })));
        assert!(store.fetch_user(id).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_missing_requester_denied() {
        let dir = tempfile::tempdir().unwrap();
        let (processor, _) = test_processor(&dir, Arc::new(AllowedRequesters::new([9])));

        let payload = json!({"user_id": 5, "action": "update_user"});
        let result = processor.process(&payload, &signed(&payload)).await;

        assert!(matches!(result, Err(WebhookError::PermissionDenied { .. })));
    }

    #[tokio::test]
    async fn test_relay_fault_is_reported_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let (processor, store) = test_processor(&dir, Arc::new(AllowedRequesters::new([9])));

        let id = store
            .insert_user(&crate::store::NewUser {
                username: "dave".into(),
                password: "pw".into(),
                credit_card: "4111".into(),
                ssn: "123".into(),
            })
            .unwrap();

        // The relay endpoint is unroutable, so apply succeeds but the
        // forward fails; that is a reportable outcome, not an error.
        let payload = json!({"user_id": id, "action": "delete_user", "requester_id": 9});
        let outcome = processor.process(&payload, &signed(&payload)).await.unwrap();

        assert_eq!(
            outcome,
            WebhookOutcome::Error {
                message: "processing failed".to_string()
            }
        );
    }

    #[test]
    fn test_outcome_wire_shapes() {
        let processed = WebhookOutcome::Processed {
            webhook_response: 200,
        };
        assert_eq!(
            serde_json::to_value(&processed).unwrap(),
            json!({"status": "processed", "webhook_response": 200})
        );

        let error = WebhookOutcome::invalid_data();
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            json!({"status": "error", "message": "invalid webhook data"})
        );
    }
}
