//! Outbound API client
//!
//! Bearer-token authenticated calls to the processing API. The token comes
//! from the resolved secrets and is attached per request; it is never
//! logged or embedded in errors.

use serde_json::Value;

use crate::config::GatewayConfig;
use crate::error::{ApiError, ConfigError};
use crate::secrets::{SecretName, SecretValue, Secrets};

/// Client for the downstream processing API.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretValue,
    timeout_secs: u64,
}

impl ApiClient {
    /// Wire a client from resolved secrets and configuration. `client`
    /// must already carry the gateway's TLS and timeout settings.
    pub fn new(
        client: reqwest::Client,
        config: &GatewayConfig,
        secrets: &Secrets,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: secrets.get(SecretName::ApiKey)?.clone(),
            timeout_secs: config.request_timeout.as_secs(),
        })
    }

    /// POST a JSON body to the `/process` endpoint and return the parsed
    /// response body.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Timeout`]: the call exceeded the deadline
    /// - [`ApiError::Http`]: a non-2xx response, status preserved
    /// - [`ApiError::Request`]: transport or connection failure
    pub async fn process(&self, data: &Value) -> Result<Value, ApiError> {
        let response = self
            .client
            .post(format!("{}/process", self.base_url))
            .bearer_auth(self.api_key.expose())
            .header(
                reqwest::header::USER_AGENT,
                concat!("datagate/", env!("CARGO_PKG_VERSION")),
            )
            .json(data)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "api returned error status");
            return Err(ApiError::Http {
                status: status.as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))
    }

    fn classify(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            tracing::error!(timeout_secs = self.timeout_secs, "api request timed out");
            ApiError::Timeout(self.timeout_secs)
        } else {
            // The reqwest error never carries headers or the request body,
            // so the description is safe to propagate.
            tracing::error!(error = %err, "api request failed");
            ApiError::Request(err.to_string())
        }
    }
}
