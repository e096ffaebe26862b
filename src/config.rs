//! Non-secret runtime configuration
//!
//! Endpoints, ports, and other plain settings with environment overrides.
//! Credentials never live here; see [`crate::secrets`].

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Hard deadline applied to every outbound network call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Non-secret gateway configuration.
///
/// Constructed once at startup and shared by reference. Defaults match the
/// production deployment; each field can be overridden through the
/// environment variable named in its doc comment.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL for the outbound API (`API_BASE_URL`)
    pub api_base_url: String,
    /// Endpoint validated webhook events are forwarded to (`WEBHOOK_ENDPOINT`)
    pub relay_endpoint: String,
    /// Object-storage region (`AWS_REGION`)
    pub aws_region: String,
    /// SMTP relay host (`SMTP_SERVER`)
    pub smtp_server: String,
    /// SMTP relay port (`SMTP_PORT`)
    pub smtp_port: u16,
    /// Sender address for notification mail (`SENDER_EMAIL`)
    pub sender_email: String,
    /// Path of the embedded database file (`DATABASE_PATH`)
    pub db_path: PathBuf,
    /// Requesters permitted by the default authorization policy
    /// (`ALLOWED_REQUESTERS`, comma-separated ids; empty means deny all)
    pub allowed_requesters: Vec<i64>,
    /// Deadline for outbound network calls
    pub request_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.production-service.com/v1".to_string(),
            relay_endpoint: "https://internal-webhook.company.com/process".to_string(),
            aws_region: "us-east-1".to_string(),
            smtp_server: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            sender_email: "notifications@company.com".to_string(),
            db_path: PathBuf::from("app_data.db"),
            allowed_requesters: Vec::new(),
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}

impl GatewayConfig {
    /// Load configuration from the environment, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when an override is present but
    /// unparseable (bad port, non-integer requester id).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let smtp_port = match env::var("SMTP_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                var: "SMTP_PORT",
                reason: e.to_string(),
            })?,
            Err(_) => defaults.smtp_port,
        };

        let allowed_requesters = match env::var("ALLOWED_REQUESTERS") {
            Ok(raw) => parse_requester_list(&raw)?,
            Err(_) => Vec::new(),
        };

        Ok(Self {
            api_base_url: env::var("API_BASE_URL").unwrap_or(defaults.api_base_url),
            relay_endpoint: env::var("WEBHOOK_ENDPOINT").unwrap_or(defaults.relay_endpoint),
            aws_region: env::var("AWS_REGION").unwrap_or(defaults.aws_region),
            smtp_server: env::var("SMTP_SERVER").unwrap_or(defaults.smtp_server),
            smtp_port,
            sender_email: env::var("SENDER_EMAIL").unwrap_or(defaults.sender_email),
            db_path: env::var("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            allowed_requesters,
            request_timeout: REQUEST_TIMEOUT,
        })
    }
}

fn parse_requester_list(raw: &str) -> Result<Vec<i64>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>().map_err(|e| ConfigError::InvalidValue {
                var: "ALLOWED_REQUESTERS",
                reason: format!("{part:?}: {e}"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_deployment() {
        let config = GatewayConfig::default();
        assert_eq!(config.smtp_port, 587);
        assert_eq!(config.aws_region, "us-east-1");
        assert!(config.api_base_url.starts_with("https://"));
        assert!(config.relay_endpoint.starts_with("https://"));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.allowed_requesters.is_empty());
    }

    #[test]
    fn test_parse_requester_list() {
        assert_eq!(parse_requester_list("9").unwrap(), vec![9]);
        assert_eq!(parse_requester_list("1, 2,3").unwrap(), vec![1, 2, 3]);
        assert!(parse_requester_list("").unwrap().is_empty());
        assert!(parse_requester_list("9,abc").is_err());
    }
}
