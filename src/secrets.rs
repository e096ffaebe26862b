//! Secret loading and access
//!
//! All credentials come from a trusted external source (the process
//! environment) and are resolved exactly once, at startup. If any required
//! secret is absent or empty the constructor fails and the gateway refuses
//! to start: it must never run with partial credentials.
//!
//! Secret values are wrapped so they are zeroized on drop and redacted in
//! `Debug`/`Display` output. Nothing in this crate logs a secret value.

use std::collections::HashMap;
use std::env;
use std::fmt;

use zeroize::Zeroizing;

use crate::error::ConfigError;

/// The fixed set of secrets the gateway requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecretName {
    /// Bearer token for the outbound API
    ApiKey,
    /// Password for the managed database deployment
    DatabasePassword,
    /// Object-storage access key id
    CloudAccessKey,
    /// Object-storage secret access key
    CloudSecretKey,
    /// SMTP login password
    MailPassword,
    /// Base64-encoded 256-bit field-encryption key
    EncryptionKey,
    /// Shared secret for webhook HMAC signatures
    WebhookSecret,
}

impl SecretName {
    /// Every secret the gateway requires at startup.
    pub const ALL: [SecretName; 7] = [
        SecretName::ApiKey,
        SecretName::DatabasePassword,
        SecretName::CloudAccessKey,
        SecretName::CloudSecretKey,
        SecretName::MailPassword,
        SecretName::EncryptionKey,
        SecretName::WebhookSecret,
    ];

    /// The environment variable this secret is resolved from.
    pub fn env_var(&self) -> &'static str {
        match self {
            SecretName::ApiKey => "API_KEY",
            SecretName::DatabasePassword => "DATABASE_PASSWORD",
            SecretName::CloudAccessKey => "AWS_ACCESS_KEY",
            SecretName::CloudSecretKey => "AWS_SECRET_KEY",
            SecretName::MailPassword => "SMTP_PASSWORD",
            SecretName::EncryptionKey => "ENCRYPTION_KEY",
            SecretName::WebhookSecret => "WEBHOOK_SECRET",
        }
    }
}

impl fmt::Display for SecretName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.env_var())
    }
}

/// An opaque secret value. Zeroized on drop, redacted in debug output.
#[derive(Clone)]
pub struct SecretValue(Zeroizing<String>);

impl SecretValue {
    fn new(value: String) -> Self {
        Self(Zeroizing::new(value))
    }

    /// Access the underlying value. Callers must not log the result.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretValue([redacted])")
    }
}

/// Immutable set of resolved secrets, constructed once at startup and passed
/// into each component's constructor. Components never read ambient global
/// state for credentials.
pub struct Secrets {
    values: HashMap<SecretName, SecretValue>,
}

impl Secrets {
    /// Resolve every required secret from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSecrets`] naming each variable that is
    /// absent or empty. This is fatal by design.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut values = HashMap::with_capacity(SecretName::ALL.len());
        let mut missing = Vec::new();

        for name in SecretName::ALL {
            match env::var(name.env_var()) {
                Ok(value) if !value.is_empty() => {
                    values.insert(name, SecretValue::new(value));
                }
                _ => missing.push(name.env_var()),
            }
        }

        if !missing.is_empty() {
            return Err(ConfigError::MissingSecrets(missing.join(", ")));
        }

        tracing::info!(count = values.len(), "required secrets resolved");
        Ok(Self { values })
    }

    /// Build the set from explicit values (dependency injection for tests
    /// and embedders). The same completeness rule applies as for
    /// [`Secrets::from_env`].
    pub fn from_values(values: HashMap<SecretName, String>) -> Result<Self, ConfigError> {
        let missing: Vec<&str> = SecretName::ALL
            .iter()
            .filter(|name| values.get(name).map_or(true, |v| v.is_empty()))
            .map(|name| name.env_var())
            .collect();

        if !missing.is_empty() {
            return Err(ConfigError::MissingSecrets(missing.join(", ")));
        }

        Ok(Self {
            values: values
                .into_iter()
                .map(|(name, value)| (name, SecretValue::new(value)))
                .collect(),
        })
    }

    /// Read-only lookup by name.
    ///
    /// Cannot fail for members of [`SecretName::ALL`] once construction has
    /// succeeded; the error kind exists for completeness of the contract.
    pub fn get(&self, name: SecretName) -> Result<&SecretValue, ConfigError> {
        self.values
            .get(&name)
            .ok_or(ConfigError::SecretNotFound(name.env_var()))
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("count", &self.values.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_map() -> HashMap<SecretName, String> {
        SecretName::ALL
            .iter()
            .map(|name| (*name, format!("value-for-{}", name.env_var())))
            .collect()
    }

    #[test]
    fn test_from_values_complete_set() {
        let secrets = Secrets::from_values(full_map()).unwrap();
        assert_eq!(
            secrets.get(SecretName::WebhookSecret).unwrap().expose(),
            "value-for-WEBHOOK_SECRET"
        );
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        let mut map = full_map();
        map.remove(&SecretName::ApiKey);

        let err = Secrets::from_values(map).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecrets(_)));
        assert!(err.to_string().contains("API_KEY"));
    }

    #[test]
    fn test_empty_secret_counts_as_missing() {
        let mut map = full_map();
        map.insert(SecretName::MailPassword, String::new());

        let err = Secrets::from_values(map).unwrap_err();
        assert!(err.to_string().contains("SMTP_PASSWORD"));
    }

    #[test]
    fn test_debug_output_is_redacted() {
        let secrets = Secrets::from_values(full_map()).unwrap();
        let value = secrets.get(SecretName::ApiKey).unwrap();

        assert_eq!(format!("{value:?}"), "SecretValue([redacted])");
        assert!(!format!("{secrets:?}").contains("value-for"));
    }
}
