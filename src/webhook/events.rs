//! Webhook event types
//!
//! Strongly-typed representation of the inbound webhook payload. Shape
//! validation runs here, after signature verification and before any
//! business logic touches the data.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::WebhookError;

/// The closed set of actions a webhook may request.
///
/// Anything outside this enumeration is invalid data, not an extension
/// point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookAction {
    /// Create a user record
    CreateUser,
    /// Update a user record
    UpdateUser,
    /// Delete a user record
    DeleteUser,
}

impl WebhookAction {
    /// Get the wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateUser => "create_user",
            Self::UpdateUser => "update_user",
            Self::DeleteUser => "delete_user",
        }
    }
}

impl FromStr for WebhookAction {
    type Err = WebhookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create_user" => Ok(Self::CreateUser),
            "update_user" => Ok(Self::UpdateUser),
            "delete_user" => Ok(Self::DeleteUser),
            other => Err(WebhookError::InvalidPayload(format!(
                "unknown action {other:?}"
            ))),
        }
    }
}

impl fmt::Display for WebhookAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated webhook event.
///
/// `extra` preserves any additional payload fields the sender included;
/// they take no part in validation but are relayed downstream unchanged
/// (the signature covers them).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Target user id; always positive after validation
    pub user_id: i64,
    /// Requested action
    pub action: WebhookAction,
    /// Identity of the party requesting the action. Absent or null means
    /// the request is denied before the authorization policy runs.
    #[serde(default)]
    pub requester_id: Option<i64>,
    /// Free-form additional payload fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WebhookEvent {
    /// Validate and type an already-authenticated payload.
    ///
    /// # Errors
    ///
    /// [`WebhookError::InvalidPayload`] when required fields are missing,
    /// mistyped, the action is outside the closed enumeration, or
    /// `user_id` is not a positive integer.
    pub fn from_value(payload: &Value) -> Result<Self, WebhookError> {
        let event: WebhookEvent = serde_json::from_value(payload.clone())
            .map_err(|e| WebhookError::InvalidPayload(e.to_string()))?;

        if event.user_id <= 0 {
            return Err(WebhookError::InvalidPayload(format!(
                "user_id {} is not a positive integer",
                event.user_id
            )));
        }

        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_event_parses() {
        let payload = json!({
            "user_id": 5,
            "action": "delete_user",
            "requester_id": 9,
            "note": "cleanup"
        });

        let event = WebhookEvent::from_value(&payload).unwrap();
        assert_eq!(event.user_id, 5);
        assert_eq!(event.action, WebhookAction::DeleteUser);
        assert_eq!(event.requester_id, Some(9));
        assert_eq!(event.extra.get("note"), Some(&json!("cleanup")));
    }

    #[test]
    fn test_unknown_action_rejected() {
        let payload = json!({"user_id": 5, "action": "archive_user", "requester_id": 9});
        assert!(matches!(
            WebhookEvent::from_value(&payload),
            Err(WebhookError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_nonpositive_user_id_rejected() {
        for bad in [0, -1] {
            let payload = json!({"user_id": bad, "action": "delete_user", "requester_id": 9});
            assert!(WebhookEvent::from_value(&payload).is_err());
        }
    }

    #[test]
    fn test_non_integer_user_id_rejected() {
        let payload = json!({"user_id": "5", "action": "delete_user", "requester_id": 9});
        assert!(WebhookEvent::from_value(&payload).is_err());
    }

    #[test]
    fn test_missing_action_rejected() {
        let payload = json!({"user_id": 5, "requester_id": 9});
        assert!(WebhookEvent::from_value(&payload).is_err());
    }

    #[test]
    fn test_null_requester_is_none() {
        let payload = json!({"user_id": 5, "action": "update_user", "requester_id": null});
        let event = WebhookEvent::from_value(&payload).unwrap();
        assert_eq!(event.requester_id, None);
    }

    #[test]
    fn test_action_round_trips_through_str() {
        for action in [
            WebhookAction::CreateUser,
            WebhookAction::UpdateUser,
            WebhookAction::DeleteUser,
        ] {
            assert_eq!(action.as_str().parse::<WebhookAction>().unwrap(), action);
        }
        assert!("archive_user".parse::<WebhookAction>().is_err());
    }
}
