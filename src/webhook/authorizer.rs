//! Authorization policy
//!
//! Whether a requester may perform an action is decided by a pluggable
//! policy, consulted exactly once per event. The gateway ships deny-by-
//! default: the upstream permission system is not modelled here, and with
//! no explicit policy every request is refused rather than silently
//! permitted.

use std::collections::HashSet;

use crate::webhook::events::WebhookAction;

/// Decides whether `requester_id` may perform `action`.
///
/// Implementations must be cheap and side-effect free; the decision is
/// consulted once per event and never persisted.
pub trait AuthorizationPolicy: Send + Sync {
    /// Returns `true` if the requester may perform the action.
    fn authorize(&self, requester_id: i64, action: WebhookAction) -> bool;
}

/// Refuses every request. The default when no policy is configured.
pub struct DenyAll;

impl AuthorizationPolicy for DenyAll {
    fn authorize(&self, _requester_id: i64, _action: WebhookAction) -> bool {
        false
    }
}

/// Permits a fixed set of requester ids, any action.
pub struct AllowedRequesters {
    ids: HashSet<i64>,
}

impl AllowedRequesters {
    /// Build a policy permitting exactly the given requesters.
    pub fn new(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }
}

impl AuthorizationPolicy for AllowedRequesters {
    fn authorize(&self, requester_id: i64, _action: WebhookAction) -> bool {
        self.ids.contains(&requester_id)
    }
}
