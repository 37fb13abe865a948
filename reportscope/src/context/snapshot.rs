//! Immutable scope snapshots taken at capture time.

use super::{Breadcrumb, UserIdentity};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An immutable copy of a scope's accumulated context.
///
/// Snapshots are what the client embeds in outgoing events; mutating the
/// originating scope afterwards has no effect on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ScopeSnapshot {
    /// Tags at capture time.
    #[serde(default)]
    pub tags: HashMap<String, String>,

    /// User at capture time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserIdentity>,

    /// Breadcrumbs, oldest first.
    #[serde(default)]
    pub breadcrumbs: Vec<Breadcrumb>,
}

impl ScopeSnapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a tag value.
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Returns the breadcrumb messages in order.
    #[must_use]
    pub fn breadcrumb_messages(&self) -> Vec<&str> {
        self.breadcrumbs.iter().map(|b| b.message.as_str()).collect()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.user.is_none() && self.breadcrumbs.is_empty()
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();

        map.insert(
            "tags".to_string(),
            serde_json::to_value(&self.tags).unwrap_or_default(),
        );
        map.insert(
            "user".to_string(),
            self.user
                .as_ref()
                .map_or(serde_json::Value::Null, |u| serde_json::to_value(u).unwrap_or_default()),
        );
        map.insert(
            "breadcrumbs".to_string(),
            serde_json::to_value(&self.breadcrumbs).unwrap_or_default(),
        );

        map
    }
}
