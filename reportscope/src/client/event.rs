//! Event payloads handed to the transport.

use crate::context::{Breadcrumb, Level, ScopeSnapshot, UserIdentity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// SDK name reported with every event.
pub const SDK_NAME: &str = "reportscope.rust";
/// SDK version reported with every event.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Identifies the reporting library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkInfo {
    /// Library name.
    pub name: String,
    /// Library version.
    pub version: String,
}

impl Default for SdkInfo {
    fn default() -> Self {
        Self {
            name: SDK_NAME.to_string(),
            version: SDK_VERSION.to_string(),
        }
    }
}

/// One stack frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Frame {
    /// Function name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    /// Absolute source path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abs_path: Option<String>,
    /// Path relative to the application root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Line number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lineno: Option<u32>,
    /// Whether the frame belongs to application code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_app: Option<bool>,
}

impl Frame {
    /// Creates a frame for a source location.
    #[must_use]
    pub fn new(function: impl Into<String>, abs_path: impl Into<String>, lineno: u32) -> Self {
        Self {
            function: Some(function.into()),
            abs_path: Some(abs_path.into()),
            lineno: Some(lineno),
            ..Default::default()
        }
    }
}

/// One error in an error chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionValue {
    /// Short type name.
    #[serde(rename = "type")]
    pub ty: String,
    /// Display message.
    pub value: String,
    /// Frames, outermost call last.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<Frame>,
}

impl ExceptionValue {
    /// Creates an exception value.
    #[must_use]
    pub fn new(ty: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            value: value.into(),
            frames: Vec::new(),
        }
    }

    /// Sets the frames.
    #[must_use]
    pub fn with_frames(mut self, frames: Vec<Frame>) -> Self {
        self.frames = frames;
        self
    }
}

/// A captured event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique event ID.
    pub event_id: Uuid,
    /// When the event was created.
    pub timestamp: DateTime<Utc>,
    /// Severity.
    pub level: Level,
    /// Message, for message events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Error chain, root cause first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exception: Vec<ExceptionValue>,
    /// Environment label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    /// Release identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
    /// Server name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,
    /// Tags.
    #[serde(default)]
    pub tags: HashMap<String, String>,
    /// User.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserIdentity>,
    /// Breadcrumbs, oldest first.
    #[serde(default)]
    pub breadcrumbs: Vec<Breadcrumb>,
    /// Structured contexts added by integrations.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub contexts: HashMap<String, serde_json::Value>,
    /// Reporting library.
    #[serde(default)]
    pub sdk: SdkInfo,
    /// Source platform.
    pub platform: String,
}

impl Default for Event {
    fn default() -> Self {
        Self {
            event_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            level: Level::Error,
            message: None,
            exception: Vec::new(),
            environment: None,
            release: None,
            server_name: None,
            tags: HashMap::new(),
            user: None,
            breadcrumbs: Vec::new(),
            contexts: HashMap::new(),
            sdk: SdkInfo::default(),
            platform: "rust".to_string(),
        }
    }
}

impl Event {
    /// Creates an empty error-level event.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a message event.
    #[must_use]
    pub fn message(message: impl Into<String>, level: Level) -> Self {
        Self {
            message: Some(message.into()),
            level,
            ..Self::default()
        }
    }

    /// Creates an error event from an error and its `source()` chain.
    #[must_use]
    pub fn from_error<E: std::error::Error + ?Sized>(err: &E) -> Self {
        let mut chain = vec![ExceptionValue::new(
            short_type_name(std::any::type_name::<E>()),
            err.to_string(),
        )];

        let mut source = err.source();
        while let Some(inner) = source {
            chain.push(ExceptionValue::new(
                type_name_from_debug(inner),
                inner.to_string(),
            ));
            source = inner.source();
        }
        chain.reverse();

        Self {
            exception: chain,
            level: Level::Error,
            ..Self::default()
        }
    }

    /// Sets the level.
    #[must_use]
    pub const fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Adds an event-specific tag.
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Sets an event-specific user.
    #[must_use]
    pub fn with_user(mut self, user: UserIdentity) -> Self {
        self.user = Some(user);
        self
    }

    /// Merges a scope snapshot.
    ///
    /// Values already on the event win; scope breadcrumbs precede the
    /// event's own, and only the newest `max_breadcrumbs` are kept.
    pub fn apply_snapshot(&mut self, snapshot: ScopeSnapshot, max_breadcrumbs: usize) {
        for (key, value) in snapshot.tags {
            self.tags.entry(key).or_insert(value);
        }
        if self.user.is_none() {
            self.user = snapshot.user;
        }

        let mut breadcrumbs = snapshot.breadcrumbs;
        breadcrumbs.append(&mut self.breadcrumbs);
        let overflow = breadcrumbs.len().saturating_sub(max_breadcrumbs);
        breadcrumbs.drain(..overflow);
        self.breadcrumbs = breadcrumbs;
    }

    /// Iterates over every frame of every exception.
    pub fn frames_mut(&mut self) -> impl Iterator<Item = &mut Frame> {
        self.exception.iter_mut().flat_map(|e| e.frames.iter_mut())
    }
}

fn short_type_name(full: &str) -> String {
    let base = full.split('<').next().unwrap_or(full);
    let base = base.trim_start_matches("dyn ").trim_start_matches('&');
    base.rsplit("::").next().unwrap_or(base).trim().to_string()
}

/// Best-effort type name for a `dyn Error` source, taken from its `Debug`
/// output (`Kind { .. }`, `Kind(..)` or a bare identifier).
fn type_name_from_debug(err: &(dyn std::error::Error + 'static)) -> String {
    let debug = format!("{err:?}");
    let name: String = debug
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    if name.is_empty() {
        "Error".to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("database unreachable")]
    struct DbError;

    #[derive(Debug, Error)]
    #[error("request failed")]
    struct RequestError {
        #[source]
        cause: DbError,
    }

    #[test]
    fn test_from_error_walks_chain() {
        let err = RequestError { cause: DbError };
        let event = Event::from_error(&err);

        assert_eq!(event.level, Level::Error);
        assert_eq!(event.exception.len(), 2);
        assert_eq!(event.exception[0].ty, "DbError");
        assert_eq!(event.exception[0].value, "database unreachable");
        assert_eq!(event.exception[1].ty, "RequestError");
        assert_eq!(event.exception[1].value, "request failed");
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("my_crate::errors::Boom"), "Boom");
        assert_eq!(short_type_name("dyn core::error::Error"), "Error");
        assert_eq!(short_type_name("alloc::boxed::Box<dyn Error>"), "Box");
    }

    #[test]
    fn test_apply_snapshot_event_values_win() {
        let mut snapshot = ScopeSnapshot::new();
        snapshot.tags.insert("route".to_string(), "scope".to_string());
        snapshot.tags.insert("language".to_string(), "en".to_string());
        snapshot.user = Some(UserIdentity::with_id("scope-user"));

        let mut event = Event::message("boom", Level::Warning)
            .with_tag("route", "event")
            .with_user(UserIdentity::with_id("event-user"));
        event.apply_snapshot(snapshot, 100);

        assert_eq!(event.tags["route"], "event");
        assert_eq!(event.tags["language"], "en");
        assert_eq!(event.user, Some(UserIdentity::with_id("event-user")));
    }

    #[test]
    fn test_apply_snapshot_orders_and_caps_breadcrumbs() {
        let mut snapshot = ScopeSnapshot::new();
        snapshot.breadcrumbs = vec![
            Breadcrumb::navigation("s1"),
            Breadcrumb::navigation("s2"),
        ];

        let mut event = Event::new();
        event.breadcrumbs.push(Breadcrumb::navigation("e1"));
        event.apply_snapshot(snapshot, 2);

        let messages: Vec<_> = event.breadcrumbs.iter().map(|b| b.message.as_str()).collect();
        assert_eq!(messages, vec!["s2", "e1"]);
    }

    #[test]
    fn test_event_serialization() {
        let event = Event::message("hello", Level::Info);
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["level"], "info");
        assert_eq!(json["platform"], "rust");
        assert_eq!(json["sdk"]["name"], SDK_NAME);
        assert!(json.get("exception").is_none());
    }
}
