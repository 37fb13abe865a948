//! Breadcrumbs: the chronological trail attached to captured events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Severity level shared by breadcrumbs and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Diagnostic detail.
    Debug,
    /// Normal operation.
    #[default]
    Info,
    /// Something unexpected but recoverable.
    Warning,
    /// A failure.
    Error,
    /// A failure that takes the unit of work down.
    Critical,
}

impl Level {
    /// Returns the lowercase name of the level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of activity a breadcrumb records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BreadcrumbCategory {
    /// Generic entry.
    #[default]
    Default,
    /// Route change / handler dispatch.
    Navigation,
    /// Outgoing or incoming HTTP call.
    Http,
    /// Database query.
    Query,
    /// User interaction.
    User,
    /// An error that was handled.
    Error,
}

/// An immutable trail entry.
///
/// Breadcrumbs are built once and then only read; the timestamp is taken at
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breadcrumb {
    /// Severity.
    pub level: Level,
    /// Activity kind.
    pub category: BreadcrumbCategory,
    /// Free-form sub-category, e.g. `"route"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// Human-readable message.
    pub message: String,
    /// Scalar metadata.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
    /// When the breadcrumb was recorded.
    pub timestamp: DateTime<Utc>,
}

impl Breadcrumb {
    /// Creates a breadcrumb stamped with the current time.
    #[must_use]
    pub fn new(level: Level, category: BreadcrumbCategory, message: impl Into<String>) -> Self {
        Self {
            level,
            category,
            origin: None,
            message: message.into(),
            metadata: HashMap::new(),
            timestamp: Utc::now(),
        }
    }

    /// Creates an info-level navigation breadcrumb.
    #[must_use]
    pub fn navigation(message: impl Into<String>) -> Self {
        Self::new(Level::Info, BreadcrumbCategory::Navigation, message)
    }

    /// Sets the origin sub-category.
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Adds a metadata entry.
    ///
    /// Non-scalar values (arrays, objects) are stored as their JSON text so
    /// the metadata map stays flat.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        let value = match value {
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                serde_json::Value::String(value.to_string())
            }
            scalar => scalar,
        };
        self.metadata.insert(key.into(), value);
        self
    }

    /// Overrides the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}
