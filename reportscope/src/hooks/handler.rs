//! Handler classification supplied by the host router.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the host resolved the handler for a unit of work.
///
/// The router classifies the handler once; the hooks only format it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HandlerInfo {
    /// A standalone handler type with a single entry point.
    Direct {
        /// Fully qualified handler type name.
        class: String,
    },
    /// A method on a controller resolved at dispatch time.
    Dynamic {
        /// Fully qualified owning controller name.
        owner: String,
        /// Method name on the owner.
        method: String,
    },
}

impl HandlerInfo {
    /// Creates a direct handler.
    #[must_use]
    pub fn direct(class: impl Into<String>) -> Self {
        Self::Direct {
            class: class.into(),
        }
    }

    /// Creates a dynamically bound handler.
    #[must_use]
    pub fn dynamic(owner: impl Into<String>, method: impl Into<String>) -> Self {
        Self::Dynamic {
            owner: owner.into(),
            method: method.into(),
        }
    }

    /// Returns the handler signature shown in breadcrumbs.
    ///
    /// `Direct` handlers render as `Class::run()`, `Dynamic` ones as
    /// `Owner::method()`.
    #[must_use]
    pub fn signature(&self) -> String {
        match self {
            Self::Direct { class } => format!("{class}::run()"),
            Self::Dynamic { owner, method } => format!("{owner}::{method}()"),
        }
    }
}

impl fmt::Display for HandlerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature())
    }
}

/// What the host is about to dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchInfo {
    /// Stable identifier of the work unit, e.g. `site/index`.
    pub route: String,
    /// The resolved handler.
    pub handler: HandlerInfo,
}

impl DispatchInfo {
    /// Creates dispatch info.
    #[must_use]
    pub fn new(route: impl Into<String>, handler: HandlerInfo) -> Self {
        Self {
            route: route.into(),
            handler,
        }
    }
}
