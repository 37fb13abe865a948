//! Default tags computed once at reporter initialization.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tag holding the host framework version.
pub const PLATFORM_VERSION_TAG: &str = "platform_version";
/// Tag holding the active locale.
pub const LANGUAGE_TAG: &str = "language";
/// Value used when a default tag source is unavailable.
pub const UNKNOWN: &str = "unknown";

const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// Facts about the host application used to seed every scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HostInfo {
    /// Host framework version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework_version: Option<String>,
    /// Active locale, e.g. `en-US`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl HostInfo {
    /// Creates empty host info.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Detects the locale from the process environment.
    ///
    /// The framework version cannot be discovered from inside this crate, so
    /// hosts pass their own (typically `env!("CARGO_PKG_VERSION")`).
    #[must_use]
    pub fn detect(framework_version: Option<&str>) -> Self {
        Self::detect_from(framework_version, |key| std::env::var(key).ok())
    }

    /// Detection with an injectable environment lookup.
    #[must_use]
    pub fn detect_from<F>(framework_version: Option<&str>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let locale = LOCALE_VARS
            .iter()
            .filter_map(|key| lookup(key))
            .find_map(|raw| normalize_locale(&raw));

        Self {
            framework_version: framework_version.map(str::to_string),
            locale,
        }
    }

    /// Sets the framework version.
    #[must_use]
    pub fn with_framework_version(mut self, version: impl Into<String>) -> Self {
        self.framework_version = Some(version.into());
        self
    }

    /// Sets the locale.
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Computes the default tag set, substituting `"unknown"` for anything
    /// missing or blank.
    #[must_use]
    pub fn default_tags(&self) -> HashMap<String, String> {
        HashMap::from([
            (
                PLATFORM_VERSION_TAG.to_string(),
                or_unknown(self.framework_version.as_deref()),
            ),
            (LANGUAGE_TAG.to_string(), or_unknown(self.locale.as_deref())),
        ])
    }
}

fn or_unknown(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(UNKNOWN)
        .to_string()
}

/// Turns `en_US.UTF-8` into `en-US`; `C` and `POSIX` carry no language.
fn normalize_locale(raw: &str) -> Option<String> {
    let base = raw.split(['.', '@']).next().unwrap_or_default().trim();
    if base.is_empty() || base == "C" || base == "POSIX" {
        return None;
    }
    Some(base.replace('_', "-"))
}
