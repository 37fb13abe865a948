//! Client configuration.
//!
//! [`ClientOptions`] carries every setting with its default. Partial
//! configuration from the environment or a JSON file arrives as
//! [`OptionsOverrides`] and is merged field by field, overrides winning.

use crate::context::DEFAULT_MAX_BREADCRUMBS;
use crate::errors::{ReportScopeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "REPORTSCOPE_";

/// Which component owns uncaught-error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ErrorAuthority {
    /// The host framework's error handler reports; nothing global is installed.
    #[default]
    Host,
    /// The reporter installs a panic hook and reports panics itself.
    Client,
}

/// Configuration for the reporting client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientOptions {
    /// Collector DSN. Without one the client is disabled and captures nothing.
    #[serde(default)]
    pub dsn: Option<String>,

    /// Environment label attached to every event.
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Release identifier attached to every event.
    #[serde(default)]
    pub release: Option<String>,

    /// Server name attached to every event.
    #[serde(default)]
    pub server_name: Option<String>,

    /// Path prefixes considered application code.
    #[serde(default)]
    pub in_app_include: Vec<String>,

    /// Path prefixes considered vendored code. Checked before includes.
    #[serde(default)]
    pub in_app_exclude: Vec<String>,

    /// Prefixes stripped from frame paths to produce relative filenames.
    #[serde(default)]
    pub strip_prefixes: Vec<String>,

    /// Breadcrumbs retained per scope and per event.
    #[serde(default = "default_max_breadcrumbs")]
    pub max_breadcrumbs: usize,

    /// Fraction of events sent, within `0.0..=1.0`.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: f32,

    /// Whether user fields beyond the ID may be sent.
    #[serde(default)]
    pub send_default_pii: bool,

    /// Whether built-in integrations are enabled.
    #[serde(default)]
    pub default_integrations: bool,

    /// Who reports uncaught errors.
    #[serde(default)]
    pub error_authority: ErrorAuthority,

    /// Log capture decisions at debug level.
    #[serde(default)]
    pub debug: bool,
}

fn default_environment() -> String {
    "production".to_string()
}

fn default_max_breadcrumbs() -> usize {
    DEFAULT_MAX_BREADCRUMBS
}

fn default_sample_rate() -> f32 {
    1.0
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            dsn: None,
            environment: default_environment(),
            release: None,
            server_name: None,
            in_app_include: Vec::new(),
            in_app_exclude: Vec::new(),
            strip_prefixes: Vec::new(),
            max_breadcrumbs: default_max_breadcrumbs(),
            sample_rate: default_sample_rate(),
            send_default_pii: false,
            default_integrations: false,
            error_authority: ErrorAuthority::default(),
            debug: false,
        }
    }
}

impl ClientOptions {
    /// Creates options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the DSN.
    #[must_use]
    pub fn with_dsn(mut self, dsn: impl Into<String>) -> Self {
        self.dsn = Some(dsn.into());
        self
    }

    /// Sets the environment label.
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Sets the release.
    #[must_use]
    pub fn with_release(mut self, release: impl Into<String>) -> Self {
        self.release = Some(release.into());
        self
    }

    /// Treats an application base path as in-app.
    ///
    /// The directory becomes an include and strip prefix, and its `vendor/`
    /// subdirectory an exclude. Sibling paths sharing the name as a prefix
    /// are not matched.
    #[must_use]
    pub fn with_app_base_path(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        let base = base.trim_end_matches('/');
        self.in_app_include.push(format!("{base}/"));
        self.in_app_exclude.push(format!("{base}/vendor/"));
        self.strip_prefixes.push(format!("{base}/"));
        self
    }

    /// Adds an in-app include prefix.
    #[must_use]
    pub fn with_in_app_include(mut self, prefix: impl Into<String>) -> Self {
        self.in_app_include.push(prefix.into());
        self
    }

    /// Adds an in-app exclude prefix.
    #[must_use]
    pub fn with_in_app_exclude(mut self, prefix: impl Into<String>) -> Self {
        self.in_app_exclude.push(prefix.into());
        self
    }

    /// Sets the breadcrumb capacity.
    #[must_use]
    pub fn with_max_breadcrumbs(mut self, max: usize) -> Self {
        self.max_breadcrumbs = max;
        self
    }

    /// Sets the sample rate.
    #[must_use]
    pub fn with_sample_rate(mut self, rate: f32) -> Self {
        self.sample_rate = rate;
        self
    }

    /// Enables or disables built-in integrations.
    #[must_use]
    pub fn with_default_integrations(mut self, enabled: bool) -> Self {
        self.default_integrations = enabled;
        self
    }

    /// Sets who reports uncaught errors.
    #[must_use]
    pub fn with_error_authority(mut self, authority: ErrorAuthority) -> Self {
        self.error_authority = authority;
        self
    }

    /// Allows sending user fields beyond the ID.
    #[must_use]
    pub fn with_send_default_pii(mut self, enabled: bool) -> Self {
        self.send_default_pii = enabled;
        self
    }

    /// Applies overrides field by field.
    #[must_use]
    pub fn merge(mut self, overrides: OptionsOverrides) -> Self {
        if let Some(dsn) = overrides.dsn {
            self.dsn = Some(dsn);
        }
        if let Some(environment) = overrides.environment {
            self.environment = environment;
        }
        if let Some(release) = overrides.release {
            self.release = Some(release);
        }
        if let Some(server_name) = overrides.server_name {
            self.server_name = Some(server_name);
        }
        if let Some(include) = overrides.in_app_include {
            self.in_app_include = include;
        }
        if let Some(exclude) = overrides.in_app_exclude {
            self.in_app_exclude = exclude;
        }
        if let Some(prefixes) = overrides.strip_prefixes {
            self.strip_prefixes = prefixes;
        }
        if let Some(max) = overrides.max_breadcrumbs {
            self.max_breadcrumbs = max;
        }
        if let Some(rate) = overrides.sample_rate {
            self.sample_rate = rate;
        }
        if let Some(pii) = overrides.send_default_pii {
            self.send_default_pii = pii;
        }
        if let Some(enabled) = overrides.default_integrations {
            self.default_integrations = enabled;
        }
        if let Some(authority) = overrides.error_authority {
            self.error_authority = authority;
        }
        if let Some(debug) = overrides.debug {
            self.debug = debug;
        }
        self
    }

    /// Loads complete options from a JSON file; absent fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Checks values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.sample_rate) {
            return Err(ReportScopeError::invalid_option(
                "sample_rate",
                format!("{} is outside 0.0..=1.0", self.sample_rate),
            ));
        }
        if self.environment.trim().is_empty() {
            return Err(ReportScopeError::invalid_option(
                "environment",
                "must not be empty",
            ));
        }
        Ok(())
    }

    /// Classifies a source path.
    ///
    /// Excludes win over includes; paths matching neither stay unclassified.
    #[must_use]
    pub fn is_in_app(&self, path: &str) -> Option<bool> {
        if self.in_app_exclude.iter().any(|p| path.starts_with(p.as_str())) {
            return Some(false);
        }
        if self.in_app_include.iter().any(|p| path.starts_with(p.as_str())) {
            return Some(true);
        }
        None
    }

    /// Strips the first matching prefix from a path.
    #[must_use]
    pub fn strip_path<'a>(&self, path: &'a str) -> &'a str {
        self.strip_prefixes
            .iter()
            .find_map(|p| path.strip_prefix(p.as_str()))
            .unwrap_or(path)
    }
}

/// Partial options; `None` leaves the base value untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OptionsOverrides {
    /// See [`ClientOptions::dsn`].
    pub dsn: Option<String>,
    /// See [`ClientOptions::environment`].
    pub environment: Option<String>,
    /// See [`ClientOptions::release`].
    pub release: Option<String>,
    /// See [`ClientOptions::server_name`].
    pub server_name: Option<String>,
    /// See [`ClientOptions::in_app_include`].
    pub in_app_include: Option<Vec<String>>,
    /// See [`ClientOptions::in_app_exclude`].
    pub in_app_exclude: Option<Vec<String>>,
    /// See [`ClientOptions::strip_prefixes`].
    pub strip_prefixes: Option<Vec<String>>,
    /// See [`ClientOptions::max_breadcrumbs`].
    pub max_breadcrumbs: Option<usize>,
    /// See [`ClientOptions::sample_rate`].
    pub sample_rate: Option<f32>,
    /// See [`ClientOptions::send_default_pii`].
    pub send_default_pii: Option<bool>,
    /// See [`ClientOptions::default_integrations`].
    pub default_integrations: Option<bool>,
    /// See [`ClientOptions::error_authority`].
    pub error_authority: Option<ErrorAuthority>,
    /// See [`ClientOptions::debug`].
    pub debug: Option<bool>,
}

impl OptionsOverrides {
    /// Creates empty overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `REPORTSCOPE_*` variables from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads overrides through an injectable lookup.
    ///
    /// Recognized keys: `DSN`, `ENVIRONMENT`, `RELEASE`, `SERVER_NAME`,
    /// `SAMPLE_RATE`, `MAX_BREADCRUMBS`, `DEBUG`, each prefixed with
    /// [`ENV_PREFIX`]. Empty values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(&format!("{ENV_PREFIX}{name}"))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let sample_rate = get("SAMPLE_RATE")
            .map(|v| {
                v.parse::<f32>()
                    .map_err(|e| ReportScopeError::invalid_option("sample_rate", e.to_string()))
            })
            .transpose()?;
        let max_breadcrumbs = get("MAX_BREADCRUMBS")
            .map(|v| {
                v.parse::<usize>()
                    .map_err(|e| ReportScopeError::invalid_option("max_breadcrumbs", e.to_string()))
            })
            .transpose()?;
        let debug = get("DEBUG").map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"));

        Ok(Self {
            dsn: get("DSN"),
            environment: get("ENVIRONMENT"),
            release: get("RELEASE"),
            server_name: get("SERVER_NAME"),
            sample_rate,
            max_breadcrumbs,
            debug,
            ..Self::default()
        })
    }

    /// Loads overrides from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
