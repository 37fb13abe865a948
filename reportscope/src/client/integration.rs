//! Event processors plugged into the client.

use super::{ClientOptions, Event};
use std::sync::Arc;

/// Processes events before they reach the transport.
pub trait Integration: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Returns the (possibly modified) event, or `None` to drop it.
    fn process_event(&self, event: Event, options: &ClientOptions) -> Option<Event>;
}

/// Adds `os` and `runtime` contexts describing the process.
#[derive(Debug, Clone, Copy)]
pub struct ContextsIntegration {
    /// Add the `os` context.
    pub add_os: bool,
    /// Add the `runtime` context.
    pub add_runtime: bool,
}

impl Default for ContextsIntegration {
    fn default() -> Self {
        Self {
            add_os: true,
            add_runtime: true,
        }
    }
}

impl Integration for ContextsIntegration {
    fn name(&self) -> &'static str {
        "contexts"
    }

    fn process_event(&self, mut event: Event, _options: &ClientOptions) -> Option<Event> {
        if self.add_os {
            event.contexts.entry("os".to_string()).or_insert_with(|| {
                serde_json::json!({
                    "name": std::env::consts::OS,
                    "family": std::env::consts::FAMILY,
                    "arch": std::env::consts::ARCH,
                })
            });
        }
        if self.add_runtime {
            event.contexts.entry("runtime".to_string()).or_insert_with(|| {
                serde_json::json!({
                    "name": "rust",
                    "sdk_version": super::event::SDK_VERSION,
                })
            });
        }
        Some(event)
    }
}

/// The integrations enabled by `default_integrations`.
#[must_use]
pub fn default_integrations() -> Vec<Arc<dyn Integration>> {
    vec![Arc::new(ContextsIntegration::default())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contexts_integration_adds_contexts() {
        let event = ContextsIntegration::default()
            .process_event(Event::new(), &ClientOptions::default())
            .unwrap();

        assert_eq!(event.contexts["os"]["name"], std::env::consts::OS);
        assert_eq!(event.contexts["runtime"]["name"], "rust");
    }

    #[test]
    fn test_contexts_integration_keeps_existing() {
        let mut event = Event::new();
        event
            .contexts
            .insert("os".to_string(), serde_json::json!({"name": "custom"}));

        let event = ContextsIntegration {
            add_os: true,
            add_runtime: false,
        }
        .process_event(event, &ClientOptions::default())
        .unwrap();

        assert_eq!(event.contexts["os"]["name"], "custom");
        assert!(!event.contexts.contains_key("runtime"));
    }

    #[test]
    fn test_default_integrations_list() {
        let names: Vec<_> = default_integrations().iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["contexts"]);
    }
}
