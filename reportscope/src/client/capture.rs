//! The reporting client: merges scope context into events and hands them
//! to the transport.

use super::integration::default_integrations;
use super::{ClientOptions, Dsn, Event, Integration, NoOpTransport, Transport};
use crate::context::{ContextScope, Level};
use crate::errors::Result;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Callback run on every event after integrations; `None` drops the event.
pub type BeforeSendFn = dyn Fn(Event) -> Option<Event> + Send + Sync;

/// Builds a [`Client`].
pub struct ClientBuilder {
    options: ClientOptions,
    transport: Arc<dyn Transport>,
    integrations: Vec<Arc<dyn Integration>>,
    before_send: Option<Arc<BeforeSendFn>>,
}

impl ClientBuilder {
    /// Starts a builder from options.
    #[must_use]
    pub fn new(options: ClientOptions) -> Self {
        Self {
            options,
            transport: Arc::new(NoOpTransport),
            integrations: Vec::new(),
            before_send: None,
        }
    }

    /// Sets the transport.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// Adds an integration. Integrations run in insertion order, after the
    /// built-in ones.
    #[must_use]
    pub fn integration(mut self, integration: Arc<dyn Integration>) -> Self {
        self.integrations.push(integration);
        self
    }

    /// Sets the `before_send` callback.
    #[must_use]
    pub fn before_send<F>(mut self, f: F) -> Self
    where
        F: Fn(Event) -> Option<Event> + Send + Sync + 'static,
    {
        self.before_send = Some(Arc::new(f));
        self
    }

    /// Validates the options and builds the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the DSN is malformed or an option is out of range.
    pub fn build(self) -> Result<Client> {
        self.options.validate()?;

        let dsn = match self.options.dsn.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(raw.parse::<Dsn>()?),
            _ => None,
        };

        let mut integrations = if self.options.default_integrations {
            default_integrations()
        } else {
            Vec::new()
        };
        integrations.extend(self.integrations);

        if dsn.is_none() {
            tracing::info!("no DSN configured; error reporting is disabled");
        }

        Ok(Client {
            options: self.options,
            dsn,
            transport: self.transport,
            integrations,
            before_send: self.before_send,
        })
    }
}

/// Captures events enriched with scope context.
pub struct Client {
    options: ClientOptions,
    dsn: Option<Dsn>,
    transport: Arc<dyn Transport>,
    integrations: Vec<Arc<dyn Integration>>,
    before_send: Option<Arc<BeforeSendFn>>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("dsn", &self.dsn.as_ref().map(Dsn::host))
            .field("environment", &self.options.environment)
            .field(
                "integrations",
                &self.integrations.iter().map(|i| i.name()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Starts a builder.
    #[must_use]
    pub fn builder(options: ClientOptions) -> ClientBuilder {
        ClientBuilder::new(options)
    }

    /// Returns the options.
    #[must_use]
    pub const fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Returns the parsed DSN.
    #[must_use]
    pub const fn dsn(&self) -> Option<&Dsn> {
        self.dsn.as_ref()
    }

    /// Returns true if a DSN is configured.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.dsn.is_some()
    }

    /// Captures an event with the context of `scope`.
    ///
    /// The scope is snapshotted at call time. Returns the event ID if the
    /// event was handed to the transport.
    pub fn capture_event(&self, event: Event, scope: Option<&ContextScope>) -> Option<Uuid> {
        if !self.is_enabled() {
            return None;
        }

        if !self.sample() {
            self.log_drop(&event, "sampled out");
            return None;
        }

        let event = self.prepare_event(event, scope)?;
        let event_id = event.event_id;
        if self.options.debug {
            tracing::debug!(%event_id, level = %event.level, "sending event");
        }
        self.transport.try_send(event);
        Some(event_id)
    }

    /// Captures a message.
    pub fn capture_message(
        &self,
        message: impl Into<String>,
        level: Level,
        scope: Option<&ContextScope>,
    ) -> Option<Uuid> {
        self.capture_event(Event::message(message, level), scope)
    }

    /// Captures an error and its source chain.
    pub fn capture_error<E: std::error::Error + ?Sized>(
        &self,
        err: &E,
        scope: Option<&ContextScope>,
    ) -> Option<Uuid> {
        self.capture_event(Event::from_error(err), scope)
    }

    /// Applies scope context, options and processors to an event.
    ///
    /// Returns `None` if an integration or `before_send` dropped it.
    pub fn prepare_event(&self, mut event: Event, scope: Option<&ContextScope>) -> Option<Event> {
        if let Some(scope) = scope {
            event.apply_snapshot(scope.snapshot(), self.options.max_breadcrumbs);
        } else {
            let overflow = event.breadcrumbs.len().saturating_sub(self.options.max_breadcrumbs);
            event.breadcrumbs.drain(..overflow);
        }

        if event.environment.is_none() {
            event.environment = Some(self.options.environment.clone());
        }
        if event.release.is_none() {
            event.release.clone_from(&self.options.release);
        }
        if event.server_name.is_none() {
            event.server_name.clone_from(&self.options.server_name);
        }

        if !self.options.send_default_pii {
            event.user = event.user.map(|u| u.without_pii());
        }

        for frame in event.frames_mut() {
            if let Some(abs_path) = frame.abs_path.as_deref() {
                if frame.in_app.is_none() {
                    frame.in_app = self.options.is_in_app(abs_path);
                }
                if frame.filename.is_none() {
                    frame.filename = Some(self.options.strip_path(abs_path).to_string());
                }
            }
        }

        for integration in &self.integrations {
            let event_id = event.event_id;
            match integration.process_event(event, &self.options) {
                Some(processed) => event = processed,
                None => {
                    tracing::debug!(%event_id, integration = integration.name(), "event dropped by integration");
                    return None;
                }
            }
        }

        if let Some(before_send) = &self.before_send {
            let event_id = event.event_id;
            let Some(processed) = before_send(event) else {
                tracing::debug!(%event_id, "event dropped by before_send");
                return None;
            };
            event = processed;
        }

        Some(event)
    }

    fn sample(&self) -> bool {
        let rate = self.options.sample_rate;
        if rate >= 1.0 {
            return true;
        }
        if rate <= 0.0 {
            return false;
        }
        rand::random::<f32>() < rate
    }

    fn log_drop(&self, event: &Event, reason: &str) {
        if self.options.debug {
            tracing::debug!(event_id = %event.event_id, reason, "event not sent");
        }
    }
}
