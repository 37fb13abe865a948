//! The reporter component wired into the host at bootstrap.
//!
//! A [`Reporter`] owns the client and the default tags computed once at
//! start-up. It replaces a process-global hub: the host keeps the reporter
//! (typically in its application state) and runs every unit of work inside
//! a fresh scope with [`Reporter::run`].

use crate::client::{Client, ClientOptions, ErrorAuthority, Event, ExceptionValue, Frame, Transport};
use crate::context::{current_scope, with_scope, with_scope_sync, ContextScope, HostInfo, Level};
use crate::errors::Result;
use crate::hooks::ScopeHooks;
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::panic::Location;
use std::sync::{Arc, Once};
use uuid::Uuid;

/// Ties the client, default tags and lifecycle hooks together.
#[derive(Debug, Clone)]
pub struct Reporter {
    client: Arc<Client>,
    default_tags: HashMap<String, String>,
    hooks: ScopeHooks,
}

impl Reporter {
    /// Builds the client and computes the default tags.
    ///
    /// Installs a panic handler only when the options make the client the
    /// error authority.
    ///
    /// # Errors
    ///
    /// Returns an error if the options are invalid.
    pub fn init(options: ClientOptions, host: &HostInfo, transport: Arc<dyn Transport>) -> Result<Self> {
        let authority = options.error_authority;
        let client = Client::builder(options).transport(transport).build()?;
        let reporter = Self::from_client(Arc::new(client), host);

        tracing::info!(
            enabled = reporter.client.is_enabled(),
            environment = %reporter.client.options().environment,
            ?authority,
            "error reporting initialized"
        );

        if authority == ErrorAuthority::Client {
            reporter.install_panic_handler();
        }

        Ok(reporter)
    }

    /// Wraps an already built client. Installs nothing global.
    #[must_use]
    pub fn from_client(client: Arc<Client>, host: &HostInfo) -> Self {
        Self {
            client,
            default_tags: host.default_tags(),
            hooks: ScopeHooks::new(),
        }
    }

    /// Returns the client.
    #[must_use]
    pub const fn client(&self) -> &Arc<Client> {
        &self.client
    }

    /// Returns the default tags seeded into every scope.
    #[must_use]
    pub const fn default_tags(&self) -> &HashMap<String, String> {
        &self.default_tags
    }

    /// Returns the lifecycle hooks.
    #[must_use]
    pub const fn hooks(&self) -> &ScopeHooks {
        &self.hooks
    }

    /// Creates a fresh scope for a new unit of work.
    #[must_use]
    pub fn new_scope(&self) -> ContextScope {
        ContextScope::with_capacity(self.default_tags.clone(), self.client.options().max_breadcrumbs)
    }

    /// Runs a future as a unit of work with its own scope.
    pub async fn run<F: Future>(&self, f: F) -> F::Output {
        with_scope(Arc::new(self.new_scope()), f).await
    }

    /// Runs a closure as a unit of work with its own scope.
    pub fn run_sync<R>(&self, f: impl FnOnce() -> R) -> R {
        with_scope_sync(Arc::new(self.new_scope()), f)
    }

    /// Captures an event with the current scope.
    ///
    /// Outside a unit of work the event still carries the default tags.
    pub fn capture_event(&self, event: Event) -> Option<Uuid> {
        match current_scope() {
            Some(scope) => self.client.capture_event(event, Some(&scope)),
            None => self.client.capture_event(event, Some(&self.new_scope())),
        }
    }

    /// Captures an error with the current scope.
    pub fn capture_error<E: std::error::Error + ?Sized>(&self, err: &E) -> Option<Uuid> {
        self.capture_event(Event::from_error(err))
    }

    /// Captures a message with the current scope.
    pub fn capture_message(&self, message: impl Into<String>, level: Level) -> Option<Uuid> {
        self.capture_event(Event::message(message, level))
    }

    /// Routes panics to this reporter.
    ///
    /// The process-wide hook is installed once and chains to the hook that
    /// was set before it. Later calls only retarget it, so a panic is
    /// reported by exactly one reporter however often this runs.
    pub fn install_panic_handler(&self) {
        *PANIC_REPORTER.write() = Some(self.clone());

        PANIC_HOOK.call_once(|| {
            let previous = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                let reporter = PANIC_REPORTER.read().clone();
                if let Some(reporter) = reporter {
                    let event = panic_event(panic_message(info.payload()), info.location());
                    reporter.capture_event(event);
                }
                previous(info);
            }));
            tracing::debug!("panic handler installed");
        });
    }

    /// Stops reporting panics. The installed hook keeps forwarding to the
    /// previous one.
    pub fn detach_panic_handler() {
        if PANIC_REPORTER.write().take().is_some() {
            tracing::debug!("panic handler detached");
        }
    }
}

static PANIC_REPORTER: RwLock<Option<Reporter>> = parking_lot::const_rwlock(None);
static PANIC_HOOK: Once = Once::new();

fn panic_event(message: String, location: Option<&Location<'_>>) -> Event {
    let mut exception = ExceptionValue::new("panic", message.clone());
    if let Some(location) = location {
        exception.frames.push(Frame {
            abs_path: Some(location.file().to_string()),
            lineno: Some(location.line()),
            ..Frame::default()
        });
    }

    Event {
        message: Some(message),
        level: Level::Critical,
        exception: vec![exception],
        ..Event::default()
    }
}

/// Extracts the message from a panic payload.
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}
