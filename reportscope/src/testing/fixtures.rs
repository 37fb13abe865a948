//! Test fixtures for hosts integrating reportscope.

use std::sync::Arc;

use crate::client::{ClientOptions, CollectingTransport, Event};
use crate::context::HostInfo;
use crate::errors::Result;
use crate::hooks::Identity;
use crate::reporter::Reporter;

/// A syntactically valid DSN that never leaves the process.
pub const TEST_DSN: &str = "https://public@reports.invalid/1";

/// A reporter wired to an in-memory transport.
#[derive(Debug, Clone)]
pub struct TestReporter {
    /// The reporter under test.
    pub reporter: Reporter,
    /// Collects every event the reporter sends.
    pub transport: Arc<CollectingTransport>,
}

impl TestReporter {
    /// Creates an enabled reporter with default options.
    ///
    /// # Errors
    ///
    /// Propagates option validation errors.
    pub fn new() -> Result<Self> {
        Self::with_options(ClientOptions::new(), &HostInfo::new())
    }

    /// Creates an enabled reporter; a missing DSN is replaced by [`TEST_DSN`].
    ///
    /// # Errors
    ///
    /// Propagates option validation errors.
    pub fn with_options(mut options: ClientOptions, host: &HostInfo) -> Result<Self> {
        if options.dsn.is_none() {
            options.dsn = Some(TEST_DSN.to_string());
        }
        let transport = Arc::new(CollectingTransport::new());
        let reporter = Reporter::init(options, host, transport.clone())?;
        Ok(Self {
            reporter,
            transport,
        })
    }

    /// Returns every event sent so far.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.transport.events()
    }

    /// Returns the most recent event.
    #[must_use]
    pub fn last_event(&self) -> Option<Event> {
        self.transport.last()
    }
}

/// An identity with a fixed ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticIdentity(pub Option<String>);

impl StaticIdentity {
    /// Creates an identity with the given ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(Some(id.into()))
    }

    /// Creates an identity without an ID.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self(None)
    }
}

impl Identity for StaticIdentity {
    fn id(&self) -> Option<String> {
        self.0.clone()
    }
}
