//! Transport trait and in-process implementations.
//!
//! Delivering events to a remote collector is the job of an external
//! transport; this module defines the seam and ships transports for
//! discarding, logging and collecting events.

use super::Event;
use async_trait::async_trait;
use tracing::{debug, info, Level};

/// Receives finalized events.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Delivers an event, waiting for the transport to accept it.
    async fn send(&self, event: Event);

    /// Hands an event over without blocking.
    ///
    /// This method must never panic. Delivery errors are logged and
    /// suppressed.
    fn try_send(&self, event: Event);
}

/// A transport that discards all events.
///
/// Used when the client is built without a transport.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpTransport;

#[async_trait]
impl Transport for NoOpTransport {
    async fn send(&self, _event: Event) {}

    fn try_send(&self, _event: Event) {}
}

/// A transport that writes events to the tracing subscriber.
#[derive(Debug, Clone)]
pub struct LoggingTransport {
    level: Level,
}

impl Default for LoggingTransport {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingTransport {
    /// Creates a logging transport with the specified level.
    #[must_use]
    pub const fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level logging transport.
    #[must_use]
    pub const fn debug() -> Self {
        Self::new(Level::DEBUG)
    }

    fn log_event(&self, event: &Event) {
        let payload = serde_json::to_string(event).unwrap_or_default();
        if self.level == Level::DEBUG {
            debug!(
                event_id = %event.event_id,
                level = %event.level,
                payload = %payload,
                "captured event"
            );
        } else {
            info!(
                event_id = %event.event_id,
                level = %event.level,
                payload = %payload,
                "captured event"
            );
        }
    }
}

#[async_trait]
impl Transport for LoggingTransport {
    async fn send(&self, event: Event) {
        self.log_event(&event);
    }

    fn try_send(&self, event: Event) {
        self.log_event(&event);
    }
}

/// A transport that keeps events in memory, for tests.
#[derive(Debug, Default)]
pub struct CollectingTransport {
    events: parking_lot::RwLock<Vec<Event>>,
}

impl CollectingTransport {
    /// Creates a new collecting transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.events.read().clone()
    }

    /// Returns the most recent event.
    #[must_use]
    pub fn last(&self) -> Option<Event> {
        self.events.read().last().cloned()
    }

    /// Returns the number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if no events have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Clears all collected events.
    pub fn clear(&self) {
        self.events.write().clear();
    }
}

#[async_trait]
impl Transport for CollectingTransport {
    async fn send(&self, event: Event) {
        self.events.write().push(event);
    }

    fn try_send(&self, event: Event) {
        self.events.write().push(event);
    }
}
