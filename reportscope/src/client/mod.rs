//! The reporting client seam.
//!
//! This module provides:
//! - Client options and DSN parsing
//! - The event model handed to transports
//! - The [`Transport`] and [`Integration`] traits
//! - The [`Client`] that merges scope snapshots into events

mod capture;
mod dsn;
mod event;
mod integration;
mod options;
mod transport;

pub use capture::{BeforeSendFn, Client, ClientBuilder};
pub use dsn::Dsn;
pub use event::{Event, ExceptionValue, Frame, SdkInfo, SDK_NAME, SDK_VERSION};
pub use integration::{default_integrations, ContextsIntegration, Integration};
pub use options::{ClientOptions, ErrorAuthority, OptionsOverrides, ENV_PREFIX};
pub use transport::{CollectingTransport, LoggingTransport, NoOpTransport, Transport};
