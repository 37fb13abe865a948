//! # Reportscope
//!
//! Request-scoped context for error reporting.
//!
//! Reportscope sits between a web framework's request lifecycle and an
//! error-reporting transport:
//!
//! - **Context scopes**: tags, user identity and breadcrumbs accumulated per
//!   unit of work, snapshotted whenever an event is captured
//! - **Default tags**: platform version and locale seeded into every scope
//! - **Lifecycle hooks**: typed `on_authenticated` / `on_before_dispatch`
//!   calls that record the user and the dispatched route
//! - **Client**: options, DSN parsing, integrations and a pluggable
//!   transport
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use reportscope::prelude::*;
//!
//! let reporter = Reporter::init(
//!     ClientOptions::new().with_dsn(dsn).with_app_base_path("/srv/app"),
//!     &HostInfo::detect(Some(env!("CARGO_PKG_VERSION"))),
//!     Arc::new(LoggingTransport::default()),
//! )?;
//!
//! reporter
//!     .run(async {
//!         reporter.hooks().authenticated(&user);
//!         reporter.hooks().before_dispatch(&DispatchInfo::new(
//!             "site/index",
//!             HandlerInfo::dynamic("SiteController", "actionIndex"),
//!         ));
//!         if let Err(err) = handle().await {
//!             reporter.capture_error(&err);
//!         }
//!     })
//!     .await;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod client;
pub mod context;
pub mod errors;
pub mod hooks;
pub mod observability;
pub mod reporter;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::client::{
        Client, ClientBuilder, ClientOptions, Dsn, ErrorAuthority, Event, Integration,
        LoggingTransport, NoOpTransport, OptionsOverrides, Transport,
    };
    pub use crate::context::{
        configure_scope, current_scope, with_scope, with_scope_sync, Breadcrumb,
        BreadcrumbCategory, ContextScope, HostInfo, Level, ScopeSnapshot, UserIdentity,
    };
    pub use crate::errors::{ReportScopeError, Result};
    pub use crate::hooks::{DispatchInfo, HandlerInfo, Identity, LifecycleHooks, ScopeHooks};
    pub use crate::observability::{init_logging, LoggingConfig};
    pub use crate::reporter::Reporter;
}
