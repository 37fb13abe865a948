//! Context scope management for error reporting.
//!
//! This module provides:
//! - The mutable per-unit-of-work [`ContextScope`]
//! - Immutable snapshots taken at capture time
//! - Default tags derived from the host application
//! - Task-local storage for the active scope

mod breadcrumb;
#[cfg(test)]
mod context_tests;
mod current;
mod defaults;
mod identity;
mod scope;
mod snapshot;

pub use breadcrumb::{Breadcrumb, BreadcrumbCategory, Level};
pub use current::{configure_scope, current_scope, with_scope, with_scope_sync};
pub use defaults::{HostInfo, LANGUAGE_TAG, PLATFORM_VERSION_TAG, UNKNOWN};
pub use identity::UserIdentity;
pub use scope::{ContextScope, DEFAULT_MAX_BREADCRUMBS};
pub use snapshot::ScopeSnapshot;
