//! Lifecycle hooks the host application invokes.
//!
//! The host calls these at fixed points of its request lifecycle instead of
//! registering listeners on a string-keyed event bus:
//! - [`LifecycleHooks::on_authenticated`] after a user logs in
//! - [`LifecycleHooks::on_before_dispatch`] before a handler runs

mod handler;

pub use handler::{DispatchInfo, HandlerInfo};

use crate::context::{configure_scope, Breadcrumb, ContextScope, UserIdentity};

/// Tag carrying the dispatched route.
pub const ROUTE_TAG: &str = "route";
/// Breadcrumb origin used for dispatch breadcrumbs.
pub const ROUTE_ORIGIN: &str = "route";
/// Breadcrumb metadata key holding the handler signature.
pub const ACTION_METADATA_KEY: &str = "action";

/// The authenticated principal, as seen by the hooks.
#[cfg_attr(test, mockall::automock)]
pub trait Identity: Send + Sync {
    /// Returns the principal's ID, if it has one.
    fn id(&self) -> Option<String>;
}

impl Identity for UserIdentity {
    fn id(&self) -> Option<String> {
        self.id.clone()
    }
}

impl Identity for String {
    fn id(&self) -> Option<String> {
        Some(self.clone())
    }
}

/// Typed hook interface the host is required to call.
///
/// Implementations must never panic or fail; they are context bookkeeping.
pub trait LifecycleHooks: Send + Sync {
    /// Called after an identity has been authenticated.
    fn on_authenticated(&self, scope: &ContextScope, identity: &dyn Identity);

    /// Called just before a handler is invoked.
    fn on_before_dispatch(&self, scope: &ContextScope, dispatch: &DispatchInfo);
}

/// Hooks that record user and route information on the scope.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeHooks;

impl ScopeHooks {
    /// Creates the hooks.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Applies [`LifecycleHooks::on_authenticated`] to the current scope.
    ///
    /// Does nothing when no scope is active.
    pub fn authenticated(&self, identity: &dyn Identity) {
        configure_scope(|scope| self.on_authenticated(scope, identity));
    }

    /// Applies [`LifecycleHooks::on_before_dispatch`] to the current scope.
    ///
    /// Does nothing when no scope is active.
    pub fn before_dispatch(&self, dispatch: &DispatchInfo) {
        configure_scope(|scope| self.on_before_dispatch(scope, dispatch));
    }
}

impl LifecycleHooks for ScopeHooks {
    fn on_authenticated(&self, scope: &ContextScope, identity: &dyn Identity) {
        let id = identity.id();
        if id.is_none() {
            tracing::debug!("authenticated identity has no id; recording empty user");
        }

        scope.set_user(UserIdentity {
            id,
            ..Default::default()
        });
    }

    fn on_before_dispatch(&self, scope: &ContextScope, dispatch: &DispatchInfo) {
        let signature = dispatch.handler.signature();
        tracing::trace!(route = %dispatch.route, action = %signature, "recording dispatch");

        scope.add_breadcrumb(
            Breadcrumb::navigation(dispatch.route.clone())
                .with_origin(ROUTE_ORIGIN)
                .with_metadata(ACTION_METADATA_KEY, serde_json::json!(signature)),
        );
        scope.set_tag(ROUTE_TAG, dispatch.route.clone());
    }
}
