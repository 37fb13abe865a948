//! Task-local storage for the active scope.
//!
//! Each unit of work runs with its own [`ContextScope`] installed here. The
//! scope survives `.await` points on multi-thread Tokio runtimes, and
//! concurrently running units never see each other's scope.

use super::ContextScope;
use std::future::Future;
use std::sync::Arc;

tokio::task_local! {
    static CURRENT_SCOPE: Arc<ContextScope>;
}

/// Runs a future with `scope` as the current scope.
pub async fn with_scope<F: Future>(scope: Arc<ContextScope>, f: F) -> F::Output {
    CURRENT_SCOPE.scope(scope, f).await
}

/// Runs a synchronous closure with `scope` as the current scope.
///
/// Nesting is supported; inner scopes shadow outer ones and restore on return.
pub fn with_scope_sync<R>(scope: Arc<ContextScope>, f: impl FnOnce() -> R) -> R {
    CURRENT_SCOPE.sync_scope(scope, f)
}

/// Returns the current scope, if one is active.
#[must_use]
pub fn current_scope() -> Option<Arc<ContextScope>> {
    CURRENT_SCOPE.try_with(Arc::clone).ok()
}

/// Applies `f` to the current scope.
///
/// Returns `None` without doing anything when no scope is active, so callers
/// can mutate context unconditionally.
pub fn configure_scope<R>(f: impl FnOnce(&ContextScope) -> R) -> Option<R> {
    match CURRENT_SCOPE.try_with(|scope| f(scope)) {
        Ok(result) => Some(result),
        Err(_) => {
            tracing::trace!("configure_scope called outside of a unit of work");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_no_scope_outside_unit_of_work() {
        assert!(current_scope().is_none());
        assert_eq!(configure_scope(|scope| scope.set_tag("a", "1")), None);
    }

    #[test]
    fn test_sync_scope_is_visible() {
        let scope = Arc::new(ContextScope::default());
        with_scope_sync(scope.clone(), || {
            configure_scope(|s| s.set_tag("route", "site/index"));
        });

        assert_eq!(scope.tag("route"), Some("site/index".to_string()));
        assert!(current_scope().is_none());
    }

    #[test]
    fn test_nested_scopes_shadow_and_restore() {
        let outer = Arc::new(ContextScope::default());
        let inner = Arc::new(ContextScope::default());

        with_scope_sync(outer.clone(), || {
            with_scope_sync(inner.clone(), || {
                configure_scope(|s| s.set_tag("level", "inner"));
            });
            configure_scope(|s| s.set_tag("level", "outer"));
        });

        assert_eq!(inner.tag("level"), Some("inner".to_string()));
        assert_eq!(outer.tag("level"), Some("outer".to_string()));
    }

    #[tokio::test]
    async fn test_scope_survives_await() {
        let scope = Arc::new(ContextScope::initialize(HashMap::new()));

        with_scope(scope.clone(), async {
            tokio::task::yield_now().await;
            configure_scope(|s| s.set_tag("after_await", "yes"));
        })
        .await;

        assert_eq!(scope.tag("after_await"), Some("yes".to_string()));
    }
}
