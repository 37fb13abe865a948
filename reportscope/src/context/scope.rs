//! The mutable per-unit-of-work context scope.

use super::{Breadcrumb, ScopeSnapshot, UserIdentity};
use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};

/// Breadcrumb capacity used when none is configured.
pub const DEFAULT_MAX_BREADCRUMBS: usize = 100;

#[derive(Debug, Clone, Default)]
struct ScopeState {
    tags: HashMap<String, String>,
    user: Option<UserIdentity>,
    breadcrumbs: VecDeque<Breadcrumb>,
}

/// Context accumulated during one unit of work.
///
/// A scope is created per request (or per job), mutated by lifecycle hooks,
/// and read through [`ContextScope::snapshot`] whenever an event is captured.
/// State sits behind a lock so the scope can be shared between the request
/// future and its error handlers; it must never be shared across units of
/// work.
#[derive(Debug)]
pub struct ContextScope {
    defaults: HashMap<String, String>,
    max_breadcrumbs: usize,
    state: RwLock<ScopeState>,
}

impl ContextScope {
    /// Creates a scope seeded with the given default tags.
    #[must_use]
    pub fn initialize(default_tags: HashMap<String, String>) -> Self {
        Self::with_capacity(default_tags, DEFAULT_MAX_BREADCRUMBS)
    }

    /// Creates a scope with an explicit breadcrumb capacity.
    #[must_use]
    pub fn with_capacity(default_tags: HashMap<String, String>, max_breadcrumbs: usize) -> Self {
        let state = ScopeState {
            tags: default_tags.clone(),
            user: None,
            breadcrumbs: VecDeque::with_capacity(max_breadcrumbs.min(DEFAULT_MAX_BREADCRUMBS)),
        };

        Self {
            defaults: default_tags,
            max_breadcrumbs,
            state: RwLock::new(state),
        }
    }

    /// Inserts or overwrites a tag.
    pub fn set_tag(&self, key: impl Into<String>, value: impl Into<String>) {
        let (key, value) = (key.into(), value.into());
        self.state.write().tags.insert(key, value);
    }

    /// Removes a tag, returning its previous value.
    pub fn remove_tag(&self, key: &str) -> Option<String> {
        self.state.write().tags.remove(key)
    }

    /// Returns a tag value.
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<String> {
        self.state.read().tags.get(key).cloned()
    }

    /// Replaces the user record.
    pub fn set_user(&self, user: UserIdentity) {
        self.state.write().user = Some(user);
    }

    /// Clears the user record.
    pub fn clear_user(&self) {
        self.state.write().user = None;
    }

    /// Returns the current user.
    #[must_use]
    pub fn user(&self) -> Option<UserIdentity> {
        self.state.read().user.clone()
    }

    /// Appends a breadcrumb, dropping the oldest entries beyond capacity.
    pub fn add_breadcrumb(&self, breadcrumb: Breadcrumb) {
        if self.max_breadcrumbs == 0 {
            return;
        }

        let mut state = self.state.write();
        while state.breadcrumbs.len() >= self.max_breadcrumbs {
            state.breadcrumbs.pop_front();
        }
        state.breadcrumbs.push_back(breadcrumb);
    }

    /// Drops all breadcrumbs.
    pub fn clear_breadcrumbs(&self) {
        self.state.write().breadcrumbs.clear();
    }

    /// Returns the number of stored breadcrumbs.
    #[must_use]
    pub fn breadcrumb_count(&self) -> usize {
        self.state.read().breadcrumbs.len()
    }

    /// Returns the breadcrumb capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.max_breadcrumbs
    }

    /// Returns the tags this scope was seeded with.
    #[must_use]
    pub const fn default_tags(&self) -> &HashMap<String, String> {
        &self.defaults
    }

    /// Resets the scope to its freshly initialized state.
    ///
    /// Hosts that reuse one scope across units of work call this at the
    /// start of each unit.
    pub fn clear(&self) {
        let mut state = self.state.write();
        state.tags.clone_from(&self.defaults);
        state.user = None;
        state.breadcrumbs.clear();
    }

    /// Takes an immutable copy of the current context.
    #[must_use]
    pub fn snapshot(&self) -> ScopeSnapshot {
        let state = self.state.read();
        ScopeSnapshot {
            tags: state.tags.clone(),
            user: state.user.clone(),
            breadcrumbs: state.breadcrumbs.iter().cloned().collect(),
        }
    }
}

impl Default for ContextScope {
    fn default() -> Self {
        Self::initialize(HashMap::new())
    }
}

impl Clone for ContextScope {
    fn clone(&self) -> Self {
        Self {
            defaults: self.defaults.clone(),
            max_breadcrumbs: self.max_breadcrumbs,
            state: RwLock::new(self.state.read().clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn defaults() -> HashMap<String, String> {
        HashMap::from([("platform_version".to_string(), "2.x".to_string())])
    }

    #[test]
    fn test_set_tag_overwrites() {
        let scope = ContextScope::default();
        scope.set_tag("a", "1");
        scope.set_tag("a", "2");

        let snapshot = scope.snapshot();
        assert_eq!(snapshot.tags.len(), 1);
        assert_eq!(snapshot.tag("a"), Some("2"));
    }

    struct CopyOf<'a>(&'a ContextScope, &'static str);

    impl From<CopyOf<'_>> for String {
        fn from(copy: CopyOf<'_>) -> Self {
            copy.0.tag(copy.1).unwrap_or_default()
        }
    }

    #[test]
    fn test_set_tag_converts_before_locking() {
        let scope = ContextScope::initialize(defaults());
        scope.set_tag("copied", CopyOf(&scope, "platform_version"));
        assert_eq!(scope.tag("copied"), Some("2.x".to_string()));
    }

    #[test]
    fn test_empty_key_is_accepted() {
        let scope = ContextScope::default();
        scope.set_tag("", "blank");
        assert_eq!(scope.tag(""), Some("blank".to_string()));
    }

    #[test]
    fn test_remove_tag() {
        let scope = ContextScope::initialize(defaults());
        assert_eq!(scope.remove_tag("platform_version"), Some("2.x".to_string()));
        assert_eq!(scope.tag("platform_version"), None);
    }

    #[test]
    fn test_set_user_replaces() {
        let scope = ContextScope::default();
        scope.set_user(UserIdentity::with_id("1").with_username("first"));
        scope.set_user(UserIdentity::with_id("2"));

        assert_eq!(scope.snapshot().user, Some(UserIdentity::with_id("2")));
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let scope = ContextScope::with_capacity(HashMap::new(), 2);
        scope.add_breadcrumb(Breadcrumb::navigation("b1"));
        scope.add_breadcrumb(Breadcrumb::navigation("b2"));
        scope.add_breadcrumb(Breadcrumb::navigation("b3"));

        assert_eq!(scope.snapshot().breadcrumb_messages(), vec!["b2", "b3"]);
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let scope = ContextScope::with_capacity(HashMap::new(), 0);
        scope.add_breadcrumb(Breadcrumb::navigation("ignored"));
        assert_eq!(scope.breadcrumb_count(), 0);
    }

    #[test]
    fn test_clear_restores_defaults() {
        let scope = ContextScope::initialize(defaults());
        scope.set_tag("route", "site/index");
        scope.set_tag("platform_version", "override");
        scope.set_user(UserIdentity::with_id("1"));
        scope.add_breadcrumb(Breadcrumb::navigation("site/index"));

        scope.clear();

        let snapshot = scope.snapshot();
        assert_eq!(snapshot.tags, defaults());
        assert!(snapshot.user.is_none());
        assert!(snapshot.breadcrumbs.is_empty());
    }

    #[test]
    fn test_clone_is_independent() {
        let scope = ContextScope::initialize(defaults());
        let copy = scope.clone();
        copy.set_tag("route", "other");

        assert_eq!(scope.tag("route"), None);
        assert_eq!(copy.capacity(), scope.capacity());
    }
}
