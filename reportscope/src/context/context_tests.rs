//! Behavioral tests for the context module.

#[cfg(test)]
mod tests {
    use crate::context::{
        configure_scope, current_scope, with_scope, Breadcrumb, BreadcrumbCategory, ContextScope,
        HostInfo, Level, UserIdentity, LANGUAGE_TAG, PLATFORM_VERSION_TAG,
    };
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[test]
    fn test_default_tags_present_before_mutation() {
        let scope = ContextScope::initialize(HashMap::from([(
            PLATFORM_VERSION_TAG.to_string(),
            "2.x".to_string(),
        )]));

        assert_eq!(scope.snapshot().tag(PLATFORM_VERSION_TAG), Some("2.x"));
    }

    #[test]
    fn test_request_tag_overrides_default() {
        let scope = ContextScope::initialize(HostInfo::new().with_locale("en").default_tags());
        scope.set_tag(LANGUAGE_TAG, "fr");

        let snapshot = scope.snapshot();
        assert_eq!(snapshot.tag(LANGUAGE_TAG), Some("fr"));
        assert_eq!(snapshot.tag(PLATFORM_VERSION_TAG), Some("unknown"));
    }

    #[test]
    fn test_breadcrumb_order_preserved() {
        let scope = ContextScope::default();
        let crumbs = [
            Breadcrumb::navigation("b1"),
            Breadcrumb::new(Level::Warning, BreadcrumbCategory::Http, "b2"),
            Breadcrumb::new(Level::Debug, BreadcrumbCategory::Default, "b3"),
        ];
        for crumb in &crumbs {
            scope.add_breadcrumb(crumb.clone());
        }

        assert_eq!(scope.snapshot().breadcrumbs, crumbs.to_vec());
    }

    #[test]
    fn test_snapshot_unaffected_by_later_mutation() {
        let scope = ContextScope::default();
        scope.set_tag("a", "1");
        scope.add_breadcrumb(Breadcrumb::navigation("first"));
        let before = scope.snapshot();

        scope.set_tag("a", "2");
        scope.set_user(UserIdentity::with_id("late"));
        scope.add_breadcrumb(Breadcrumb::navigation("second"));

        assert_eq!(before.tag("a"), Some("1"));
        assert!(before.user.is_none());
        assert_eq!(before.breadcrumb_messages(), vec!["first"]);
    }

    #[test]
    fn test_identical_set_tag_is_idempotent() {
        let scope = ContextScope::default();
        scope.set_tag("k", "v");
        let once = scope.snapshot();
        scope.set_tag("k", "v");

        assert_eq!(scope.snapshot().tags, once.tags);
    }

    #[test]
    fn test_mutating_one_scope_leaves_other_untouched() {
        let a = ContextScope::initialize(HostInfo::new().default_tags());
        let b = ContextScope::initialize(HostInfo::new().default_tags());
        let b_before = b.snapshot();

        a.set_tag("route", "a/index");
        a.set_user(UserIdentity::with_id("a"));
        a.add_breadcrumb(Breadcrumb::navigation("a/index"));

        assert_eq!(b.snapshot(), b_before);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_units_of_work_are_isolated() {
        let first = Arc::new(ContextScope::default());
        let second = Arc::new(ContextScope::default());

        let run = |scope: Arc<ContextScope>, name: &'static str| {
            tokio::spawn(with_scope(scope, async move {
                for i in 0..50 {
                    configure_scope(|s| {
                        s.set_tag("route", name);
                        s.add_breadcrumb(Breadcrumb::navigation(format!("{name}-{i}")));
                    });
                    tokio::task::yield_now().await;
                }
                configure_scope(|s| s.set_user(UserIdentity::with_id(name)));
                current_scope().map(|s| s.snapshot())
            }))
        };

        let (a, b) = tokio::join!(run(first.clone(), "a"), run(second.clone(), "b"));
        let a = a.unwrap().unwrap();
        let b = b.unwrap().unwrap();

        assert_eq!(a.tag("route"), Some("a"));
        assert_eq!(b.tag("route"), Some("b"));
        assert!(a.breadcrumbs.iter().all(|c| c.message.starts_with("a-")));
        assert!(b.breadcrumbs.iter().all(|c| c.message.starts_with("b-")));
        assert_eq!(a.user, Some(UserIdentity::with_id("a")));
        assert_eq!(b.user, Some(UserIdentity::with_id("b")));
        assert_eq!(first.breadcrumb_count(), 50);
    }
}
