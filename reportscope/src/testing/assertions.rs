//! Assertions over captured context.

use crate::context::{Breadcrumb, ScopeSnapshot};
use crate::client::Event;
use std::collections::HashMap;

/// Anything that carries tags, breadcrumbs and a user.
pub trait CapturedContext {
    /// Tags.
    fn tags(&self) -> &HashMap<String, String>;
    /// Breadcrumbs, oldest first.
    fn breadcrumbs(&self) -> &[Breadcrumb];
    /// User ID, if any.
    fn user_id(&self) -> Option<&str>;
}

impl CapturedContext for ScopeSnapshot {
    fn tags(&self) -> &HashMap<String, String> {
        &self.tags
    }

    fn breadcrumbs(&self) -> &[Breadcrumb] {
        &self.breadcrumbs
    }

    fn user_id(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.id.as_deref())
    }
}

impl CapturedContext for Event {
    fn tags(&self) -> &HashMap<String, String> {
        &self.tags
    }

    fn breadcrumbs(&self) -> &[Breadcrumb] {
        &self.breadcrumbs
    }

    fn user_id(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.id.as_deref())
    }
}

/// Asserts that a tag has the expected value.
///
/// # Panics
///
/// Panics if the tag is missing or differs.
pub fn assert_tag(ctx: &impl CapturedContext, key: &str, expected: &str) {
    match ctx.tags().get(key) {
        Some(value) => assert_eq!(
            value, expected,
            "tag '{key}' is '{value}', expected '{expected}'"
        ),
        None => panic!("tag '{key}' is missing; tags: {:?}", ctx.tags()),
    }
}

/// Asserts that a tag is absent.
///
/// # Panics
///
/// Panics if the tag is present.
pub fn assert_no_tag(ctx: &impl CapturedContext, key: &str) {
    if let Some(value) = ctx.tags().get(key) {
        panic!("tag '{key}' should be absent but is '{value}'");
    }
}

/// Asserts the breadcrumb messages, in order.
///
/// # Panics
///
/// Panics if the trail differs.
pub fn assert_breadcrumb_trail(ctx: &impl CapturedContext, expected: &[&str]) {
    let actual: Vec<&str> = ctx.breadcrumbs().iter().map(|b| b.message.as_str()).collect();
    assert_eq!(actual, expected, "breadcrumb trail mismatch");
}

/// Asserts the user ID.
///
/// # Panics
///
/// Panics if the user ID differs.
pub fn assert_user_id(ctx: &impl CapturedContext, expected: Option<&str>) {
    assert_eq!(ctx.user_id(), expected, "user id mismatch");
}
