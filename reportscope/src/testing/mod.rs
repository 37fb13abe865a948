//! Testing utilities for applications using reportscope.
//!
//! This module provides:
//! - A reporter fixture backed by an in-memory transport
//! - A fixed identity for exercising the authentication hook
//! - Assertions over snapshots and captured events

mod assertions;
mod fixtures;

pub use assertions::{
    assert_breadcrumb_trail, assert_no_tag, assert_tag, assert_user_id, CapturedContext,
};
pub use fixtures::{StaticIdentity, TestReporter, TEST_DSN};
