//! Common test utilities for integration tests.
//!
//! Provides a canned `lshistory` source and helpers for building record lines.
//!
//! Note: Each integration test file compiles as a separate crate,
//! so not all helpers are used in every test file. We suppress
//! dead_code warnings at the module level.

#![allow(dead_code)]

pub mod fake_cleartool;

pub use fake_cleartool::FakeClearTool;

/// Build one record line in the standard six-field format
pub fn record(date: &str, user: &str, element: &str, version: &str, event: &str, operation: &str) -> String {
    format!(r#""{date}" "{user}" "{element}" "{version}" "{event}" "{operation}" "#)
}

/// A `create version` / `checkin` record followed by a comment
pub fn checkin(date: &str, user: &str, element: &str, version: &str, comment: &str) -> String {
    format!(
        "{}\n{}\n",
        record(date, user, element, version, "create version", "checkin"),
        comment
    )
}
