//! History entry filters
//!
//! A [`Filter`] decides whether a parsed record is a significant change.
//! Filters are pure: they hold no state between calls and can be reused
//! for any number of entries and parser runs.

mod field;
mod operation;

pub use field::{Comparison, FieldFilter, HistoryField};
pub use operation::{OperationFilter, object_name};

use std::sync::LazyLock;

use regex::Regex;

use crate::cleartool::ClearToolError;
use crate::cleartool::constants::special;
use crate::model::HistoryEntry;

/// Matches `destroy sub-branch "<name>" of branch` events
static DESTROY_SUB_BRANCH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"destroy sub-branch "(.+)" of branch"#)
        .expect("Invalid destroy sub-branch regex")
});

/// Predicate over a [`HistoryEntry`]
#[derive(Debug, Clone)]
pub enum Filter {
    /// Rejects the initial `/0` version of a branch and `create branch` events
    Default,
    /// Rejects sub-branch destruction events
    DestroySubBranch,
    /// Include or exclude by element path
    File(FileFilter),
    /// Compare one field against a value
    Field(FieldFilter),
    /// Restrict by operation name and object name
    Operation(OperationFilter),
    /// Accepts iff every child accepts
    Chain(Vec<Filter>),
}

impl Filter {
    pub fn accept(&self, entry: &HistoryEntry) -> bool {
        match self {
            Filter::Default => accept_default(entry),
            Filter::DestroySubBranch => !DESTROY_SUB_BRANCH_REGEX.is_match(&entry.event),
            Filter::File(filter) => filter.accept(entry),
            Filter::Field(filter) => filter.accept(entry),
            Filter::Operation(filter) => filter.accept(entry),
            Filter::Chain(filters) => filters.iter().all(|f| f.accept(entry)),
        }
    }

    pub fn chain(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::Chain(filters.into_iter().collect())
    }

    /// Keep only the accepted entries, preserving order
    pub fn apply(&self, entries: Vec<HistoryEntry>) -> Vec<HistoryEntry> {
        entries.into_iter().filter(|e| self.accept(e)).collect()
    }
}

fn accept_default(entry: &HistoryEntry) -> bool {
    if entry.version_id.ends_with("/0") || entry.version_id.ends_with("\\0") {
        return false;
    }
    !entry
        .event
        .eq_ignore_ascii_case(special::CREATE_BRANCH_EVENT)
}

/// Element path filter
///
/// Accepts when `include` equals whether the pattern is found in the path.
#[derive(Debug, Clone)]
pub struct FileFilter {
    include: bool,
    pattern: Regex,
}

impl FileFilter {
    /// Only accept paths containing a match
    pub fn include(pattern: &str) -> Result<Self, ClearToolError> {
        Ok(Self {
            include: true,
            pattern: Regex::new(pattern)?,
        })
    }

    /// Reject paths containing a match
    pub fn exclude(pattern: &str) -> Result<Self, ClearToolError> {
        Ok(Self {
            include: false,
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn accept(&self, entry: &HistoryEntry) -> bool {
        self.include == self.pattern.is_match(&entry.element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(version: &str, event: &str) -> HistoryEntry {
        let mut entry = HistoryEntry::new(format!("{version} {event}"));
        entry.element = "vobs/proj/src/main.c".to_string();
        entry.version_id = version.to_string();
        entry.event = event.to_string();
        entry.operation = "checkin".to_string();
        entry
    }

    #[test]
    fn test_default_rejects_zero_versions() {
        assert!(!Filter::Default.accept(&entry("/main/feature/0", "create version")));
        assert!(!Filter::Default.accept(&entry(r"\main\feature\0", "create version")));
        assert!(Filter::Default.accept(&entry("/main/feature/10", "create version")));
    }

    #[test]
    fn test_default_rejects_create_branch() {
        assert!(!Filter::Default.accept(&entry("/main/feature/3", "create branch")));
        assert!(!Filter::Default.accept(&entry("/main/feature/3", "Create Branch")));
        assert!(Filter::Default.accept(&entry("/main/feature/3", "create branch type")));
    }

    #[test]
    fn test_destroy_sub_branch() {
        let destroy = entry("/main/2", r#"destroy sub-branch "feature" of branch"#);
        assert!(!Filter::DestroySubBranch.accept(&destroy));
        assert!(Filter::DestroySubBranch.accept(&entry("/main/2", "create version")));
    }

    #[test]
    fn test_file_filter() {
        let include = Filter::File(FileFilter::include(r"\.c$").unwrap());
        let exclude = Filter::File(FileFilter::exclude("/src/").unwrap());
        let e = entry("/main/1", "create version");
        assert!(include.accept(&e));
        assert!(!exclude.accept(&e));
    }

    #[test]
    fn test_file_filter_invalid_pattern() {
        assert!(matches!(
            FileFilter::include("("),
            Err(ClearToolError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_chain_requires_all() {
        let chain = Filter::chain([
            Filter::Default,
            Filter::File(FileFilter::exclude(r"\.txt$").unwrap()),
        ]);
        assert!(chain.accept(&entry("/main/1", "create version")));
        assert!(!chain.accept(&entry("/main/0", "create version")));

        let mut txt = entry("/main/1", "create version");
        txt.element = "notes.txt".to_string();
        assert!(!chain.accept(&txt));
    }

    #[test]
    fn test_empty_chain_accepts() {
        assert!(Filter::chain([]).accept(&entry("/main/0", "create branch")));
    }

    #[test]
    fn test_apply_keeps_order() {
        let entries = vec![
            entry("/main/1", "create version"),
            entry("/main/0", "create version"),
            entry("/main/2", "create version"),
        ];
        let kept = Filter::Default.apply(entries);
        let versions: Vec<_> = kept.iter().map(|e| e.version_id.as_str()).collect();
        assert_eq!(versions, vec!["/main/1", "/main/2"]);
    }
}
