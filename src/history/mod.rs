//! History queries
//!
//! [`HistoryAction`] answers "what changed since T": it issues one
//! `lshistory` request per branch and path, parses and filters the output,
//! and merges the surviving records into changesets.

mod merge;

pub use merge::ChangeLogMerger;

use chrono::NaiveDateTime;

use crate::cleartool::parser::RecordParser;
use crate::cleartool::{ClearToolError, FormatSpec, HistorySource, LsHistoryRequest};
use crate::filter::Filter;
use crate::model::{ChangeLogEntry, HistoryEntry};

/// Default changeset window in seconds
pub const DEFAULT_CHANGESET_WINDOW_SECS: i64 = 10;

/// How much changeset detail a checkout should record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChangesetLevel {
    /// Do not compute changesets on checkout
    None,
    /// Changesets for the configured branches
    #[default]
    Branch,
    /// Changesets for everything visible in the view, on checkout the
    /// history is queried without a branch filter
    All,
}

/// What the history is needed for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionMode {
    /// Polling for changes
    Poll,
    /// Populating a changelog during checkout
    Checkout {
        view_exists: bool,
        has_load_rules: bool,
    },
}

/// Options for a history query
#[derive(Debug, Clone)]
pub struct HistoryOptions {
    /// Branches to query in order (empty = one query without branch filter)
    pub branches: Vec<String>,
    /// View-relative paths to query (empty = the view root)
    pub view_paths: Vec<String>,
    /// Prefix stripped from reported element paths
    pub extended_view_path: String,
    pub include_minor_events: bool,
    /// `-r` instead of `-all`
    pub recurse: bool,
    /// Only the last N events (incompatible with `recurse`)
    pub last_events: Option<usize>,
    /// Hide `destroy sub-branch` events
    pub filter_destroy_sub_branch: bool,
    /// Additional filters, applied after the default ones
    pub extra_filters: Vec<Filter>,
    pub changeset_window_secs: i64,
    pub changeset_level: ChangesetLevel,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            branches: Vec::new(),
            view_paths: Vec::new(),
            extended_view_path: String::new(),
            include_minor_events: false,
            recurse: false,
            last_events: None,
            filter_destroy_sub_branch: false,
            extra_filters: Vec::new(),
            changeset_window_secs: DEFAULT_CHANGESET_WINDOW_SECS,
            changeset_level: ChangesetLevel::default(),
        }
    }
}

impl HistoryOptions {
    pub fn with_branches<I, S>(mut self, branches: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.branches = branches.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_view_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.view_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_extended_view_path(mut self, path: impl Into<String>) -> Self {
        self.extended_view_path = path.into();
        self
    }

    pub fn with_minor_events(mut self, include: bool) -> Self {
        self.include_minor_events = include;
        self
    }

    pub fn with_recurse(mut self, recurse: bool) -> Self {
        self.recurse = recurse;
        self
    }

    pub fn with_last_events(mut self, last: Option<usize>) -> Self {
        self.last_events = last;
        self
    }

    pub fn with_destroy_sub_branch_filter(mut self, enabled: bool) -> Self {
        self.filter_destroy_sub_branch = enabled;
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.extra_filters.push(filter);
        self
    }

    pub fn with_changeset_window(mut self, secs: i64) -> Self {
        self.changeset_window_secs = secs;
        self
    }

    pub fn with_changeset_level(mut self, level: ChangesetLevel) -> Self {
        self.changeset_level = level;
        self
    }

    /// Reject option combinations cleartool cannot serve
    pub fn validate(&self) -> Result<(), ClearToolError> {
        if self.recurse && self.last_events.is_some() {
            return Err(ClearToolError::InvalidConfiguration(
                "recursive history cannot be combined with a last-events limit".to_string(),
            ));
        }
        if self.changeset_window_secs < 0 {
            return Err(ClearToolError::InvalidConfiguration(format!(
                "changeset window must not be negative: {}",
                self.changeset_window_secs
            )));
        }
        Ok(())
    }

    /// Filter chain: default hygiene, optional sub-branch filter, extras
    pub fn filter(&self) -> Filter {
        let mut filters = vec![Filter::Default];
        if self.filter_destroy_sub_branch {
            filters.push(Filter::DestroySubBranch);
        }
        filters.extend(self.extra_filters.iter().cloned());
        Filter::Chain(filters)
    }
}

/// Outcome of one `lshistory` request
#[derive(Debug)]
pub enum BranchHistory {
    Entries(Vec<HistoryEntry>),
    Failed { reason: String },
}

impl BranchHistory {
    /// Entries, or none when the request failed
    pub fn into_entries(self) -> Vec<HistoryEntry> {
        match self {
            BranchHistory::Entries(entries) => entries,
            BranchHistory::Failed { .. } => Vec::new(),
        }
    }
}

/// One logical "changes since T" query
#[derive(Debug)]
pub struct HistoryAction<S> {
    source: S,
    format: FormatSpec,
    options: HistoryOptions,
}

impl<S: HistorySource> HistoryAction<S> {
    /// Create an action with the standard format
    ///
    /// Fails fast on invalid options, before anything is sent to cleartool.
    pub fn new(source: S, options: HistoryOptions) -> Result<Self, ClearToolError> {
        options.validate()?;
        Ok(Self {
            source,
            format: FormatSpec::standard()?,
            options,
        })
    }

    /// Use a different output format
    pub fn with_format(mut self, format: FormatSpec) -> Self {
        self.format = format;
        self
    }

    pub fn options(&self) -> &HistoryOptions {
        &self.options
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Whether history has to be queried at all
    pub fn needs_history(&self, mode: ActionMode) -> bool {
        match mode {
            ActionMode::Poll => true,
            ActionMode::Checkout {
                view_exists,
                has_load_rules,
            } => {
                self.options.changeset_level != ChangesetLevel::None
                    || !view_exists
                    || !has_load_rules
            }
        }
    }

    /// Changesets since `since`, oldest first
    ///
    /// Returns an empty list without contacting cleartool when `mode` does
    /// not need history.
    pub fn get_changes(&self, since: Option<NaiveDateTime>, mode: ActionMode) -> Vec<ChangeLogEntry> {
        if !self.needs_history(mode) {
            tracing::info!(?mode, "history not needed, skipping lshistory");
            return Vec::new();
        }

        let entries = self.collect_from(since, &self.branches_for(mode));
        let merged = changesets(&self.options, entries);
        tracing::info!(changesets = merged.len(), "history query finished");
        merged
    }

    /// Whether anything significant changed since `since`
    pub fn has_changes(&self, since: Option<NaiveDateTime>) -> bool {
        !filter_entries(&self.options, self.collect_entries(since)).is_empty()
    }

    /// Raw entries for every branch and path, in request order
    pub fn collect_entries(&self, since: Option<NaiveDateTime>) -> Vec<HistoryEntry> {
        self.collect_from(since, &self.branches())
    }

    fn collect_from(&self, since: Option<NaiveDateTime>, branches: &[&str]) -> Vec<HistoryEntry> {
        let mut entries = Vec::new();
        for &branch in branches {
            for path in self.view_paths() {
                match self.query(since, branch, path) {
                    BranchHistory::Entries(found) => entries.extend(found),
                    BranchHistory::Failed { reason } => {
                        tracing::warn!(branch, path, %reason, "lshistory failed, treating as no changes");
                    }
                }
            }
        }
        entries
    }

    /// Issue and parse a single request
    pub fn query(&self, since: Option<NaiveDateTime>, branch: &str, path: &str) -> BranchHistory {
        let request = LsHistoryRequest {
            format: self.format.request_with_comment(),
            since,
            branch: branch.to_string(),
            path: path.to_string(),
            include_minor: self.options.include_minor_events,
            recurse: self.options.recurse,
            last_events: self.options.last_events,
        };

        let output = match self.source.lshistory(&request) {
            Ok(output) => output,
            Err(e) => {
                return BranchHistory::Failed {
                    reason: e.to_string(),
                };
            }
        };

        let entries = RecordParser::new(&self.format)
            .with_view_path(self.options.extended_view_path.as_str())
            .parse_str(&output);
        tracing::debug!(branch, path, entries = entries.len(), "parsed lshistory output");
        BranchHistory::Entries(entries)
    }

    fn branches(&self) -> Vec<&str> {
        if self.options.branches.is_empty() {
            vec![""]
        } else {
            self.options.branches.iter().map(String::as_str).collect()
        }
    }

    /// Branches to query in `mode`
    ///
    /// A checkout at [`ChangesetLevel::All`] covers the whole view, so it
    /// drops the branch filter.
    fn branches_for(&self, mode: ActionMode) -> Vec<&str> {
        match (mode, self.options.changeset_level) {
            (ActionMode::Checkout { .. }, ChangesetLevel::All) => vec![""],
            _ => self.branches(),
        }
    }

    fn view_paths(&self) -> Vec<&str> {
        if self.options.view_paths.is_empty() {
            vec!["."]
        } else {
            self.options.view_paths.iter().map(String::as_str).collect()
        }
    }
}

/// Drop undated entries, then apply the option's filter chain
pub fn filter_entries(options: &HistoryOptions, entries: Vec<HistoryEntry>) -> Vec<HistoryEntry> {
    let total = entries.len();
    let (dated, undated): (Vec<_>, Vec<_>) = entries.into_iter().partition(|e| e.date.is_some());
    if !undated.is_empty() {
        tracing::warn!(
            undated = undated.len(),
            "discarding history entries with unparsable dates"
        );
    }

    let accepted = options.filter().apply(dated);
    tracing::debug!(total, accepted = accepted.len(), "filtered history entries");
    accepted
}

/// Filter already parsed entries and merge them with a fresh merger
pub fn changesets(options: &HistoryOptions, entries: Vec<HistoryEntry>) -> Vec<ChangeLogEntry> {
    let accepted = filter_entries(options, entries);
    ChangeLogMerger::from_seconds(options.changeset_window_secs).merge(&accepted)
}
