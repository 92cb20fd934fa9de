//! Changeset merging
//!
//! cleartool reports one record per element version. Records from the same
//! user, with an identical comment and close together in time, are folded
//! into one [`ChangeLogEntry`].

use std::collections::BTreeMap;

use chrono::{NaiveDateTime, TimeDelta};

use crate::model::{ChangeLogEntry, FileElement, HistoryEntry};

/// Slack added to the configured window; `%Nd` truncates to whole seconds
const TRUNCATION_SLACK_MS: i64 = 1000;

/// A changeset still accepting members, with the span of its members' dates
#[derive(Debug, Clone)]
struct OpenChangeset {
    entry: ChangeLogEntry,
    oldest: NaiveDateTime,
    newest: NaiveDateTime,
}

impl OpenChangeset {
    fn seed(entry: &HistoryEntry, date: NaiveDateTime) -> Self {
        let mut changeset = ChangeLogEntry::new(date, entry.user.clone(), entry.comment());
        changeset.add_element(FileElement::from(entry));
        Self {
            entry: changeset,
            oldest: date,
            newest: date,
        }
    }

    fn add(&mut self, entry: &HistoryEntry, date: NaiveDateTime) {
        if date > self.newest {
            self.newest = date;
        } else if date < self.oldest {
            self.oldest = date;
        }
        self.entry.add_element(FileElement::from(entry));
    }
}

/// Groups per-element records into per-commit changesets
///
/// The merger keeps every changeset it has opened, per user. Calling
/// [`merge`](Self::merge) again on the same instance continues from that
/// state: new records may join changesets from earlier calls, and the result
/// includes them. Use a fresh merger per history query.
#[derive(Debug, Clone)]
pub struct ChangeLogMerger {
    max_time_difference: TimeDelta,
    open: BTreeMap<String, Vec<OpenChangeset>>,
}

impl ChangeLogMerger {
    /// Create a merger with a window given in milliseconds
    ///
    /// Windows beyond what [`TimeDelta`] can hold are clamped to its maximum.
    pub fn new(window_millis: i64) -> Self {
        let millis = window_millis.saturating_add(TRUNCATION_SLACK_MS);
        Self {
            max_time_difference: TimeDelta::try_milliseconds(millis).unwrap_or(TimeDelta::MAX),
            open: BTreeMap::new(),
        }
    }

    /// Create a merger with a window given in seconds
    pub fn from_seconds(window_secs: i64) -> Self {
        Self::new(window_secs.saturating_mul(1000))
    }

    /// Effective window, including the truncation slack
    pub fn max_time_difference(&self) -> TimeDelta {
        self.max_time_difference
    }

    /// Merge `entries` and return every changeset known so far, oldest first
    ///
    /// Entries without a parsed date cannot be placed in time and are skipped.
    pub fn merge(&mut self, entries: &[HistoryEntry]) -> Vec<ChangeLogEntry> {
        let mut undated = 0usize;

        for entry in entries {
            let Some(date) = entry.date else {
                undated += 1;
                continue;
            };
            self.add(entry, date);
        }

        if undated > 0 {
            tracing::warn!(undated, "skipped history entries without a date");
        }

        let mut merged: Vec<ChangeLogEntry> = self
            .open
            .values()
            .flatten()
            .map(|open| open.entry.clone())
            .collect();
        merged.sort_by_key(|changeset| changeset.date);

        tracing::debug!(
            entries = entries.len(),
            changesets = merged.len(),
            "merged history entries"
        );
        merged
    }

    fn add(&mut self, entry: &HistoryEntry, date: NaiveDateTime) {
        let max = self.max_time_difference;
        let changesets = self.open.entry(entry.user.clone()).or_default();

        let target = changesets.iter_mut().find(|open| {
            open.entry.comment == entry.comment()
                && ((open.oldest - date).abs() < max || (open.newest - date).abs() < max)
        });

        match target {
            Some(open) => open.add(entry, date),
            None => changesets.push(OpenChangeset::seed(entry, date)),
        }
    }
}
