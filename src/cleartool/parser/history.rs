//! Streaming parser for `lshistory` output
//!
//! Every line that matches the [`FormatSpec`] pattern opens a new record.
//! Anything else belongs to the comment of the record before it.

use std::io::BufRead;

use crate::cleartool::constants::errors;
use crate::cleartool::{ClearToolError, FormatField, FormatSpec};
use crate::model::HistoryEntry;

/// How a single line was consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// cleartool error line, skipped
    Error,
    /// Opened a new record
    Record,
    /// Appended to the current record's comment
    Comment,
    /// Non-record line before any record, dropped
    Orphan,
}

/// Line-by-line record reconstruction
///
/// The record being built is always the last one in `entries`; it stops
/// receiving comment lines as soon as the next record line arrives.
#[derive(Debug)]
pub struct RecordParser<'f> {
    format: &'f FormatSpec,
    view_path: Option<String>,
    entries: Vec<HistoryEntry>,
    orphans: usize,
    date_errors: usize,
}

impl<'f> RecordParser<'f> {
    pub fn new(format: &'f FormatSpec) -> Self {
        Self {
            format,
            view_path: None,
            entries: Vec::new(),
            orphans: 0,
            date_errors: 0,
        }
    }

    /// Strip this prefix from every element path
    pub fn with_view_path(mut self, view_path: impl Into<String>) -> Self {
        let view_path = view_path.into();
        self.view_path = (!view_path.is_empty()).then_some(view_path);
        self
    }

    /// Consume one line of output
    pub fn feed_line(&mut self, line: &str) -> LineKind {
        if line.starts_with(errors::ERROR_PREFIX) {
            tracing::debug!(line, "skipping cleartool error line");
            return LineKind::Error;
        }

        if let Some(values) = self.format.match_line(line) {
            let entry = self.build_entry(line, &values);
            self.entries.push(entry);
            return LineKind::Record;
        }

        match self.entries.last_mut() {
            Some(current) => {
                current.append_comment(line);
                LineKind::Comment
            }
            None => {
                tracing::debug!(line, "dropping line outside of any record");
                self.orphans += 1;
                LineKind::Orphan
            }
        }
    }

    /// Consume a whole reader and return the parsed entries
    pub fn parse_reader<R: BufRead>(mut self, reader: R) -> Result<Vec<HistoryEntry>, ClearToolError> {
        for line in reader.lines() {
            self.feed_line(&line?);
        }
        Ok(self.finish())
    }

    /// Consume captured output and return the parsed entries
    pub fn parse_str(mut self, output: &str) -> Vec<HistoryEntry> {
        for line in output.lines() {
            self.feed_line(line);
        }
        self.finish()
    }

    /// Number of lines dropped because no record was open yet
    pub fn orphans(&self) -> usize {
        self.orphans
    }

    /// Number of records whose date could not be parsed
    pub fn date_errors(&self) -> usize {
        self.date_errors
    }

    pub fn finish(self) -> Vec<HistoryEntry> {
        if self.orphans > 0 || self.date_errors > 0 {
            tracing::warn!(
                orphans = self.orphans,
                date_errors = self.date_errors,
                records = self.entries.len(),
                "lshistory output contained unusable lines"
            );
        }
        self.entries
    }

    fn build_entry(&mut self, line: &str, values: &[&str]) -> HistoryEntry {
        let mut entry = HistoryEntry::new(line);

        for (field, value) in self.format.fields().iter().zip(values) {
            match field {
                FormatField::Date => {
                    if let Err(e) = entry.set_date_text(value) {
                        tracing::warn!(error = %e, line, "malformed date in history record");
                        self.date_errors += 1;
                    }
                }
                FormatField::User => entry.user = value.to_string(),
                FormatField::ElementName => entry.element = value.to_string(),
                FormatField::VersionId => entry.version_id = value.to_string(),
                FormatField::Event => entry.event = value.to_string(),
                FormatField::Operation => entry.operation = value.to_string(),
                FormatField::Comment => {
                    if !value.is_empty() {
                        entry.append_comment(value);
                    }
                }
                FormatField::Activity => {
                    if !value.is_empty() {
                        entry.activity_name = value.to_string();
                    }
                }
            }
        }

        if let Some(ref view_path) = self.view_path {
            entry.strip_view_path(view_path);
        }

        entry
    }
}
