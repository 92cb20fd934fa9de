//! History entry data model

use std::hash::{Hash, Hasher};

use chrono::NaiveDateTime;

use crate::cleartool::ClearToolError;
use crate::cleartool::constants::{dates, special};

/// One parsed `lshistory` record: a single event on a single element
///
/// Two entries are equal iff the raw record lines are equal.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// Raw record line as emitted by cleartool
    pub line: String,

    /// Date as printed (`yyyyMMdd.HHmmss`)
    pub date_text: String,

    /// Parsed date, `None` when `date_text` could not be parsed
    pub date: Option<NaiveDateTime>,

    /// Login name of the user
    pub user: String,

    /// Element path, relative to the view once the view prefix is stripped
    pub element: String,

    /// Version id, e.g. `/main/feature/3`
    pub version_id: String,

    /// Event text, e.g. `create version`
    pub event: String,

    /// Operation name, e.g. `checkin`
    pub operation: String,

    /// UCM activity, [`special::UNDEFINED_ACTIVITY`] outside UCM
    pub activity_name: String,

    comment: String,
}

impl HistoryEntry {
    /// Create an entry for a record line; fields are filled in by the parser
    pub fn new(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            date_text: String::new(),
            date: None,
            user: String::new(),
            element: String::new(),
            version_id: String::new(),
            event: String::new(),
            operation: String::new(),
            activity_name: special::UNDEFINED_ACTIVITY.to_string(),
            comment: String::new(),
        }
    }

    /// Set the date text and parse it
    ///
    /// On failure the text is kept, `date` becomes `None` and the error is
    /// returned so the caller can report it.
    pub fn set_date_text(&mut self, text: &str) -> Result<(), ClearToolError> {
        self.date_text = text.trim().to_string();
        match parse_history_date(&self.date_text) {
            Ok(date) => {
                self.date = Some(date);
                Ok(())
            }
            Err(e) => {
                self.date = None;
                Err(e)
            }
        }
    }

    /// Append one continuation line to the comment
    pub fn append_comment(&mut self, fragment: &str) {
        self.comment.push_str(fragment);
        self.comment.push('\n');
    }

    /// Comment text without the trailing line breaks left by accumulation
    pub fn comment(&self) -> &str {
        self.comment.trim_end_matches(['\n', '\r'])
    }

    /// Comment exactly as accumulated
    pub fn raw_comment(&self) -> &str {
        &self.comment
    }

    /// Replace the comment wholesale
    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    /// Strip a view-root prefix from the element path
    pub fn strip_view_path(&mut self, view_path: &str) {
        if !view_path.is_empty()
            && let Some(rest) = self.element.strip_prefix(view_path)
        {
            self.element = rest.to_string();
        }
    }
}

impl PartialEq for HistoryEntry {
    fn eq(&self, other: &Self) -> bool {
        self.line == other.line
    }
}

impl Eq for HistoryEntry {}

impl Hash for HistoryEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.line.hash(state);
    }
}

/// Parse a `%Nd` date
pub fn parse_history_date(text: &str) -> Result<NaiveDateTime, ClearToolError> {
    NaiveDateTime::parse_from_str(text, dates::HISTORY_DATE_FORMAT).map_err(|source| {
        ClearToolError::InvalidDate {
            text: text.to_string(),
            source,
        }
    })
}
