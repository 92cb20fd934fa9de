//! Changeset data model (output of the merge step)

use chrono::NaiveDateTime;
use serde::Serialize;

use super::HistoryEntry;

/// One element touched by a changeset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileElement {
    /// Element path
    pub name: String,
    /// Version id created by the event
    pub version: String,
    /// Event text
    pub action: String,
    /// Operation name
    pub operation: String,
}

impl From<&HistoryEntry> for FileElement {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            name: entry.element.clone(),
            version: entry.version_id.clone(),
            action: entry.event.clone(),
            operation: entry.operation.clone(),
        }
    }
}

/// A logical commit: one user, one comment, many elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeLogEntry {
    /// Date of the entry that opened the changeset
    pub date: NaiveDateTime,
    pub user: String,
    pub comment: String,
    /// Elements in the order they were merged in
    pub elements: Vec<FileElement>,
}

impl ChangeLogEntry {
    pub fn new(date: NaiveDateTime, user: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            date,
            user: user.into(),
            comment: comment.into(),
            elements: Vec::new(),
        }
    }

    pub fn add_element(&mut self, element: FileElement) {
        self.elements.push(element);
    }

    /// Element paths in merge order
    pub fn element_names(&self) -> Vec<&str> {
        self.elements.iter().map(|e| e.name.as_str()).collect()
    }

    /// Plain-text rendering used by the command line output
    pub fn summary(&self) -> String {
        let mut out = format!(
            "{} {} ({} element{})\n",
            self.date.format("%Y-%m-%d %H:%M:%S"),
            self.user,
            self.elements.len(),
            if self.elements.len() == 1 { "" } else { "s" }
        );
        for line in self.comment.lines() {
            out.push_str("    ");
            out.push_str(line);
            out.push('\n');
        }
        for element in &self.elements {
            out.push_str(&format!("  {} {}\n", element.version, element.name));
        }
        out
    }
}
