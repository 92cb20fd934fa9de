//! Data models for cchist
//!
//! This module contains tool-independent data structures: the parsed
//! history record and the merged changeset handed to changelog writers.

mod changelog;
mod history_entry;

pub use changelog::{ChangeLogEntry, FileElement};
pub use history_entry::{HistoryEntry, parse_history_date};
