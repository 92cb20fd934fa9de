//! cleartool output parser
//!
//! Parses `lshistory` output into [`HistoryEntry`] records.

mod history;
mod legacy;

pub use history::{LineKind, RecordParser};


use super::FormatSpec;
use crate::model::HistoryEntry;

/// Parser for cleartool command output
pub struct Parser;

impl Parser {
    /// Parse captured `lshistory` output produced with `format`
    ///
    /// `view_path` is stripped from element paths (empty = keep as is).
    pub fn parse_history(format: &FormatSpec, output: &str, view_path: &str) -> Vec<HistoryEntry> {
        RecordParser::new(format)
            .with_view_path(view_path)
            .parse_str(output)
    }
}
