//! Legacy history parser
//!
//! Older setups request the six standard fields followed by a quoted comment
//! block (`... \"%o\" \n\"%c\"\n`), and read the whole output in one go.
//!
//! Output example:
//! ```text
//! "20070906.091701"   "egsperi"    "\ApplicationConfiguration" "\main\sit_r6a\2"  "create version" "mkelem"
//! "BUG8949
//! This fixed the problem"
//! ```

use std::sync::LazyLock;

use super::super::FormatSpec;
use super::Parser;
use super::RecordParser;
use crate::model::HistoryEntry;

static LEGACY_FORMAT: LazyLock<FormatSpec> =
    LazyLock::new(|| FormatSpec::standard().expect("Invalid legacy history format"));

impl Parser {
    /// Parse legacy `lshistory` output in a single pass
    ///
    /// The comment is trimmed and one surrounding pair of quotes removed
    /// when present. `view_path` is stripped from element paths as in
    /// [`Parser::parse_history`].
    pub fn parse_legacy_history(output: &str, view_path: &str) -> Vec<HistoryEntry> {
        let mut entries = RecordParser::new(&LEGACY_FORMAT)
            .with_view_path(view_path)
            .parse_str(output);
        for entry in &mut entries {
            let comment = unquote(entry.raw_comment().trim()).to_string();
            entry.set_comment(comment);
        }
        entries
    }
}

fn unquote(comment: &str) -> &str {
    let comment = comment.strip_prefix('"').unwrap_or(comment);
    comment.strip_suffix('"').unwrap_or(comment)
}
