//! Operation whitelist filter

use std::sync::LazyLock;

use regex::Regex;

use crate::cleartool::ClearToolError;
use crate::model::HistoryEntry;

/// Object name is the single quoted part of an event,
/// e.g. `make label "REL_1.0" on version`
static OBJECT_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^[^"]*"(.*)"[^"]*$"#).expect("Invalid object name regex"));

/// Extract the quoted object name from an event, empty if there is none
pub fn object_name(event: &str) -> &str {
    OBJECT_NAME_REGEX
        .captures(event)
        .and_then(|c| c.get(1))
        .map_or("", |m| m.as_str())
}

/// Restricts entries by operation name
///
/// Entries whose operation is not listed are accepted iff `allow_others`.
/// Listed operations are accepted when no name patterns are configured, or
/// when one of them matches the object name in the event text.
#[derive(Debug, Clone)]
pub struct OperationFilter {
    operations: Vec<String>,
    allow_others: bool,
    name_patterns: Vec<Regex>,
}

impl OperationFilter {
    pub fn new<I, S>(operations: I, allow_others: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            operations: operations.into_iter().map(Into::into).collect(),
            allow_others,
            name_patterns: Vec::new(),
        }
    }

    /// Only accept listed operations whose object name matches `pattern`
    pub fn with_name_pattern(mut self, pattern: &str) -> Result<Self, ClearToolError> {
        self.name_patterns.push(Regex::new(pattern)?);
        Ok(self)
    }

    pub fn accept(&self, entry: &HistoryEntry) -> bool {
        if !self.operations.iter().any(|op| *op == entry.operation) {
            return self.allow_others;
        }
        if self.name_patterns.is_empty() {
            return true;
        }
        let name = object_name(&entry.event);
        self.name_patterns.iter().any(|p| p.is_match(name))
    }
}
