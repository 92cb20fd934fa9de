//! Generic field comparison filter

use regex::Regex;

use crate::cleartool::ClearToolError;
use crate::model::HistoryEntry;

/// Which string of a [`HistoryEntry`] a [`FieldFilter`] looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryField {
    Date,
    User,
    Element,
    Version,
    Event,
    Operation,
    Comment,
    Activity,
}

impl HistoryField {
    pub fn extract(self, entry: &HistoryEntry) -> &str {
        match self {
            HistoryField::Date => &entry.date_text,
            HistoryField::User => &entry.user,
            HistoryField::Element => &entry.element,
            HistoryField::Version => &entry.version_id,
            HistoryField::Event => &entry.event,
            HistoryField::Operation => &entry.operation,
            HistoryField::Comment => entry.comment(),
            HistoryField::Activity => &entry.activity_name,
        }
    }
}

/// Comparison applied between the field and the configured value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equals,
    EqualsIgnoreCase,
    NotEquals,
    NotEqualsIgnoreCase,
    StartsWith,
    StartsWithIgnoreCase,
    EndsWith,
    EndsWithIgnoreCase,
    Contains,
    ContainsIgnoreCase,
    DoesNotContain,
    DoesNotContainIgnoreCase,
    ContainsRegex,
    DoesNotContainRegex,
}

impl Comparison {
    fn ignores_case(self) -> bool {
        matches!(
            self,
            Comparison::EqualsIgnoreCase
                | Comparison::NotEqualsIgnoreCase
                | Comparison::StartsWithIgnoreCase
                | Comparison::EndsWithIgnoreCase
                | Comparison::ContainsIgnoreCase
                | Comparison::DoesNotContainIgnoreCase
        )
    }
}

/// Compares one field of the entry against a fixed value
#[derive(Debug, Clone)]
pub struct FieldFilter {
    field: HistoryField,
    comparison: Comparison,
    /// Lowercased for the case-insensitive comparisons
    value: String,
    regex: Option<Regex>,
}

impl FieldFilter {
    /// Build a filter; fails only for an invalid regex value
    pub fn new(
        field: HistoryField,
        comparison: Comparison,
        value: impl Into<String>,
    ) -> Result<Self, ClearToolError> {
        let value = value.into();
        let regex = match comparison {
            Comparison::ContainsRegex | Comparison::DoesNotContainRegex => Some(Regex::new(&value)?),
            _ => None,
        };
        let value = if comparison.ignores_case() {
            value.to_lowercase()
        } else {
            value
        };
        Ok(Self {
            field,
            comparison,
            value,
            regex,
        })
    }

    pub fn accept(&self, entry: &HistoryEntry) -> bool {
        let raw = self.field.extract(entry);
        let lowered;
        let text = if self.comparison.ignores_case() {
            lowered = raw.to_lowercase();
            lowered.as_str()
        } else {
            raw
        };
        let value = self.value.as_str();

        match self.comparison {
            Comparison::Equals | Comparison::EqualsIgnoreCase => text == value,
            Comparison::NotEquals | Comparison::NotEqualsIgnoreCase => text != value,
            Comparison::StartsWith | Comparison::StartsWithIgnoreCase => text.starts_with(value),
            Comparison::EndsWith | Comparison::EndsWithIgnoreCase => text.ends_with(value),
            Comparison::Contains | Comparison::ContainsIgnoreCase => text.contains(value),
            Comparison::DoesNotContain | Comparison::DoesNotContainIgnoreCase => {
                !text.contains(value)
            }
            Comparison::ContainsRegex => self.regex.as_ref().is_some_and(|r| r.is_match(text)),
            Comparison::DoesNotContainRegex => {
                !self.regex.as_ref().is_some_and(|r| r.is_match(text))
            }
        }
    }
}
