//! cleartool `-fmt` format definitions for stable output parsing
//!
//! A [`FormatSpec`] is the single source of truth for both sides of an
//! `lshistory` exchange: the request string handed to `-fmt` and the regex
//! applied to every line that comes back.

use regex::Regex;

use super::ClearToolError;

/// Opening delimiter of a field in the request (an escaped quote)
const FIELD_START: &str = "\\\"";

/// Closing delimiter of a field in the request
const FIELD_END: &str = "\\\" ";

/// Line terminator understood by cleartool's format language
pub const LINE_END: &str = "\\n";

/// Pattern fragment emitted once per field
const FIELD_PATTERN: &str = r#""(.*)"\s*"#;

/// One field of `lshistory` output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatField {
    /// Numeric date, `yyyyMMdd.HHmmss`
    Date,
    /// Login name of the user who caused the event
    User,
    /// Element path
    ElementName,
    /// Version id, e.g. `/main/feature/3`
    VersionId,
    /// Event description, e.g. `create version`
    Event,
    /// Operation name, e.g. `checkin`
    Operation,
    /// Comment with newlines removed
    Comment,
    /// UCM activity the version belongs to
    Activity,
}

impl FormatField {
    /// cleartool format code for this field
    pub fn code(self) -> &'static str {
        match self {
            FormatField::Date => "%Nd",
            FormatField::User => "%u",
            FormatField::ElementName => "%En",
            FormatField::VersionId => "%Vn",
            FormatField::Event => "%e",
            FormatField::Operation => "%o",
            FormatField::Comment => "%Nc",
            FormatField::Activity => "%[activity]p",
        }
    }
}

/// Ordered list of fields, compiled into a request string and a line pattern
#[derive(Debug, Clone)]
pub struct FormatSpec {
    fields: Vec<FormatField>,
    pattern: Regex,
}

impl FormatSpec {
    /// Build a format from fields in output order
    pub fn new(fields: &[FormatField]) -> Result<Self, ClearToolError> {
        let pattern = Regex::new(&compile_pattern(fields))?;
        Ok(Self {
            fields: fields.to_vec(),
            pattern,
        })
    }

    /// Date, user, element, version, event, operation
    pub fn standard() -> Result<Self, ClearToolError> {
        Self::new(&STANDARD_FIELDS)
    }

    /// The standard fields followed by the UCM activity
    pub fn with_activity() -> Result<Self, ClearToolError> {
        let mut fields = STANDARD_FIELDS.to_vec();
        fields.push(FormatField::Activity);
        Self::new(&fields)
    }

    pub fn fields(&self) -> &[FormatField] {
        &self.fields
    }

    /// Request string for `-fmt`, one record line per event
    pub fn request(&self) -> String {
        compile_request(&self.fields)
    }

    /// Request string followed by the free-text comment on its own lines
    ///
    /// Comment lines do not match the record pattern, which is what lets the
    /// parser tell them apart from the next record.
    pub fn request_with_comment(&self) -> String {
        format!("{}%c{}", self.request(), LINE_END)
    }

    /// Compiled record pattern
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Match a line, returning the captured field values in field order
    ///
    /// Returns `None` unless the pattern is found and every field group
    /// participated in the match. [`new`](Self::new) guarantees one group
    /// per field.
    pub fn match_line<'l>(&self, line: &'l str) -> Option<Vec<&'l str>> {
        let captures = self.pattern.captures(line)?;
        // group 0 is the whole match
        captures
            .iter()
            .skip(1)
            .map(|group| group.map(|m| m.as_str()))
            .collect()
    }
}

const STANDARD_FIELDS: [FormatField; 6] = [
    FormatField::Date,
    FormatField::User,
    FormatField::ElementName,
    FormatField::VersionId,
    FormatField::Event,
    FormatField::Operation,
];

/// `\"f1\" \"f2\" ... \n`
fn compile_request(fields: &[FormatField]) -> String {
    let mut request: String = fields
        .iter()
        .map(|field| format!("{FIELD_START}{}{FIELD_END}", field.code()))
        .collect();
    request.push_str(LINE_END);
    request
}

/// `"(.*)"\s*` once per field
fn compile_pattern(fields: &[FormatField]) -> String {
    FIELD_PATTERN.repeat(fields.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn test_standard_request() {
        let spec = FormatSpec::standard().unwrap();
        assert_snapshot!(spec.request(), @r#"\"%Nd\" \"%u\" \"%En\" \"%Vn\" \"%e\" \"%o\" \n"#);
    }

    #[test]
    fn test_request_with_comment_appends_comment_line() {
        let spec = FormatSpec::new(&[FormatField::User]).unwrap();
        assert_eq!(spec.request_with_comment(), r#"\"%u\" \n%c\n"#);
    }

    #[test]
    fn test_pattern_has_one_group_per_field() {
        let spec = FormatSpec::with_activity().unwrap();
        assert_eq!(spec.pattern().captures_len(), spec.fields().len() + 1);
    }

    #[test]
    fn test_match_line_returns_fields_in_order() {
        let spec = FormatSpec::standard().unwrap();
        let line = r#""20070906.091701"   "egsperi"    "\ApplicationConfiguration" "\main\sit_r6a\2"  "create version" "mkelem""#;
        let fields = spec.match_line(line).unwrap();
        assert_eq!(
            fields,
            vec![
                "20070906.091701",
                "egsperi",
                r"\ApplicationConfiguration",
                r"\main\sit_r6a\2",
                "create version",
                "mkelem",
            ]
        );
    }

    #[test]
    fn test_match_line_rejects_comment_with_quotes() {
        let spec = FormatSpec::standard().unwrap();
        assert!(spec.match_line(r#""BUG8949""#).is_none());
        assert!(spec.match_line(r#"see "foo" and "bar""#).is_none());
    }

    #[test]
    fn test_match_line_accepts_empty_fields() {
        let spec = FormatSpec::new(&[FormatField::User, FormatField::Comment]).unwrap();
        assert_eq!(spec.match_line(r#""" """#).unwrap(), vec!["", ""]);
    }

    #[test]
    fn test_match_line_finds_record_inside_line() {
        let spec = FormatSpec::new(&[FormatField::User, FormatField::Event]).unwrap();
        let fields = spec.match_line(r#"  "alice" "create version" trailing"#).unwrap();
        assert_eq!(fields, vec!["alice", "create version"]);
    }
}
