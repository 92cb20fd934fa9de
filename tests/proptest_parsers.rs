//! Property-based tests for lshistory formats, parsers and the merger
//!
//! Uses proptest to verify parsers handle arbitrary input without panicking
//! and that request strings and record patterns stay in step.
//! Reference: https://lib.rs/crates/proptest

use proptest::prelude::*;

use cchist::cleartool::parser::Parser;
use cchist::cleartool::{FormatField, FormatSpec};
use cchist::filter::Filter;
use cchist::history::ChangeLogMerger;
use cchist::model::HistoryEntry;

// =============================================================================
// Strategy generators for realistic-ish lshistory output
// =============================================================================

fn field_strategy() -> impl Strategy<Value = FormatField> {
    prop::sample::select(vec![
        FormatField::Date,
        FormatField::User,
        FormatField::ElementName,
        FormatField::VersionId,
        FormatField::Event,
        FormatField::Operation,
        FormatField::Comment,
        FormatField::Activity,
    ])
}

/// Field value without quotes or line breaks
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 _./\\\\:-]{0,30}"
}

/// Substitute values into a request string the way cleartool would
fn render(spec: &FormatSpec, values: &[String]) -> String {
    let mut line = spec.request().replace("\\\"", "\"").replace("\\n", "");
    for (field, value) in spec.fields().iter().zip(values) {
        line = line.replacen(field.code(), value, 1);
    }
    line
}

// =============================================================================
// Robustness tests: parsers should never panic on arbitrary input
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// History parser should not panic on arbitrary input
    #[test]
    fn history_parser_does_not_panic(input in ".*") {
        let spec = FormatSpec::standard().unwrap();
        let _ = Parser::parse_history(&spec, &input, "");
    }

    /// Legacy parser should not panic on arbitrary input
    #[test]
    fn legacy_parser_does_not_panic(input in ".*") {
        let _ = Parser::parse_legacy_history(&input, "");
    }
}

// =============================================================================
// Format round trip
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Pattern has one group per field, and rendered requests match back
    #[test]
    fn request_and_pattern_round_trip(
        pairs in prop::collection::vec((field_strategy(), value_strategy()), 1..8),
    ) {
        // field codes must not appear inside substituted values
        let fields: Vec<FormatField> = pairs.iter().map(|(f, _)| *f).collect();
        let values: Vec<String> = pairs.iter().map(|(_, v)| v.clone()).collect();
        let spec = FormatSpec::new(&fields).unwrap();

        prop_assert_eq!(spec.pattern().captures_len() - 1, fields.len());

        let line = render(&spec, &values);
        let matched = spec.match_line(&line);
        prop_assert!(matched.is_some(), "no match for {:?}", line);
        let matched: Vec<String> = matched.unwrap().into_iter().map(str::to_string).collect();
        prop_assert_eq!(matched, values);
    }

    /// Lines that are not records end up in the comment verbatim
    #[test]
    fn comment_lines_are_reconstructed(
        lines in prop::collection::vec("[a-zA-Z0-9 .,:!?-]{1,40}", 0..6),
    ) {
        let spec = FormatSpec::standard().unwrap();
        let record = r#""20070906.091701" "alice" "a.c" "/main/1" "create version" "checkin""#;
        let mut output = format!("{record}\n");
        for line in &lines {
            output.push_str(line);
            output.push('\n');
        }
        output.push('\n');

        let entries = Parser::parse_history(&spec, &output, "");
        prop_assert_eq!(entries.len(), 1);
        let expected = lines.join("\n");
        prop_assert_eq!(entries[0].comment(), expected.trim_end_matches('\n'));
    }
}

// =============================================================================
// Filter and merge invariants
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// First versions on a branch are always rejected
    #[test]
    fn default_filter_rejects_zero_versions(
        branch in "[a-z_]{1,12}",
        backslash in prop::bool::ANY,
        event in "[a-z ]{0,20}",
    ) {
        let mut entry = HistoryEntry::new("line");
        entry.version_id = if backslash {
            format!("\\main\\{branch}\\0")
        } else {
            format!("/main/{branch}/0")
        };
        entry.event = event;
        prop_assert!(!Filter::Default.accept(&entry));
    }

    /// Merged changesets are sorted and keep user/comment consistency
    #[test]
    fn merged_changesets_are_consistent(
        records in prop::collection::vec((0usize..3, 0usize..3, 0i64..120), 0..40),
        window in 0i64..20,
    ) {
        let users = ["alice", "bob", "carol"];
        let comments = ["fix", "feature", ""];
        let base = chrono::NaiveDate::from_ymd_opt(2007, 9, 6)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();

        let entries: Vec<HistoryEntry> = records
            .iter()
            .enumerate()
            .map(|(i, (u, c, secs))| {
                let mut entry = HistoryEntry::new(format!("record {i}"));
                entry.user = users[*u].to_string();
                entry.element = format!("file{i}");
                entry.date = Some(base + chrono::TimeDelta::seconds(*secs));
                entry.append_comment(comments[*c]);
                entry
            })
            .collect();

        let merged = ChangeLogMerger::from_seconds(window).merge(&entries);

        prop_assert!(merged.windows(2).all(|w| w[0].date <= w[1].date));
        let total: usize = merged.iter().map(|c| c.elements.len()).sum();
        prop_assert_eq!(total, entries.len());

        for changeset in &merged {
            for element in &changeset.elements {
                let source = entries.iter().find(|e| e.element == element.name).unwrap();
                prop_assert_eq!(&source.user, &changeset.user);
                prop_assert_eq!(source.comment(), changeset.comment.as_str());
            }
        }
    }
}
