//! A small rule tester in the style of ESLint's `RuleTester`.
//!
//! A valid case must produce no diagnostics. An invalid case lists the
//! expected `(line, expected, found)` triples and the text after fixing.

#![allow(dead_code)]

use jsindent_diagnostics::Applicability;
use jsindent_linter::rules::Indent;
use jsindent_linter::{FromConfig, Linter, fix_source};
use jsindent_source_file::{LineIndex, SourceCode};
use serde_json::Value;

/// A reported line and its message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reported {
    pub line: usize,
    pub message: String,
}

pub fn linter(options: &Value) -> Linter {
    let options = match options {
        Value::Array(options) => options.clone(),
        Value::Null => Vec::new(),
        other => vec![other.clone()],
    };
    let Ok(rule) = Indent::from_config(&options) else {
        panic!("invalid indent options: {options:?}");
    };
    Linter::new().with_rule(Box::new(rule))
}

pub fn lint(source: &str, options: &Value) -> Vec<Reported> {
    let result = linter(options).lint(source).unwrap();
    let line_index = LineIndex::from_source_text(source);
    let source_code = SourceCode::new(source, &line_index);

    result
        .diagnostics
        .iter()
        .map(|d| Reported {
            line: source_code.line_column(d.diagnostic.range.start()).line.get(),
            message: d.diagnostic.kind.body.clone(),
        })
        .collect()
}

pub fn fix(source: &str, options: &Value) -> String {
    fix_source(&linter(options), source, Applicability::Safe)
        .unwrap()
        .source
}

/// Expected messages for `(line, expected, found)` triples, where `unit` is
/// `"space"` or `"tab"`.
pub fn expected_errors(unit: &str, errors: &[(usize, u32, &str)]) -> Vec<Reported> {
    errors
        .iter()
        .map(|&(line, expected, found)| {
            let unit = if expected == 1 {
                unit.to_string()
            } else {
                format!("{unit}s")
            };
            Reported {
                line,
                message: format!("Expected indentation of {expected} {unit} but found {found}."),
            }
        })
        .collect()
}

pub fn assert_valid(source: &str, options: &Value) {
    let reported = lint(source, options);
    assert!(
        reported.is_empty(),
        "expected no errors for\n{source}\nwith {options}, got {reported:#?}"
    );
}

pub fn assert_invalid(
    source: &str,
    options: &Value,
    output: &str,
    unit: &str,
    errors: &[(usize, u32, &str)],
) {
    assert_eq!(
        lint(source, options),
        expected_errors(unit, errors),
        "errors for\n{source}\nwith {options}"
    );
    assert_eq!(fix(source, options), output, "fixed output for\n{source}");
}
