//! Indent rule implementation.
//!
//! Checks that every line starts at the indentation its enclosing
//! constructs call for. This is a port of ESLint's `indent` rule.
//!
//! A check runs in four passes over one file:
//!
//! 1. Construct handlers walk the tree and record, for every token, an
//!    offset from an anchor token ([`offsets::OffsetGraph`]).
//! 2. Parenthesized groups get the same treatment once the walk is done.
//! 3. The resolver turns offsets into expected indentation.
//! 4. The validator compares each line's first token with what it has.

mod handlers;
mod indent_level;
mod offsets;
mod parens;
mod resolver;
mod validate;

use jsindent_config::{IndentKind, IndentOptions, OptionsError};
use jsindent_diagnostics::{Diagnostic, Edit, Fix, FixAvailability, Violation};
use jsindent_js_cst::{EventWalker, TokenStream, WalkEvent};
use jsindent_text_size::TextRange;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{CheckContext, FromConfig, LintError, Rule};

use handlers::{Construct, HandlerContext};
use indent_level::{ActualIndent, indentation_message};
use validate::{Mismatch, Validator};

/// Violation for a line that starts at the wrong indentation.
#[derive(Debug, Clone)]
pub struct IncorrectIndentation {
    pub expected: u32,
    pub actual: ActualIndent,
    pub kind: IndentKind,
}

impl Violation for IncorrectIndentation {
    const FIX_AVAILABILITY: FixAvailability = FixAvailability::Always;

    fn message(&self) -> String {
        indentation_message(self.expected, self.actual, self.kind)
    }

    fn fix_title(&self) -> Option<String> {
        Some(format!("Indent with {} {}", self.expected, self.kind.name()))
    }
}

/// The `indent` rule.
#[derive(Debug, Clone, Default)]
pub struct Indent {
    options: IndentOptions,
}

impl Indent {
    pub fn new(options: IndentOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &IndentOptions {
        &self.options
    }

    fn diagnostic(&self, tokens: &TokenStream, mismatch: Mismatch) -> Diagnostic {
        let token = tokens.get(mismatch.token);
        let violation = IncorrectIndentation {
            expected: mismatch.expected,
            actual: mismatch.actual,
            kind: self.options.kind,
        };
        let indentation = self
            .options
            .kind
            .as_char()
            .to_string()
            .repeat(mismatch.expected as usize);
        let replaced = TextRange::new(tokens.line_start_of(mismatch.token), token.start());

        Diagnostic::new(violation, token.range)
            .with_fix(Fix::safe_edit(Edit::range_replacement(indentation, replaced)))
    }
}

impl FromConfig for Indent {
    const RULE_NAME: &'static str = "indent";

    fn from_config(options: &[Value]) -> Result<Self, OptionsError> {
        IndentOptions::from_eslint_options(options).map(Self::new)
    }
}

impl Rule for Indent {
    fn name(&self) -> &'static str {
        "indent"
    }

    fn check(&self, ctx: &CheckContext) -> Result<Vec<Diagnostic>, LintError> {
        let tokens = ctx.tokens();
        let mut handler_ctx = HandlerContext::new(tokens, &self.options);

        for event in EventWalker::new(ctx.root().inner(), ctx.source()) {
            match event {
                WalkEvent::Enter(node) => {
                    if let Some(construct) = Construct::of(&node) {
                        construct.enter(&mut handler_ctx, node);
                    }
                }
                WalkEvent::Leave(node) => {
                    if let Some(construct) = Construct::of(&node) {
                        construct.leave(&mut handler_ctx, node);
                    }
                }
            }
        }

        let mut graph = handler_ctx.into_graph();
        parens::add_parens_indent(&mut graph, tokens);

        let resolved = resolver::resolve_all(&graph, tokens, self.options.kind).map_err(|err| {
            warn!(error = %err, "indentation could not be resolved");
            LintError::Internal {
                rule: "indent",
                message: err.to_string(),
            }
        })?;

        let mismatches = Validator::new(tokens, &graph, &resolved, self.options.kind).mismatches();
        debug!(
            tokens = tokens.len(),
            mismatches = mismatches.len(),
            "checked indentation"
        );

        Ok(mismatches
            .into_iter()
            .map(|mismatch| self.diagnostic(tokens, mismatch))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsindent_js_parser::JsParser;
    use jsindent_text_size::Ranged;

    fn check_source(source: &str, options: IndentOptions) -> Vec<(usize, String)> {
        let mut parser = JsParser::new();
        let result = parser.parse(source).unwrap();
        let ctx = CheckContext::new(source, result.tree.root_node());
        let rule = Indent::new(options);
        rule.check(&ctx)
            .unwrap()
            .into_iter()
            .map(|d| {
                let line = ctx.source_code().line_column(d.range.start()).line.get();
                (line, d.kind.body)
            })
            .collect()
    }

    #[test]
    fn test_valid_block() {
        assert!(check_source("if (a) {\n  b();\n}\n", IndentOptions::spaces(2)).is_empty());
    }

    #[test]
    fn test_unindented_statement() {
        let diagnostics = check_source("if (a) {\nb();\n}", IndentOptions::spaces(2));
        assert_eq!(
            diagnostics,
            vec![(2, "Expected indentation of 2 spaces but found 0.".to_string())]
        );
    }

    #[test]
    fn test_other_character_is_spelled_out() {
        let diagnostics = check_source("if (a) {\n\tb();\n}", IndentOptions::spaces(4));
        assert_eq!(
            diagnostics,
            vec![(2, "Expected indentation of 4 spaces but found 1 tab.".to_string())]
        );
    }

    #[test]
    fn test_tabs() {
        assert!(check_source("if (a) {\n\tb();\n}", IndentOptions::tabs()).is_empty());
        let diagnostics = check_source("if (a) {\n\t\tb();\n}", IndentOptions::tabs());
        assert_eq!(
            diagnostics,
            vec![(2, "Expected indentation of 1 tab but found 2.".to_string())]
        );
    }

    #[test]
    fn test_fix_replaces_leading_whitespace() {
        let source = "function f() {\n      return 1;\n}";
        let mut parser = JsParser::new();
        let result = parser.parse(source).unwrap();
        let ctx = CheckContext::new(source, result.tree.root_node());
        let diagnostics = Indent::new(IndentOptions::spaces(2)).check(&ctx).unwrap();

        assert_eq!(diagnostics.len(), 1);
        let fix = diagnostics[0].fix.as_ref().unwrap();
        let edit = &fix.edits()[0];
        assert_eq!(edit.content(), Some("  "));
        assert_eq!(&source[edit.range()], "      ");
        assert_eq!(&source[diagnostics[0].range], "return");
    }

    #[test]
    fn test_from_config() {
        let rule = Indent::from_config(&[serde_json::json!(2)]).unwrap();
        assert_eq!(rule.options().size, 2);
        assert!(Indent::from_config(&[serde_json::json!("three")]).is_err());
    }
}
