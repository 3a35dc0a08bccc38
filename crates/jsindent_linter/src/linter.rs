//! Runs the configured rules over one source file.

use jsindent_config::MergedConfig;
use jsindent_diagnostics::Diagnostic;
use jsindent_js_parser::JsParser;
use jsindent_source_file::{LineIndex, SourceCode};
use jsindent_text_size::{Ranged, TextSize};
use tracing::debug;

use crate::{CheckContext, LintError, LintResult, Rule, RuleRegistry, SuppressionContext};

/// A diagnostic together with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDiagnostic {
    pub rule: &'static str,
    pub diagnostic: Diagnostic,
}

struct ActiveRule {
    rule: Box<dyn Rule>,
    /// Whether the rule's fixes are kept. Rules in check mode only report.
    fix: bool,
}

#[derive(Default)]
pub struct Linter {
    rules: Vec<ActiveRule>,
}

impl Linter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rule(&mut self, rule: Box<dyn Rule>, fix: bool) {
        self.rules.push(ActiveRule { rule, fix });
    }

    #[must_use]
    pub fn with_rule(mut self, rule: Box<dyn Rule>) -> Self {
        self.add_rule(rule, true);
        self
    }

    /// Instantiate every enabled rule the registry knows about.
    ///
    /// Rules without an implementation are skipped; invalid options are an error.
    pub fn from_config(config: &MergedConfig, registry: &RuleRegistry) -> Result<Self, LintError> {
        let mut linter = Self::new();
        for configured in config.enabled_rules() {
            match registry.create_rule(&configured.name, &configured.options) {
                Some(Ok(rule)) => linter.add_rule(rule, configured.should_fix()),
                Some(Err(source)) => {
                    return Err(LintError::Options {
                        rule: configured.name.clone(),
                        source,
                    });
                }
                None => debug!(rule = %configured.name, "no implementation, skipping"),
            }
        }
        Ok(linter)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|active| active.rule.name())
    }

    /// Parse `source` and run every rule, dropping suppressed diagnostics.
    ///
    /// Diagnostics are sorted by position.
    pub fn lint(&self, source: &str) -> Result<LintResult, LintError> {
        let mut parser = JsParser::new();
        let parsed = parser.parse(source).ok_or(LintError::NoTree)?;

        if parsed.has_syntax_error() {
            let offset = parsed.first_error_offset().unwrap_or(0);
            let line_index = LineIndex::from_source_text(source);
            let location = SourceCode::new(source, &line_index)
                .line_column(TextSize::try_from(offset).unwrap_or_default());
            return Err(LintError::Syntax {
                line: location.line.get(),
                column: location.column.get(),
            });
        }

        let ctx = CheckContext::new(source, parsed.tree.root_node());
        let suppressions = SuppressionContext::from_tokens(ctx.tokens(), ctx.line_index());

        let mut result = LintResult::new();
        for active in &self.rules {
            let name = active.rule.name();
            for mut diagnostic in active.rule.check(&ctx)? {
                if suppressions.is_suppressed(name, diagnostic.start()) {
                    continue;
                }
                if !active.fix {
                    diagnostic.fix = None;
                }
                result.diagnostics.push(RuleDiagnostic {
                    rule: name,
                    diagnostic,
                });
            }
        }

        result
            .diagnostics
            .sort_by_key(|d| (d.diagnostic.start(), d.rule));

        debug!(
            rules = self.rules.len(),
            tokens = ctx.tokens().len(),
            reported = result.len(),
            "linted source"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Indent;
    use jsindent_config::IndentOptions;

    #[test]
    fn test_lint_reports_sorted_diagnostics() {
        let linter = Linter::new().with_rule(Box::new(Indent::new(IndentOptions::spaces(2))));
        let result = linter.lint("if (a) {\nb();\n    c();\n}").unwrap();

        let lines: Vec<_> = result
            .diagnostics
            .iter()
            .map(|d| d.diagnostic.start())
            .collect();
        assert_eq!(result.len(), 2);
        assert!(lines.windows(2).all(|w| w[0] <= w[1]));
        assert!(result.diagnostics.iter().all(|d| d.rule == "indent"));
    }

    #[test]
    fn test_syntax_error_is_reported_as_error() {
        let linter = Linter::new().with_rule(Box::new(Indent::default()));
        let err = linter.lint("var = ;\n").unwrap_err();
        assert!(matches!(err, LintError::Syntax { line: 1, .. }));
    }

    #[test]
    fn test_check_mode_strips_fixes() {
        let mut linter = Linter::new();
        linter.add_rule(Box::new(Indent::new(IndentOptions::spaces(2))), false);
        let result = linter.lint("if (a) {\nb();\n}").unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.fixable().count(), 0);
    }

    #[test]
    fn test_from_config_skips_unknown_rules() {
        let eslint = jsindent_config::EslintConfig::parse(
            r#"{ "rules": { "indent": ["error", 2], "semi": "error" } }"#,
        )
        .unwrap();
        let config = MergedConfig::new(Some(&eslint), None).unwrap();
        let linter = Linter::from_config(&config, &RuleRegistry::builtin()).unwrap();
        assert_eq!(linter.rule_names().collect::<Vec<_>>(), vec!["indent"]);
    }

    #[test]
    fn test_from_config_rejects_bad_options() {
        let eslint = jsindent_config::EslintConfig::parse(
            r#"{ "rules": { "indent": ["error", "three"] } }"#,
        )
        .unwrap();
        let config = MergedConfig::new(Some(&eslint), None).unwrap();
        assert!(matches!(
            Linter::from_config(&config, &RuleRegistry::builtin()),
            Err(LintError::Options { .. })
        ));
    }
}
