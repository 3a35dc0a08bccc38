//! Inline ESLint directive support.
//!
//! Recognized comments:
//! - `/* eslint-disable */` and `/* eslint-enable */`, optionally naming rules
//! - `// eslint-disable-line` and `// eslint-disable-next-line`, optionally naming rules
//!
//! Suppressions are tracked as regions where a rule is disabled.

use std::collections::HashMap;

use jsindent_js_cst::{TokenKind, TokenStream};
use jsindent_source_file::{LineIndex, OneIndexed};
use jsindent_text_size::TextSize;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DIRECTIVE: Regex = Regex::new(
        r"^\s*(eslint-disable-next-line|eslint-disable-line|eslint-disable|eslint-enable)(?:\s+(.*?))?\s*$"
    )
    .unwrap();
    static ref RULE_SEPARATOR: Regex = Regex::new(r"\s*,\s*").unwrap();
}

/// Key used for directives that name no rule.
const ALL_RULES: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    Disable,
    Enable,
    DisableLine,
    DisableNextLine,
}

impl Directive {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "eslint-disable" => Some(Self::Disable),
            "eslint-enable" => Some(Self::Enable),
            "eslint-disable-line" => Some(Self::DisableLine),
            "eslint-disable-next-line" => Some(Self::DisableNextLine),
            _ => None,
        }
    }
}

/// A region where a specific rule is disabled.
#[derive(Debug, Clone)]
pub struct SuppressionRegion {
    /// The rule name being suppressed (or "*" for all rules).
    pub rule: String,
    pub start: TextSize,
    pub end: TextSize,
}

impl SuppressionRegion {
    fn contains(&self, pos: TextSize) -> bool {
        self.start <= pos && pos < self.end
    }
}

/// Manages suppressions for a source file.
#[derive(Debug, Default)]
pub struct SuppressionContext {
    regions: HashMap<String, Vec<SuppressionRegion>>,
}

impl SuppressionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect directives from the comments of a token stream.
    pub fn from_tokens(tokens: &TokenStream, line_index: &LineIndex) -> Self {
        let mut ctx = Self::new();
        let source = tokens.source();
        let end_of_file = TextSize::of(source);
        let mut open: HashMap<String, TextSize> = HashMap::new();

        for id in tokens.comment_ids() {
            let token = tokens.get(id);
            let Some((directive, rules)) = parse_directive(tokens.text(id), token.kind) else {
                continue;
            };

            match directive {
                Directive::Disable => {
                    for rule in rules {
                        open.entry(rule).or_insert(token.start());
                    }
                }
                Directive::Enable => {
                    let closing: Vec<String> = if rules == [ALL_RULES] {
                        open.keys().cloned().collect()
                    } else {
                        rules
                    };
                    for rule in closing {
                        if let Some(start) = open.remove(&rule) {
                            ctx.add_region(rule, start, token.start());
                        }
                    }
                }
                Directive::DisableLine | Directive::DisableNextLine => {
                    let mut line = line_index.line_index(token.start());
                    if directive == Directive::DisableNextLine {
                        line = OneIndexed::from_zero_indexed(line.get());
                    }
                    let range = line_index.line_range(line, source);
                    for rule in rules {
                        // Include the end so a diagnostic at the very end of the line matches.
                        ctx.add_region(rule, range.start(), range.end() + TextSize::new(1));
                    }
                }
            }
        }

        for (rule, start) in open {
            ctx.add_region(rule, start, end_of_file + TextSize::new(1));
        }

        ctx
    }

    fn add_region(&mut self, rule: String, start: TextSize, end: TextSize) {
        self.regions
            .entry(rule.clone())
            .or_default()
            .push(SuppressionRegion { rule, start, end });
    }

    /// Check if a diagnostic at the given position for the given rule is suppressed.
    pub fn is_suppressed(&self, rule_name: &str, pos: TextSize) -> bool {
        [rule_name, ALL_RULES].into_iter().any(|key| {
            self.regions
                .get(key)
                .is_some_and(|regions| regions.iter().any(|region| region.contains(pos)))
        })
    }

    pub fn has_suppressions(&self) -> bool {
        !self.regions.is_empty()
    }
}

/// Parse a comment into a directive and the rules it names.
///
/// Line comments may only carry the line directives, as in ESLint.
fn parse_directive(comment: &str, kind: TokenKind) -> Option<(Directive, Vec<String>)> {
    let body = match kind {
        TokenKind::LineComment => comment.strip_prefix("//")?,
        TokenKind::BlockComment => comment.strip_prefix("/*")?.strip_suffix("*/")?,
        _ => return None,
    };

    let captures = DIRECTIVE.captures(body)?;
    let directive = Directive::from_keyword(captures.get(1)?.as_str())?;
    if kind == TokenKind::LineComment
        && matches!(directive, Directive::Disable | Directive::Enable)
    {
        return None;
    }

    let rules: Vec<String> = captures
        .get(2)
        .map(|m| {
            RULE_SEPARATOR
                .split(m.as_str())
                .filter(|rule| !rule.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    if rules.is_empty() {
        Some((directive, vec![ALL_RULES.to_string()]))
    } else {
        Some((directive, rules))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsindent_js_parser::JsParser;

    fn context_for(source: &str) -> SuppressionContext {
        let mut parser = JsParser::new();
        let result = parser.parse(source).expect("Failed to parse");
        let line_index = LineIndex::from_source_text(source);
        let tokens = TokenStream::new(result.tree.root_node(), source, &line_index);
        SuppressionContext::from_tokens(&tokens, &line_index)
    }

    fn pos(source: &str, needle: &str) -> TextSize {
        TextSize::try_from(source.find(needle).unwrap()).unwrap()
    }

    #[test]
    fn test_disable_enable_block() {
        let source = "a();\n/* eslint-disable indent */\n  b();\n/* eslint-enable indent */\n  c();\n";
        let ctx = context_for(source);

        assert!(ctx.has_suppressions());
        assert!(ctx.is_suppressed("indent", pos(source, "b()")));
        assert!(!ctx.is_suppressed("indent", pos(source, "c()")));
        assert!(!ctx.is_suppressed("indent", pos(source, "a()")));
        assert!(!ctx.is_suppressed("semi", pos(source, "b()")));
    }

    #[test]
    fn test_disable_all_until_end_of_file() {
        let source = "a();\n/* eslint-disable */\n  b();\n";
        let ctx = context_for(source);
        assert!(ctx.is_suppressed("indent", pos(source, "b()")));
        assert!(ctx.is_suppressed("anything", TextSize::of(source)));
    }

    #[test]
    fn test_enable_without_rules_closes_everything() {
        let source = "/* eslint-disable indent, semi */\nb();\n/* eslint-enable */\nc();\n";
        let ctx = context_for(source);
        assert!(ctx.is_suppressed("semi", pos(source, "b()")));
        assert!(!ctx.is_suppressed("indent", pos(source, "c()")));
        assert!(!ctx.is_suppressed("semi", pos(source, "c()")));
    }

    #[test]
    fn test_disable_line_and_next_line() {
        let source = "  a(); // eslint-disable-line indent\n// eslint-disable-next-line\n  b();\n  c();\n";
        let ctx = context_for(source);

        assert!(ctx.is_suppressed("indent", pos(source, "  a()")));
        assert!(ctx.is_suppressed("indent", pos(source, "  b()")));
        assert!(!ctx.is_suppressed("indent", pos(source, "  c()")));
    }

    #[test]
    fn test_line_comment_cannot_disable_region() {
        let source = "// eslint-disable\n  a();\n";
        let ctx = context_for(source);
        assert!(!ctx.has_suppressions());
    }

    #[test]
    fn test_directive_parsing() {
        assert_eq!(
            parse_directive("/* eslint-disable indent , semi */", TokenKind::BlockComment),
            Some((
                Directive::Disable,
                vec!["indent".to_string(), "semi".to_string()]
            ))
        );
        assert_eq!(
            parse_directive("// eslint-disable-line", TokenKind::LineComment),
            Some((Directive::DisableLine, vec!["*".to_string()]))
        );
        assert_eq!(parse_directive("// eslint is great", TokenKind::LineComment), None);
    }
}
