//! Comparing resolved indentation with what the file actually has.

use jsindent_config::IndentKind;
use jsindent_js_cst::{TokenId, TokenStream};

use super::indent_level::ActualIndent;
use super::offsets::OffsetGraph;
use super::resolver::ResolvedIndents;

/// A line-leading token whose indentation is wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    pub token: TokenId,
    /// Expected characters of the configured kind.
    pub expected: u32,
    pub actual: ActualIndent,
}

pub struct Validator<'a> {
    tokens: &'a TokenStream<'a>,
    graph: &'a OffsetGraph<'a>,
    resolved: &'a ResolvedIndents,
    kind: IndentKind,
}

impl<'a> Validator<'a> {
    pub fn new(
        tokens: &'a TokenStream<'a>,
        graph: &'a OffsetGraph<'a>,
        resolved: &'a ResolvedIndents,
        kind: IndentKind,
    ) -> Self {
        Self {
            tokens,
            graph,
            resolved,
            kind,
        }
    }

    /// Every mismatch in the file, code and comments, in source order.
    pub fn mismatches(&self) -> Vec<Mismatch> {
        let mut mismatches = self.code_mismatches();
        mismatches.extend(self.comment_mismatches());
        mismatches.sort_by_key(|mismatch| mismatch.token);
        mismatches
    }

    fn code_mismatches(&self) -> Vec<Mismatch> {
        self.tokens
            .code_ids()
            .filter(|&id| self.tokens.is_first_of_line(id) && !self.graph.is_ignored(id))
            .filter_map(|id| {
                let expected = self.resolved.get(id);
                let actual = ActualIndent::of_token(self.tokens, id);
                (!actual.satisfies(expected, self.kind)).then_some(Mismatch {
                    token: id,
                    expected,
                    actual,
                })
            })
            .collect()
    }

    /// A line-leading comment may line up with the line of the code before
    /// it, the line of the code after it, or its own resolved position.
    fn comment_mismatches(&self) -> Vec<Mismatch> {
        let mut mismatches = Vec::new();
        let mut preceding: Option<TokenId> = None;

        for id in self.tokens.ids() {
            if !self.tokens.is_comment(id) {
                preceding = Some(id);
                continue;
            }
            if !self.tokens.has_blank_prefix(id) || self.graph.is_ignored(id) {
                continue;
            }

            let actual = ActualIndent::of_token(self.tokens, id);
            let fits = |token: TokenId| actual.satisfies(self.resolved.get(token), self.kind);

            let line_before = preceding.map(|token| self.tokens.first_of_line_of(token));
            let next_code = match preceding {
                Some(token) => self.tokens.next_code(token),
                None => self.tokens.code_ids().next(),
            };
            let line_after = next_code.map(|token| self.tokens.first_of_line_of(token));

            let matches_before = line_before.is_some_and(fits);
            let matches_after = line_after.is_some_and(fits);
            let matches_own = fits(id);

            if !matches_before && !matches_after && !matches_own {
                mismatches.push(Mismatch {
                    token: id,
                    expected: self.resolved.get(id),
                    actual,
                });
            }
        }

        mismatches
    }
}
