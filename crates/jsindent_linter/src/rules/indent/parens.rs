//! Indentation inside grouping parentheses, applied after every construct.

use jsindent_js_cst::{TokenId, TokenSpan, TokenStream};
use tracing::trace;

use super::offsets::OffsetGraph;

/// Pair every `(` with its `)` and indent the tokens between them.
///
/// Parameter and argument parens are left to their lists. Inside other
/// parens, a token keeps its anchor when that anchor is also inside;
/// everything else moves one level in from the `(`. Pairs are visited from
/// the last one closed backwards, so outer parens are applied before the
/// parens nested in them.
pub fn add_parens_indent(graph: &mut OffsetGraph, tokens: &TokenStream) {
    let mut stack: Vec<TokenId> = Vec::new();
    let mut pairs: Vec<(TokenId, TokenId)> = Vec::new();

    for id in tokens.ids() {
        if tokens.is_punctuator(id, "(") {
            stack.push(id);
        } else if tokens.is_punctuator(id, ")")
            && let Some(left) = stack.pop()
        {
            pairs.push((left, id));
        }
    }

    for &(left, right) in pairs.iter().rev() {
        if !graph.is_parameter_paren(left) && !graph.is_parameter_paren(right) {
            let inside = |token: TokenId| left < token && token < right;
            for token in TokenSpan::new(left, right).interior() {
                if !graph.edge(token).anchor.is_some_and(inside) {
                    graph.set_offset(token, Some(left), 1);
                }
            }
            trace!(left = left.index(), right = right.index(), "indented parenthesized tokens");
        }
        graph.match_offset(left, right);
    }
}
