//! Blocks, control flow, classes and `switch`.

use std::collections::HashSet;

use jsindent_js_cst::{CstNode, TokenId};

use super::base::{HandlerContext, estree_parent, is_outer_iife};

/// `{ ... }` as a statement or a body.
///
/// The interior is indented from the brace. When the brace does not start
/// its line, the braces follow the first token of the owning construct, so
/// a body keeps its indentation however the header wraps.
pub fn block(ctx: &mut HandlerContext, node: CstNode) {
    let tokens = ctx.tokens();
    let options = ctx.options();
    let Some(span) = ctx.span(&node) else {
        return;
    };
    let parent = estree_parent(&node);

    let levels = match parent.as_ref().map(|parent| (parent, parent.kind())) {
        Some((parent, _)) if is_outer_iife(parent) => options.outer_iife_body,
        Some((
            _,
            "function_expression" | "function" | "generator_function" | "method_definition"
            | "arrow_function",
        )) => options.function_expression.body,
        Some((_, "function_declaration" | "generator_function_declaration")) => {
            options.function_declaration.body
        }
        _ => 1,
    };

    let open = span.first;
    let anchor = if tokens.is_first_of_line(open) {
        open
    } else {
        parent
            .and_then(|parent| ctx.construct_first_token(&parent))
            .unwrap_or(open)
    };

    ctx.graph.match_offset(anchor, open);
    ctx.graph.set_offsets(span.interior(), Some(open), levels);
    ctx.graph.match_offset(anchor, span.last);
}

/// Indent a body that is not a block one level past its statement.
pub fn blockless_body(ctx: &mut HandlerContext, body: Option<CstNode>, statement: &CstNode) {
    let Some(body) = body.filter(|body| body.kind() != "statement_block") else {
        return;
    };
    let (Some(span), Some(anchor)) = (ctx.span(&body), ctx.first_token(statement)) else {
        return;
    };
    ctx.graph.set_offsets(span.ids(), Some(anchor), 1);
}

/// `while`, `do ... while` and `for ... in` / `for ... of`.
pub fn loop_body(ctx: &mut HandlerContext, node: CstNode) {
    blockless_body(ctx, node.child_by_field_name("body"), &node);
}

/// `if` bodies, following `else if` chains.
pub fn if_statement(ctx: &mut HandlerContext, node: CstNode) {
    blockless_body(ctx, node.child_by_field_name("consequence"), &node);

    let Some(alternative) = node
        .child_by_field_name("alternative")
        .and_then(|clause| clause.syntax_children().next())
    else {
        return;
    };
    if alternative.kind() == "if_statement" {
        if_statement(ctx, alternative);
    } else {
        blockless_body(ctx, Some(alternative), &node);
    }
}

/// `for (init; test; update)`: the header parts are indented from `(`.
pub fn for_statement(ctx: &mut HandlerContext, node: CstNode) {
    let tokens = ctx.tokens();
    if let Some(open) = ctx.first_token(&node).and_then(|first| tokens.next_code(first)) {
        for field in ["initializer", "condition", "increment"] {
            for part in node.children_by_field_name(field) {
                if !part.is_named() || part.kind() == "empty_statement" {
                    continue;
                }
                if let Some(span) = ctx.span(&part) {
                    ctx.graph.set_offsets(span.ids(), Some(open), 1);
                }
            }
        }
    }
    blockless_body(ctx, node.child_by_field_name("body"), &node);
}

/// Class declarations and expressions, measured from the `class` keyword.
pub fn class(ctx: &mut HandlerContext, node: CstNode) {
    let Some(span) = ctx.span(&node) else {
        return;
    };
    ctx.graph.set_offsets(span.interior(), Some(span.first), 1);
    ctx.graph.match_offset(span.first, span.last);
}

/// `switch`: cases are indented from `{`, and what follows a case label is
/// indented from the label unless the case body is a single block.
pub fn switch(ctx: &mut HandlerContext, node: CstNode) {
    let tokens = ctx.tokens();
    let Some(body) = node.child_by_field_name("body") else {
        return;
    };
    let Some(span) = ctx.span(&body) else {
        return;
    };
    let open = span.first;
    let case_levels = ctx.options().switch_case;
    ctx.graph.set_offsets(span.interior(), Some(open), case_levels);

    let cases: Vec<CstNode> = body
        .syntax_children()
        .filter(|child| matches!(child.kind(), "switch_case" | "switch_default"))
        .collect();
    let labels: Vec<TokenId> = cases.iter().filter_map(|case| ctx.first_token(case)).collect();
    let last_label = labels.last().copied();
    let label_set: HashSet<TokenId> = labels.iter().copied().collect();
    let block_labels: HashSet<TokenId> = cases
        .iter()
        .filter(|case| has_single_block(case))
        .filter_map(|case| ctx.first_token(case))
        .collect();

    let mut anchor = open;
    for token in span.interior() {
        if label_set.contains(&token) {
            anchor = token;
        } else if Some(anchor) == last_label && tokens.is_comment(token) {
            ctx.graph.ignore(token);
        } else if !block_labels.contains(&anchor) {
            ctx.graph.set_offset(token, Some(anchor), 1);
        }
    }
}

/// Whether the statements after a case label are exactly one block.
fn has_single_block(case: &CstNode) -> bool {
    let mut past_colon = false;
    let mut statements = Vec::new();
    for child in case.children() {
        if !past_colon {
            past_colon = !child.is_named() && child.kind() == ":";
        } else if child.is_named() && !child.is_extra() {
            statements.push(child);
        }
    }
    matches!(statements.as_slice(), [only] if only.kind() == "statement_block")
}
