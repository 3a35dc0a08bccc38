//! `var`, `let` and `const` declarations.

use jsindent_config::VariableKind;
use jsindent_js_cst::CstNode;

use super::base::{HandlerContext, unwrap_parens};

fn declaration_kind(node: &CstNode) -> VariableKind {
    if node.kind() != "lexical_declaration" {
        return VariableKind::Var;
    }
    let keyword = node
        .child_by_field_name("kind")
        .or_else(|| node.children().next());
    match keyword.map(|keyword| keyword.kind()) {
        Some("const") => VariableKind::Const,
        _ => VariableKind::Let,
    }
}

/// Everything after the keyword is indented by the keyword's configured
/// levels. A trailing semicolon is not checked.
pub fn variable_declaration(ctx: &mut HandlerContext, node: CstNode) {
    let tokens = ctx.tokens();
    let levels = ctx.options().variable_declarator.get(declaration_kind(&node));
    let Some(span) = ctx.span(&node) else {
        return;
    };
    ctx.graph.set_offsets(span.tail(), Some(span.first), levels);
    if tokens.is_punctuator(span.last, ";") {
        ctx.graph.ignore(span.last);
    }
}

/// The first token of an initializer is not checked.
pub fn variable_declarator(ctx: &mut HandlerContext, node: CstNode) {
    if let Some(first) = node
        .child_by_field_name("value")
        .and_then(|value| ctx.first_token(&unwrap_parens(value)))
    {
        ctx.graph.ignore(first);
    }
}

/// On leaving the first of several declarators, push its initializer one
/// more step in, so that
///
/// ```text
/// var a = {
///         b: 1
///     },
///     c = 2;
/// ```
///
/// is accepted with a unit of 4. Tokens anchored inside the initializer
/// move with their anchors and are left alone.
pub fn variable_declarator_exit(ctx: &mut HandlerContext, node: CstNode) {
    let Some(declaration) = node.parent() else {
        return;
    };
    let mut declarators = declaration
        .syntax_children()
        .filter(|child| child.kind() == "variable_declarator");
    if declarators.next() != Some(node) || declarators.next().is_none() {
        return;
    }

    let Some(span) = node
        .child_by_field_name("value")
        .and_then(|value| ctx.span(&unwrap_parens(value)))
    else {
        return;
    };
    let levels = ctx
        .options()
        .variable_declarator
        .get(declaration_kind(&declaration));

    for token in span.ids() {
        let anchored_inside = ctx
            .graph
            .edge(token)
            .anchor
            .is_some_and(|anchor| span.contains(anchor));
        if !anchored_inside {
            ctx.graph.add_offset(token, levels);
        }
    }
}
