//! Operators, member access, properties, arrow bodies and template literals.

use jsindent_js_cst::{CstNode, TokenSpan};

use super::base::{HandlerContext, unwrap_parens};
use super::lists::function_params;

/// `a + b`, `a && b`: only what follows the operator is indented, and the
/// operator and the token after it are not checked.
pub fn binary(ctx: &mut HandlerContext, node: CstNode) {
    let tokens = ctx.tokens();
    let Some(operator) = node
        .child_by_field_name("operator")
        .and_then(|operator| tokens.token_starting_at(operator.range().start()))
    else {
        return;
    };
    let (Some(after), Some(first), Some(last)) = (
        tokens.next_code(operator),
        ctx.first_token(&node),
        ctx.last_token(&node),
    ) else {
        return;
    };

    ctx.graph.ignore(operator);
    ctx.graph.ignore(after);
    ctx.graph.set_offset(after, Some(first), 1);
    if after < last {
        ctx.graph
            .set_offsets(TokenSpan::new(after, last).tail(), Some(after), 1);
    }
}

/// `a = b` and `a += b`: indented from the start of the assignment target.
pub fn assignment(ctx: &mut HandlerContext, node: CstNode) {
    let tokens = ctx.tokens();
    let Some(left) = node.child_by_field_name("left") else {
        return;
    };
    let Some(operator) = node
        .child_by_field_name("operator")
        .or_else(|| node.token_child("="))
        .and_then(|operator| tokens.token_starting_at(operator.range().start()))
    else {
        return;
    };
    let (Some(target), Some(last)) = (ctx.first_token(&unwrap_parens(left)), ctx.last_token(&node))
    else {
        return;
    };
    if operator > last {
        return;
    }

    let span = TokenSpan::new(operator, last);
    ctx.graph.set_offsets(span.ids(), Some(target), 1);
    ctx.graph.ignore(operator);
    if let Some(next) = span.nth(1) {
        ctx.graph.ignore(next);
    }
}

/// `test ? a : b`
pub fn conditional(ctx: &mut HandlerContext, node: CstNode) {
    if let Some(span) = ctx.span(&node) {
        ctx.graph.set_offsets(span.tail(), Some(span.first), 1);
    }
}

/// `object.property`, `object[index]` and their optional forms.
///
/// The access starts at the first token after the object that is not a
/// closing paren. By default it keeps whatever indentation its line has;
/// a configured offset indents it from the object instead.
pub fn member(ctx: &mut HandlerContext, node: CstNode) {
    let tokens = ctx.tokens();
    let Some(object) = node.child_by_field_name("object").map(unwrap_parens) else {
        return;
    };
    let Some(property) = node
        .child_by_field_name("property")
        .or_else(|| node.child_by_field_name("index"))
        .map(unwrap_parens)
    else {
        return;
    };
    let (Some(object_first), Some(object_last), Some(property_first), Some(last)) = (
        ctx.first_token(&object),
        ctx.last_token(&object),
        ctx.first_token(&property),
        ctx.last_token(&node),
    ) else {
        return;
    };
    let Some(access) = tokens
        .code_between(object_last, property_first)
        .find(|&token| !tokens.is_punctuator(token, ")"))
    else {
        return;
    };

    let span = TokenSpan::new(access, last);
    ctx.graph.set_offsets(span.tail(), Some(access), 0);

    let leading = [Some(access), span.nth(1)];
    match ctx.options().member_expression {
        Some(levels) => {
            for token in leading.into_iter().flatten() {
                ctx.graph.set_offset(token, Some(object_first), levels);
            }
        }
        None => {
            for token in leading.into_iter().flatten() {
                ctx.graph.match_offset(tokens.first_of_line_of(token), token);
                ctx.graph.ignore(token);
            }
        }
    }
}

/// `key: value`: the value's first token is not checked.
pub fn property(ctx: &mut HandlerContext, node: CstNode) {
    let tokens = ctx.tokens();
    if node
        .child_by_field_name("key")
        .is_some_and(|key| key.kind() == "computed_property_name")
    {
        return;
    }
    if let Some(value) = node
        .token_child(":")
        .and_then(|colon| tokens.token_starting_at(colon.range().start()))
        .and_then(|colon| tokens.next_code(colon))
    {
        ctx.graph.ignore(value);
    }
}

/// Arrow functions: parameters like a function expression, and an
/// expression body one level past the arrow function's start.
pub fn arrow_function(ctx: &mut HandlerContext, node: CstNode) {
    let parameters = ctx.options().function_expression.parameters;
    function_params(ctx, node, parameters);

    let Some(body) = node
        .child_by_field_name("body")
        .filter(|body| body.kind() != "statement_block")
    else {
        return;
    };
    if let (Some(span), Some(first)) = (ctx.span(&unwrap_parens(body)), ctx.first_token(&node)) {
        ctx.graph.set_offsets(span.ids(), Some(first), 1);
    }
}

/// Template literals: substitutions are indented from the template part
/// before them when that part fits on one line, and from column 0 otherwise.
pub fn template(ctx: &mut HandlerContext, node: CstNode) {
    let tokens = ctx.tokens();
    let Some(mut previous) = tokens.token_starting_at(node.range().start()) else {
        return;
    };

    for substitution in node
        .children()
        .filter(|child| child.kind() == "template_substitution")
    {
        let Some(next) = substitution
            .children()
            .filter(|child| child.kind() == "}")
            .last()
            .and_then(|close| tokens.token_starting_at(close.range().start()))
        else {
            return;
        };

        let part = tokens.get(previous);
        let align = (part.start_line == part.end_line).then_some(previous);
        ctx.graph
            .set_offsets(tokens.code_between(previous, next), align, 1);
        ctx.graph.set_offset(next, align, 0);
        previous = next;
    }
}
