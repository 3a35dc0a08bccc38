//! Delimited lists: array and object literals and patterns, parameter and
//! argument lists, import and export specifiers.

use jsindent_config::ListOffset;
use jsindent_js_cst::{CstNode, TokenId, TokenSpan, TokenStream};

use super::base::{HandlerContext, unwrap_parens};

/// Indent the elements of a list delimited by `span.first` and `span.last`.
///
/// `None` elements are holes such as the middle of `[a, , b]`.
pub fn element_list(
    ctx: &mut HandlerContext,
    span: TokenSpan,
    elements: &[Option<CstNode>],
    offset: ListOffset,
) {
    let tokens = ctx.tokens();
    let first_of = |element: &CstNode| element_first_token(tokens, span, element);

    match offset {
        ListOffset::First => {
            let lead = elements
                .first()
                .copied()
                .flatten()
                .and_then(|element| first_of(&element));
            if let Some(lead) = lead {
                ctx.graph.ignore(lead);
            }
            ctx.graph.set_offsets(span.interior(), Some(span.first), 1);

            if let Some(lead) = lead {
                let column = tokens.get(lead).column;
                for element in elements.iter().skip(1).flatten() {
                    if let Some(token) = first_of(element) {
                        ctx.graph.set_absolute(token, column);
                    }
                }
            }
        }
        ListOffset::Levels(levels) => {
            ctx.graph.set_offsets(span.interior(), Some(span.first), levels);

            let opening_line = tokens.get(span.first).end_line;
            for pair in elements.windows(2) {
                let [Some(previous), Some(current)] = pair else {
                    continue;
                };
                let ends_below_opening = ctx
                    .last_token(&unwrap_parens(*previous))
                    .is_some_and(|last| tokens.get(last).end_line > opening_line);
                if ends_below_opening
                    && let (Some(previous), Some(current)) = (first_of(previous), first_of(current))
                {
                    ctx.graph.match_offset(previous, current);
                }
            }
        }
    }

    ctx.graph.match_offset(span.first, span.last);
}

/// First token of a list element, counting the parens wrapped around it.
fn element_first_token(tokens: &TokenStream, span: TokenSpan, element: &CstNode) -> Option<TokenId> {
    let first = tokens.first_code_in(element.range())?;
    let mut before = tokens.prev_code(first);
    while let Some(token) = before
        && token != span.first
        && tokens.is_punctuator(token, "(")
    {
        before = tokens.prev_code(token);
    }
    match before {
        Some(token) => tokens.next_code(token),
        None => tokens.code_ids().next(),
    }
}

/// Array elements in order, with `None` for every hole.
fn array_elements<'a>(node: &CstNode<'a>) -> Vec<Option<CstNode<'a>>> {
    let mut elements = Vec::new();
    let mut pending = None;
    for child in node.children().filter(|child| !child.is_extra()) {
        match child.kind() {
            "[" => {}
            "," => elements.push(pending.take()),
            "]" => {
                if pending.is_some() {
                    elements.push(pending.take());
                }
            }
            _ => pending = Some(child),
        }
    }
    elements
}

/// `[...]` and `{...}`, as literals or destructuring patterns.
pub fn array_or_object(ctx: &mut HandlerContext, node: CstNode, offset: ListOffset) {
    let Some(span) = ctx.span(&node) else {
        return;
    };
    let elements = match node.kind() {
        "array" | "array_pattern" => array_elements(&node),
        _ => node.syntax_children().map(Some).collect(),
    };
    element_list(ctx, span, &elements, offset);
}

/// Parameters of a function, method or arrow function.
///
/// The list runs from the token before the first parameter to the token
/// before the body. Without a configured offset the parameters are not
/// checked.
pub fn function_params(ctx: &mut HandlerContext, node: CstNode, parameters: Option<ListOffset>) {
    let tokens = ctx.tokens();
    let params: Vec<CstNode> = match node.child_by_field_name("parameters") {
        Some(list) => list.syntax_children().collect(),
        None => node.child_by_field_name("parameter").into_iter().collect(),
    };

    let Some(body_first) = node
        .child_by_field_name("body")
        .and_then(|body| ctx.first_token(&unwrap_parens(body)))
    else {
        return;
    };
    let opening = match params.first() {
        Some(param) => ctx.first_token(param).and_then(|first| tokens.prev_code(first)),
        None => tokens.prev_code(body_first).and_then(|before| tokens.prev_code(before)),
    };
    let (Some(opening), Some(closing), Some(node_first)) = (
        opening,
        tokens.prev_code(body_first),
        ctx.construct_first_token(&node),
    ) else {
        return;
    };

    let start = opening.max(node_first);
    if start > closing {
        return;
    }
    let span = TokenSpan::new(start, closing);
    ctx.graph.mark_parameter_paren(span.first);
    ctx.graph.mark_parameter_paren(span.last);

    let elements: Vec<Option<CstNode>> = params.iter().copied().map(Some).collect();
    element_list(ctx, span, &elements, parameters.unwrap_or(ListOffset::Levels(0)));

    if parameters.is_none() {
        for param in &params {
            if let Some(first) = ctx.first_token(param) {
                ctx.graph.ignore(first);
            }
        }
    }
}

/// `callee(...)` and `new Callee(...)`.
pub fn call_arguments(ctx: &mut HandlerContext, node: CstNode, callee_field: &str) {
    let Some(arguments) = node
        .child_by_field_name("arguments")
        .filter(|arguments| arguments.kind() == "arguments")
    else {
        return;
    };
    let (Some(open), Some(last)) = (ctx.first_token(&arguments), ctx.last_token(&node)) else {
        return;
    };

    let span = TokenSpan::new(open, last);
    ctx.graph.mark_parameter_paren(span.first);
    ctx.graph.mark_parameter_paren(span.last);

    if let Some(callee_last) = node
        .child_by_field_name(callee_field)
        .and_then(|callee| ctx.last_token(&unwrap_parens(callee)))
    {
        ctx.graph.match_offset(callee_last, open);
    }

    let args: Vec<CstNode> = arguments.syntax_children().collect();
    let elements: Vec<Option<CstNode>> = args.iter().copied().map(Some).collect();
    match ctx.options().call_expression.arguments {
        Some(offset) => element_list(ctx, span, &elements, offset),
        None => {
            element_list(ctx, span, &elements, ListOffset::Levels(1));
            for arg in args {
                if let Some(first) = ctx.first_token(&unwrap_parens(arg)) {
                    ctx.graph.ignore(first);
                }
            }
        }
    }
}

/// `export { a, b as c } from "x";`
pub fn export_specifiers(ctx: &mut HandlerContext, node: CstNode) {
    let Some(clause) = node
        .syntax_children()
        .find(|child| child.kind() == "export_clause")
    else {
        return;
    };
    let Some(span) = ctx.span(&clause) else {
        return;
    };

    let specifiers: Vec<Option<CstNode>> = clause
        .syntax_children()
        .filter(|child| child.kind() == "export_specifier")
        .map(Some)
        .collect();
    element_list(ctx, span, &specifiers, ListOffset::Levels(1));
}

/// `import a, { b, c as d } from "x";`
pub fn import_specifiers(ctx: &mut HandlerContext, node: CstNode) {
    let Some(named) = node
        .syntax_children()
        .find(|child| child.kind() == "import_clause")
        .and_then(|clause| clause.syntax_children().find(|child| child.kind() == "named_imports"))
    else {
        return;
    };
    let specifiers: Vec<Option<CstNode>> = named
        .syntax_children()
        .filter(|child| child.kind() == "import_specifier")
        .map(Some)
        .collect();
    if specifiers.is_empty() {
        return;
    }
    if let Some(span) = ctx.span(&named) {
        element_list(ctx, span, &specifiers, ListOffset::Levels(1));
    }
}
