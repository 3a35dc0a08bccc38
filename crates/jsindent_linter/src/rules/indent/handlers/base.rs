//! Shared state and tree helpers for the construct handlers.

use jsindent_config::IndentOptions;
use jsindent_js_cst::{CstNode, TokenId, TokenSpan, TokenStream};

use crate::rules::indent::offsets::OffsetGraph;

/// Grammar nodes that only group other nodes. They are skipped when
/// looking for the construct that owns a node.
const TRANSPARENT_KINDS: &[&str] = &[
    "parenthesized_expression",
    "else_clause",
    "finally_clause",
    "arguments",
    "formal_parameters",
    "switch_body",
    "class_heritage",
    "template_substitution",
    "named_imports",
    "import_clause",
    "export_clause",
];

/// Everything a handler reads and the graph it writes.
pub struct HandlerContext<'a> {
    tokens: &'a TokenStream<'a>,
    options: &'a IndentOptions,
    pub graph: OffsetGraph<'a>,
}

impl<'a> HandlerContext<'a> {
    pub fn new(tokens: &'a TokenStream<'a>, options: &'a IndentOptions) -> Self {
        Self {
            tokens,
            options,
            graph: OffsetGraph::new(tokens, options.size),
        }
    }

    pub fn tokens(&self) -> &'a TokenStream<'a> {
        self.tokens
    }

    pub fn options(&self) -> &'a IndentOptions {
        self.options
    }

    pub fn into_graph(self) -> OffsetGraph<'a> {
        self.graph
    }

    /// First non-comment token of `node`.
    pub fn first_token(&self, node: &CstNode) -> Option<TokenId> {
        self.tokens.first_code_in(node.range())
    }

    /// Last non-comment token of `node`.
    pub fn last_token(&self, node: &CstNode) -> Option<TokenId> {
        self.tokens.last_code_in(node.range())
    }

    /// Tokens and comments from the first to the last token of `node`.
    pub fn span(&self, node: &CstNode) -> Option<TokenSpan> {
        self.tokens.span_of(node.range())
    }

    /// First token of a construct. A method's function starts at its
    /// parameter list, after the name and modifiers.
    pub fn construct_first_token(&self, node: &CstNode) -> Option<TokenId> {
        if node.kind() == "method_definition"
            && let Some(parameters) = node.child_by_field_name("parameters")
        {
            return self.first_token(&parameters);
        }
        self.first_token(node)
    }
}

/// The nearest ancestor that is a construct of its own.
pub fn estree_parent<'a>(node: &CstNode<'a>) -> Option<CstNode<'a>> {
    let mut parent = node.parent()?;
    while TRANSPARENT_KINDS.contains(&parent.kind()) {
        parent = parent.parent()?;
    }
    Some(parent)
}

/// Strip grouping parentheses.
pub fn unwrap_parens(node: CstNode<'_>) -> CstNode<'_> {
    let mut node = node;
    while node.kind() == "parenthesized_expression" {
        let Some(inner) = node.syntax_children().next() else {
            break;
        };
        node = inner;
    }
    node
}

/// Whether `node` is a function called right where it is defined, at the
/// top level of the program.
///
/// `!function () {}()`, `var x = (function () {})();` and
/// `a = b || (() => {})()` all qualify.
pub fn is_outer_iife(node: &CstNode) -> bool {
    let Some(call) = estree_parent(node) else {
        return false;
    };
    if call.kind() != "call_expression"
        || call
            .child_by_field_name("function")
            .is_none_or(|callee| unwrap_parens(callee) != *node)
    {
        return false;
    }

    let mut statement = estree_parent(&call);
    while let Some(current) = statement
        && runs_operand_immediately(&current)
    {
        statement = estree_parent(&current);
    }

    statement.is_some_and(|statement| {
        matches!(
            statement.kind(),
            "expression_statement" | "variable_declaration" | "lexical_declaration"
        ) && estree_parent(&statement).is_some_and(|parent| parent.kind() == "program")
    })
}

fn runs_operand_immediately(node: &CstNode) -> bool {
    let operator = || node.child_by_field_name("operator").map(|op| op.kind());
    match node.kind() {
        "unary_expression" => matches!(operator(), Some("!" | "~" | "+" | "-")),
        "binary_expression" => matches!(operator(), Some("&&" | "||" | "??")),
        "assignment_expression"
        | "augmented_assignment_expression"
        | "sequence_expression"
        | "variable_declarator" => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsindent_js_cst::TreeWalker;
    use jsindent_js_parser::JsParser;

    fn first_of_kind<'a>(root: tree_sitter::Node<'a>, source: &'a str, kinds: &[&str]) -> CstNode<'a> {
        TreeWalker::new(root, source)
            .find(|node| node.is_named() && kinds.contains(&node.kind()))
            .unwrap()
    }

    fn outer_iife(source: &str) -> bool {
        let mut parser = JsParser::new();
        let result = parser.parse(source).unwrap();
        let function = first_of_kind(
            result.tree.root_node(),
            source,
            &["function_expression", "function", "arrow_function"],
        );
        is_outer_iife(&function)
    }

    #[test]
    fn test_outer_iife_forms() {
        assert!(outer_iife("(function () {})();"));
        assert!(outer_iife("(function () {}());"));
        assert!(outer_iife("!function () {}();"));
        assert!(outer_iife("var x = (function () {})();"));
        assert!(outer_iife("a = b || (() => {})();"));
    }

    #[test]
    fn test_not_outer_iife() {
        assert!(!outer_iife("foo(function () {});"));
        assert!(!outer_iife("if (a) { (function () {})(); }"));
        assert!(!outer_iife("var f = function () {};"));
        assert!(!outer_iife("typeof function () {}();"));
    }

    #[test]
    fn test_estree_parent_skips_grouping_nodes() {
        let source = "foo((a), b);";
        let mut parser = JsParser::new();
        let result = parser.parse(source).unwrap();
        let identifier = TreeWalker::new(result.tree.root_node(), source)
            .find(|node| node.kind() == "identifier" && node.text() == "a")
            .unwrap();
        assert_eq!(estree_parent(&identifier).unwrap().kind(), "call_expression");

        let argument = identifier.parent().unwrap();
        assert_eq!(argument.kind(), "parenthesized_expression");
        assert_eq!(unwrap_parens(argument), identifier);
    }
}
