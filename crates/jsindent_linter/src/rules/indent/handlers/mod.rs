//! Construct handlers.
//!
//! Each handler installs offsets for one kind of construct and never reads
//! resolved indentation. Handlers run in tree order on entry, so inner
//! constructs overwrite what their parents set.

mod base;
mod declarations;
mod expressions;
mod lists;
mod statements;

use std::collections::HashMap;
use std::sync::OnceLock;

use jsindent_config::ListOffset;
use jsindent_js_cst::CstNode;
use jsindent_js_parser::js_kind_id_map;

pub use base::HandlerContext;

/// A construct with an indentation policy of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construct {
    Array,
    ArrayPattern,
    Object,
    ObjectPattern,
    ArrowFunction,
    Assignment,
    Binary,
    Block,
    Call,
    New,
    Class,
    Conditional,
    Loop,
    For,
    ExportNamed,
    FunctionDeclaration,
    FunctionExpression,
    If,
    ImportNamed,
    Member,
    Property,
    Switch,
    Template,
    VariableDeclaration,
    VariableDeclarator,
}

/// Grammar node kinds for each construct. Kinds missing from the grammar
/// are skipped when the table is built.
const CONSTRUCT_KINDS: &[(&str, Construct)] = &[
    ("array", Construct::Array),
    ("array_pattern", Construct::ArrayPattern),
    ("object", Construct::Object),
    ("object_pattern", Construct::ObjectPattern),
    ("arrow_function", Construct::ArrowFunction),
    ("assignment_expression", Construct::Assignment),
    ("augmented_assignment_expression", Construct::Assignment),
    ("binary_expression", Construct::Binary),
    ("statement_block", Construct::Block),
    ("call_expression", Construct::Call),
    ("new_expression", Construct::New),
    ("class_declaration", Construct::Class),
    ("class", Construct::Class),
    ("ternary_expression", Construct::Conditional),
    ("do_statement", Construct::Loop),
    ("while_statement", Construct::Loop),
    ("for_in_statement", Construct::Loop),
    ("for_statement", Construct::For),
    ("export_statement", Construct::ExportNamed),
    ("function_declaration", Construct::FunctionDeclaration),
    ("generator_function_declaration", Construct::FunctionDeclaration),
    ("function_expression", Construct::FunctionExpression),
    ("function", Construct::FunctionExpression),
    ("generator_function", Construct::FunctionExpression),
    ("method_definition", Construct::FunctionExpression),
    ("if_statement", Construct::If),
    ("import_statement", Construct::ImportNamed),
    ("member_expression", Construct::Member),
    ("subscript_expression", Construct::Member),
    ("pair", Construct::Property),
    ("pair_pattern", Construct::Property),
    ("switch_statement", Construct::Switch),
    ("template_string", Construct::Template),
    ("variable_declaration", Construct::VariableDeclaration),
    ("lexical_declaration", Construct::VariableDeclaration),
    ("variable_declarator", Construct::VariableDeclarator),
];

fn construct_table() -> &'static HashMap<u16, Construct> {
    static TABLE: OnceLock<HashMap<u16, Construct>> = OnceLock::new();

    TABLE.get_or_init(|| {
        let kinds = js_kind_id_map();
        CONSTRUCT_KINDS
            .iter()
            .flat_map(|&(name, construct)| {
                kinds
                    .get(name)
                    .into_iter()
                    .flatten()
                    .map(move |&id| (id, construct))
            })
            .collect()
    })
}

impl Construct {
    /// The construct `node` is, if any. Keywords that share a name with a
    /// construct (`class`, `function`) are anonymous and never match.
    pub fn of(node: &CstNode) -> Option<Self> {
        if !node.is_named() {
            return None;
        }
        construct_table().get(&node.kind_id()).copied()
    }

    pub fn enter(self, ctx: &mut HandlerContext, node: CstNode) {
        let options = ctx.options();
        match self {
            Construct::Array => lists::array_or_object(ctx, node, options.array_expression),
            Construct::Object => lists::array_or_object(ctx, node, options.object_expression),
            Construct::ArrayPattern | Construct::ObjectPattern => {
                lists::array_or_object(ctx, node, ListOffset::Levels(1));
            }
            Construct::ArrowFunction => expressions::arrow_function(ctx, node),
            Construct::Assignment => expressions::assignment(ctx, node),
            Construct::Binary => expressions::binary(ctx, node),
            Construct::Block => statements::block(ctx, node),
            Construct::Call => lists::call_arguments(ctx, node, "function"),
            Construct::New => lists::call_arguments(ctx, node, "constructor"),
            Construct::Class => statements::class(ctx, node),
            Construct::Conditional => expressions::conditional(ctx, node),
            Construct::Loop => statements::loop_body(ctx, node),
            Construct::For => statements::for_statement(ctx, node),
            Construct::ExportNamed => lists::export_specifiers(ctx, node),
            Construct::FunctionDeclaration => {
                lists::function_params(ctx, node, options.function_declaration.parameters);
            }
            Construct::FunctionExpression => {
                lists::function_params(ctx, node, options.function_expression.parameters);
            }
            Construct::If => statements::if_statement(ctx, node),
            Construct::ImportNamed => lists::import_specifiers(ctx, node),
            Construct::Member => expressions::member(ctx, node),
            Construct::Property => expressions::property(ctx, node),
            Construct::Switch => statements::switch(ctx, node),
            Construct::Template => expressions::template(ctx, node),
            Construct::VariableDeclaration => declarations::variable_declaration(ctx, node),
            Construct::VariableDeclarator => declarations::variable_declarator(ctx, node),
        }
    }

    pub fn leave(self, ctx: &mut HandlerContext, node: CstNode) {
        if self == Construct::VariableDeclarator {
            declarations::variable_declarator_exit(ctx, node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsindent_js_cst::TreeWalker;
    use jsindent_js_parser::JsParser;

    fn constructs(source: &str) -> Vec<(&'static str, Construct)> {
        let mut parser = JsParser::new();
        let result = parser.parse(source).unwrap();
        TreeWalker::new(result.tree.root_node(), source)
            .filter_map(|node| Construct::of(&node).map(|construct| (node.kind(), construct)))
            .collect()
    }

    #[test]
    fn test_keywords_are_not_constructs() {
        let found = constructs("class A {}");
        assert_eq!(found, vec![("class_declaration", Construct::Class)]);
    }

    #[test]
    fn test_function_forms() {
        let found = constructs("var f = function () {};");
        assert!(found.contains(&("variable_declaration", Construct::VariableDeclaration)));
        assert!(found.contains(&("variable_declarator", Construct::VariableDeclarator)));
        assert!(found.iter().any(|&(_, construct)| construct == Construct::FunctionExpression));
        assert!(found.contains(&("statement_block", Construct::Block)));
    }

    #[test]
    fn test_every_kind_is_known_to_the_grammar() {
        let kinds = js_kind_id_map();
        let missing: Vec<&str> = CONSTRUCT_KINDS
            .iter()
            .map(|&(name, _)| name)
            .filter(|name| !kinds.contains_key(name))
            .collect();
        // One of the two spellings of a function expression is enough.
        assert!(missing.len() <= 1, "unknown kinds: {missing:?}");
    }
}
