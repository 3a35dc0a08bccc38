//! JavaScript parser for jsindent, built on tree-sitter-javascript.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::OnceLock;

/// A parsed source file.
pub struct ParseResult {
    pub tree: tree_sitter::Tree,
    pub source: Arc<str>,
}

impl ParseResult {
    /// Whether tree-sitter had to recover from a syntax error anywhere in the file.
    pub fn has_syntax_error(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Start of the first `ERROR` or `MISSING` node, if any.
    pub fn first_error_offset(&self) -> Option<usize> {
        let mut cursor = self.tree.walk();
        loop {
            let node = cursor.node();
            if node.is_error() || node.is_missing() {
                return Some(node.start_byte());
            }
            if node.has_error() && cursor.goto_first_child() {
                continue;
            }
            while !cursor.goto_next_sibling() {
                if !cursor.goto_parent() {
                    return None;
                }
            }
        }
    }
}

/// JavaScript parser wrapping tree-sitter.
pub struct JsParser {
    parser: tree_sitter::Parser,
}

pub fn js_language() -> tree_sitter::Language {
    tree_sitter_javascript::LANGUAGE.into()
}

/// Map from node kind name to every kind id carrying that name.
///
/// A name can have several ids when the grammar aliases rules, so callers
/// matching on `kind_id()` should check all of them.
pub fn js_kind_id_map() -> &'static HashMap<&'static str, Vec<u16>> {
    static KIND_ID_MAP: OnceLock<HashMap<&'static str, Vec<u16>>> = OnceLock::new();

    KIND_ID_MAP.get_or_init(|| {
        let language = js_language();
        let mut map: HashMap<&'static str, Vec<u16>> = HashMap::new();

        for id in 0..language.node_kind_count() {
            let Ok(id) = u16::try_from(id) else { break };
            if let Some(kind) = language.node_kind_for_id(id) {
                map.entry(kind).or_default().push(id);
            }
        }

        map
    })
}

impl JsParser {
    pub fn new() -> Self {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&js_language())
            .expect("Failed to load JavaScript grammar");
        Self { parser }
    }

    /// Parse JavaScript source into a syntax tree.
    pub fn parse(&mut self, source: &str) -> Option<ParseResult> {
        let tree = self.parser.parse(source, None)?;
        Some(ParseResult {
            tree,
            source: source.into(),
        })
    }
}

impl Default for JsParser {
    fn default() -> Self {
        Self::new()
    }
}
