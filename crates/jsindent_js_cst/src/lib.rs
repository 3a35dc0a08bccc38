//! CST node wrappers and the flat token stream for JavaScript syntax trees.

mod tokens;

pub use tokens::{Token, TokenId, TokenKind, TokenSpan, TokenStream};

use jsindent_text_size::{TextRange, TextSize};
use tree_sitter::Node;

/// Convert a tree-sitter node range to a `TextRange`.
pub fn node_range(node: &Node) -> TextRange {
    TextRange::new(byte_offset(node.start_byte()), byte_offset(node.end_byte()))
}

fn byte_offset(byte: usize) -> TextSize {
    TextSize::try_from(byte).unwrap_or(TextSize::new(u32::MAX))
}

/// Wrapper for traversing CST nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CstNode<'a> {
    node: Node<'a>,
    source: &'a str,
}

impl<'a> CstNode<'a> {
    pub fn new(node: Node<'a>, source: &'a str) -> Self {
        Self { node, source }
    }

    pub fn kind(&self) -> &'static str {
        self.node.kind()
    }

    pub fn kind_id(&self) -> u16 {
        self.node.kind_id()
    }

    pub fn range(&self) -> TextRange {
        node_range(&self.node)
    }

    pub fn text(&self) -> &'a str {
        self.node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    pub fn is_named(&self) -> bool {
        self.node.is_named()
    }

    /// Comments and other nodes the grammar allows anywhere.
    pub fn is_extra(&self) -> bool {
        self.node.is_extra()
    }

    pub fn parent(&self) -> Option<CstNode<'a>> {
        self.node.parent().map(|n| CstNode::new(n, self.source))
    }

    pub fn children(&self) -> impl Iterator<Item = CstNode<'a>> + 'a {
        let source = self.source;
        let node = self.node;
        let count = u32::try_from(node.child_count()).unwrap_or(u32::MAX);
        (0..count).filter_map(move |i| node.child(i).map(|child| CstNode::new(child, source)))
    }

    pub fn child_by_field_name(&self, name: &str) -> Option<CstNode<'a>> {
        self.node
            .child_by_field_name(name)
            .map(|n| CstNode::new(n, self.source))
    }

    pub fn children_by_field_name(&self, name: &str) -> Vec<CstNode<'a>> {
        let mut cursor = self.node.walk();
        self.node
            .children_by_field_name(name, &mut cursor)
            .map(|n| CstNode::new(n, self.source))
            .collect()
    }

    pub fn named_children(&self) -> impl Iterator<Item = CstNode<'a>> + 'a {
        self.children().filter(|c| c.node.is_named())
    }

    /// Named children that are not comments.
    pub fn syntax_children(&self) -> impl Iterator<Item = CstNode<'a>> + 'a {
        self.named_children().filter(|c| !c.is_extra())
    }

    /// First anonymous child whose text is `text`.
    pub fn token_child(&self, text: &str) -> Option<CstNode<'a>> {
        self.children().find(|c| !c.is_named() && c.kind() == text)
    }

    /// Get the raw tree-sitter node.
    pub fn inner(&self) -> Node<'a> {
        self.node
    }
}

/// Iterator for walking all nodes in a tree (pre-order traversal).
pub struct TreeWalker<'a> {
    cursor: tree_sitter::TreeCursor<'a>,
    source: &'a str,
    done: bool,
}

impl<'a> TreeWalker<'a> {
    pub fn new(root: Node<'a>, source: &'a str) -> Self {
        Self {
            cursor: root.walk(),
            source,
            done: false,
        }
    }
}

impl<'a> Iterator for TreeWalker<'a> {
    type Item = CstNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let node = CstNode::new(self.cursor.node(), self.source);

        if self.cursor.goto_first_child() || self.cursor.goto_next_sibling() {
            return Some(node);
        }

        loop {
            if !self.cursor.goto_parent() {
                self.done = true;
                return Some(node);
            }
            if self.cursor.goto_next_sibling() {
                return Some(node);
            }
        }
    }
}

/// Entering or leaving a node during an [`EventWalker`] traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkEvent<'a> {
    Enter(CstNode<'a>),
    Leave(CstNode<'a>),
}

/// Depth-first walk that reports both entry and exit of every node.
///
/// Parents are entered before their children and left after them.
pub struct EventWalker<'a> {
    cursor: tree_sitter::TreeCursor<'a>,
    source: &'a str,
    pending_leave: bool,
    done: bool,
}

impl<'a> EventWalker<'a> {
    pub fn new(root: Node<'a>, source: &'a str) -> Self {
        Self {
            cursor: root.walk(),
            source,
            pending_leave: false,
            done: false,
        }
    }
}

impl<'a> Iterator for EventWalker<'a> {
    type Item = WalkEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if self.pending_leave {
            // The cursor sits on a node whose subtree is finished.
            let node = CstNode::new(self.cursor.node(), self.source);
            if self.cursor.goto_next_sibling() {
                self.pending_leave = false;
            } else if !self.cursor.goto_parent() {
                self.done = true;
            }
            return Some(WalkEvent::Leave(node));
        }

        let node = CstNode::new(self.cursor.node(), self.source);
        if !self.cursor.goto_first_child() {
            self.pending_leave = true;
        }
        Some(WalkEvent::Enter(node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsindent_js_parser::JsParser;

    #[test]
    fn test_cst_node_traversal() {
        let mut parser = JsParser::new();
        let source = "class Foo { bar() {} }";
        let result = parser.parse(source).unwrap();
        let root = CstNode::new(result.tree.root_node(), source);

        assert_eq!(root.kind(), "program");
        let class = root.named_children().next().unwrap();
        assert_eq!(class.kind(), "class_declaration");
        assert_eq!(class.child_by_field_name("name").unwrap().text(), "Foo");
        assert!(class.token_child("class").is_some());
    }

    #[test]
    fn test_tree_walker() {
        let mut parser = JsParser::new();
        let source = "let a = 1;";
        let result = parser.parse(source).unwrap();

        let nodes: Vec<_> = TreeWalker::new(result.tree.root_node(), source).collect();

        assert_eq!(nodes[0].kind(), "program");
        assert!(nodes.iter().any(|n| n.kind() == "variable_declarator"));
    }

    #[test]
    fn test_event_walker_balances_enter_and_leave() {
        let mut parser = JsParser::new();
        let source = "if (a) { b(); } else { c(); }";
        let result = parser.parse(source).unwrap();

        let mut depth = 0i32;
        let mut entered = 0;
        let mut order = Vec::new();
        for event in EventWalker::new(result.tree.root_node(), source) {
            match event {
                WalkEvent::Enter(node) => {
                    depth += 1;
                    entered += 1;
                    order.push(node.kind());
                }
                WalkEvent::Leave(_) => depth -= 1,
            }
            assert!(depth >= 0);
        }

        assert_eq!(depth, 0);
        assert_eq!(entered, TreeWalker::new(result.tree.root_node(), source).count());
        assert_eq!(order[0], "program");
        assert_eq!(order[1], "if_statement");
    }
}
