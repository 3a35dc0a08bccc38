//! Flat, ordered token and comment stream built from CST leaves.
//!
//! Every token gets a dense [`TokenId`] (its index in source order), so
//! per-token tables can be plain vectors.

use std::ops::RangeInclusive;

use jsindent_source_file::LineIndex;
use jsindent_text_size::{TextRange, TextSize};
use tree_sitter::Node;

use crate::node_range;

/// Index of a token in its [`TokenStream`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId(u32);

impl TokenId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Keyword,
    Punctuator,
    String,
    Numeric,
    /// A template part: from a backtick or `}` up to `${` or the closing backtick.
    Template,
    RegularExpression,
    JsxText,
    LineComment,
    BlockComment,
}

impl TokenKind {
    pub fn is_comment(self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub range: TextRange,
    /// 1-based line of the first character.
    pub start_line: u32,
    /// 1-based line of the position just past the last character.
    pub end_line: u32,
    /// 0-based column of the first character, in characters.
    pub column: u32,
}

impl Token {
    pub fn is_comment(&self) -> bool {
        self.kind.is_comment()
    }

    pub fn start(&self) -> TextSize {
        self.range.start()
    }

    pub fn end(&self) -> TextSize {
        self.range.end()
    }
}

/// An inclusive run of tokens (comments included) from `first` to `last`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenSpan {
    pub first: TokenId,
    pub last: TokenId,
}

impl TokenSpan {
    pub fn new(first: TokenId, last: TokenId) -> Self {
        Self { first, last }
    }

    pub fn ids(self) -> impl DoubleEndedIterator<Item = TokenId> {
        self.index_range().map(TokenId::from_index)
    }

    /// Every token except the first and the last.
    pub fn interior(self) -> impl Iterator<Item = TokenId> {
        self.ids()
            .filter(move |id| *id != self.first && *id != self.last)
    }

    /// Every token after the first.
    pub fn tail(self) -> impl Iterator<Item = TokenId> {
        self.ids().skip(1)
    }

    pub fn contains(self, id: TokenId) -> bool {
        self.first <= id && id <= self.last
    }

    /// The `n`th token of the span, if the span is long enough.
    pub fn nth(self, n: usize) -> Option<TokenId> {
        let index = self.first.index() + n;
        (index <= self.last.index()).then(|| TokenId::from_index(index))
    }

    fn index_range(self) -> RangeInclusive<usize> {
        self.first.index()..=self.last.index()
    }
}

/// All tokens and comments of one file, in source order.
pub struct TokenStream<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    /// First token or comment touching each line, indexed by 1-based line.
    first_by_line: Vec<Option<TokenId>>,
}

impl<'src> TokenStream<'src> {
    pub fn new(root: Node<'_>, source: &'src str, line_index: &LineIndex) -> Self {
        let mut ranges = Vec::new();
        collect_tokens(root, source, &mut ranges);
        ranges.sort_by_key(|(range, _)| range.start());

        let tokens: Vec<Token> = ranges
            .into_iter()
            .map(|(range, kind)| Token {
                kind,
                range,
                start_line: line_number(line_index, range.start()),
                end_line: line_number(line_index, range.end()),
                column: u32::try_from(line_index.column(range.start(), source))
                    .unwrap_or(u32::MAX),
            })
            .collect();

        let mut first_by_line = vec![None; line_index.line_count() + 2];
        for (index, token) in tokens.iter().enumerate() {
            for line in [token.start_line, token.end_line] {
                if let Some(slot) = first_by_line.get_mut(line as usize)
                    && slot.is_none()
                {
                    *slot = Some(TokenId::from_index(index));
                }
            }
        }

        Self {
            source,
            tokens,
            first_by_line,
        }
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = TokenId> + use<> {
        (0..self.tokens.len()).map(TokenId::from_index)
    }

    /// Non-comment tokens in source order.
    pub fn code_ids(&self) -> impl Iterator<Item = TokenId> + '_ {
        self.ids().filter(|id| !self.get(*id).is_comment())
    }

    pub fn comment_ids(&self) -> impl Iterator<Item = TokenId> + '_ {
        self.ids().filter(|id| self.get(*id).is_comment())
    }

    pub fn get(&self, id: TokenId) -> &Token {
        &self.tokens[id.index()]
    }

    pub fn text(&self, id: TokenId) -> &'src str {
        &self.source[self.get(id).range]
    }

    pub fn is_punctuator(&self, id: TokenId, text: &str) -> bool {
        self.get(id).kind == TokenKind::Punctuator && self.text(id) == text
    }

    pub fn is_comment(&self, id: TokenId) -> bool {
        self.get(id).is_comment()
    }

    /// Token whose first byte is exactly `offset`.
    pub fn token_starting_at(&self, offset: TextSize) -> Option<TokenId> {
        self.tokens
            .binary_search_by_key(&offset, Token::start)
            .ok()
            .map(TokenId::from_index)
    }

    /// First non-comment token inside `range`.
    pub fn first_code_in(&self, range: TextRange) -> Option<TokenId> {
        let start = self.tokens.partition_point(|t| t.start() < range.start());
        self.tokens[start..]
            .iter()
            .take_while(|t| t.end() <= range.end())
            .position(|t| !t.is_comment())
            .map(|offset| TokenId::from_index(start + offset))
    }

    /// Last non-comment token inside `range`.
    pub fn last_code_in(&self, range: TextRange) -> Option<TokenId> {
        let end = self.tokens.partition_point(|t| t.end() <= range.end());
        self.tokens[..end]
            .iter()
            .rev()
            .take_while(|t| t.start() >= range.start())
            .position(|t| !t.is_comment())
            .map(|offset| TokenId::from_index(end - 1 - offset))
    }

    /// Tokens and comments from the first to the last code token of `range`.
    pub fn span_of(&self, range: TextRange) -> Option<TokenSpan> {
        let first = self.first_code_in(range)?;
        let last = self.last_code_in(range)?;
        (first <= last).then(|| TokenSpan::new(first, last))
    }

    /// The closest non-comment token before `id`.
    pub fn prev_code(&self, id: TokenId) -> Option<TokenId> {
        (0..id.index())
            .rev()
            .find(|&index| !self.tokens[index].is_comment())
            .map(TokenId::from_index)
    }

    /// The closest non-comment token after `id`.
    pub fn next_code(&self, id: TokenId) -> Option<TokenId> {
        (id.index() + 1..self.tokens.len())
            .find(|&index| !self.tokens[index].is_comment())
            .map(TokenId::from_index)
    }

    /// Non-comment tokens strictly between `after` and `before`.
    pub fn code_between(&self, after: TokenId, before: TokenId) -> impl Iterator<Item = TokenId> + '_ {
        (after.index() + 1..before.index())
            .filter(|&index| !self.tokens[index].is_comment())
            .map(TokenId::from_index)
    }

    /// First token or comment that starts or ends on `line`.
    pub fn first_of_line(&self, line: u32) -> Option<TokenId> {
        self.first_by_line.get(line as usize).copied().flatten()
    }

    /// First token or comment on the line where `id` starts.
    pub fn first_of_line_of(&self, id: TokenId) -> TokenId {
        self.first_of_line(self.get(id).start_line).unwrap_or(id)
    }

    pub fn is_first_of_line(&self, id: TokenId) -> bool {
        self.first_of_line(self.get(id).start_line) == Some(id)
    }

    /// Whether only spaces and tabs precede `id` on its line.
    pub fn has_blank_prefix(&self, id: TokenId) -> bool {
        self.line_prefix(id).chars().all(char::is_whitespace)
    }

    /// Text from the start of the token's line up to the token.
    pub fn line_prefix(&self, id: TokenId) -> &'src str {
        let start = self.get(id).start().to_usize();
        let line_start = self.source[..start]
            .rfind(['\n', '\r'])
            .map_or(0, |position| position + 1);
        &self.source[line_start..start]
    }

    /// Byte offset where the token's line begins.
    pub fn line_start_of(&self, id: TokenId) -> TextSize {
        let prefix = self.line_prefix(id);
        self.get(id).start() - TextSize::of(prefix)
    }
}

fn line_number(line_index: &LineIndex, offset: TextSize) -> u32 {
    u32::try_from(line_index.line_index(offset).get()).unwrap_or(u32::MAX)
}

fn collect_tokens(node: Node<'_>, source: &str, out: &mut Vec<(TextRange, TokenKind)>) {
    let atomic = match node.kind() {
        "comment" | "html_comment" | "hash_bang_line" => Some(comment_kind(node, source)),
        "string" => Some(TokenKind::String),
        "number" => Some(TokenKind::Numeric),
        "regex" => Some(TokenKind::RegularExpression),
        "jsx_text" => Some(TokenKind::JsxText),
        "template_string" => {
            collect_template(node, source, out);
            return;
        }
        _ => None,
    };

    if let Some(kind) = atomic {
        push_token(out, node_range(&node), kind);
        return;
    }

    if node.child_count() == 0 {
        push_token(out, node_range(&node), leaf_kind(node, source));
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_tokens(child, source, out);
    }
}

/// Split a template string into its literal parts and the tokens of its substitutions.
fn collect_template(node: Node<'_>, source: &str, out: &mut Vec<(TextRange, TokenKind)>) {
    let mut part_start = node_range(&node).start();
    let mut cursor = node.walk();

    for child in node.children(&mut cursor) {
        if child.kind() != "template_substitution" {
            continue;
        }
        let count = u32::try_from(child.child_count()).unwrap_or(0);
        let (Some(open), Some(close)) = (child.child(0), count.checked_sub(1).and_then(|i| child.child(i)))
        else {
            continue;
        };

        let open_end = node_range(&open).end();
        push_token(out, TextRange::new(part_start, open_end), TokenKind::Template);

        let mut inner = child.walk();
        for expression in child.children(&mut inner) {
            if expression.id() != open.id() && expression.id() != close.id() {
                collect_tokens(expression, source, out);
            }
        }
        part_start = node_range(&close).start();
    }

    push_token(
        out,
        TextRange::new(part_start, node_range(&node).end()),
        TokenKind::Template,
    );
}

fn push_token(out: &mut Vec<(TextRange, TokenKind)>, range: TextRange, kind: TokenKind) {
    // Zero-width leaves are inserted by error recovery or automatic semicolons.
    if !range.is_empty() {
        out.push((range, kind));
    }
}

fn comment_kind(node: Node<'_>, source: &str) -> TokenKind {
    let text = &source[node.byte_range()];
    if text.starts_with("/*") {
        TokenKind::BlockComment
    } else {
        TokenKind::LineComment
    }
}

fn leaf_kind(node: Node<'_>, source: &str) -> TokenKind {
    let text = &source[node.byte_range()];
    let starts_word = text
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$');

    if !starts_word {
        return TokenKind::Punctuator;
    }
    // Keywords are anonymous leaves, or named leaves such as `this` whose kind is their text.
    if !node.is_named() || node.kind() == text {
        TokenKind::Keyword
    } else {
        TokenKind::Identifier
    }
}
