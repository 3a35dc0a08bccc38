//! The offset graph: for every token, the token its indentation is measured
//! from and how far past that token's indentation it sits.
//!
//! Offsets are stored in indentation characters, not levels. A level is
//! `unit` characters (the space count, or 1 for tabs), so a "first"-mode
//! column that is not a whole number of levels is still exact.

use jsindent_js_cst::{TokenId, TokenStream};

/// Where a token's expected indentation comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OffsetEdge {
    /// `None` measures from column 0.
    pub anchor: Option<TokenId>,
    /// Characters added to the anchor's indentation.
    pub offset: u32,
}

pub struct OffsetGraph<'a> {
    tokens: &'a TokenStream<'a>,
    unit: u32,
    edges: Vec<OffsetEdge>,
    ignored: Vec<bool>,
    parameter_parens: Vec<bool>,
}

impl<'a> OffsetGraph<'a> {
    /// A graph where every token and comment sits at column 0.
    pub fn new(tokens: &'a TokenStream<'a>, unit: u32) -> Self {
        let len = tokens.len();
        Self {
            tokens,
            unit,
            edges: vec![OffsetEdge::default(); len],
            ignored: vec![false; len],
            parameter_parens: vec![false; len],
        }
    }

    pub fn edge(&self, token: TokenId) -> OffsetEdge {
        self.edges[token.index()]
    }

    /// Indent `token` by `levels` from `anchor`.
    ///
    /// A token on the same line as its anchor is aligned with it instead.
    pub fn set_offset(&mut self, token: TokenId, anchor: Option<TokenId>, levels: u32) {
        match anchor {
            Some(anchor) if self.same_start_line(token, anchor) => self.match_offset(anchor, token),
            _ => {
                self.edges[token.index()] = OffsetEdge {
                    anchor,
                    offset: levels.saturating_mul(self.unit),
                };
            }
        }
    }

    pub fn set_offsets(
        &mut self,
        tokens: impl IntoIterator<Item = TokenId>,
        anchor: Option<TokenId>,
        levels: u32,
    ) {
        for token in tokens {
            self.set_offset(token, anchor, levels);
        }
    }

    /// Give `token` exactly the indentation of `anchor`.
    pub fn match_offset(&mut self, anchor: TokenId, token: TokenId) {
        if anchor != token {
            self.edges[token.index()] = OffsetEdge {
                anchor: Some(anchor),
                offset: 0,
            };
        }
    }

    /// Place `token` at a fixed column, whatever line it is on.
    pub fn set_absolute(&mut self, token: TokenId, column: u32) {
        self.edges[token.index()] = OffsetEdge {
            anchor: None,
            offset: column,
        };
    }

    /// Push `token` further by `levels`, keeping its anchor.
    pub fn add_offset(&mut self, token: TokenId, levels: u32) {
        let edge = &mut self.edges[token.index()];
        edge.offset = edge.offset.saturating_add(levels.saturating_mul(self.unit));
    }

    /// Exempt `token` from checking. Only line-leading tokens are ever checked,
    /// so anything else is left alone.
    pub fn ignore(&mut self, token: TokenId) {
        if self.tokens.is_first_of_line(token) {
            self.ignored[token.index()] = true;
        }
    }

    pub fn is_ignored(&self, token: TokenId) -> bool {
        self.ignored[token.index()]
    }

    /// Record a delimiter of a parameter or argument list.
    pub fn mark_parameter_paren(&mut self, token: TokenId) {
        self.parameter_parens[token.index()] = true;
    }

    pub fn is_parameter_paren(&self, token: TokenId) -> bool {
        self.parameter_parens[token.index()]
    }

    fn same_start_line(&self, a: TokenId, b: TokenId) -> bool {
        self.tokens.get(a).start_line == self.tokens.get(b).start_line
    }
}
