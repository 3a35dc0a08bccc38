//! JavaScript linter with auto-fix support.

pub mod fix;
mod linter;
pub mod registry;
pub mod rules;
pub mod suppression;

pub use fix::{FixOutcome, apply_edits, fix_source};
pub use linter::{Linter, RuleDiagnostic};
pub use registry::{FromConfig, RuleRegistry};
pub use suppression::SuppressionContext;

use jsindent_config::OptionsError;
use jsindent_diagnostics::Diagnostic;
use jsindent_js_cst::{CstNode, TokenStream};
use jsindent_source_file::{LineIndex, SourceCode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LintError {
    #[error("Parsing error at {line}:{column}")]
    Syntax { line: usize, column: usize },
    #[error("the parser produced no tree")]
    NoTree,
    #[error("invalid options for rule '{rule}': {source}")]
    Options {
        rule: String,
        #[source]
        source: OptionsError,
    },
    /// A rule hit a state it should never reach. This is a bug, not a finding.
    #[error("internal error in rule '{rule}': {message}")]
    Internal { rule: &'static str, message: String },
}

/// Context provided to rules during checking.
pub struct CheckContext<'a> {
    source: &'a str,
    line_index: LineIndex,
    root: CstNode<'a>,
    tokens: TokenStream<'a>,
}

impl<'a> CheckContext<'a> {
    pub fn new(source: &'a str, root: tree_sitter::Node<'a>) -> Self {
        let line_index = LineIndex::from_source_text(source);
        let tokens = TokenStream::new(root, source, &line_index);
        Self {
            source,
            line_index,
            root: CstNode::new(root, source),
            tokens,
        }
    }

    /// Get the source text.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Get the cached line index.
    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// Get the source code helper for line/column info.
    pub fn source_code(&self) -> SourceCode<'a, '_> {
        SourceCode::new(self.source, &self.line_index)
    }

    /// The `program` node.
    pub fn root(&self) -> CstNode<'a> {
        self.root
    }

    /// Every token and comment of the file.
    pub fn tokens(&self) -> &TokenStream<'a> {
        &self.tokens
    }
}

/// Trait for lint rules.
///
/// Rules see the whole file at once: the tree and its token stream.
pub trait Rule: Send + Sync {
    /// The rule's name, as it appears in an ESLint config.
    fn name(&self) -> &'static str;

    fn check(&self, ctx: &CheckContext) -> Result<Vec<Diagnostic>, LintError>;
}

/// Result of linting a file.
#[derive(Debug, Default)]
pub struct LintResult {
    pub diagnostics: Vec<RuleDiagnostic>,
}

impl LintResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Diagnostics that carry a fix.
    pub fn fixable(&self) -> impl Iterator<Item = &RuleDiagnostic> {
        self.diagnostics.iter().filter(|d| d.diagnostic.fix.is_some())
    }
}
