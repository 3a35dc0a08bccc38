//! Diagnostic types for reporting violations.

use jsindent_text_size::{Ranged, TextRange};

use crate::Fix;

/// Whether a violation comes with a fix.
#[derive(Copy, Clone, Debug, Default, Hash, PartialEq, Eq)]
pub enum FixAvailability {
    Always,
    Sometimes,
    #[default]
    None,
}

/// A violation that can be reported as a diagnostic.
pub trait Violation: std::fmt::Debug + Clone + Send + Sync {
    const FIX_AVAILABILITY: FixAvailability = FixAvailability::None;

    /// The user-facing message.
    fn message(&self) -> String;

    fn fix_title(&self) -> Option<String> {
        None
    }
}

/// Violation code and rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DiagnosticKind {
    /// Name of the violation type, e.g. `IncorrectIndentation`.
    pub code: String,
    pub body: String,
}

/// A violation found at a source range.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub range: TextRange,
    pub fix: Option<Fix>,
}

impl Diagnostic {
    #[allow(clippy::needless_pass_by_value)]
    pub fn new<V: Violation>(violation: V, range: TextRange) -> Self {
        Self {
            kind: DiagnosticKind {
                code: std::any::type_name::<V>()
                    .rsplit("::")
                    .next()
                    .unwrap_or("Unknown")
                    .to_string(),
                body: violation.message(),
            },
            range,
            fix: None,
        }
    }

    #[must_use]
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    pub fn fixable(&self) -> bool {
        self.fix.is_some()
    }
}

impl Ranged for Diagnostic {
    fn range(&self) -> TextRange {
        self.range
    }
}
