//! Fixes: one or more edits plus how safe they are to apply.

use get_size2::GetSize;
use is_macro::Is;

use crate::Edit;

/// How confident we are that applying a fix preserves meaning.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Is, GetSize)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Applicability {
    /// Needs explicit opt-in (`--unsafe`).
    Unsafe,
    /// Always applied by `fix`.
    Safe,
}

/// A set of edits applied together.
#[derive(Clone, Debug, PartialEq, Eq, Hash, GetSize)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Fix {
    edits: Vec<Edit>,
    applicability: Applicability,
}

impl Fix {
    pub fn safe_edit(edit: Edit) -> Self {
        Self {
            edits: vec![edit],
            applicability: Applicability::Safe,
        }
    }

    pub fn unsafe_edit(edit: Edit) -> Self {
        Self {
            edits: vec![edit],
            applicability: Applicability::Unsafe,
        }
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    pub fn applicability(&self) -> Applicability {
        self.applicability
    }

    /// Whether the fix may be applied when `requested` is the allowed level.
    pub fn applies(&self, requested: Applicability) -> bool {
        self.applicability >= requested
    }
}
