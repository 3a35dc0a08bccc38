//! Applying fixes to source text.

use std::cmp::Reverse;

use jsindent_diagnostics::{Applicability, Edit};
use jsindent_text_size::Ranged;
use tracing::trace;

use crate::{LintError, LintResult, Linter};

/// Upper bound on lint-and-fix rounds for one file.
pub const MAX_FIX_PASSES: usize = 10;

/// The fixed text and what is left to report on it.
#[derive(Debug)]
pub struct FixOutcome {
    pub source: String,
    /// Number of edits applied over all passes.
    pub fixed: usize,
    pub passes: usize,
    /// Diagnostics of the final text.
    pub remaining: LintResult,
}

impl FixOutcome {
    pub fn changed(&self) -> bool {
        self.fixed > 0
    }
}

/// Lint `source` and apply every fix allowed by `applicability`, re-linting
/// until nothing fixable remains or [`MAX_FIX_PASSES`] is reached.
pub fn fix_source(
    linter: &Linter,
    source: &str,
    applicability: Applicability,
) -> Result<FixOutcome, LintError> {
    let mut current = source.to_string();
    let mut result = linter.lint(&current)?;
    let mut fixed = 0;
    let mut passes = 0;

    while passes < MAX_FIX_PASSES {
        let edits: Vec<Edit> = result
            .diagnostics
            .iter()
            .filter_map(|d| d.diagnostic.fix.as_ref())
            .filter(|fix| fix.applies(applicability))
            .flat_map(|fix| fix.edits().iter().cloned())
            .collect();
        if edits.is_empty() {
            break;
        }

        let edits = sort_and_dedup_edits(edits);
        trace!(pass = passes, edits = edits.len(), "applying fixes");
        current = apply_edits(&current, &edits);
        fixed += edits.len();
        passes += 1;
        result = linter.lint(&current)?;
    }

    Ok(FixOutcome {
        source: current,
        fixed,
        passes,
        remaining: result,
    })
}

/// Sort edits by descending start and drop any that overlap an edit after them.
fn sort_and_dedup_edits(mut edits: Vec<Edit>) -> Vec<Edit> {
    edits.sort_by_key(|e| Reverse(e.start()));

    let mut result: Vec<Edit> = Vec::with_capacity(edits.len());
    for edit in edits {
        // Accepted edits all start at or after this one.
        let overlaps = result.iter().any(|existing| edit.end() > existing.start());
        if !overlaps {
            result.push(edit);
        }
    }
    result
}

/// Apply edits sorted by descending start position.
pub fn apply_edits(source: &str, edits: &[Edit]) -> String {
    let mut result = source.to_string();
    for edit in edits {
        let start = edit.start().to_usize();
        let end = edit.end().to_usize();
        result.replace_range(start..end, edit.content().unwrap_or(""));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Indent;
    use jsindent_config::IndentOptions;
    use jsindent_text_size::{TextRange, TextSize};

    fn range(start: u32, end: u32) -> TextRange {
        TextRange::new(TextSize::new(start), TextSize::new(end))
    }

    #[test]
    fn test_apply_edits_from_the_end() {
        let edits = sort_and_dedup_edits(vec![
            Edit::range_replacement("  ".to_string(), range(0, 0)),
            Edit::range_replacement("\t".to_string(), range(3, 5)),
        ]);
        // The first two of the four spaces become a tab.
        assert_eq!(apply_edits("ab\n    c", &edits), "  ab\n\t  c");
    }

    #[test]
    fn test_overlapping_edits_are_dropped() {
        let edits = sort_and_dedup_edits(vec![
            Edit::range_deletion(range(0, 4)),
            Edit::range_deletion(range(2, 6)),
        ]);
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].start(), TextSize::new(2));
    }

    #[test]
    fn test_fix_source_reaches_fixed_point() {
        let linter = Linter::new().with_rule(Box::new(Indent::new(IndentOptions::spaces(2))));
        let outcome =
            fix_source(&linter, "if (a) {\nb();\n}", Applicability::Safe).unwrap();

        assert_eq!(outcome.source, "if (a) {\n  b();\n}");
        assert_eq!(outcome.fixed, 1);
        assert_eq!(outcome.passes, 1);
        assert!(outcome.remaining.is_empty());
        assert!(outcome.changed());
    }

    #[test]
    fn test_fix_source_without_violations() {
        let linter = Linter::new().with_rule(Box::new(Indent::new(IndentOptions::spaces(2))));
        let outcome = fix_source(&linter, "foo();\n", Applicability::Safe).unwrap();
        assert!(!outcome.changed());
        assert_eq!(outcome.passes, 0);
    }
}
