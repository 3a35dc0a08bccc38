//! A single text replacement.

use get_size2::GetSize;
use jsindent_text_size::{Ranged, TextRange, TextSize};

/// Replace `range` with `content`. An empty content deletes, an empty range inserts.
#[derive(Clone, Debug, PartialEq, Eq, Hash, GetSize)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Edit {
    range: TextRange,
    content: Option<String>,
}

impl Edit {
    pub fn insertion(content: String, at: TextSize) -> Self {
        Self {
            range: TextRange::empty(at),
            content: Some(content),
        }
    }

    pub fn range_deletion(range: TextRange) -> Self {
        Self {
            range,
            content: None,
        }
    }

    pub fn range_replacement(content: String, range: TextRange) -> Self {
        if content.is_empty() {
            return Self::range_deletion(range);
        }
        Self {
            range,
            content: Some(content),
        }
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn is_insertion(&self) -> bool {
        self.range.is_empty() && self.content.is_some()
    }

    pub fn is_deletion(&self) -> bool {
        self.content.is_none()
    }
}

impl Ranged for Edit {
    fn range(&self) -> TextRange {
        self.range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_replacement_is_deletion() {
        let range = TextRange::new(TextSize::new(0), TextSize::new(2));
        let edit = Edit::range_replacement(String::new(), range);
        assert!(edit.is_deletion());
        assert_eq!(edit.content(), None);
    }

    #[test]
    fn test_insertion() {
        let edit = Edit::insertion("  ".to_string(), TextSize::new(9));
        assert!(edit.is_insertion());
        assert_eq!(edit.start(), TextSize::new(9));
        assert_eq!(edit.end(), TextSize::new(9));
    }
}
