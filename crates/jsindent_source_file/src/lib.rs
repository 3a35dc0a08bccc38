//! Line/column lookup for source text.

use std::fmt;
use std::num::NonZeroUsize;

use jsindent_text_size::{TextRange, TextSize};

/// A 1-based index (line or column).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "get-size", derive(get_size2::GetSize))]
pub struct OneIndexed(NonZeroUsize);

impl OneIndexed {
    pub const MIN: Self = Self(NonZeroUsize::MIN);

    /// Returns `None` for zero.
    pub const fn new(value: usize) -> Option<Self> {
        match NonZeroUsize::new(value) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Convert a 0-based index.
    pub const fn from_zero_indexed(value: usize) -> Self {
        Self(NonZeroUsize::MIN.saturating_add(value))
    }

    pub const fn get(self) -> usize {
        self.0.get()
    }

    pub const fn to_zero_indexed(self) -> usize {
        self.0.get() - 1
    }
}

impl fmt::Debug for OneIndexed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for OneIndexed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A line and a column, both 1-based. Columns count characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineColumn {
    pub line: OneIndexed,
    pub column: OneIndexed,
}

/// Byte offsets of every line start. `\n`, `\r\n` and a lone `\r` end a line.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "get-size", derive(get_size2::GetSize))]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
}

impl LineIndex {
    pub fn from_source_text(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = vec![TextSize::default()];

        for position in memchr::memchr2_iter(b'\n', b'\r', bytes) {
            // The `\r` of a `\r\n` pair does not end the line on its own.
            if bytes[position] == b'\r' && bytes.get(position + 1) == Some(&b'\n') {
                continue;
            }
            let next = u32::try_from(position + 1).unwrap_or(u32::MAX);
            line_starts.push(TextSize::new(next));
        }

        Self { line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn line_starts(&self) -> &[TextSize] {
        &self.line_starts
    }

    /// The line containing `offset`.
    pub fn line_index(&self, offset: TextSize) -> OneIndexed {
        match self.line_starts.binary_search(&offset) {
            Ok(row) => OneIndexed::from_zero_indexed(row),
            Err(next_row) => OneIndexed::from_zero_indexed(next_row.saturating_sub(1)),
        }
    }

    /// Start offset of `line`. Lines past the end clamp to the text length.
    pub fn line_start(&self, line: OneIndexed, text: &str) -> TextSize {
        self.line_starts
            .get(line.to_zero_indexed())
            .copied()
            .unwrap_or_else(|| TextSize::of(text))
    }

    /// End offset of `line`, excluding its terminator.
    pub fn line_end(&self, line: OneIndexed, text: &str) -> TextSize {
        let next = line.to_zero_indexed() + 1;
        let Some(&next_start) = self.line_starts.get(next) else {
            return TextSize::of(text);
        };
        let bytes = text.as_bytes();
        let mut end = next_start.to_usize();
        if end > 0 && bytes[end - 1] == b'\n' {
            end -= 1;
        }
        if end > 0 && bytes[end - 1] == b'\r' {
            end -= 1;
        }
        TextSize::try_from(end).unwrap_or(next_start)
    }

    pub fn line_range(&self, line: OneIndexed, text: &str) -> TextRange {
        TextRange::new(self.line_start(line, text), self.line_end(line, text))
    }

    /// 0-based character column of `offset` within its line.
    pub fn column(&self, offset: TextSize, text: &str) -> usize {
        let line_start = self.line_start(self.line_index(offset), text);
        text[line_start.to_usize()..offset.to_usize()].chars().count()
    }
}

/// Source text paired with its line index.
#[derive(Clone, Copy, Debug)]
pub struct SourceCode<'src, 'index> {
    text: &'src str,
    index: &'index LineIndex,
}

impl<'src, 'index> SourceCode<'src, 'index> {
    pub fn new(text: &'src str, index: &'index LineIndex) -> Self {
        Self { text, index }
    }

    pub fn text(&self) -> &'src str {
        self.text
    }

    pub fn line_column(&self, offset: TextSize) -> LineColumn {
        LineColumn {
            line: self.index.line_index(offset),
            column: OneIndexed::from_zero_indexed(self.index.column(offset, self.text)),
        }
    }

    pub fn line_start(&self, line: OneIndexed) -> TextSize {
        self.index.line_start(line, self.text)
    }

    pub fn line_text(&self, line: OneIndexed) -> &'src str {
        &self.text[self.index.line_range(line, self.text)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_starts_lf_and_crlf() {
        let index = LineIndex::from_source_text("a\r\nbb\ncc\rd");
        assert_eq!(
            index.line_starts(),
            &[
                TextSize::new(0),
                TextSize::new(3),
                TextSize::new(6),
                TextSize::new(9)
            ]
        );
    }

    #[test]
    fn test_line_index_and_column() {
        let text = "if (a) {\n  b();\n}";
        let index = LineIndex::from_source_text(text);
        let code = SourceCode::new(text, &index);
        let loc = code.line_column(TextSize::new(11));
        assert_eq!(loc.line.get(), 2);
        assert_eq!(loc.column.get(), 3);
        assert_eq!(code.line_text(OneIndexed::from_zero_indexed(1)), "  b();");
    }

    #[test]
    fn test_column_counts_characters() {
        let text = "x = 'é'; y";
        let index = LineIndex::from_source_text(text);
        let offset = TextSize::of("x = 'é'; ");
        assert_eq!(index.column(offset, text), 9);
    }

    #[test]
    fn test_line_end_excludes_terminator() {
        let text = "ab\r\ncd";
        let index = LineIndex::from_source_text(text);
        assert_eq!(index.line_end(OneIndexed::MIN, text), TextSize::new(2));
        assert_eq!(
            index.line_end(OneIndexed::from_zero_indexed(1), text),
            TextSize::new(6)
        );
    }
}
