//! Byte offsets and ranges into UTF-8 source text.
//!
//! Offsets are `u32`: a source file larger than 4 GiB is not a JavaScript
//! file anyone wants indented.

use std::fmt;
use std::ops::{Add, AddAssign, Index, Sub, SubAssign};

/// A byte offset into a source text.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "get-size", derive(get_size2::GetSize))]
pub struct TextSize {
    raw: u32,
}

impl TextSize {
    pub const fn new(raw: u32) -> Self {
        Self { raw }
    }

    /// The size of a string slice in bytes.
    pub fn of(text: &str) -> Self {
        Self::try_from(text.len()).unwrap_or(Self::new(u32::MAX))
    }

    pub const fn to_u32(self) -> u32 {
        self.raw
    }

    pub const fn to_usize(self) -> usize {
        self.raw as usize
    }

    pub fn checked_sub(self, rhs: TextSize) -> Option<TextSize> {
        self.raw.checked_sub(rhs.raw).map(TextSize::new)
    }
}

impl fmt::Debug for TextSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl From<u32> for TextSize {
    fn from(raw: u32) -> Self {
        Self::new(raw)
    }
}

impl From<TextSize> for u32 {
    fn from(value: TextSize) -> Self {
        value.raw
    }
}

impl From<TextSize> for usize {
    fn from(value: TextSize) -> Self {
        value.raw as usize
    }
}

impl TryFrom<usize> for TextSize {
    type Error = std::num::TryFromIntError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Ok(Self::new(u32::try_from(value)?))
    }
}

impl Add for TextSize {
    type Output = TextSize;

    fn add(self, rhs: TextSize) -> TextSize {
        TextSize::new(self.raw + rhs.raw)
    }
}

impl Sub for TextSize {
    type Output = TextSize;

    fn sub(self, rhs: TextSize) -> TextSize {
        TextSize::new(self.raw - rhs.raw)
    }
}

impl AddAssign for TextSize {
    fn add_assign(&mut self, rhs: TextSize) {
        self.raw += rhs.raw;
    }
}

impl SubAssign for TextSize {
    fn sub_assign(&mut self, rhs: TextSize) {
        self.raw -= rhs.raw;
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for TextSize {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for TextSize {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(TextSize::new)
    }
}

/// A half-open byte range `[start, end)`.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "get-size", derive(get_size2::GetSize))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextRange {
    start: TextSize,
    end: TextSize,
}

impl TextRange {
    /// Create a range. Panics if `end < start`.
    pub fn new(start: TextSize, end: TextSize) -> Self {
        assert!(start <= end, "invalid text range {start:?}..{end:?}");
        Self { start, end }
    }

    pub fn empty(offset: TextSize) -> Self {
        Self::new(offset, offset)
    }

    pub fn at(offset: TextSize, len: TextSize) -> Self {
        Self::new(offset, offset + len)
    }

    pub const fn start(self) -> TextSize {
        self.start
    }

    pub const fn end(self) -> TextSize {
        self.end
    }

    pub fn len(self) -> TextSize {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Whether `offset` lies inside the range (end exclusive).
    pub fn contains(self, offset: TextSize) -> bool {
        self.start <= offset && offset < self.end
    }

    pub fn intersect(self, other: TextRange) -> Option<TextRange> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start <= end).then(|| TextRange::new(start, end))
    }

    #[must_use]
    pub fn cover(self, other: TextRange) -> TextRange {
        TextRange::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl fmt::Debug for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}..{:?}", self.start, self.end)
    }
}

impl Index<TextRange> for str {
    type Output = str;

    fn index(&self, index: TextRange) -> &str {
        &self[index.start.to_usize()..index.end.to_usize()]
    }
}

/// Anything with a source range.
pub trait Ranged {
    fn range(&self) -> TextRange;

    fn start(&self) -> TextSize {
        self.range().start()
    }

    fn end(&self) -> TextSize {
        self.range().end()
    }
}

impl Ranged for TextRange {
    fn range(&self) -> TextRange {
        *self
    }
}

impl<T: Ranged> Ranged for &T {
    fn range(&self) -> TextRange {
        T::range(self)
    }
}
