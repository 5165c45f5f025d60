//! Byte spans over a document.

use std::ops::Range;

/// Half-open byte interval `[start, end)` into a document.
///
/// Spans are only meaningful for the exact text they were produced from;
/// once the document is rewritten every span is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Create a span. `end` is clamped so it never precedes `start`.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Shift a span found in a sub-slice back into the coordinates of the
    /// text the slice was taken from.
    pub fn offset(self, by: usize) -> Self {
        Self::new(self.start + by, self.end + by)
    }

    /// `other` lies within `self`, both boundaries inclusive.
    pub fn encloses(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Like [`Span::encloses`] but `other` may not begin where `self` begins.
    ///
    /// A match sitting on a block's first byte is usually the block's own
    /// opening delimiter, not content of the block.
    pub fn strictly_encloses(&self, other: Span) -> bool {
        self.start < other.start && other.end <= self.end
    }

    /// Either endpoint of `other` falls within `[self.start, self.end]`.
    pub fn touches(&self, other: Span) -> bool {
        self.contains_offset(other.start) || self.contains_offset(other.end)
    }

    /// Inclusive on both ends, so an offset just past the last byte counts.
    pub fn contains_offset(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl From<regex::Match<'_>> for Span {
    fn from(m: regex::Match<'_>) -> Self {
        Self::new(m.start(), m.end())
    }
}
