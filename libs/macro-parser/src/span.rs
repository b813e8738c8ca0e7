//! # Source Span
//!
//! Byte range of a token or parameter inside the string it was parsed from.
//!
//! ## Usage
//!
//! ```rust
//! use macro_parser::Span;
//!
//! let span = Span::new(5, 12);
//! assert_eq!(span.len(), 7);
//! assert_eq!(span.slice("last({$LIMIT})"), Some("{$LIMIT"));
//! ```

/// A range in the source text, represented as byte offsets.
///
/// # Fields
///
/// - `start`: Starting byte offset (inclusive)
/// - `end`: Ending byte offset (exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Span {
    /// Starting byte offset (inclusive)
    start: usize,
    /// Ending byte offset (exclusive)
    end: usize,
}

impl Span {
    /// Creates a new span from start and end byte offsets.
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Creates a span from a start offset and a length.
    #[inline]
    pub fn at(start: usize, len: usize) -> Self {
        Self::new(start, start + len)
    }

    /// Returns the starting byte offset.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns the ending byte offset.
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Returns the length of the span in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the span covers no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if the two spans share at least one byte.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Returns the covered slice of `text`, if the span lies inside it.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.start..self.end)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_at() {
        let span = Span::at(3, 4);
        assert_eq!(span.start(), 3);
        assert_eq!(span.end(), 7);
        assert!(!span.is_empty());
    }

    #[test]
    fn test_span_overlaps() {
        assert!(Span::new(0, 5).overlaps(&Span::new(4, 6)));
        assert!(!Span::new(0, 5).overlaps(&Span::new(5, 6)));
    }

    #[test]
    fn test_span_slice_out_of_range() {
        assert_eq!(Span::new(2, 10).slice("abc"), None);
    }
}
