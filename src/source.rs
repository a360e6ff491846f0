use std::fmt;
use std::ops::Range;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)] // Default for convenience
pub struct Span {
    pub start: usize, // Byte offset
    pub end: usize,   // Byte offset (exclusive)
}

impl Span {
    pub fn new(start: usize, end: usize) -> Span {
        Span { start, end }
    }

    /// Byte range for diagnostics. Zero-width spans (end of input) are widened
    /// to one byte so ariadne still has something to point at.
    pub fn to_range(self) -> Range<usize> {
        if self.start == self.end {
            self.start..self.end + 1
        } else {
            self.start..self.end
        }
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_range_and_display() {
        let span: Span = (4..6).into();
        assert_eq!(span, Span::new(4, 6));
        assert_eq!(span.to_string(), "4..6");
    }

    #[test]
    fn test_to_range_widens_empty_span() {
        assert_eq!(Span::new(3, 5).to_range(), 3..5);
        assert_eq!(Span::new(7, 7).to_range(), 7..8);
    }
}
