use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SpanIndex(u32);

impl SpanIndex {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn to_usize(&self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for SpanIndex {
    fn from(value: usize) -> Self {
        Self(value as u32)
    }
}

impl std::ops::Add<SpanLength> for SpanIndex {
    type Output = Self;

    fn add(self, rhs: SpanLength) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::Sub<SpanIndex> for SpanIndex {
    type Output = SpanLength;

    fn sub(self, rhs: SpanIndex) -> Self::Output {
        SpanLength(self.0 - rhs.0)
    }
}

/// Distance between two [`SpanIndex`] values, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanLength(u32);

/// Byte range of a lexeme within the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// The byte position of the start of the token.
    pub start: SpanIndex,
    /// The length of the token in bytes.
    pub length: SpanLength,
}

impl Span {
    pub fn new(start: SpanIndex, end: SpanIndex) -> Self {
        Self {
            start,
            length: end - start,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start.to_usize()..self.end().to_usize()
    }

    pub fn end(&self) -> SpanIndex {
        self.start + self.length
    }
}
