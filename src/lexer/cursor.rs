use crate::token::SpanIndex;
use std::str::Chars;

#[derive(Debug, Clone, Copy)]
pub struct SourceChar {
    pub value: char,
    pub offset: SpanIndex,
    pub line: u32,
}

impl SourceChar {
    pub fn next_offset(&self) -> SpanIndex {
        (self.offset.to_usize() + self.value.len_utf8()).into()
    }
}

/// Walks the source one character at a time and keeps the line count.
#[derive(Debug, Clone)]
pub struct Cursor<'src> {
    chars: Chars<'src>,
    offset: SpanIndex,
    line: u32,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            chars: source.chars(),
            offset: SpanIndex::new(0),
            line: 1,
        }
    }

    pub fn offset(&self) -> SpanIndex {
        self.offset
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    pub fn peek_next(&self) -> Option<char> {
        let mut chars = self.chars.clone();
        chars.next();
        chars.next()
    }

    pub fn advance(&mut self) -> Option<SourceChar> {
        let value = self.chars.next()?;
        let current = SourceChar {
            value,
            offset: self.offset,
            line: self.line,
        };
        self.offset = current.next_offset();
        if value == '\n' {
            self.line += 1;
        }
        Some(current)
    }

    /// Consumes the next character only if it is `expected`.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            let _ = self.advance();
            true
        } else {
            false
        }
    }

    pub fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&predicate) {
            let _ = self.advance();
        }
    }
}
