mod cursor;
mod error;
pub mod formatter;

use compact_str::CompactString;
use cursor::{Cursor, SourceChar};
pub use error::{LexicalError, LexicalErrorKind};

use crate::token::{Literal, Span, SpanIndex, Token, TokenKind, KEYWORD_HASHMAP};

#[derive(Debug)]
pub struct Lexer<'src> {
    source: &'src str,
    cursor: Cursor<'src>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            cursor: Cursor::new(source),
        }
    }

    /// Scans the whole source. The returned tokens always end with a single `Eof`.
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<LexicalError>) {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();
        loop {
            match self.next_token() {
                Ok(token) => {
                    let is_eof = token.is_eof();
                    tokens.push(token);
                    if is_eof {
                        break;
                    }
                }
                Err(error) => errors.push(error),
            }
        }
        log::debug!(
            "Scanned {} tokens with {} lexical errors",
            tokens.len(),
            errors.len()
        );
        (tokens, errors)
    }

    pub fn next_token(&mut self) -> Result<Token, LexicalError> {
        loop {
            let Some(c) = self.cursor.advance() else {
                let end = self.cursor.offset();
                return Ok(self.make_token(TokenKind::Eof, end, self.cursor.line(), None));
            };

            let kind = match c.value {
                // Single character tokens
                '(' => TokenKind::LeftParenthesis,
                ')' => TokenKind::RightParenthesis,
                '{' => TokenKind::LeftBrace,
                '}' => TokenKind::RightBrace,
                ',' => TokenKind::Comma,
                '.' => TokenKind::Dot,
                '-' => TokenKind::Minus,
                '+' => TokenKind::Plus,
                ';' => TokenKind::Semicolon,
                '*' => TokenKind::Star,
                '?' => TokenKind::Question,
                ':' => TokenKind::Colon,
                // One or two character tokens
                '!' => self.either('=', TokenKind::BangEqual, TokenKind::Bang),
                '=' => self.either('=', TokenKind::EqualEqual, TokenKind::Equal),
                '<' => self.either('=', TokenKind::LessThanEqual, TokenKind::LessThan),
                '>' => self.either('=', TokenKind::GreaterThanEqual, TokenKind::GreaterThan),
                // Comments or division
                '/' => {
                    if self.cursor.eat('/') {
                        self.cursor.eat_while(|c| c != '\n');
                        continue;
                    } else if self.cursor.eat('*') {
                        self.skip_block_comment(c)?;
                        continue;
                    } else {
                        TokenKind::Slash
                    }
                }
                ' ' | '\r' | '\t' | '\n' => continue,
                '"' => return self.lex_string(c),
                '0'..='9' => return Ok(self.lex_number(c)),
                'a'..='z' | 'A'..='Z' | '_' => return Ok(self.lex_ident_or_keyword(c)),
                other => {
                    return Err(LexicalError {
                        kind: LexicalErrorKind::Unrecognized(other),
                        span: Span::new(c.offset, c.next_offset()),
                        line: c.line,
                    })
                }
            };
            return Ok(self.make_token(kind, c.offset, c.line, None));
        }
    }
}

impl<'src> Lexer<'src> {
    fn either(&mut self, next: char, matched: TokenKind, otherwise: TokenKind) -> TokenKind {
        if self.cursor.eat(next) {
            matched
        } else {
            otherwise
        }
    }

    /// Builds a token spanning from `start` up to the cursor.
    fn make_token(
        &self,
        kind: TokenKind,
        start: SpanIndex,
        line: u32,
        literal: Option<Literal>,
    ) -> Token {
        let span = Span::new(start, self.cursor.offset());
        Token {
            kind,
            lexeme: CompactString::from(&self.source[span.range()]),
            literal,
            span,
            line,
        }
    }

    fn skip_block_comment(&mut self, opening: SourceChar) -> Result<(), LexicalError> {
        let mut depth = 1usize;
        while depth > 0 {
            let Some(c) = self.cursor.advance() else {
                return Err(LexicalError {
                    kind: LexicalErrorKind::UnclosedComment,
                    span: Span::new(opening.offset, self.cursor.offset()),
                    line: self.cursor.line(),
                });
            };
            match c.value {
                '/' if self.cursor.eat('*') => depth += 1,
                '*' if self.cursor.eat('/') => depth -= 1,
                _ => {}
            }
        }
        Ok(())
    }

    fn lex_string(&mut self, opening: SourceChar) -> Result<Token, LexicalError> {
        self.cursor.eat_while(|c| c != '"');
        if !self.cursor.eat('"') {
            return Err(LexicalError {
                kind: LexicalErrorKind::UnclosedString,
                span: Span::new(opening.offset, self.cursor.offset()),
                line: self.cursor.line(),
            });
        }
        let start = opening.next_offset().to_usize();
        let end = self.cursor.offset().to_usize() - 1;
        let value = CompactString::from(&self.source[start..end]);
        Ok(self.make_token(
            TokenKind::StringLiteral,
            opening.offset,
            opening.line,
            Some(Literal::String(value)),
        ))
    }

    fn lex_number(&mut self, first: SourceChar) -> Token {
        self.cursor.eat_while(|c| c.is_ascii_digit());
        // A fractional part needs at least one digit after the dot.
        if self.cursor.peek() == Some('.')
            && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            let _ = self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_digit());
        }
        let lexeme = &self.source[first.offset.to_usize()..self.cursor.offset().to_usize()];
        let value: f64 = lexeme
            .parse()
            .expect("Numeric literals are guaranteed to be parseable into f64.");
        self.make_token(
            TokenKind::NumericLiteral,
            first.offset,
            first.line,
            Some(Literal::Number(value)),
        )
    }

    fn lex_ident_or_keyword(&mut self, first: SourceChar) -> Token {
        self.cursor.eat_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let lexeme = &self.source[first.offset.to_usize()..self.cursor.offset().to_usize()];
        let kind = KEYWORD_HASHMAP
            .get(lexeme)
            .copied()
            .unwrap_or(TokenKind::Ident);
        self.make_token(kind, first.offset, first.line, None)
    }
}
