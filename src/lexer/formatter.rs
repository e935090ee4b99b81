use super::{LexicalError, LexicalErrorKind};
use crate::token::Token;

/// Interface for creating new token formatters.
pub trait TokenFormatter {
    /// Formats a token into a string.
    fn format(&self, token: &Token) -> String;
    /// Formats a lexer error into a string.
    fn format_lexical_error(&self, error: &LexicalError) -> String;
}

fn format_token(token: &Token) -> String {
    match token.literal {
        Some(ref literal) => format!("{} {} {literal}", token.kind, token.lexeme),
        None => format!("{} {} null", token.kind, token.lexeme),
    }
}

/// `KIND lexeme literal`, one token per line.
pub struct BasicFormatter;

impl TokenFormatter for BasicFormatter {
    fn format(&self, token: &Token) -> String {
        format_token(token)
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        format!("[line {}] Error: {}", error.line, error.kind)
    }
}

pub struct DebugFormatter;

impl TokenFormatter for DebugFormatter {
    fn format(&self, token: &Token) -> String {
        format!("{token:?}")
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        format!("{error:?}")
    }
}

/// Same as [`BasicFormatter`] but prefixed with the source line.
pub struct LineFormatter;

impl TokenFormatter for LineFormatter {
    fn format(&self, token: &Token) -> String {
        format!("({}) {}", token.line, format_token(token))
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        let line = error.line;
        match error.kind {
            LexicalErrorKind::Unrecognized(c) => {
                format!("({line}) ERROR UNEXPECTED_CHAR {c}")
            }
            LexicalErrorKind::UnclosedString => {
                format!("({line}) ERROR UNTERMINATED_STRING null")
            }
            LexicalErrorKind::UnclosedComment => {
                format!("({line}) ERROR UNTERMINATED_COMMENT null")
            }
        }
    }
}
