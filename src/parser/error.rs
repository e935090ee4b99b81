use crate::token::Token;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParserErrorKind {
    #[error("Expect expression.")]
    NonExpression,
    #[error("Expect left-hand operand.")]
    MissingLeftOperand,
    #[error("Expect ')' after expression.")]
    UnclosedGroup,
    #[error("Expect ':' after expression.")]
    MissingColon,
    #[error("Expect '}}' after block.")]
    UnclosedBlock,
    #[error("Expect ';' after {0}.")]
    MissingSemicolon(&'static str),
    #[error("Expect variable name.")]
    MissingVariableName,
    #[error("Invalid assignment target.")]
    InvalidLValue,
    #[error("Too much nesting.")]
    ExcessiveNesting,
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind}")]
pub struct ParserError {
    #[source]
    pub kind: ParserErrorKind,
    /// The token the parser was looking at when it gave up.
    pub token: Token,
}

impl ParserError {
    pub fn line(&self) -> u32 {
        self.token.line
    }

    pub fn code(&self) -> &'static str {
        match self.kind {
            ParserErrorKind::NonExpression => "PS001",
            ParserErrorKind::MissingLeftOperand => "PS002",
            ParserErrorKind::UnclosedGroup => "PS003",
            ParserErrorKind::MissingColon => "PS004",
            ParserErrorKind::UnclosedBlock => "PS005",
            ParserErrorKind::MissingSemicolon(_) => "PS006",
            ParserErrorKind::MissingVariableName => "PS007",
            ParserErrorKind::InvalidLValue => "PS008",
            ParserErrorKind::ExcessiveNesting => "PS009",
        }
    }
}
