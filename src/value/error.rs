use super::LoxValue;
use crate::token::Token;
use compact_str::CompactString;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeErrorKind {
    #[error("Operand must be a number.")]
    NonNumeric(LoxValue),
    #[error("Operands must be numbers.")]
    NonNumerics(LoxValue, LoxValue),
    #[error("Operands must be two numbers or two strings.")]
    NonAddable(LoxValue, LoxValue),
    #[error("Operands must be two numbers or two strings.")]
    NonComparable(LoxValue, LoxValue),
    #[error("Division by zero.")]
    DivisionByZero,
    #[error("Undefined variable '{0}'.")]
    UndefinedVariable(CompactString),
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind}")]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    /// The operator or variable token being evaluated when the error occurred.
    pub token: Token,
}

impl RuntimeError {
    pub fn new(kind: RuntimeErrorKind, token: &Token) -> Self {
        Self {
            kind,
            token: token.clone(),
        }
    }

    pub fn line(&self) -> u32 {
        self.token.line
    }

    pub fn code(&self) -> &'static str {
        match self.kind {
            RuntimeErrorKind::NonNumeric(_) => "RT001",
            RuntimeErrorKind::NonNumerics(_, _) => "RT002",
            RuntimeErrorKind::NonAddable(_, _) => "RT003",
            RuntimeErrorKind::NonComparable(_, _) => "RT004",
            RuntimeErrorKind::DivisionByZero => "RT005",
            RuntimeErrorKind::UndefinedVariable(_) => "RT006",
        }
    }
}
