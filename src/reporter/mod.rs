pub mod formatter;

use formatter::DiagnosticFormatter;
use thiserror::Error;

use crate::lexer::LexicalError;
use crate::parser::ParserError;
use crate::token::Span;
use crate::value::error::RuntimeError;

/// An error found before execution starts.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StaticError {
    #[error(transparent)]
    Lexical(#[from] LexicalError),
    #[error(transparent)]
    Parser(#[from] ParserError),
}

impl StaticError {
    pub fn line(&self) -> u32 {
        match self {
            StaticError::Lexical(error) => error.line,
            StaticError::Parser(error) => error.line(),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            StaticError::Lexical(error) => error.span,
            StaticError::Parser(error) => error.token.span,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            StaticError::Lexical(error) => error.code(),
            StaticError::Parser(error) => error.code(),
        }
    }
}

/// The diagnostic sink shared by every pipeline stage.
pub trait Reporter {
    fn report_error(&mut self, error: &StaticError);
    fn report_runtime_error(&mut self, error: &RuntimeError);
    fn had_error(&self) -> bool;
    fn had_runtime_error(&self) -> bool;
}

pub struct StderrReporter<F: DiagnosticFormatter> {
    formatter: F,
    had_error: bool,
    had_runtime_error: bool,
}

impl<F: DiagnosticFormatter> StderrReporter<F> {
    pub fn new(formatter: F) -> Self {
        Self {
            formatter,
            had_error: false,
            had_runtime_error: false,
        }
    }
}

impl<F: DiagnosticFormatter> Reporter for StderrReporter<F> {
    fn report_error(&mut self, error: &StaticError) {
        self.had_error = true;
        eprintln!("{}", self.formatter.format_error(error));
    }

    fn report_runtime_error(&mut self, error: &RuntimeError) {
        self.had_runtime_error = true;
        eprintln!("{}", self.formatter.format_runtime_error(error));
    }

    fn had_error(&self) -> bool {
        self.had_error
    }

    fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }
}

/// Collects formatted diagnostics, one per line.
#[derive(Debug, Default)]
pub struct BufferedReporter<F: DiagnosticFormatter> {
    formatter: F,
    buffer: String,
    had_error: bool,
    had_runtime_error: bool,
}

impl<F: DiagnosticFormatter> BufferedReporter<F> {
    pub fn new(formatter: F) -> Self {
        Self {
            formatter,
            buffer: String::new(),
            had_error: false,
            had_runtime_error: false,
        }
    }

    pub fn get_data(&self) -> &str {
        &self.buffer
    }

    fn push(&mut self, text: &str) {
        self.buffer.push_str(text);
        self.buffer.push('\n');
    }
}

impl<F: DiagnosticFormatter> Reporter for BufferedReporter<F> {
    fn report_error(&mut self, error: &StaticError) {
        self.had_error = true;
        let text = self.formatter.format_error(error);
        self.push(&text);
    }

    fn report_runtime_error(&mut self, error: &RuntimeError) {
        self.had_runtime_error = true;
        let text = self.formatter.format_runtime_error(error);
        self.push(&text);
    }

    fn had_error(&self) -> bool {
        self.had_error
    }

    fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }
}
