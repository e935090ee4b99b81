use crate::interpreter::{SystemContext, TreeWalkInterpreter};
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::reporter::{Reporter, StaticError};
use crate::value::LoxValue;

/// How a single run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    StaticError,
    RuntimeError,
}

impl RunStatus {
    pub fn exit_code(&self) -> u8 {
        match self {
            RunStatus::Success => 0,
            RunStatus::StaticError => 65,
            RunStatus::RuntimeError => 70,
        }
    }
}

/// Drives source text through the lexer, parser and interpreter.
///
/// A session holds a single interpreter, so successive calls to [`Session::run`] share
/// their variables.
pub struct Session<C: SystemContext, R: Reporter> {
    interpreter: TreeWalkInterpreter<C>,
    reporter: R,
}

impl<C, R> Session<C, R>
where
    C: SystemContext,
    R: Reporter,
{
    pub fn new(context: C, reporter: R) -> Self {
        Self {
            interpreter: TreeWalkInterpreter::new(context),
            reporter,
        }
    }

    pub fn get_interpreter(&self) -> &TreeWalkInterpreter<C> {
        &self.interpreter
    }

    pub fn get_reporter(&self) -> &R {
        &self.reporter
    }

    pub fn into_parts(self) -> (C, R) {
        (self.interpreter.into_context(), self.reporter)
    }

    /// Runs a whole program. Nothing is executed if scanning or parsing failed.
    pub fn run(&mut self, source: &str) -> RunStatus {
        log::trace!("Scanning {} bytes", source.len());
        let (tokens, lexical_errors) = Lexer::new(source).tokenize();
        let had_error = !lexical_errors.is_empty();
        for error in lexical_errors {
            self.reporter.report_error(&StaticError::from(error));
        }

        log::trace!("Parsing {} tokens", tokens.len());
        let program = match Parser::new(tokens).parse() {
            Ok(program) => program,
            Err(errors) => {
                for error in errors {
                    self.reporter.report_error(&StaticError::from(error));
                }
                return RunStatus::StaticError;
            }
        };
        if had_error {
            return RunStatus::StaticError;
        }

        log::trace!("Interpreting {} statements", program.len());
        match self.interpreter.interpret(&program) {
            Ok(()) => RunStatus::Success,
            Err(error) => {
                log::debug!("Run aborted by {}", error.code());
                self.reporter.report_runtime_error(&error);
                RunStatus::RuntimeError
            }
        }
    }

    /// Scans, parses and evaluates a single expression.
    ///
    /// Returns `None` after reporting the error if any stage failed.
    pub fn evaluate(&mut self, source: &str) -> Option<LoxValue> {
        let (tokens, lexical_errors) = Lexer::new(source).tokenize();
        if !lexical_errors.is_empty() {
            for error in lexical_errors {
                self.reporter.report_error(&StaticError::from(error));
            }
            return None;
        }

        log::trace!("Parsing a single expression from {} tokens", tokens.len());
        let expression = match Parser::new(tokens).parse_expression() {
            Ok(expression) => expression,
            Err(error) => {
                self.reporter.report_error(&StaticError::from(error));
                return None;
            }
        };

        match self.interpreter.evaluate(&expression) {
            Ok(value) => Some(value),
            Err(error) => {
                self.reporter.report_runtime_error(&error);
                None
            }
        }
    }
}
