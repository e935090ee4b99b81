use std::ops::Range;
use std::path::Path;

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};

use super::StaticError;
use crate::lexer::formatter::{BasicFormatter as BasicTokenFormatter, TokenFormatter};
use crate::parser::formatter::{ExpressionFormatter, SExpressionFormatter};
use crate::value::error::RuntimeError;

const ARIADNE_MSG: &str = "Ariadne produces valid utf-8 strings";
const ARIADNE_WRITE_MSG: &str = "Write into buffer should not fail.";

pub trait DiagnosticFormatter {
    fn format_error(&self, error: &StaticError) -> String;
    fn format_runtime_error(&self, error: &RuntimeError) -> String;
}

/// The classic one-line diagnostics, e.g. `[line 1] Error at ')': Expect expression.`.
#[derive(Debug, Default)]
pub struct BasicFormatter;

impl DiagnosticFormatter for BasicFormatter {
    fn format_error(&self, error: &StaticError) -> String {
        match error {
            StaticError::Lexical(error) => BasicTokenFormatter.format_lexical_error(error),
            StaticError::Parser(error) => SExpressionFormatter.format_error(error),
        }
    }

    fn format_runtime_error(&self, error: &RuntimeError) -> String {
        format!("{}\n[line {}]", error.kind, error.line())
    }
}

/// Renders diagnostics against the source text with the offending span underlined.
pub struct PrettyFormatter<'src> {
    text: &'src str,
    path: &'src Path,
}

impl<'src> PrettyFormatter<'src> {
    pub fn new(text: &'src str, path: &'src Path) -> Self {
        Self { text, path }
    }

    fn render(&self, code: &str, message: String, span: Range<usize>, label: String) -> String {
        let path = self.path.to_string_lossy();
        let path = path.as_ref();
        let mut output = std::io::Cursor::new(Vec::new());
        Report::build(ReportKind::Error, (path, span.clone()))
            .with_config(Config::default().with_index_type(IndexType::Byte))
            .with_code(code)
            .with_message(message)
            .with_label(
                Label::new((path, span))
                    .with_message(label)
                    .with_color(Color::BrightRed),
            )
            .finish()
            .write((path, Source::from(self.text)), &mut output)
            .expect(ARIADNE_WRITE_MSG);
        String::from_utf8(output.into_inner()).expect(ARIADNE_MSG)
    }
}

impl DiagnosticFormatter for PrettyFormatter<'_> {
    fn format_error(&self, error: &StaticError) -> String {
        let label = match error {
            StaticError::Lexical(_) => format!("Error on line {}", error.line()),
            StaticError::Parser(inner) if inner.token.is_eof() => "File ends here".into(),
            StaticError::Parser(inner) => format!("Unexpected `{}`", inner.token.lexeme),
        };
        self.render(error.code(), error.to_string(), error.span().range(), label)
    }

    fn format_runtime_error(&self, error: &RuntimeError) -> String {
        self.render(
            error.code(),
            error.to_string(),
            error.token.span.range(),
            format!("While evaluating `{}`", error.token.lexeme),
        )
    }
}
