use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use std::{fs::read_to_string, process::ExitCode};

use loxide::interpreter::context::StdioContext;
use loxide::reporter::formatter::{BasicFormatter, DiagnosticFormatter, PrettyFormatter};
use loxide::reporter::{Reporter, StderrReporter};
use loxide::session::{RunStatus, Session};

const PROMPT: &str = "> ";

#[derive(Debug, Parser)]
#[clap(name = "loxide", version)]
pub struct CLArgs {
    #[clap(subcommand)]
    pub routine: LoxideCommand,
}

#[derive(Debug, Subcommand)]
pub enum LoxideCommand {
    /// Print the tokens of a source file.
    Tokenize {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "basic")]
        format: TokenFormat,
    },
    /// Parse a single expression and print its syntax tree.
    Parse {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "sexpr")]
        format: ExpressionFormat,
    },
    /// Evaluate a single expression and print its value.
    Evaluate { path: PathBuf },
    /// Run a program.
    Run {
        path: PathBuf,
        #[clap(long = "diagnostics", value_enum, default_value = "basic")]
        diagnostics: DiagnosticFormat,
    },
    /// Start an interactive session.
    Repl,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum TokenFormat {
    Debug,
    Basic,
    Line,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ExpressionFormat {
    Debug,
    #[clap(name = "sexpr")]
    SExpr,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum DiagnosticFormat {
    Basic,
    Pretty,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    env_logger::init();

    let args = match CLArgs::try_parse() {
        Ok(args) => args,
        Err(error) => {
            let code = if error.use_stderr() { 64 } else { 0 };
            error.print()?;
            return Ok(ExitCode::from(code));
        }
    };

    let code = match args.routine {
        LoxideCommand::Tokenize { path, format } => {
            log::info!("Tokenizing {path:?}");
            let src = read_to_string(path)?;
            tokenize(&src, &format)
        }
        LoxideCommand::Parse { path, format } => {
            log::info!("Parsing {path:?}");
            let src = read_to_string(path)?;
            parse(&src, &format)
        }
        LoxideCommand::Evaluate { path } => {
            log::info!("Evaluating {path:?}");
            let src = read_to_string(path)?;
            evaluate(&src)
        }
        LoxideCommand::Run { path, diagnostics } => {
            log::info!("Running {path:?}");
            let src = read_to_string(&path)?;
            match diagnostics {
                DiagnosticFormat::Basic => run(&src, BasicFormatter),
                DiagnosticFormat::Pretty => run(&src, PrettyFormatter::new(&src, &path)),
            }
        }
        LoxideCommand::Repl => repl()?,
    };
    Ok(ExitCode::from(code))
}

fn tokenize(src: &str, format: &TokenFormat) -> u8 {
    use loxide::lexer::formatter::{
        BasicFormatter, DebugFormatter, LineFormatter, TokenFormatter,
    };
    use loxide::lexer::Lexer;

    let formatter: Box<dyn TokenFormatter> = match format {
        TokenFormat::Debug => Box::new(DebugFormatter),
        TokenFormat::Basic => Box::new(BasicFormatter),
        TokenFormat::Line => Box::new(LineFormatter),
    };
    let mut lexer = Lexer::new(src);
    let mut succeeded = true;
    loop {
        match lexer.next_token() {
            Ok(token) => {
                println!("{}", formatter.format(&token));
                if token.is_eof() {
                    break;
                }
            }
            Err(error) => {
                eprintln!("{}", formatter.format_lexical_error(&error));
                succeeded = false;
            }
        }
    }
    if succeeded {
        0
    } else {
        RunStatus::StaticError.exit_code()
    }
}

fn parse(src: &str, format: &ExpressionFormat) -> u8 {
    use loxide::lexer::formatter::{BasicFormatter, TokenFormatter};
    use loxide::lexer::Lexer;
    use loxide::parser::formatter::{DebugFormatter, ExpressionFormatter, SExpressionFormatter};

    let (tokens, errors) = Lexer::new(src).tokenize();
    if !errors.is_empty() {
        for error in errors {
            eprintln!("{}", BasicFormatter.format_lexical_error(&error));
        }
        return RunStatus::StaticError.exit_code();
    }

    let formatter: Box<dyn ExpressionFormatter> = match format {
        ExpressionFormat::Debug => Box::new(DebugFormatter),
        ExpressionFormat::SExpr => Box::new(SExpressionFormatter),
    };
    match loxide::parser::Parser::new(tokens).parse_expression() {
        Ok(expression) => {
            println!("{}", formatter.format(&expression));
            0
        }
        Err(error) => {
            eprintln!("{}", formatter.format_error(&error));
            RunStatus::StaticError.exit_code()
        }
    }
}

fn evaluate(src: &str) -> u8 {
    let mut session = Session::new(StdioContext, StderrReporter::new(BasicFormatter));
    match session.evaluate(src) {
        Some(value) => {
            println!("{value}");
            0
        }
        None if session.get_reporter().had_error() => RunStatus::StaticError.exit_code(),
        None => RunStatus::RuntimeError.exit_code(),
    }
}

fn run<F: DiagnosticFormatter>(src: &str, formatter: F) -> u8 {
    let mut session = Session::new(StdioContext, StderrReporter::new(formatter));
    session.run(src).exit_code()
}

fn repl() -> Result<u8> {
    let mut session = Session::new(StdioContext, StderrReporter::new(BasicFormatter));
    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                editor.add_history_entry(line.as_str())?;
                let status = session.run(&line);
                log::debug!("Line finished with {status:?}");
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(error) => return Err(error.into()),
        }
    }
    Ok(0)
}
