use std::{
    fs::{read_dir, read_to_string},
    path::Path,
};

use color_eyre::{eyre::Context, Result};
use proptest::prelude::*;

use loxide::{
    interpreter::context::BufferedContext,
    reporter::{formatter::BasicFormatter, BufferedReporter, Reporter},
    session::{RunStatus, Session},
    value::LoxValue,
};

type TestSession = Session<BufferedContext, BufferedReporter<BasicFormatter>>;

fn new_session() -> TestSession {
    Session::new(
        BufferedContext::new(),
        BufferedReporter::new(BasicFormatter),
    )
}

fn run(source: &str) -> (RunStatus, String, String) {
    let mut session = new_session();
    let status = session.run(source);
    let (context, reporter) = session.into_parts();
    (status, context.into_data(), reporter.get_data().to_string())
}

fn check(input: &str, expected: &str, test_name: &str) {
    let (status, output, diagnostics) = run(input);
    assert_eq!(
        status,
        RunStatus::Success,
        "Failed test {test_name} with {diagnostics}"
    );
    assert_eq!(output, expected, "Failed test {test_name}");
}

fn evaluate(input: &str) -> Option<LoxValue> {
    new_session().evaluate(input)
}

#[test]
fn smoke_test() {
    check("print 1;", "1\n", "smoke");
}

#[test]
fn arithmetic_follows_precedence() {
    assert_eq!(evaluate("1 + 2 * 3"), Some(LoxValue::Number(7.0)));
    assert_eq!(evaluate("(1 + 2) * 3"), Some(LoxValue::Number(9.0)));
    assert_eq!(evaluate("5 / 2"), Some(LoxValue::Number(2.5)));
    assert_eq!(evaluate("-3 - -4"), Some(LoxValue::Number(1.0)));
}

#[test]
fn comma_yields_rightmost_value() {
    assert_eq!(evaluate("1, 2, 3"), Some(LoxValue::Number(3.0)));
}

#[test]
fn ternary_only_evaluates_the_chosen_branch() {
    assert_eq!(evaluate("true ? 1 : (1/0)"), Some(LoxValue::Number(1.0)));
    assert_eq!(evaluate("nil ? (1/0) : 2"), Some(LoxValue::Number(2.0)));
    check(
        "var a = 0;\ntrue ? a = 1 : (a = 2);\nprint a;",
        "1\n",
        "ternary_side_effects",
    );
}

#[test]
fn division_by_zero_is_its_own_error() {
    let (status, output, diagnostics) = run("print 5 / 0;");
    assert_eq!(status, RunStatus::RuntimeError);
    assert_eq!(output, "");
    assert_eq!(diagnostics, "Division by zero.\n[line 1]\n");

    let (_, _, diagnostics) = run("print -5 / -0;");
    assert_eq!(diagnostics, "Division by zero.\n[line 1]\n");
}

#[test]
fn strict_string_concatenation() {
    assert_eq!(
        evaluate("\"a\" + \"b\""),
        Some(LoxValue::String("ab".into()))
    );
    let (status, _, diagnostics) = run("print \"x\" + 1;");
    assert_eq!(status, RunStatus::RuntimeError);
    assert_eq!(
        diagnostics,
        "Operands must be two numbers or two strings.\n[line 1]\n"
    );
}

#[test]
fn integral_numbers_print_without_fraction() {
    check("print 6 * 7;", "42\n", "integral");
    check("print 0.5 + 0.25;", "0.75\n", "fractional");
}

#[test]
fn variable_lifecycle() {
    check("var x = 1; x = 2; print x;", "2\n", "assign");
    check("var x = 1; var x = 3; print x;", "3\n", "redeclare");
    check("var x; print x;", "nil\n", "default_nil");

    let (status, _, diagnostics) = run("print y;");
    assert_eq!(status, RunStatus::RuntimeError);
    assert_eq!(diagnostics, "Undefined variable 'y'.\n[line 1]\n");

    let (status, _, diagnostics) = run("y = 1;");
    assert_eq!(status, RunStatus::RuntimeError);
    assert_eq!(diagnostics, "Undefined variable 'y'.\n[line 1]\n");
}

#[test]
fn blocks_share_the_flat_environment() {
    check(
        "var a = 1;\n{ var a = 2; var b = 3; }\nprint a;\nprint b;",
        "2\n3\n",
        "flat_blocks",
    );
}

#[test]
fn runtime_error_aborts_the_rest_of_the_run() {
    let (status, output, _) = run("print 1;\nprint -\"a\";\nprint 2;");
    assert_eq!(status, RunStatus::RuntimeError);
    assert_eq!(output, "1\n");
}

#[test]
fn static_errors_prevent_execution() {
    let (status, output, diagnostics) = run("print 1;\nprint 2 +;\n@");
    assert_eq!(status, RunStatus::StaticError);
    assert_eq!(output, "");
    assert_eq!(
        diagnostics,
        "[line 3] Error: Unexpected character: @\n[line 2] Error at ';': Expect expression.\n"
    );
}

#[test]
fn session_keeps_variables_between_runs() {
    let mut session = new_session();
    assert_eq!(session.run("var greeting = \"hi\";"), RunStatus::Success);
    assert_eq!(session.run("print nope;"), RunStatus::RuntimeError);
    assert_eq!(session.run("print greeting;"), RunStatus::Success);
    assert_eq!(
        session.get_interpreter().get_environment().access("greeting"),
        Some(&LoxValue::String("hi".into()))
    );
    assert!(session.get_reporter().had_runtime_error());
    assert!(!session.get_reporter().had_error());
    let (context, _) = session.into_parts();
    assert_eq!(context.get_data(), "hi\n");
}

#[test]
fn exit_codes() {
    assert_eq!(RunStatus::Success.exit_code(), 0);
    assert_eq!(RunStatus::StaticError.exit_code(), 65);
    assert_eq!(RunStatus::RuntimeError.exit_code(), 70);
}

#[test]
fn test_operator() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/operator");
    test_engine(input_dir)
}

#[test]
fn test_variable() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/variable");
    test_engine(input_dir)
}

#[test]
fn test_block() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/block");
    test_engine(input_dir)
}

#[test]
fn test_error() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/error");
    test_engine(input_dir)
}

struct TestCase {
    name: String,
    source: String,
    output: String,
    diagnostics: String,
}

impl TestCase {
    pub fn check(&self) {
        let (_, output, diagnostics) = run(&self.source);
        assert_eq!(
            self.output, output,
            "Failed test {} at output stage.",
            self.name
        );
        assert_eq!(
            self.diagnostics,
            diagnostics.trim_end(),
            "Failed test {} at diagnostic stage.",
            self.name
        );
    }
}

fn test_engine(input_dir: &Path) -> Result<()> {
    let mut succeeded = true;
    for entry in read_dir(input_dir).context("Failed to open input test data folder")? {
        let entry = entry?;
        let path = entry.path();

        let Some(extension) = path.extension() else {
            continue;
        };

        if extension != "lox" {
            continue;
        }

        let test_case = parse_test_case(&path)?;

        let res = std::panic::catch_unwind(|| {
            test_case.check();
        });
        if res.is_err() {
            println!("\tFails test case {}", test_case.name);
            succeeded = false;
        }
    }

    assert!(succeeded, "At least one interpreter test case failed");
    Ok(())
}

/// Reads the expectations embedded in a test script's comments.
fn parse_test_case(input_path: &Path) -> Result<TestCase> {
    let test_name = AsRef::<Path>::as_ref(
        input_path
            .file_name()
            .expect("File name can't be none as the path is to a real file."),
    )
    .to_string_lossy();

    let input = read_to_string(input_path).context("Failed to open input test data file")?;

    let mut expected_outputs = Vec::new();
    let mut expected_diagnostics = Vec::new();

    for (line_index, line) in input.lines().enumerate() {
        let line_number = line_index + 1;
        if let Some(expected) = line.split_once("// expect: ").map(|(_, rest)| rest) {
            expected_outputs.push(format!("{}\n", expected.trim()));
        } else if let Some((_, message)) = line.split_once("// expect runtime error: ") {
            expected_diagnostics.push(format!("{}\n[line {line_number}]", message.trim()));
        } else if let Some((_, body)) = line.split_once("// [line ") {
            expected_diagnostics.push(format!("[line {}", body.trim()));
        } else if let Some((_, body)) = line.split_once("// Error") {
            expected_diagnostics.push(format!("[line {line_number}] Error{}", body.trim_end()));
        }
    }

    Ok(TestCase {
        name: test_name.into_owned(),
        source: input,
        output: expected_outputs.concat(),
        diagnostics: expected_diagnostics.join("\n"),
    })
}

// Property-based tests

#[derive(Debug, Clone)]
enum Arithmetic {
    Number(u32),
    Binary(Box<Arithmetic>, char, Box<Arithmetic>),
}

impl Arithmetic {
    fn source(&self) -> String {
        match self {
            Arithmetic::Number(v) => v.to_string(),
            Arithmetic::Binary(lhs, op, rhs) => {
                format!("({} {op} {})", lhs.source(), rhs.source())
            }
        }
    }

    /// `None` when a division by zero happens anywhere in the tree.
    fn value(&self) -> Option<f64> {
        match self {
            Arithmetic::Number(v) => Some(f64::from(*v)),
            Arithmetic::Binary(lhs, op, rhs) => {
                let lhs = lhs.value()?;
                let rhs = rhs.value()?;
                match op {
                    '+' => Some(lhs + rhs),
                    '-' => Some(lhs - rhs),
                    '*' => Some(lhs * rhs),
                    '/' if rhs == 0.0 => None,
                    '/' => Some(lhs / rhs),
                    _ => unreachable!(),
                }
            }
        }
    }
}

fn arithmetic_strategy() -> impl Strategy<Value = Arithmetic> {
    let leaf = (0u32..100).prop_map(Arithmetic::Number);
    leaf.prop_recursive(4, 32, 2, |inner| {
        (
            inner.clone(),
            prop_oneof![Just('+'), Just('-'), Just('*'), Just('/')],
            inner,
        )
            .prop_map(|(lhs, op, rhs)| Arithmetic::Binary(Box::new(lhs), op, Box::new(rhs)))
    })
}

proptest! {
    #[test]
    fn arithmetic_matches_f64(expression in arithmetic_strategy()) {
        let mut session = new_session();
        let actual = session.evaluate(&expression.source());
        match expression.value() {
            Some(expected) => {
                prop_assert_eq!(actual, Some(LoxValue::Number(expected)));
            }
            None => {
                prop_assert_eq!(actual, None);
                prop_assert!(session.get_reporter().had_runtime_error());
            }
        }
    }

    #[test]
    fn unparenthesized_term_and_factor(a in 0u32..1000, b in 0u32..1000, c in 1u32..1000) {
        let source = format!("{a} + {b} * {c} - {a} / {c}");
        let (a, b, c) = (f64::from(a), f64::from(b), f64::from(c));
        let expected = a + b * c - a / c;
        prop_assert_eq!(evaluate(&source), Some(LoxValue::Number(expected)));
    }
}
