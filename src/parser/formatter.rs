use super::{
    expression::{Expression, LiteralValue},
    ParserError,
};

pub trait ExpressionFormatter {
    fn format(&self, tree: &Expression) -> String;
    fn format_error(&self, error: &ParserError) -> String;
}

pub struct DebugFormatter;

impl ExpressionFormatter for DebugFormatter {
    fn format(&self, tree: &Expression) -> String {
        format!("{tree:?}")
    }

    fn format_error(&self, error: &ParserError) -> String {
        format!("{error:?}")
    }
}

/// Prints the tree in prefix notation, e.g. `(* (group (+ 1.0 2.0)) 3.0)`.
pub struct SExpressionFormatter;

impl SExpressionFormatter {
    fn format_literal(value: &LiteralValue) -> String {
        match value {
            LiteralValue::Number(v) => format!("{v:?}"),
            LiteralValue::String(v) => v.to_string(),
            LiteralValue::Bool(v) => format!("{v}"),
            LiteralValue::Nil => "nil".into(),
        }
    }

    fn format_node(node: &Expression) -> String {
        match node {
            Expression::Literal(value) => Self::format_literal(value),
            Expression::Grouping(inner) => format!("(group {})", Self::format_node(inner)),
            Expression::Unary { operator, rhs } => {
                format!("({} {})", operator.lexeme, Self::format_node(rhs))
            }
            Expression::Binary { lhs, operator, rhs } => format!(
                "({} {} {})",
                operator.lexeme,
                Self::format_node(lhs),
                Self::format_node(rhs)
            ),
            Expression::Ternary {
                condition,
                success,
                failure,
                ..
            } => format!(
                "(?: {} {} {})",
                Self::format_node(condition),
                Self::format_node(success),
                Self::format_node(failure)
            ),
            Expression::Variable(name) => name.lexeme.to_string(),
            Expression::Assign { name, value } => {
                format!("(= {} {})", name.lexeme, Self::format_node(value))
            }
        }
    }
}

impl ExpressionFormatter for SExpressionFormatter {
    fn format(&self, tree: &Expression) -> String {
        Self::format_node(tree)
    }

    fn format_error(&self, error: &ParserError) -> String {
        let token = &error.token;
        if token.is_eof() {
            format!("[line {}] Error at end: {}", token.line, error.kind)
        } else {
            format!(
                "[line {}] Error at '{}': {}",
                token.line, token.lexeme, error.kind
            )
        }
    }
}
