use compact_str::CompactString;

use crate::token::Token;

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Number(f64),
    String(CompactString),
    Bool(bool),
    Nil,
}

/// Expression tree. Every node owns its children.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(LiteralValue),
    Grouping(Box<Expression>),
    Unary {
        operator: Token,
        rhs: Box<Expression>,
    },
    /// Arithmetic, comparison, equality and the comma operator.
    Binary {
        lhs: Box<Expression>,
        operator: Token,
        rhs: Box<Expression>,
    },
    Ternary {
        condition: Box<Expression>,
        question: Token,
        success: Box<Expression>,
        colon: Token,
        failure: Box<Expression>,
    },
    Variable(Token),
    Assign {
        name: Token,
        value: Box<Expression>,
    },
}

impl Expression {
    pub fn binary(lhs: Expression, operator: Token, rhs: Expression) -> Self {
        Expression::Binary {
            lhs: Box::new(lhs),
            operator,
            rhs: Box::new(rhs),
        }
    }

    pub fn unary(operator: Token, rhs: Expression) -> Self {
        Expression::Unary {
            operator,
            rhs: Box::new(rhs),
        }
    }
}
