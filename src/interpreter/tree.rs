use super::environment::Environment;
use super::SystemContext;
use crate::parser::{
    expression::Expression,
    statement::{Program, Statement},
};
use crate::token::{Token, TokenKind};
use crate::value::error::{RuntimeError, RuntimeErrorKind};
use crate::value::LoxValue;

/// Evaluates statements directly on the syntax tree.
///
/// The interpreter keeps one environment for its whole lifetime, so variables defined by
/// one call to [`TreeWalkInterpreter::interpret`] are visible to the next.
pub struct TreeWalkInterpreter<C: SystemContext> {
    environment: Environment,
    context: C,
}

impl<C> TreeWalkInterpreter<C>
where
    C: SystemContext,
{
    pub fn new(context: C) -> Self {
        Self {
            environment: Environment::new(),
            context,
        }
    }

    pub fn get_environment(&self) -> &Environment {
        &self.environment
    }

    pub fn into_context(self) -> C {
        self.context
    }

    /// Runs every statement in order. The first runtime error stops the run.
    pub fn interpret(&mut self, program: &Program) -> Result<(), RuntimeError> {
        for statement in program.iter() {
            self.execute(statement)?;
        }
        Ok(())
    }

    pub fn execute(&mut self, statement: &Statement) -> Result<(), RuntimeError> {
        match statement {
            Statement::Expression(expr) => {
                let _ = self.evaluate(expr)?;
            }
            Statement::Print(expr) => {
                let value = self.evaluate(expr)?;
                self.context.writeln(&value.to_string());
            }
            Statement::Var { name, initial } => {
                let value = match initial {
                    Some(expr) => self.evaluate(expr)?,
                    None => LoxValue::Nil,
                };
                log::trace!("Defining `{}` as {value:?}", name.lexeme);
                self.environment.define(&name.lexeme, value);
            }
            Statement::Block(statements) => {
                for statement in statements {
                    self.execute(statement)?;
                }
            }
        }
        Ok(())
    }

    pub fn evaluate(&mut self, expr: &Expression) -> Result<LoxValue, RuntimeError> {
        match expr {
            Expression::Literal(value) => Ok(value.into()),
            Expression::Grouping(inner) => self.evaluate(inner),
            Expression::Variable(name) => self.environment.get(name),
            Expression::Assign { name, value } => {
                let value = self.evaluate(value)?;
                self.environment.assign(name, value.clone())?;
                Ok(value)
            }
            Expression::Unary { operator, rhs } => {
                let rhs = self.evaluate(rhs)?;
                Self::evaluate_unary(operator, &rhs)
            }
            Expression::Binary { lhs, operator, rhs } => {
                let lhs = self.evaluate(lhs)?;
                let rhs = self.evaluate(rhs)?;
                Self::evaluate_binary(operator, &lhs, &rhs)
            }
            Expression::Ternary {
                condition,
                success,
                failure,
                ..
            } => {
                // Only the selected branch is evaluated.
                if self.evaluate(condition)?.is_truthy() {
                    self.evaluate(success)
                } else {
                    self.evaluate(failure)
                }
            }
        }
    }
}

impl<C> TreeWalkInterpreter<C>
where
    C: SystemContext,
{
    fn evaluate_unary(operator: &Token, rhs: &LoxValue) -> Result<LoxValue, RuntimeError> {
        match operator.kind {
            TokenKind::Bang => Ok(rhs.logical_not()),
            TokenKind::Minus => rhs
                .numeric_negate()
                .map_err(|kind| RuntimeError::new(kind, operator)),
            kind => unreachable!("The parser never produces the unary operator {kind}."),
        }
    }

    fn evaluate_binary(
        operator: &Token,
        lhs: &LoxValue,
        rhs: &LoxValue,
    ) -> Result<LoxValue, RuntimeError> {
        let result: Result<LoxValue, RuntimeErrorKind> = match operator.kind {
            // Both sides are already evaluated in order, the comma keeps the right one.
            TokenKind::Comma => Ok(rhs.clone()),
            TokenKind::Plus => lhs.add(rhs),
            TokenKind::Minus => lhs.subtract(rhs),
            TokenKind::Star => lhs.multiply(rhs),
            TokenKind::Slash => lhs.divide(rhs),
            TokenKind::LessThan => lhs.less_than(rhs),
            TokenKind::LessThanEqual => lhs.less_than_or_equal(rhs),
            TokenKind::GreaterThan => lhs.greater_than(rhs),
            TokenKind::GreaterThanEqual => lhs.greater_than_or_equal(rhs),
            TokenKind::EqualEqual => Ok(LoxValue::Bool(lhs.is_equal(rhs))),
            TokenKind::BangEqual => Ok(LoxValue::Bool(lhs.is_not_equal(rhs))),
            kind => unreachable!("The parser never produces the binary operator {kind}."),
        };
        result.map_err(|kind| RuntimeError::new(kind, operator))
    }
}
