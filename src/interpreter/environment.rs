use compact_str::CompactString;
use std::collections::HashMap;

use crate::token::Token;
use crate::value::{
    error::{RuntimeError, RuntimeErrorKind},
    LoxValue,
};

/// The single flat variable store of a run. Blocks do not open a new scope.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    values: HashMap<CompactString, LoxValue>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name`, replacing any earlier binding of the same name.
    pub fn define(&mut self, name: &str, value: LoxValue) {
        self.values.insert(CompactString::from(name), value);
    }

    pub fn get(&self, name: &Token) -> Result<LoxValue, RuntimeError> {
        self.values
            .get(name.lexeme.as_str())
            .cloned()
            .ok_or_else(|| Self::undefined(name))
    }

    /// Rebinds an existing variable. Assignment never declares.
    pub fn assign(&mut self, name: &Token, value: LoxValue) -> Result<(), RuntimeError> {
        match self.values.get_mut(name.lexeme.as_str()) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Self::undefined(name)),
        }
    }

    pub fn access(&self, name: &str) -> Option<&LoxValue> {
        self.values.get(name)
    }

    fn undefined(name: &Token) -> RuntimeError {
        RuntimeError::new(
            RuntimeErrorKind::UndefinedVariable(name.lexeme.clone()),
            name,
        )
    }
}
