pub mod error;

use compact_str::{CompactString, CompactStringExt};
use error::RuntimeErrorKind;

use crate::parser::expression::LiteralValue;

#[derive(Debug, Clone, PartialEq)]
pub enum LoxValue {
    Number(f64),
    String(CompactString),
    Bool(bool),
    Nil,
}

impl From<&LiteralValue> for LoxValue {
    fn from(value: &LiteralValue) -> Self {
        match value {
            LiteralValue::Number(v) => LoxValue::Number(*v),
            LiteralValue::String(v) => LoxValue::String(v.clone()),
            LiteralValue::Bool(v) => LoxValue::Bool(*v),
            LiteralValue::Nil => LoxValue::Nil,
        }
    }
}

/// Integral numbers print without a fractional part, so `3.0` prints as `3`.
/// Overflowed numbers print as `Infinity`, `-Infinity` or `NaN`.
impl std::fmt::Display for LoxValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(v) if v.is_nan() => write!(f, "NaN"),
            Self::Number(v) if v.is_infinite() && v.is_sign_negative() => write!(f, "-Infinity"),
            Self::Number(v) if v.is_infinite() => write!(f, "Infinity"),
            Self::Number(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Nil => write!(f, "nil"),
        }
    }
}

// Unary operators
impl LoxValue {
    /// `nil` and `false` are falsy, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, LoxValue::Bool(false) | LoxValue::Nil)
    }

    pub fn logical_not(&self) -> LoxValue {
        LoxValue::Bool(!self.is_truthy())
    }

    pub fn numeric_negate(&self) -> Result<LoxValue, RuntimeErrorKind> {
        match self {
            LoxValue::Number(v) => Ok(LoxValue::Number(-v)),
            v => Err(RuntimeErrorKind::NonNumeric(v.clone())),
        }
    }
}

impl LoxValue {
    // Arithmetic + string concatenation
    pub fn add(&self, other: &LoxValue) -> Result<LoxValue, RuntimeErrorKind> {
        match (self, other) {
            (LoxValue::Number(lhs), LoxValue::Number(rhs)) => Ok(LoxValue::Number(lhs + rhs)),
            (LoxValue::String(lhs), LoxValue::String(rhs)) => {
                Ok(LoxValue::String([lhs, rhs].concat_compact()))
            }
            (lhs, rhs) => Err(RuntimeErrorKind::NonAddable(lhs.clone(), rhs.clone())),
        }
    }

    pub fn subtract(&self, other: &LoxValue) -> Result<LoxValue, RuntimeErrorKind> {
        let (lhs, rhs) = self.as_numbers(other)?;
        Ok(LoxValue::Number(lhs - rhs))
    }

    pub fn multiply(&self, other: &LoxValue) -> Result<LoxValue, RuntimeErrorKind> {
        let (lhs, rhs) = self.as_numbers(other)?;
        Ok(LoxValue::Number(lhs * rhs))
    }

    pub fn divide(&self, other: &LoxValue) -> Result<LoxValue, RuntimeErrorKind> {
        let (lhs, rhs) = self.as_numbers(other)?;
        if rhs == 0.0 {
            return Err(RuntimeErrorKind::DivisionByZero);
        }
        Ok(LoxValue::Number(lhs / rhs))
    }

    fn as_numbers(&self, other: &LoxValue) -> Result<(f64, f64), RuntimeErrorKind> {
        match (self, other) {
            (LoxValue::Number(lhs), LoxValue::Number(rhs)) => Ok((*lhs, *rhs)),
            (lhs, rhs) => Err(RuntimeErrorKind::NonNumerics(lhs.clone(), rhs.clone())),
        }
    }
}

// Comparison. Numbers compare numerically and strings lexicographically.
impl LoxValue {
    fn compare(
        &self,
        other: &LoxValue,
        numbers: fn(&f64, &f64) -> bool,
        strings: fn(&CompactString, &CompactString) -> bool,
    ) -> Result<LoxValue, RuntimeErrorKind> {
        match (self, other) {
            (LoxValue::Number(lhs), LoxValue::Number(rhs)) => Ok(LoxValue::Bool(numbers(lhs, rhs))),
            (LoxValue::String(lhs), LoxValue::String(rhs)) => {
                Ok(LoxValue::Bool(strings(lhs, rhs)))
            }
            (lhs, rhs) => Err(RuntimeErrorKind::NonComparable(lhs.clone(), rhs.clone())),
        }
    }

    pub fn less_than(&self, other: &LoxValue) -> Result<LoxValue, RuntimeErrorKind> {
        self.compare(other, |lhs, rhs| lhs < rhs, |lhs, rhs| lhs < rhs)
    }

    pub fn less_than_or_equal(&self, other: &LoxValue) -> Result<LoxValue, RuntimeErrorKind> {
        self.compare(other, |lhs, rhs| lhs <= rhs, |lhs, rhs| lhs <= rhs)
    }

    pub fn greater_than(&self, other: &LoxValue) -> Result<LoxValue, RuntimeErrorKind> {
        self.compare(other, |lhs, rhs| lhs > rhs, |lhs, rhs| lhs > rhs)
    }

    pub fn greater_than_or_equal(&self, other: &LoxValue) -> Result<LoxValue, RuntimeErrorKind> {
        self.compare(other, |lhs, rhs| lhs >= rhs, |lhs, rhs| lhs >= rhs)
    }

    // Equality
    pub fn is_equal(&self, other: &LoxValue) -> bool {
        match (self, other) {
            (LoxValue::Number(lhs), LoxValue::Number(rhs)) => lhs == rhs,
            (LoxValue::String(lhs), LoxValue::String(rhs)) => lhs == rhs,
            (LoxValue::Bool(lhs), LoxValue::Bool(rhs)) => lhs == rhs,
            (LoxValue::Nil, LoxValue::Nil) => true,
            _ => false,
        }
    }

    pub fn is_not_equal(&self, other: &LoxValue) -> bool {
        !self.is_equal(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_empty_string_are_truthy() {
        assert!(LoxValue::Number(0.0).is_truthy());
        assert!(LoxValue::String("".into()).is_truthy());
        assert!(!LoxValue::Nil.is_truthy());
        assert!(!LoxValue::Bool(false).is_truthy());
    }

    #[test]
    fn integral_numbers_print_without_fraction() {
        assert_eq!(LoxValue::Number(42.0).to_string(), "42");
        assert_eq!(LoxValue::Number(2.5).to_string(), "2.5");
        assert_eq!(LoxValue::Number(-3.0).to_string(), "-3");
    }

    #[test]
    fn overflow_prints_like_lox() {
        let huge = LoxValue::Number(1e308);
        let Ok(infinity) = huge.multiply(&LoxValue::Number(10.0)) else {
            panic!("Multiplying two numbers cannot fail");
        };
        assert_eq!(infinity.to_string(), "Infinity");
        assert_eq!(infinity.numeric_negate().map(|v| v.to_string()), Ok("-Infinity".into()));
        let Ok(nan) = infinity.subtract(&infinity) else {
            panic!("Subtracting two numbers cannot fail");
        };
        assert_eq!(nan.to_string(), "NaN");
    }

    #[test]
    fn negative_zero_divisor_is_division_by_zero() {
        let result = LoxValue::Number(5.0).divide(&LoxValue::Number(-0.0));
        assert_eq!(result, Err(RuntimeErrorKind::DivisionByZero));
    }

    #[test]
    fn mismatched_types_are_never_equal() {
        assert!(LoxValue::Nil.is_equal(&LoxValue::Nil));
        assert!(!LoxValue::Nil.is_equal(&LoxValue::Bool(false)));
        assert!(!LoxValue::Number(1.0).is_equal(&LoxValue::String("1".into())));
    }

    #[test]
    fn strings_compare_lexicographically() {
        let lhs = LoxValue::String("apple".into());
        let rhs = LoxValue::String("banana".into());
        assert_eq!(lhs.less_than(&rhs), Ok(LoxValue::Bool(true)));
        assert_eq!(lhs.greater_than_or_equal(&rhs), Ok(LoxValue::Bool(false)));
    }
}
