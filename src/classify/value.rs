//! Dynamically-kinded input values.
//!
//! Classifiers accept a [`Value`] rather than a bare number so that a caller
//! holding loosely typed data (CLI arguments, JSON) gets an explicit
//! `InvalidInputKind` error instead of a silent coercion.

use crate::errors::DrillError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar value of one of the supported kinds.
///
/// Equality is structural and kind-sensitive: `Int(1) != Real(1.0)`, and
/// `Real(NaN)` never equals anything (IEEE semantics).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Real(f64),
    Text(String),
}

/// A value that has passed the numeric guard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Real(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Real(x) => x,
        }
    }

    /// The integer this number represents exactly, if any.
    pub fn as_exact_integer(self) -> Option<i64> {
        match self {
            Number::Int(n) => Some(n),
            Number::Real(x) => real_to_exact_integer(x),
        }
    }
}

// 2^63 is exactly representable; anything at or above it cannot fit in i64.
const I64_UPPER_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn real_to_exact_integer(x: f64) -> Option<i64> {
    if x.is_finite() && x.fract() == 0.0 && x >= -I64_UPPER_BOUND && x < I64_UPPER_BOUND {
        Some(x as i64)
    } else {
        None
    }
}

impl Value {
    /// Parse a command-line token into the most specific kind it matches.
    ///
    /// `true`/`false` become booleans, integers win over reals, and anything
    /// else is kept as text.
    pub fn parse(token: &str) -> Value {
        let trimmed = token.trim();
        match trimmed {
            "true" => return Value::Bool(true),
            "false" => return Value::Bool(false),
            "null" => return Value::Null,
            _ => {}
        }
        if let Ok(n) = trimmed.parse::<i64>() {
            return Value::Int(n);
        }
        if let Ok(x) = trimmed.parse::<f64>() {
            return Value::Real(x);
        }
        Value::Text(token.to_string())
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Real(_) => "real",
            Value::Text(_) => "text",
        }
    }

    /// Numeric guard used by every classifier.
    ///
    /// Non-finite reals are rejected too: they cannot take part in modulo or
    /// floor arithmetic.
    pub fn as_number(&self) -> Result<Number, DrillError> {
        match self {
            Value::Int(n) => Ok(Number::Int(*n)),
            Value::Real(x) if x.is_finite() => Ok(Number::Real(*x)),
            Value::Real(x) => Err(DrillError::invalid_input(
                "finite number",
                format!("real {}", x),
            )),
            other => Err(DrillError::invalid_input("number", other.describe())),
        }
    }

    fn describe(&self) -> String {
        match self {
            Value::Text(s) => format!("text {:?}", s),
            Value::Null => "null".to_string(),
            other => format!("{} {}", other.kind_name(), other),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Real(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Real(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefers_integer() {
        assert_eq!(Value::parse("15"), Value::Int(15));
        assert_eq!(Value::parse("-3"), Value::Int(-3));
        assert_eq!(Value::parse("2.5"), Value::Real(2.5));
        assert_eq!(Value::parse("300000000000000000000"), Value::Real(3e20));
        assert_eq!(Value::parse("true"), Value::Bool(true));
        assert_eq!(Value::parse("x"), Value::Text("x".to_string()));
    }

    #[test]
    fn test_numeric_guard_rejects_text() {
        let err = Value::from("x").as_number().unwrap_err();
        assert!(matches!(err, DrillError::InvalidInputKind { .. }));
        assert!(err.to_string().contains("text \"x\""));
    }

    #[test]
    fn test_numeric_guard_rejects_non_finite() {
        assert!(Value::Real(f64::NAN).as_number().is_err());
        assert!(Value::Real(f64::INFINITY).as_number().is_err());
    }

    #[test]
    fn test_exact_integer_from_real() {
        assert_eq!(Number::Real(30.0).as_exact_integer(), Some(30));
        assert_eq!(Number::Real(-0.0).as_exact_integer(), Some(0));
        assert_eq!(Number::Real(4.5).as_exact_integer(), None);
    }

    #[test]
    fn test_equality_is_kind_sensitive() {
        assert_ne!(Value::Int(1), Value::Real(1.0));
        assert_ne!(Value::Real(f64::NAN), Value::Real(f64::NAN));
    }

    #[test]
    fn test_deserialize_untagged() {
        let values: Vec<Value> = serde_json::from_str(r#"[1, 2.5, "a", true, null]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Value::Int(1),
                Value::Real(2.5),
                Value::Text("a".to_string()),
                Value::Bool(true),
                Value::Null,
            ]
        );
    }
}
