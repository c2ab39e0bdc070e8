//! Raw sample values and table cells.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single table cell. `None` is the missing marker, which is distinct
/// from a present empty string.
pub type Cell = Option<String>;

/// A raw point value as delivered by the data source.
///
/// Deserializes untagged from JSON: booleans are binary values, integers are
/// multistate values, other numbers are numeric values and strings are
/// alphanumeric values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// On/off state
    Binary(bool),
    /// Discrete state code
    MultiState(i32),
    /// Analog reading
    Numeric(f64),
    /// Free text
    Alphanumeric(String),
}

impl Value {
    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Numeric(v) => Some(*v),
            Value::MultiState(v) => Some(f64::from(*v)),
            Value::Binary(_) | Value::Alphanumeric(_) => None,
        }
    }

    /// Short name of the value's data type, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Binary(_) => "binary",
            Value::MultiState(_) => "multistate",
            Value::Numeric(_) => "numeric",
            Value::Alphanumeric(_) => "alphanumeric",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Binary(v) => write!(f, "{}", v),
            Value::MultiState(v) => write!(f, "{}", v),
            Value::Numeric(v) => write!(f, "{}", v),
            Value::Alphanumeric(v) => f.write_str(v),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Numeric(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Binary(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::MultiState(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Alphanumeric(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Alphanumeric(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_string_forms() {
        assert_eq!(Value::Numeric(21.5).to_string(), "21.5");
        assert_eq!(Value::Binary(true).to_string(), "true");
        assert_eq!(Value::MultiState(3).to_string(), "3");
        assert_eq!(Value::from("open").to_string(), "open");
    }

    #[test]
    fn test_deserialize_untagged() {
        let values: Vec<Value> = serde_json::from_str(r#"[true, 2, 21.5, "x"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Value::Binary(true),
                Value::MultiState(2),
                Value::Numeric(21.5),
                Value::Alphanumeric("x".to_string()),
            ]
        );
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(Value::MultiState(4).as_f64(), Some(4.0));
        assert_eq!(Value::Numeric(1.25).as_f64(), Some(1.25));
        assert_eq!(Value::Binary(false).as_f64(), None);
        assert_eq!(Value::from("a").as_f64(), None);
    }
}
