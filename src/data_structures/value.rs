//! Loosely typed values read from entity descriptors.
//!
//! Attribute values and positional method arguments arrive as JSON. A
//! [`Value`] keeps them untyped until the receiving property or method
//! decides what shape it needs.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
}

impl Value {
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Number(n) => Some(*n as f32),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Flattens a number or a list of numbers into components.
    ///
    /// Attribute values are written either as a single number or as the
    /// argument list of a component setter, e.g. `[0, 10, 0]` for a position.
    pub fn components(&self) -> Option<Vec<f32>> {
        match self {
            Self::Number(n) => Some(vec![*n as f32]),
            Self::List(items) => numbers(items),
            _ => None,
        }
    }
}

/// Reads every argument as a number, failing on the first non-number.
pub fn numbers(args: &[Value]) -> Option<Vec<f32>> {
    args.iter().map(Value::as_f32).collect()
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_json() {
        let value: Value = serde_json::from_str(r#"[1, true, "x", {"color": 255}, null]"#).unwrap();
        let Value::List(items) = value else {
            panic!("expected a list");
        };
        assert_eq!(items[0], Value::Number(1.0));
        assert_eq!(items[1], Value::Bool(true));
        assert_eq!(items[2], Value::Text("x".into()));
        assert_eq!(
            items[3].as_map().and_then(|m| m.get("color")),
            Some(&Value::Number(255.0))
        );
        assert_eq!(items[4], Value::Null);
    }

    #[test]
    fn components_accept_scalars_and_lists() {
        assert_eq!(Value::from(2.0).components(), Some(vec![2.0]));
        assert_eq!(Value::from(vec![1.0, 2.0, 3.0]).components(), Some(vec![1.0, 2.0, 3.0]));
        assert_eq!(Value::from(vec![Value::from(1.0), Value::from("a")]).components(), None);
        assert_eq!(Value::from(true).components(), None);
    }
}
