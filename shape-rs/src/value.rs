//! Runtime value model.
//!
//! [`Value`] is the input and output representation for validation. It is a
//! superset of JSON: maps accept arbitrary keys, and a [`Value::Symbol`]
//! variant carries symbolic identifiers distinct from plain strings.
//!
//! Field lookup on maps tries the symbolic key form first and the textual
//! form second, so `{name: ...}` and `{"name": ...}` both satisfy a field
//! named `name`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A dynamically typed value checked by the validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
    /// Absent / null value
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Text
    String(String),
    /// Symbolic identifier
    Symbol(String),
    /// Ordered sequence (also used for tuples)
    List(Vec<Value>),
    /// Keyed collection in insertion order
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Create a symbol value.
    pub fn symbol(name: impl Into<String>) -> Self {
        Value::Symbol(name.into())
    }

    /// Create a map value from key/value pairs.
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Value>,
        V: Into<Value>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Short label for the runtime type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// Numeric view of integers and floats.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// String contents, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Map entries, if this is a map.
    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// The name a map key stands for: symbols and strings name themselves.
    pub fn key_name(&self) -> Option<&str> {
        match self {
            Value::Symbol(s) | Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Textual rendering of a map key, used for paths and JSON object keys.
    pub fn key_text(&self) -> String {
        match self.key_name() {
            Some(name) => name.to_string(),
            None => serde_json::Value::from(self.clone()).to_string(),
        }
    }

    /// Look up a field by name on a map.
    ///
    /// Tries the symbolic key first, then the textual key. Returns the key as
    /// stored in the map together with its value.
    pub fn get_field(&self, name: &str) -> Option<(&Value, &Value)> {
        let entries = self.as_map()?;
        let lookup = |symbolic: bool| {
            entries.iter().find(|(k, _)| match k {
                Value::Symbol(s) => symbolic && s == name,
                Value::String(s) => !symbolic && s == name,
                _ => false,
            })
        };
        lookup(true).or_else(|| lookup(false)).map(|(k, v)| (k, v))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Symbol(s) => write!(f, ":{}", s),
            other => write!(f, "{}", serde_json::Value::from(other.clone())),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            Json::Object(object) => Value::Map(
                object
                    .into_iter()
                    .map(|(k, v)| (Value::String(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        use serde_json::Value as Json;

        match value {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(b),
            Value::Int(i) => Json::from(i),
            // NaN and infinities have no JSON form
            Value::Float(f) => serde_json::Number::from_f64(f).map_or(Json::Null, Json::Number),
            Value::String(s) | Value::Symbol(s) => Json::String(s),
            Value::List(items) => Json::Array(items.into_iter().map(Json::from).collect()),
            Value::Map(entries) => Json::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.key_text(), Json::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_field_prefers_symbol_key() {
        let value = Value::map([
            (Value::from("name"), Value::from("text")),
            (Value::symbol("name"), Value::from("symbolic")),
        ]);

        let (key, found) = value.get_field("name").unwrap();
        assert_eq!(key, &Value::symbol("name"));
        assert_eq!(found, &Value::from("symbolic"));
    }

    #[test]
    fn test_get_field_falls_back_to_text_key() {
        let value = Value::from(json!({ "age": 3 }));
        let (key, found) = value.get_field("age").unwrap();
        assert_eq!(key, &Value::from("age"));
        assert_eq!(found, &Value::Int(3));
        assert!(value.get_field("missing").is_none());
    }

    #[test]
    fn test_json_numbers() {
        assert_eq!(Value::from(json!(1)), Value::Int(1));
        assert_eq!(Value::from(json!(1.5)), Value::Float(1.5));
        assert_eq!(Value::from(json!(u64::MAX)), Value::Float(u64::MAX as f64));
    }

    #[test]
    fn test_into_json_renders_symbols_and_keys() {
        let value = Value::map([
            (Value::symbol("kind"), Value::symbol("admin")),
            (Value::Int(7), Value::Float(f64::NAN)),
        ]);
        let json = serde_json::Value::from(value);
        assert_eq!(json, json!({ "kind": "admin", "7": null }));
    }

    #[test]
    fn test_serde_goes_through_json() {
        let value: Value = serde_json::from_str(r#"{"tags": ["a", 2]}"#).unwrap();
        assert_eq!(
            value,
            Value::map([(
                Value::from("tags"),
                Value::List(vec![Value::from("a"), Value::Int(2)])
            )])
        );
        assert_eq!(serde_json::to_string(&Value::symbol("x")).unwrap(), "\"x\"");
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::symbol("ok").to_string(), ":ok");
        assert_eq!(Value::from("ok").to_string(), "\"ok\"");
        assert_eq!(Value::Int(4).to_string(), "4");
    }
}
