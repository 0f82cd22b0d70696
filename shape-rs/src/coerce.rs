//! Best-effort representation coercion.
//!
//! Coercion only changes how a value is represented (`"42"` to `42`, `7` to
//! `"7"`). It never checks constraints. Callers treat it as advisory: when it
//! fails, the original value goes on to the normal type check and is rejected
//! there.

use crate::error::CoercionError;
use crate::ir::{PrimitiveKind, TypeNode};
use crate::value::Value;

/// Coerce a value towards the shape of `node`.
///
/// Containers coerce element-wise; an element that does not coerce is kept
/// as it was. Unions try their variants in order and stop at the first one
/// that coerces. References are left unchanged.
pub fn coerce(node: &TypeNode, value: &Value) -> Result<Value, CoercionError> {
    match node {
        TypeNode::Primitive(primitive) => coerce_primitive(primitive.kind, value),
        TypeNode::Array(array) => match value {
            Value::List(items) => Ok(Value::List(
                items.iter().map(|item| coerce_or_keep(&array.items, item)).collect(),
            )),
            other => Err(CoercionError::new("list", other.type_name())),
        },
        TypeNode::Map(map) => match value {
            Value::Map(entries) => Ok(Value::Map(
                entries
                    .iter()
                    .map(|(k, v)| (coerce_or_keep(&map.key, k), coerce_or_keep(&map.value, v)))
                    .collect(),
            )),
            other => Err(CoercionError::new("map", other.type_name())),
        },
        TypeNode::Tuple(tuple) => match value {
            Value::List(items) => Ok(Value::List(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| match tuple.elements.get(i) {
                        Some(element) => coerce_or_keep(element, item),
                        None => item.clone(),
                    })
                    .collect(),
            )),
            other => Err(CoercionError::new("tuple", other.type_name())),
        },
        TypeNode::Record(record) => match value {
            Value::Map(entries) => Ok(Value::Map(
                entries
                    .iter()
                    .map(|(k, v)| {
                        let field = k
                            .key_name()
                            .and_then(|name| record.fields.iter().find(|f| f.name == name));
                        match field {
                            Some(field) => (k.clone(), coerce_or_keep(&field.ty, v)),
                            None => (k.clone(), v.clone()),
                        }
                    })
                    .collect(),
            )),
            other => Err(CoercionError::new("map", other.type_name())),
        },
        TypeNode::Union(union) => union
            .variants
            .iter()
            .find_map(|variant| coerce(variant, value).ok())
            .ok_or_else(|| CoercionError::new("union", value.type_name())),
        TypeNode::Reference(_) => Ok(value.clone()),
    }
}

fn coerce_or_keep(node: &TypeNode, value: &Value) -> Value {
    coerce(node, value).unwrap_or_else(|_| value.clone())
}

/// Coerce a value to a primitive kind.
pub fn coerce_primitive(kind: PrimitiveKind, value: &Value) -> Result<Value, CoercionError> {
    let fail = || CoercionError::new(kind.name(), value.type_name());

    match (kind, value) {
        (PrimitiveKind::Any, v) => Ok(v.clone()),
        (kind, v) if kind.matches(v) => Ok(v.clone()),

        (PrimitiveKind::String, Value::Int(i)) => Ok(Value::String(i.to_string())),
        (PrimitiveKind::String, Value::Float(f)) => Ok(Value::String(f.to_string())),
        (PrimitiveKind::String, Value::Bool(b)) => Ok(Value::String(b.to_string())),
        (PrimitiveKind::String, Value::Symbol(s)) => Ok(Value::String(s.clone())),

        (PrimitiveKind::Integer, Value::String(s)) => {
            s.trim().parse::<i64>().map(Value::Int).map_err(|_| fail())
        }
        (PrimitiveKind::Integer, Value::Float(f))
            if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 =>
        {
            Ok(Value::Int(*f as i64))
        }

        (PrimitiveKind::Float, Value::Int(i)) => Ok(Value::Float(*i as f64)),
        (PrimitiveKind::Float, Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Value::Float)
            .ok_or_else(fail),

        (PrimitiveKind::Boolean, Value::String(s)) => match s.as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(fail()),
        },

        (PrimitiveKind::Symbol, Value::String(s)) if !s.is_empty() => Ok(Value::Symbol(s.clone())),

        _ => Err(fail()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Field;

    #[test]
    fn test_numeric_strings() {
        assert_eq!(
            coerce_primitive(PrimitiveKind::Integer, &Value::from("42")),
            Ok(Value::Int(42))
        );
        assert_eq!(
            coerce_primitive(PrimitiveKind::Float, &Value::from("1.5")),
            Ok(Value::Float(1.5))
        );
        assert!(coerce_primitive(PrimitiveKind::Integer, &Value::from("4.2")).is_err());
        assert!(coerce_primitive(PrimitiveKind::Float, &Value::from("NaN")).is_err());
    }

    #[test]
    fn test_to_string() {
        assert_eq!(
            coerce_primitive(PrimitiveKind::String, &Value::Int(7)),
            Ok(Value::from("7"))
        );
        assert_eq!(
            coerce_primitive(PrimitiveKind::String, &Value::symbol("ok")),
            Ok(Value::from("ok"))
        );
        assert!(coerce_primitive(PrimitiveKind::String, &Value::Null).is_err());
    }

    #[test]
    fn test_integral_float_to_integer() {
        assert_eq!(
            coerce_primitive(PrimitiveKind::Integer, &Value::Float(3.0)),
            Ok(Value::Int(3))
        );
        assert!(coerce_primitive(PrimitiveKind::Integer, &Value::Float(3.5)).is_err());
    }

    #[test]
    fn test_boolean_and_symbol() {
        assert_eq!(
            coerce_primitive(PrimitiveKind::Boolean, &Value::from("true")),
            Ok(Value::Bool(true))
        );
        assert!(coerce_primitive(PrimitiveKind::Boolean, &Value::from("yes")).is_err());
        assert_eq!(
            coerce_primitive(PrimitiveKind::Symbol, &Value::from("admin")),
            Ok(Value::symbol("admin"))
        );
    }

    #[test]
    fn test_array_keeps_uncoercible_elements() {
        let node = TypeNode::array(TypeNode::integer());
        let value = Value::List(vec![Value::from("1"), Value::from("x"), Value::Int(3)]);
        assert_eq!(
            coerce(&node, &value),
            Ok(Value::List(vec![Value::Int(1), Value::from("x"), Value::Int(3)]))
        );
        assert!(coerce(&node, &Value::from("1")).is_err());
    }

    #[test]
    fn test_union_stops_at_first_success() {
        let node = TypeNode::union(vec![TypeNode::integer(), TypeNode::string()]);
        assert_eq!(coerce(&node, &Value::from("12")), Ok(Value::Int(12)));
        assert_eq!(coerce(&node, &Value::from("ab")), Ok(Value::from("ab")));

        let node = TypeNode::union(vec![TypeNode::integer(), TypeNode::boolean()]);
        assert!(coerce(&node, &Value::from("ab")).is_err());
    }

    #[test]
    fn test_record_coerces_declared_fields_only() {
        let node = TypeNode::record(vec![Field::required("age", TypeNode::integer())]);
        let value = Value::map([("age", "30"), ("note", "7")]);
        assert_eq!(
            coerce(&node, &value),
            Ok(Value::map([
                (Value::from("age"), Value::Int(30)),
                (Value::from("note"), Value::from("7")),
            ]))
        );
    }
}
