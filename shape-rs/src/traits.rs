//! Custom type capability trait.
//!
//! A custom type is a named, externally defined shape-like unit. The
//! validator and the projection engine look up the capabilities below
//! explicitly rather than assuming every reference target is a schema.
//!
//! ## Overview
//!
//! Implementors must provide:
//! - [`CustomType::name`] - the identity the type is registered under
//! - [`CustomType::type_definition`] - the structural shape values must match
//!
//! And may override:
//! - [`CustomType::json_schema`] - a hand-written projection fragment
//! - [`CustomType::coerce`] - a coercion rule used when coercion is enabled
//! - [`CustomType::rules`] / [`CustomType::check_rule`] - named rules run after
//!   the structural check
//!
//! ## Example
//!
//! ```rust
//! use shape_rs::{CustomType, TypeNode, Value};
//!
//! #[derive(Debug)]
//! struct Port;
//!
//! impl CustomType for Port {
//!     fn name(&self) -> &str {
//!         "Port"
//!     }
//!
//!     fn type_definition(&self) -> TypeNode {
//!         TypeNode::integer()
//!     }
//!
//!     fn rules(&self) -> Vec<&str> {
//!         vec!["in_range"]
//!     }
//!
//!     fn check_rule(&self, rule: &str, value: &Value) -> Option<Result<bool, String>> {
//!         match (rule, value) {
//!             ("in_range", Value::Int(port)) => Some(Ok((1..=65535).contains(port))),
//!             ("in_range", _) => Some(Ok(false)),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! assert_eq!(Port.check_rule("in_range", &Value::Int(8080)), Some(Ok(true)));
//! assert!(Port.json_schema().is_none());
//! ```

use std::fmt::Debug;

use crate::error::CoercionError;
use crate::ir::TypeNode;
use crate::value::Value;

/// A named, externally defined shape.
pub trait CustomType: Debug + Send + Sync {
    /// Identity the type is registered and referenced under.
    fn name(&self) -> &str;

    /// Structural shape that values must satisfy.
    fn type_definition(&self) -> TypeNode;

    /// Projection fragment overriding the mapping of [`type_definition`].
    ///
    /// [`type_definition`]: CustomType::type_definition
    fn json_schema(&self) -> Option<serde_json::Value> {
        None
    }

    /// Coercion rule. `None` means the type has no rule of its own and the
    /// generic coercion of its type definition applies.
    fn coerce(&self, _value: &Value) -> Option<Result<Value, CoercionError>> {
        None
    }

    /// Names of custom rules, checked in this order.
    fn rules(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Resolve and run a rule.
    ///
    /// Returns `None` if the rule is unknown to this type, which is a
    /// configuration error for any rule listed in [`rules`](CustomType::rules).
    /// `Ok(false)` fails with the rule's default message; `Err(reason)` fails
    /// with `reason`.
    fn check_rule(&self, _rule: &str, _value: &Value) -> Option<Result<bool, String>> {
        None
    }
}
