//! Validator engine.
//!
//! Walks a shape and a value in lock-step and returns either the validated
//! value (possibly coerced, defaulted or refined) or the located data errors.
//!
//! # Example
//!
//! ```rust
//! use shape_rs::{Field, Schema, ShapeRegistry, TypeNode, Validator, Value};
//!
//! let schema = Schema::new("User")
//!     .field(Field::required("name", TypeNode::string()))
//!     .field(Field::new("age", TypeNode::integer()).with_default(0));
//!
//! let registry = ShapeRegistry::new();
//! let validator = Validator::new(&registry);
//!
//! let data = Value::from(serde_json::json!({ "name": "Ann" }));
//! let validated = validator.validate_schema(&schema, &data).unwrap();
//! assert_eq!(validated.get_field("age").map(|(_, v)| v), Some(&Value::Int(0)));
//! ```

mod engine;
mod error;

pub use engine::{ValidateResult, Validator};
pub use error::{
    codes, PathSegment, ValidateError, ValidationError, ValidationErrors, ValidationPath,
};
