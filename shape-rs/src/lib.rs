//! # shape-rs
//!
//! A data-shape validation engine with JSON Schema projection.
//!
//! Describe the expected structure of data once, as a [`Schema`] or a bare
//! [`TypeNode`], then:
//!
//! - **validate** arbitrary [`Value`]s against it with the [`Validator`],
//!   getting back the (possibly coerced, defaulted or refined) value or a
//!   list of path-located errors;
//! - **project** it into a JSON Schema (Draft-7 subset) document with the
//!   [`Projector`], for API clients or structured-output constraints.
//!
//! ## Quick Start
//!
//! ```rust
//! use shape_rs::{Constraint, Field, Projector, Schema, ShapeRegistry, TypeNode, Validator, Value};
//!
//! let user = Schema::new("User")
//!     .field(Field::required("name", TypeNode::string().with_constraint(Constraint::min_length(1))))
//!     .field(Field::new("age", TypeNode::integer()).with_default(0))
//!     .strict(true);
//!
//! let registry = ShapeRegistry::new().with_schemas([user.clone()]);
//!
//! let data = Value::from(serde_json::json!({ "name": "Ann" }));
//! let validated = Validator::new(&registry).validate_schema(&user, &data).unwrap();
//! assert_eq!(validated.get_field("age").map(|(_, v)| v), Some(&Value::Int(0)));
//!
//! let document = Projector::new(&registry).project(&user).unwrap();
//! assert_eq!(document["additionalProperties"], serde_json::json!(false));
//! ```
//!
//! ## Type Nodes
//!
//! | Variant | Accepts |
//! |---------|---------|
//! | `primitive` | `string`, `integer`, `float`, `boolean`, `symbol`, `any` |
//! | `array` | a list whose elements all match one type |
//! | `map` | a keyed collection with one key type and one value type |
//! | `record` | a map with declared fields |
//! | `tuple` | a list with one type per position |
//! | `union` | the first of several alternatives that matches |
//! | `reference` | a registered schema or custom type, by identity |
//!
//! ## Constraints
//!
//! | Kind | Applies to | JSON Schema |
//! |------|------------|-------------|
//! | `min_length` / `max_length` | strings | `minLength` / `maxLength` |
//! | `min_items` / `max_items` | lists | `minItems` / `maxItems` |
//! | `gt` / `lt` | numbers | `exclusiveMinimum` / `exclusiveMaximum` |
//! | `gteq` / `lteq` | numbers | `minimum` / `maximum` |
//! | `format` | strings | `pattern` |
//! | `choices` | any value | `enum` |
//! | `size` | maps | `minProperties` + `maxProperties` |
//!
//! Unknown constraint kinds load and pass without effect.
//!
//! ## Error Policy
//!
//! Schema fields and primitive constraints stop at the first failure. The
//! elements of arrays, maps, tuples and nested records are checked
//! exhaustively. Misconfiguration (unknown reference targets, unresolved
//! custom rules) is reported as [`ShapeError`], never as a data error.

pub mod coerce;
pub mod config;
pub mod constraints;
pub mod error;
pub mod ir;
pub mod projection;
pub mod registry;
pub mod traits;
pub mod validation;
pub mod value;

pub use coerce::{coerce, coerce_primitive};
pub use config::{EngineConfig, ProjectionOptions, ValidationOptions};
pub use constraints::check_constraint;
pub use error::{CoercionError, ShapeError};
pub use ir::{
    Bound, Constraint, Field, PrimitiveKind, Refinement, RefinementError, Rule, Schema, SchemaConfig,
    ShapeProvider, TypeNode,
};
pub use projection::{Projector, ReferenceStore, SchemaMapper};
pub use registry::{Shape, ShapeRegistry};
pub use traits::CustomType;
pub use validation::{
    ValidateError, ValidationError, ValidationErrors, ValidationPath, Validator,
};
pub use value::Value;
