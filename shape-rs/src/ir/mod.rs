//! Shape intermediate representation.
//!
//! This module defines the data structures that describe the expected shape
//! of a value: type nodes, constraints, fields and schemas. The IR carries no
//! behavior of its own; it is consumed by the validator and the projection
//! engine, and it can be deserialized from JSON or TOML shape definitions.

pub mod constraint;
pub mod schema;
pub mod types;

pub use constraint::{Bound, Constraint, Pattern, Refinement, RefinementError, Rule};
pub use schema::{Field, Schema, SchemaConfig, ShapeProvider};
pub use types::{
    ArrayType, MapType, PrimitiveKind, PrimitiveType, RecordType, ReferenceType, TupleType,
    TypeNode, UnionType,
};
