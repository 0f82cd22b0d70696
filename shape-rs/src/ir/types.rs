//! Type node definitions.
//!
//! [`TypeNode`] is the recursive, closed set of shape variants. Each variant
//! carries its own payload struct so that validators and mappers can match
//! exhaustively on the variant set.

use serde::{Deserialize, Serialize};

use super::constraint::{Constraint, Refinement};
use super::schema::Field;
use crate::value::Value;

/// Primitive value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    /// Text
    String,
    /// Signed integer
    Integer,
    /// Floating point number
    Float,
    /// Boolean
    Boolean,
    /// Symbolic identifier
    Symbol,
    /// Accepts every value
    Any,
}

impl PrimitiveKind {
    /// Name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Symbol => "symbol",
            PrimitiveKind::Any => "any",
        }
    }

    /// Runtime predicate for this kind.
    pub fn matches(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (PrimitiveKind::String, Value::String(_))
                | (PrimitiveKind::Integer, Value::Int(_))
                | (PrimitiveKind::Float, Value::Float(_))
                | (PrimitiveKind::Boolean, Value::Bool(_))
                | (PrimitiveKind::Symbol, Value::Symbol(_))
                | (PrimitiveKind::Any, _)
        )
    }
}

/// A primitive value with ordered constraints and optional refinements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimitiveType {
    /// The primitive kind
    pub kind: PrimitiveKind,

    /// Constraints, checked in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,

    /// User predicates/transforms run after the built-in constraints
    #[serde(skip)]
    pub refinements: Vec<Refinement>,
}

/// A homogeneous sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrayType {
    /// Element type
    pub items: Box<TypeNode>,

    /// Container constraints (`min_items`, `max_items`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
}

/// A homogeneous keyed collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapType {
    /// Key type
    pub key: Box<TypeNode>,

    /// Value type
    pub value: Box<TypeNode>,

    /// Container constraints (`size`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
}

/// A fixed-key object nested inside another shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordType {
    /// Fields in declaration order
    pub fields: Vec<Field>,

    /// Record-level constraints
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
}

/// A fixed-arity positional sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TupleType {
    /// Element types by position
    pub elements: Vec<TypeNode>,
}

/// Ordered alternatives; the first matching variant wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnionType {
    /// Variants in match order
    pub variants: Vec<TypeNode>,

    /// Constraints applied to the matched value
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
}

/// A pointer to a registered schema or custom type by identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceType {
    /// Identity of the referenced shape
    pub target: String,
}

/// Recursive description of a value's structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TypeNode {
    /// Scalar value
    Primitive(PrimitiveType),

    /// Sequence of one element type
    Array(ArrayType),

    /// Keyed collection with key and value types
    Map(MapType),

    /// Object with declared fields
    Record(RecordType),

    /// Positional sequence
    Tuple(TupleType),

    /// Alternatives
    Union(UnionType),

    /// Cross-shape reference
    Reference(ReferenceType),
}

impl TypeNode {
    /// Create a primitive node of the given kind.
    pub fn primitive(kind: PrimitiveKind) -> Self {
        TypeNode::Primitive(PrimitiveType {
            kind,
            constraints: Vec::new(),
            refinements: Vec::new(),
        })
    }

    /// Create a string node.
    pub fn string() -> Self {
        Self::primitive(PrimitiveKind::String)
    }

    /// Create an integer node.
    pub fn integer() -> Self {
        Self::primitive(PrimitiveKind::Integer)
    }

    /// Create a float node.
    pub fn float() -> Self {
        Self::primitive(PrimitiveKind::Float)
    }

    /// Create a boolean node.
    pub fn boolean() -> Self {
        Self::primitive(PrimitiveKind::Boolean)
    }

    /// Create a symbol node.
    pub fn symbol() -> Self {
        Self::primitive(PrimitiveKind::Symbol)
    }

    /// Create a node accepting any value.
    pub fn any() -> Self {
        Self::primitive(PrimitiveKind::Any)
    }

    /// Create an array node.
    pub fn array(items: TypeNode) -> Self {
        TypeNode::Array(ArrayType {
            items: Box::new(items),
            constraints: Vec::new(),
        })
    }

    /// Create a keyed collection node.
    pub fn map(key: TypeNode, value: TypeNode) -> Self {
        TypeNode::Map(MapType {
            key: Box::new(key),
            value: Box::new(value),
            constraints: Vec::new(),
        })
    }

    /// Create a record node.
    pub fn record(fields: Vec<Field>) -> Self {
        TypeNode::Record(RecordType {
            fields,
            constraints: Vec::new(),
        })
    }

    /// Create a tuple node.
    pub fn tuple(elements: Vec<TypeNode>) -> Self {
        TypeNode::Tuple(TupleType { elements })
    }

    /// Create a union node.
    pub fn union(variants: Vec<TypeNode>) -> Self {
        TypeNode::Union(UnionType {
            variants,
            constraints: Vec::new(),
        })
    }

    /// Create a reference to a registered shape.
    pub fn reference(target: impl Into<String>) -> Self {
        TypeNode::Reference(ReferenceType {
            target: target.into(),
        })
    }

    /// Append a constraint.
    ///
    /// Tuples and references carry no constraints; the call is a no-op there.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        if let Some(constraints) = self.constraints_mut() {
            constraints.push(constraint);
        }
        self
    }

    /// Append a refinement. Only primitives carry refinements.
    pub fn with_refinement(mut self, refinement: Refinement) -> Self {
        if let TypeNode::Primitive(primitive) = &mut self {
            primitive.refinements.push(refinement);
        }
        self
    }

    /// Constraints attached to this node.
    pub fn constraints(&self) -> &[Constraint] {
        match self {
            TypeNode::Primitive(p) => &p.constraints,
            TypeNode::Array(a) => &a.constraints,
            TypeNode::Map(m) => &m.constraints,
            TypeNode::Record(r) => &r.constraints,
            TypeNode::Union(u) => &u.constraints,
            TypeNode::Tuple(_) | TypeNode::Reference(_) => &[],
        }
    }

    fn constraints_mut(&mut self) -> Option<&mut Vec<Constraint>> {
        match self {
            TypeNode::Primitive(p) => Some(&mut p.constraints),
            TypeNode::Array(a) => Some(&mut a.constraints),
            TypeNode::Map(m) => Some(&mut m.constraints),
            TypeNode::Record(r) => Some(&mut r.constraints),
            TypeNode::Union(u) => Some(&mut u.constraints),
            TypeNode::Tuple(_) | TypeNode::Reference(_) => None,
        }
    }

    /// Short label for the variant.
    pub fn label(&self) -> &'static str {
        match self {
            TypeNode::Primitive(p) => p.kind.name(),
            TypeNode::Array(_) => "list",
            TypeNode::Map(_) => "map",
            TypeNode::Record(_) => "map",
            TypeNode::Tuple(_) => "tuple",
            TypeNode::Union(_) => "union",
            TypeNode::Reference(_) => "reference",
        }
    }

    /// Collect the identities this node refers to, in encounter order.
    pub fn collect_references(&self, out: &mut Vec<String>) {
        match self {
            TypeNode::Primitive(_) => {}
            TypeNode::Array(a) => a.items.collect_references(out),
            TypeNode::Map(m) => {
                m.key.collect_references(out);
                m.value.collect_references(out);
            }
            TypeNode::Record(r) => {
                for field in &r.fields {
                    field.ty.collect_references(out);
                }
            }
            TypeNode::Tuple(t) => {
                for element in &t.elements {
                    element.collect_references(out);
                }
            }
            TypeNode::Union(u) => {
                for variant in &u.variants {
                    variant.collect_references(out);
                }
            }
            TypeNode::Reference(r) => {
                if !out.contains(&r.target) {
                    out.push(r.target.clone());
                }
            }
        }
    }

    /// Check if this is a reference node.
    pub fn is_reference(&self) -> bool {
        matches!(self, TypeNode::Reference(_))
    }
}
