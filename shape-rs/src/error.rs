//! Error types for shape configuration and coercion.
//!
//! [`ShapeError`] covers programmer misconfiguration: a reference to an
//! identity nobody registered, a custom rule nobody can resolve, a pattern
//! that does not compile. These abort validation and projection immediately
//! and are never reported as data errors. Data errors live in
//! [`crate::validation`].

use thiserror::Error;

/// Misconfigured shape definitions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    /// A referenced identity is neither a schema nor a custom type.
    #[error("Unknown shape '{0}': not a registered schema or custom type")]
    UnknownShape(String),

    /// A custom type lists a rule it cannot resolve.
    #[error("Custom type '{type_name}' lists rule '{rule}' but does not resolve it")]
    UnresolvedRule { type_name: String, rule: String },

    /// A `format` pattern failed to compile.
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A constraint parameter has the wrong form.
    #[error("Invalid '{kind}' constraint: {reason}")]
    InvalidConstraint { kind: String, reason: String },

    /// A shape refers to an identity that is not registered.
    #[error("Shape '{from}' references unregistered shape '{target}'")]
    DanglingReference { from: String, target: String },
}

impl ShapeError {
    /// Returns a stable identifier for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownShape(_) => "unknown_shape",
            Self::UnresolvedRule { .. } => "unresolved_rule",
            Self::InvalidPattern { .. } => "invalid_pattern",
            Self::InvalidConstraint { .. } => "invalid_constraint",
            Self::DanglingReference { .. } => "dangling_reference",
        }
    }
}

/// A value whose representation could not be converted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot coerce {actual} to {expected}")]
pub struct CoercionError {
    /// Target type label
    pub expected: String,
    /// Runtime type label of the input
    pub actual: String,
}

impl CoercionError {
    /// Create a coercion error.
    pub fn new(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}
