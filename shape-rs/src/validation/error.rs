//! Validation error model.
//!
//! Every error carries the full path from the root of the validated value,
//! a code, and a human-readable message.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constraints::message_for;
use crate::error::ShapeError;
use crate::ir::{Constraint, RefinementError};

/// Well-known error codes. Constraint failures use the constraint kind.
pub mod codes {
    /// A required field is absent
    pub const REQUIRED: &str = "required";
    /// The value has the wrong runtime type
    pub const TYPE: &str = "type";
    /// Strict schema received undeclared keys
    pub const ADDITIONAL_PROPERTIES: &str = "additional_properties";
    /// Default code for refinement failures
    pub const VALIDATION_ERROR: &str = "validation_error";
}

/// One step of a validation path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathSegment {
    /// Field name or map entry
    Name(String),
    /// Sequence position
    Index(usize),
    /// The key of a map entry itself
    Key(String),
}

/// Location of an error, relative to the root of the validated value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationPath(Vec<PathSegment>);

impl ValidationPath {
    /// The empty (root) path.
    pub fn root() -> Self {
        Self::default()
    }

    /// Extend with a segment.
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Self(segments)
    }

    /// Extend with a field name.
    pub fn field(&self, name: impl Into<String>) -> Self {
        self.child(PathSegment::Name(name.into()))
    }

    /// Extend with a sequence index.
    pub fn index(&self, index: usize) -> Self {
        self.child(PathSegment::Index(index))
    }

    /// Extend with a map-key marker.
    pub fn key(&self, key: impl Into<String>) -> Self {
        self.child(PathSegment::Key(key.into()))
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if this is the root path.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The segments in order.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }
}

impl From<Vec<PathSegment>> for ValidationPath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}

impl fmt::Display for ValidationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Name(name) if i == 0 => write!(f, "{}", name)?,
                PathSegment::Name(name) => write!(f, ".{}", name)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
                PathSegment::Key(key) => write!(f, "{{{}}}", key)?,
            }
        }
        Ok(())
    }
}

/// A single located data error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Where the error occurred
    pub path: ValidationPath,
    /// Error code
    pub code: String,
    /// Human-readable message
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(path: ValidationPath, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a "required" error; `path` already ends with the field name
    pub fn required(path: ValidationPath) -> Self {
        Self::new(path, codes::REQUIRED, "is required")
    }

    /// Create a "type" error
    pub fn type_mismatch(path: ValidationPath, expected: &str, actual: &str) -> Self {
        Self::new(
            path,
            codes::TYPE,
            format!("expected {}, got {}", expected, actual),
        )
    }

    /// Create the generic union failure
    pub fn no_variant(path: ValidationPath) -> Self {
        Self::new(path, codes::TYPE, "no variant matched")
    }

    /// Create an "additional_properties" error listing the extra keys
    pub fn additional_properties(path: ValidationPath, extra: &[String]) -> Self {
        Self::new(
            path,
            codes::ADDITIONAL_PROPERTIES,
            format!("unexpected keys: {}", extra.join(", ")),
        )
    }

    /// Create an error for a failed constraint
    pub fn constraint(path: ValidationPath, constraint: &Constraint) -> Self {
        Self::new(path, constraint.kind(), message_for(constraint))
    }

    /// Create an error for a failed refinement
    pub fn refinement(path: ValidationPath, error: RefinementError) -> Self {
        let code = error
            .code
            .unwrap_or_else(|| codes::VALIDATION_ERROR.to_string());
        Self::new(path, code, error.message)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "(root): {} [{}]", self.message, self.code)
        } else {
            write!(f, "{}: {} [{}]", self.path, self.message, self.code)
        }
    }
}

/// A non-empty, ordered list of validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// Wrap a single error.
    pub fn single(error: ValidationError) -> Self {
        Self(vec![error])
    }

    /// Wrap a list of errors; `None` if the list is empty.
    pub fn from_vec(errors: Vec<ValidationError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    /// Number of errors (at least one).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the errors.
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    /// The first error.
    pub fn first(&self) -> &ValidationError {
        &self.0[0]
    }

    /// Length of the deepest error path.
    pub fn max_depth(&self) -> usize {
        self.0.iter().map(|e| e.path.len()).max().unwrap_or(0)
    }

    /// Unwrap into the underlying list.
    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self::single(error)
    }
}

/// Failure of a validation call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidateError {
    /// The data does not match the shape.
    #[error("{0}")]
    Invalid(#[from] ValidationErrors),

    /// The shape itself is misconfigured.
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

impl ValidateError {
    /// Data errors, if this is a data failure.
    pub fn errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            Self::Shape(_) => None,
        }
    }

    /// Check if this is a data failure.
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }
}

impl From<ValidationError> for ValidateError {
    fn from(error: ValidationError) -> Self {
        Self::Invalid(ValidationErrors::single(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_display() {
        let path = ValidationPath::root()
            .field("users")
            .index(0)
            .field("tags")
            .key("k");
        assert_eq!(path.to_string(), "users[0].tags{k}");
        assert_eq!(path.len(), 4);
        assert_eq!(ValidationPath::root().to_string(), "");
    }

    #[test]
    fn test_error_display() {
        let err = ValidationError::required(ValidationPath::root().field("name"));
        assert_eq!(err.to_string(), "name: is required [required]");

        let err = ValidationError::no_variant(ValidationPath::root());
        assert_eq!(err.to_string(), "(root): no variant matched [type]");
    }

    #[test]
    fn test_refinement_default_code() {
        let err = ValidationError::refinement(
            ValidationPath::root(),
            RefinementError::new("must be even"),
        );
        assert_eq!(err.code, codes::VALIDATION_ERROR);

        let err = ValidationError::refinement(
            ValidationPath::root(),
            RefinementError::new("taken").with_code("unique"),
        );
        assert_eq!(err.code, "unique");
    }

    #[test]
    fn test_errors_non_empty() {
        assert!(ValidationErrors::from_vec(Vec::new()).is_none());
        let errors = ValidationErrors::from_vec(vec![
            ValidationError::required(ValidationPath::root().field("a")),
            ValidationError::type_mismatch(ValidationPath::root().field("b").index(2), "integer", "string"),
        ])
        .unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.max_depth(), 2);
        assert_eq!(errors.first().code, codes::REQUIRED);
    }

    #[test]
    fn test_path_serializes_as_segments() {
        let path = ValidationPath::root().field("a").index(1);
        let json = serde_json::to_value(&path).unwrap();
        assert_eq!(json, serde_json::json!([{"name": "a"}, {"index": 1}]));
    }
}
