//! Constraint IR definitions.
//!
//! A [`Constraint`] is a named side-condition narrowing the valid values of a
//! type node. Constraints are kept in declaration order; the validator stops
//! at the first one that fails. Unknown constraint kinds are carried as
//! [`Rule::Unknown`] and always pass, so that shape documents written for a
//! newer engine still load.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ShapeError;
use crate::value::Value;

/// A compiled `format` pattern.
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    /// Compile a pattern. An invalid pattern is a configuration error.
    pub fn new(pattern: &str) -> Result<Self, ShapeError> {
        Regex::new(pattern)
            .map(Pattern)
            .map_err(|e| ShapeError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    /// The source pattern.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Check whether `text` matches.
    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

/// A numeric bound, kept in the form it was written.
///
/// Integer bounds compare exactly against integer values, so bounds beyond
/// 2^53 do not lose precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// Integer bound
    Int(i64),
    /// Floating point bound
    Float(f64),
}

impl Bound {
    /// Order a numeric value against this bound. `None` for non-numeric
    /// values and NaN.
    pub fn compare(&self, value: &Value) -> Option<Ordering> {
        match (value, self) {
            (Value::Int(a), Bound::Int(b)) => Some(a.cmp(b)),
            (Value::Int(a), Bound::Float(b)) => compare_int_float(*a, *b),
            (Value::Float(a), Bound::Int(b)) => compare_int_float(*b, *a).map(Ordering::reverse),
            (Value::Float(a), Bound::Float(b)) => a.partial_cmp(b),
            _ => None,
        }
    }

    /// The bound as a JSON number.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Bound::Int(i) => serde_json::Value::from(*i),
            Bound::Float(f) => json_number(*f),
        }
    }

    fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value.as_i64() {
            Some(i) => Some(Bound::Int(i)),
            None => value.as_f64().map(Bound::Float),
        }
    }
}

/// Exact ordering of an integer against a float.
fn compare_int_float(a: i64, b: f64) -> Option<Ordering> {
    // 2^63; every i64 is below it
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    if b.is_nan() {
        return None;
    }
    if b >= LIMIT {
        return Some(Ordering::Less);
    }
    if b < -LIMIT {
        return Some(Ordering::Greater);
    }
    let floor = b.floor();
    match a.cmp(&(floor as i64)) {
        Ordering::Equal if b > floor => Some(Ordering::Less),
        ordering => Some(ordering),
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Int(i) => write!(f, "{}", i),
            Bound::Float(x) => write!(f, "{}", x),
        }
    }
}

impl From<i64> for Bound {
    fn from(i: i64) -> Self {
        Bound::Int(i)
    }
}

impl From<i32> for Bound {
    fn from(i: i32) -> Self {
        Bound::Int(i64::from(i))
    }
}

impl From<f64> for Bound {
    fn from(f: f64) -> Self {
        Bound::Float(f)
    }
}

/// Constraint kinds with their parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Minimum string length
    MinLength(usize),
    /// Maximum string length
    MaxLength(usize),
    /// Minimum sequence length
    MinItems(usize),
    /// Maximum sequence length
    MaxItems(usize),
    /// Strictly greater than
    Gt(Bound),
    /// Strictly less than
    Lt(Bound),
    /// Greater than or equal
    Gteq(Bound),
    /// Less than or equal
    Lteq(Bound),
    /// Pattern match on strings
    Format(Pattern),
    /// Set membership
    Choices(Vec<Value>),
    /// Exact keyed-collection size
    Size(usize),
    /// A kind this engine does not know; always passes
    Unknown {
        /// The kind name as written
        kind: String,
        /// The parameter as written
        value: serde_json::Value,
    },
}

impl Rule {
    /// The kind name, also used as the error code.
    pub fn kind(&self) -> &str {
        match self {
            Rule::MinLength(_) => "min_length",
            Rule::MaxLength(_) => "max_length",
            Rule::MinItems(_) => "min_items",
            Rule::MaxItems(_) => "max_items",
            Rule::Gt(_) => "gt",
            Rule::Lt(_) => "lt",
            Rule::Gteq(_) => "gteq",
            Rule::Lteq(_) => "lteq",
            Rule::Format(_) => "format",
            Rule::Choices(_) => "choices",
            Rule::Size(_) => "size",
            Rule::Unknown { kind, .. } => kind.as_str(),
        }
    }

    /// The parameter in its JSON form.
    pub fn parameter(&self) -> serde_json::Value {
        match self {
            Rule::MinLength(n)
            | Rule::MaxLength(n)
            | Rule::MinItems(n)
            | Rule::MaxItems(n)
            | Rule::Size(n) => serde_json::Value::from(*n),
            Rule::Gt(bound) | Rule::Lt(bound) | Rule::Gteq(bound) | Rule::Lteq(bound) => {
                bound.to_json()
            }
            Rule::Format(pattern) => serde_json::Value::from(pattern.as_str()),
            Rule::Choices(options) => serde_json::Value::Array(
                options.iter().cloned().map(serde_json::Value::from).collect(),
            ),
            Rule::Unknown { value, .. } => value.clone(),
        }
    }
}

/// Render a bound as a JSON number, preferring the integer form.
fn json_number(x: f64) -> serde_json::Value {
    if x.fract() == 0.0 && x.abs() < i64::MAX as f64 {
        serde_json::Value::from(x as i64)
    } else {
        serde_json::Number::from_f64(x).map_or(serde_json::Value::Null, serde_json::Value::Number)
    }
}

/// A rule plus an optional custom error message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawConstraint", into = "RawConstraint")]
pub struct Constraint {
    /// The rule to check
    pub rule: Rule,
    /// Replaces the default message when the rule fails
    pub message: Option<String>,
}

impl Constraint {
    /// Create a constraint from a rule.
    pub fn new(rule: Rule) -> Self {
        Self {
            rule,
            message: None,
        }
    }

    /// `min_length` constraint.
    pub fn min_length(n: usize) -> Self {
        Self::new(Rule::MinLength(n))
    }

    /// `max_length` constraint.
    pub fn max_length(n: usize) -> Self {
        Self::new(Rule::MaxLength(n))
    }

    /// `min_items` constraint.
    pub fn min_items(n: usize) -> Self {
        Self::new(Rule::MinItems(n))
    }

    /// `max_items` constraint.
    pub fn max_items(n: usize) -> Self {
        Self::new(Rule::MaxItems(n))
    }

    /// `gt` constraint.
    pub fn gt(bound: impl Into<Bound>) -> Self {
        Self::new(Rule::Gt(bound.into()))
    }

    /// `lt` constraint.
    pub fn lt(bound: impl Into<Bound>) -> Self {
        Self::new(Rule::Lt(bound.into()))
    }

    /// `gteq` constraint.
    pub fn gteq(bound: impl Into<Bound>) -> Self {
        Self::new(Rule::Gteq(bound.into()))
    }

    /// `lteq` constraint.
    pub fn lteq(bound: impl Into<Bound>) -> Self {
        Self::new(Rule::Lteq(bound.into()))
    }

    /// `format` constraint. Fails if the pattern does not compile.
    pub fn format(pattern: &str) -> Result<Self, ShapeError> {
        Ok(Self::new(Rule::Format(Pattern::new(pattern)?)))
    }

    /// `choices` constraint.
    pub fn choices(options: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Self::new(Rule::Choices(options.into_iter().map(Into::into).collect()))
    }

    /// `size` constraint.
    pub fn size(n: usize) -> Self {
        Self::new(Rule::Size(n))
    }

    /// Set a custom error message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// The kind name of the rule.
    pub fn kind(&self) -> &str {
        self.rule.kind()
    }
}

/// Serialized form: `{"kind": "min_length", "value": 3, "message": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawConstraint {
    kind: String,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    value: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl TryFrom<RawConstraint> for Constraint {
    type Error = ShapeError;

    fn try_from(raw: RawConstraint) -> Result<Self, Self::Error> {
        let invalid = |reason: &str| ShapeError::InvalidConstraint {
            kind: raw.kind.clone(),
            reason: reason.to_string(),
        };
        let count = || {
            raw.value
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .ok_or_else(|| invalid("expected a non-negative integer"))
        };
        let bound = || Bound::from_json(&raw.value).ok_or_else(|| invalid("expected a number"));

        let rule = match raw.kind.as_str() {
            "min_length" => Rule::MinLength(count()?),
            "max_length" => Rule::MaxLength(count()?),
            "min_items" => Rule::MinItems(count()?),
            "max_items" => Rule::MaxItems(count()?),
            "size" => Rule::Size(count()?),
            "gt" => Rule::Gt(bound()?),
            "lt" => Rule::Lt(bound()?),
            "gteq" => Rule::Gteq(bound()?),
            "lteq" => Rule::Lteq(bound()?),
            "format" => {
                let pattern = raw
                    .value
                    .as_str()
                    .ok_or_else(|| invalid("expected a pattern string"))?;
                Rule::Format(Pattern::new(pattern)?)
            }
            "choices" => {
                let options = raw
                    .value
                    .as_array()
                    .ok_or_else(|| invalid("expected a list of choices"))?;
                Rule::Choices(options.iter().cloned().map(Value::from).collect())
            }
            _ => Rule::Unknown {
                kind: raw.kind.clone(),
                value: raw.value.clone(),
            },
        };

        Ok(Constraint {
            rule,
            message: raw.message,
        })
    }
}

impl From<Constraint> for RawConstraint {
    fn from(constraint: Constraint) -> Self {
        RawConstraint {
            kind: constraint.rule.kind().to_string(),
            value: constraint.rule.parameter(),
            message: constraint.message,
        }
    }
}

/// Failure reported by a [`Refinement`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefinementError {
    /// Error code; `validation_error` when unset
    pub code: Option<String>,
    /// Human-readable message
    pub message: String,
}

impl RefinementError {
    /// Create a refinement error with the default code.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    /// Set the error code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

type RefineFn = dyn Fn(&Value) -> Result<Value, RefinementError> + Send + Sync;

/// A user-supplied predicate or transform.
///
/// Runs after the built-in constraints of the same node. On success the
/// returned value replaces the input, which allows normalization.
#[derive(Clone)]
pub struct Refinement(Arc<RefineFn>);

impl Refinement {
    /// Wrap a transform.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, RefinementError> + Send + Sync + 'static,
    {
        Refinement(Arc::new(f))
    }

    /// Wrap a predicate; the value passes through unchanged.
    pub fn check<F>(predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let message = message.into();
        Self::new(move |value| {
            if predicate(value) {
                Ok(value.clone())
            } else {
                Err(RefinementError::new(message.clone()))
            }
        })
    }

    /// Run the refinement.
    pub fn apply(&self, value: &Value) -> Result<Value, RefinementError> {
        (self.0)(value)
    }
}

impl fmt::Debug for Refinement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Refinement(..)")
    }
}
