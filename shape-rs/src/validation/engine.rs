//! Recursive-descent validator.
//!
//! Error policy differs by level:
//! - schema fields: the first missing required field, or the first field that
//!   fails, ends the call;
//! - primitive constraints: the first failing constraint wins;
//! - array, map, tuple and record contents: every failing element is
//!   reported, and container constraints run only when all elements pass.
//!
//! Configuration errors ([`ValidateError::Shape`]) end the call at once from
//! any depth, including from inside union alternatives.

use std::cmp::Reverse;

use tracing::{debug, trace};

use super::error::{codes, ValidateError, ValidationError, ValidationErrors, ValidationPath};
use crate::coerce::coerce_primitive;
use crate::config::ValidationOptions;
use crate::constraints::first_violation;
use crate::error::ShapeError;
use crate::ir::{
    ArrayType, Constraint, MapType, PrimitiveType, RecordType, ShapeProvider, TupleType, TypeNode,
    UnionType,
};
use crate::registry::{Shape, ShapeRegistry};
use crate::traits::CustomType;
use crate::value::Value;

/// Result of validating one value.
pub type ValidateResult = Result<Value, ValidateError>;

/// Validates values against shapes resolved through a registry.
///
/// Holds no mutable state; a single validator can be shared across threads.
#[derive(Debug, Clone)]
pub struct Validator<'r> {
    registry: &'r ShapeRegistry,
    options: ValidationOptions,
}

impl<'r> Validator<'r> {
    /// Create a validator with default options.
    pub fn new(registry: &'r ShapeRegistry) -> Self {
        Self {
            registry,
            options: ValidationOptions::default(),
        }
    }

    /// Replace the options.
    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    /// Current options.
    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Validate a map against a schema.
    pub fn validate_schema(&self, schema: &dyn ShapeProvider, data: &Value) -> ValidateResult {
        self.validate_schema_at(schema, data, &ValidationPath::root())
    }

    /// Validate a value against a type node.
    pub fn validate(&self, node: &TypeNode, value: &Value) -> ValidateResult {
        self.validate_at(node, value, &ValidationPath::root())
    }

    /// Validate a value against a registered shape.
    pub fn validate_shape(&self, identity: &str, value: &Value) -> ValidateResult {
        self.validate_reference(identity, value, &ValidationPath::root())
    }

    /// Validate a map against a schema, reporting errors below `path`.
    pub fn validate_schema_at(
        &self,
        schema: &dyn ShapeProvider,
        data: &Value,
        path: &ValidationPath,
    ) -> ValidateResult {
        trace!(schema = schema.identity(), path = %path, "Validating schema");

        let Some(entries) = data.as_map() else {
            return Err(ValidationError::type_mismatch(path.clone(), "map", data.type_name()).into());
        };

        if let Some(missing) = schema
            .fields()
            .iter()
            .find(|field| field.is_required() && data.get_field(&field.name).is_none())
        {
            debug!(schema = schema.identity(), field = %missing.name, "Required field missing");
            return Err(ValidationError::required(path.field(&missing.name)).into());
        }

        let mut validated = Vec::with_capacity(schema.fields().len());
        for field in schema.fields() {
            match data.get_field(&field.name) {
                Some((key, value)) => {
                    let value = self.validate_at(&field.ty, value, &path.field(&field.name))?;
                    validated.push((key.clone(), value));
                }
                None => {
                    if let Some(default) = &field.default {
                        validated.push((Value::symbol(&field.name), default.clone()));
                    }
                }
            }
        }

        if schema.config().strict {
            let extra: Vec<String> = entries
                .iter()
                .filter(|(key, _)| {
                    key.key_name()
                        .map_or(true, |name| schema.field(name).is_none())
                })
                .map(|(key, _)| key.key_text())
                .collect();
            if !extra.is_empty() {
                debug!(schema = schema.identity(), extra = ?extra, "Undeclared keys in strict schema");
                return Err(ValidationError::additional_properties(path.clone(), &extra).into());
            }
        }

        Ok(Value::Map(validated))
    }

    /// Validate a value against a type node, reporting errors below `path`.
    pub fn validate_at(&self, node: &TypeNode, value: &Value, path: &ValidationPath) -> ValidateResult {
        trace!(node = node.label(), path = %path, "Validating node");

        match node {
            TypeNode::Primitive(primitive) => self.validate_primitive(primitive, value, path),
            TypeNode::Array(array) => self.validate_array(array, value, path),
            TypeNode::Map(map) => self.validate_map(map, value, path),
            TypeNode::Record(record) => self.validate_record(record, value, path),
            TypeNode::Tuple(tuple) => self.validate_tuple(tuple, value, path),
            TypeNode::Union(union) => self.validate_union(union, value, path),
            TypeNode::Reference(reference) => {
                self.validate_reference(&reference.target, value, path)
            }
        }
    }

    fn validate_reference(&self, identity: &str, value: &Value, path: &ValidationPath) -> ValidateResult {
        match self.registry.resolve(identity)? {
            Shape::Schema(schema) => self.validate_schema_at(schema.as_ref(), value, path),
            Shape::Custom(custom) => self.validate_custom(custom.as_ref(), value, path),
        }
    }

    fn validate_primitive(
        &self,
        primitive: &PrimitiveType,
        value: &Value,
        path: &ValidationPath,
    ) -> ValidateResult {
        let mut value = if self.options.coerce {
            coerce_primitive(primitive.kind, value).unwrap_or_else(|_| value.clone())
        } else {
            value.clone()
        };

        if !primitive.kind.matches(&value) {
            return Err(
                ValidationError::type_mismatch(path.clone(), primitive.kind.name(), value.type_name())
                    .into(),
            );
        }

        check_constraints(&primitive.constraints, &value, path)?;

        for refinement in &primitive.refinements {
            value = refinement
                .apply(&value)
                .map_err(|e| ValidationError::refinement(path.clone(), e))?;
        }

        Ok(value)
    }

    fn validate_array(&self, array: &ArrayType, value: &Value, path: &ValidationPath) -> ValidateResult {
        let Value::List(items) = value else {
            return Err(ValidationError::type_mismatch(path.clone(), "list", value.type_name()).into());
        };

        let mut collector = Collector::default();
        let mut validated = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            if let Some(item) = collector.take(self.validate_at(&array.items, item, &path.index(index)))? {
                validated.push(item);
            }
        }
        collector.finish(path, "array")?;

        let validated = Value::List(validated);
        check_constraints(&array.constraints, &validated, path)?;
        Ok(validated)
    }

    fn validate_map(&self, map: &MapType, value: &Value, path: &ValidationPath) -> ValidateResult {
        let Value::Map(entries) = value else {
            return Err(ValidationError::type_mismatch(path.clone(), "map", value.type_name()).into());
        };

        let mut collector = Collector::default();
        let mut validated = Vec::with_capacity(entries.len());
        for (key, entry) in entries {
            let text = key.key_text();
            let Some(key) = collector.take(self.validate_at(&map.key, key, &path.key(&text)))? else {
                continue;
            };
            if let Some(entry) = collector.take(self.validate_at(&map.value, entry, &path.field(&text)))? {
                validated.push((key, entry));
            }
        }
        collector.finish(path, "map")?;

        let validated = Value::Map(validated);
        check_constraints(&map.constraints, &validated, path)?;
        Ok(validated)
    }

    fn validate_tuple(&self, tuple: &TupleType, value: &Value, path: &ValidationPath) -> ValidateResult {
        let Value::List(items) = value else {
            return Err(ValidationError::type_mismatch(path.clone(), "tuple", value.type_name()).into());
        };

        if items.len() != tuple.elements.len() {
            return Err(ValidationError::new(
                path.clone(),
                codes::TYPE,
                format!(
                    "expected tuple of {} elements, got {}",
                    tuple.elements.len(),
                    items.len()
                ),
            )
            .into());
        }

        let mut collector = Collector::default();
        let mut validated = Vec::with_capacity(items.len());
        for (index, (element, item)) in tuple.elements.iter().zip(items).enumerate() {
            if let Some(item) = collector.take(self.validate_at(element, item, &path.index(index)))? {
                validated.push(item);
            }
        }
        collector.finish(path, "tuple")?;

        Ok(Value::List(validated))
    }

    fn validate_record(&self, record: &RecordType, value: &Value, path: &ValidationPath) -> ValidateResult {
        if value.as_map().is_none() {
            return Err(ValidationError::type_mismatch(path.clone(), "map", value.type_name()).into());
        }

        let mut collector = Collector::default();
        let mut validated = Vec::with_capacity(record.fields.len());
        for field in &record.fields {
            let field_path = path.field(&field.name);
            match value.get_field(&field.name) {
                Some((key, entry)) => {
                    if let Some(entry) = collector.take(self.validate_at(&field.ty, entry, &field_path))? {
                        validated.push((key.clone(), entry));
                    }
                }
                None => {
                    if let Some(default) = &field.default {
                        validated.push((Value::symbol(&field.name), default.clone()));
                    } else if field.is_required() {
                        collector.errors.push(ValidationError::required(field_path));
                    }
                }
            }
        }
        collector.finish(path, "record")?;

        let validated = Value::Map(validated);
        check_constraints(&record.constraints, &validated, path)?;
        Ok(validated)
    }

    fn validate_union(&self, union: &UnionType, value: &Value, path: &ValidationPath) -> ValidateResult {
        let mut failures: Vec<ValidationErrors> = Vec::with_capacity(union.variants.len());

        for (index, variant) in union.variants.iter().enumerate() {
            match self.validate_at(variant, value, path) {
                Ok(matched) => {
                    trace!(path = %path, variant = index, "Union variant matched");
                    check_constraints(&union.constraints, &matched, path)?;
                    return Ok(matched);
                }
                Err(ValidateError::Invalid(errors)) => failures.push(errors),
                Err(shape @ ValidateError::Shape(_)) => return Err(shape),
            }
        }

        let depth = path.len();
        let best = failures
            .into_iter()
            .enumerate()
            .filter(|(_, errors)| is_informative(errors, depth))
            .max_by_key(|(index, errors)| (errors.max_depth(), Reverse(*index)));

        match best {
            Some((index, errors)) => {
                debug!(path = %path, variant = index, "No union variant matched; reporting closest");
                Err(ValidateError::Invalid(errors))
            }
            None => {
                debug!(path = %path, variants = union.variants.len(), "No union variant matched");
                Err(ValidationError::no_variant(path.clone()).into())
            }
        }
    }

    fn validate_custom(&self, custom: &dyn CustomType, value: &Value, path: &ValidationPath) -> ValidateResult {
        trace!(custom = custom.name(), path = %path, "Validating custom type");

        let coerced = if self.options.coerce {
            match custom.coerce(value) {
                Some(Ok(coerced)) => coerced,
                _ => value.clone(),
            }
        } else {
            value.clone()
        };

        let validated = self.validate_at(&custom.type_definition(), &coerced, path)?;

        for rule in custom.rules() {
            match custom.check_rule(rule, &validated) {
                Some(Ok(true)) => {}
                Some(Ok(false)) => {
                    return Err(ValidationError::new(
                        path.clone(),
                        rule,
                        format!("failed the '{}' check", rule),
                    )
                    .into())
                }
                Some(Err(reason)) => {
                    return Err(ValidationError::new(path.clone(), rule, reason).into())
                }
                None => {
                    return Err(ShapeError::UnresolvedRule {
                        type_name: custom.name().to_string(),
                        rule: rule.to_string(),
                    }
                    .into())
                }
            }
        }

        Ok(validated)
    }
}

/// Gathers data errors across the elements of one container.
#[derive(Default)]
struct Collector {
    errors: Vec<ValidationError>,
}

impl Collector {
    /// Keep a success, record a data failure, propagate a configuration error.
    fn take(&mut self, result: ValidateResult) -> Result<Option<Value>, ValidateError> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(ValidateError::Invalid(errors)) => {
                self.errors.extend(errors);
                Ok(None)
            }
            Err(shape) => Err(shape),
        }
    }

    fn finish(self, path: &ValidationPath, container: &str) -> Result<(), ValidateError> {
        match ValidationErrors::from_vec(self.errors) {
            Some(errors) => {
                debug!(path = %path, container, error_count = errors.len(), "Container validation failed");
                Err(ValidateError::Invalid(errors))
            }
            None => Ok(()),
        }
    }
}

fn check_constraints(
    constraints: &[Constraint],
    value: &Value,
    path: &ValidationPath,
) -> Result<(), ValidateError> {
    match first_violation(constraints, value) {
        Some(constraint) => Err(ValidationError::constraint(path.clone(), constraint).into()),
        None => Ok(()),
    }
}

/// A failed alternative says more than "wrong type" if it failed below the
/// union's own path or failed a check other than the base type.
fn is_informative(errors: &ValidationErrors, depth: usize) -> bool {
    errors
        .iter()
        .any(|e| e.path.len() > depth || e.code != codes::TYPE)
}
