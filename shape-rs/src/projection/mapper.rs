//! Type node to JSON Schema fragment mapping.
//!
//! # Mappings
//!
//! | Type node | Fragment |
//! |-----------|----------|
//! | `string`, `symbol` | `{"type": "string"}` |
//! | `integer` | `{"type": "integer"}` |
//! | `float` | `{"type": "number"}` |
//! | `boolean` | `{"type": "boolean"}` |
//! | `any` | `{}` |
//! | array | `{"type": "array", "items": ...}` |
//! | map | `{"type": "object", "additionalProperties": ...}` (key type dropped) |
//! | record | `{"type": "object", "properties": ..., "required": [...]}` |
//! | tuple | `{"type": "array", "items": [...], "additionalItems": false}` |
//! | union | `{"oneOf": [...]}` |
//! | reference | `{"$ref": "#/definitions/<id>"}` |
//!
//! A reference field with a description, default or examples becomes
//! `{"allOf": [{"$ref": ...}], "description": ...}`.

use serde_json::{json, Map, Value as JsonValue};

use super::store::ReferenceStore;
use crate::config::ProjectionOptions;
use crate::ir::{Constraint, Field, PrimitiveKind, Rule, SchemaConfig, ShapeProvider, TypeNode};
use crate::traits::CustomType;

/// Maps type nodes to JSON Schema fragments.
///
/// A reference never expands inline: the mapper registers the target in the
/// store and emits a pointer.
#[derive(Debug, Clone)]
pub struct SchemaMapper<'o> {
    options: &'o ProjectionOptions,
}

impl<'o> SchemaMapper<'o> {
    /// Create a mapper for the given options.
    pub fn new(options: &'o ProjectionOptions) -> Self {
        Self { options }
    }

    /// Map a schema to an object fragment.
    pub fn map_schema(&self, schema: &dyn ShapeProvider, store: &mut ReferenceStore) -> JsonValue {
        self.map_object(schema.fields(), Some(schema.config()), store)
    }

    /// Map a custom type: its own fragment if it has one, else its type
    /// definition.
    pub fn map_custom(&self, custom: &dyn CustomType, store: &mut ReferenceStore) -> JsonValue {
        match custom.json_schema() {
            Some(fragment) => fragment,
            None => self.map_type(&custom.type_definition(), store),
        }
    }

    /// Map a type node to its fragment.
    pub fn map_type(&self, node: &TypeNode, store: &mut ReferenceStore) -> JsonValue {
        let mut fragment = match node {
            TypeNode::Primitive(primitive) => self.map_primitive(primitive.kind),
            TypeNode::Array(array) => {
                let mut object = Map::new();
                object.insert("type".into(), json!("array"));
                object.insert("items".into(), self.map_type(&array.items, store));
                object
            }
            TypeNode::Map(map) => {
                let mut object = Map::new();
                object.insert("type".into(), json!("object"));
                object.insert("additionalProperties".into(), self.map_type(&map.value, store));
                object
            }
            TypeNode::Record(record) => match self.map_object(&record.fields, None, store) {
                JsonValue::Object(object) => object,
                _ => Map::new(),
            },
            TypeNode::Tuple(tuple) => self.map_tuple(&tuple.elements, store),
            TypeNode::Union(union) => {
                let variants: Vec<JsonValue> = union
                    .variants
                    .iter()
                    .map(|variant| self.map_type(variant, store))
                    .collect();
                let mut object = Map::new();
                object.insert("oneOf".into(), JsonValue::Array(variants));
                object
            }
            TypeNode::Reference(reference) => {
                store.register(&reference.target);
                let mut object = Map::new();
                object.insert(
                    "$ref".into(),
                    JsonValue::String(self.options.ref_pointer(&reference.target)),
                );
                object
            }
        };

        apply_constraints(&mut fragment, node.constraints());
        JsonValue::Object(fragment)
    }

    fn map_primitive(&self, kind: PrimitiveKind) -> Map<String, JsonValue> {
        let ty = match kind {
            PrimitiveKind::String | PrimitiveKind::Symbol => "string",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Float => "number",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Any => return Map::new(),
        };
        let mut object = Map::new();
        object.insert("type".into(), json!(ty));
        object
    }

    fn map_tuple(&self, elements: &[TypeNode], store: &mut ReferenceStore) -> Map<String, JsonValue> {
        let items: Vec<JsonValue> = elements
            .iter()
            .map(|element| self.map_type(element, store))
            .collect();
        let mut object = Map::new();
        object.insert("type".into(), json!("array"));
        object.insert("items".into(), JsonValue::Array(items));
        object.insert("minItems".into(), json!(elements.len()));
        object.insert("maxItems".into(), json!(elements.len()));
        object.insert("additionalItems".into(), json!(false));
        object
    }

    fn map_object(
        &self,
        fields: &[Field],
        config: Option<&SchemaConfig>,
        store: &mut ReferenceStore,
    ) -> JsonValue {
        let mut object = Map::new();
        object.insert("type".into(), json!("object"));

        if let Some(config) = config {
            if let Some(title) = &config.title {
                object.insert("title".into(), json!(title));
            }
            if let Some(description) = &config.description {
                object.insert("description".into(), json!(description));
            }
        }

        let mut properties = Map::new();
        for field in fields {
            properties.insert(field.name.clone(), self.map_field(field, store));
        }
        object.insert("properties".into(), JsonValue::Object(properties));

        let required: Vec<JsonValue> = fields
            .iter()
            .filter(|field| field.is_required())
            .map(|field| json!(field.name))
            .collect();
        object.insert("required".into(), JsonValue::Array(required));

        let strict = config.map_or(false, |config| config.strict);
        object.insert("additionalProperties".into(), json!(!strict));

        JsonValue::Object(object)
    }

    /// Map a field, attaching its documentation.
    ///
    /// Draft-7 ignores siblings of `$ref`, so a documented reference field
    /// is wrapped as `{"allOf": [{"$ref": ...}], ...}`.
    fn map_field(&self, field: &Field, store: &mut ReferenceStore) -> JsonValue {
        let fragment = self.map_type(&field.ty, store);

        let mut metadata = Map::new();
        if let Some(description) = &field.description {
            metadata.insert("description".into(), json!(description));
        }
        if let Some(default) = &field.default {
            metadata.insert("default".into(), JsonValue::from(default.clone()));
        }
        let examples: Vec<JsonValue> = field
            .example
            .iter()
            .chain(&field.examples)
            .cloned()
            .map(JsonValue::from)
            .collect();
        if !examples.is_empty() {
            metadata.insert("examples".into(), JsonValue::Array(examples));
        }

        if metadata.is_empty() {
            return fragment;
        }

        let mut object = match fragment {
            JsonValue::Object(object) if !field.ty.is_reference() => object,
            other => {
                let mut wrapper = Map::new();
                wrapper.insert("allOf".into(), JsonValue::Array(vec![other]));
                wrapper
            }
        };
        object.extend(metadata);
        JsonValue::Object(object)
    }
}

/// Add the JSON Schema keywords for a node's constraints.
///
/// Kinds without a keyword are skipped.
fn apply_constraints(object: &mut Map<String, JsonValue>, constraints: &[Constraint]) {
    for constraint in constraints {
        match &constraint.rule {
            Rule::MinLength(n) => {
                object.insert("minLength".into(), json!(n));
            }
            Rule::MaxLength(n) => {
                object.insert("maxLength".into(), json!(n));
            }
            Rule::MinItems(n) => {
                object.insert("minItems".into(), json!(n));
            }
            Rule::MaxItems(n) => {
                object.insert("maxItems".into(), json!(n));
            }
            Rule::Gt(bound) => {
                object.insert("exclusiveMinimum".into(), bound.to_json());
            }
            Rule::Lt(bound) => {
                object.insert("exclusiveMaximum".into(), bound.to_json());
            }
            Rule::Gteq(bound) => {
                object.insert("minimum".into(), bound.to_json());
            }
            Rule::Lteq(bound) => {
                object.insert("maximum".into(), bound.to_json());
            }
            Rule::Format(pattern) => {
                object.insert("pattern".into(), json!(pattern.as_str()));
            }
            Rule::Choices(options) => {
                let options: Vec<JsonValue> = options.iter().cloned().map(JsonValue::from).collect();
                object.insert("enum".into(), JsonValue::Array(options));
            }
            Rule::Size(n) => {
                object.insert("minProperties".into(), json!(n));
                object.insert("maxProperties".into(), json!(n));
            }
            Rule::Unknown { .. } => {}
        }
    }
}
