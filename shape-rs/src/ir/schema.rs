//! Schema and field definitions.

use std::fmt::Debug;

use serde::{Deserialize, Deserializer, Serialize};

use super::types::TypeNode;
use crate::value::Value;

/// A named, typed member of a schema or record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    /// Field name
    pub name: String,

    /// Field type
    #[serde(rename = "type")]
    pub ty: TypeNode,

    /// Whether the field must be present
    #[serde(default)]
    pub required: bool,

    /// Value substituted when the field is absent
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Value>,

    /// Documentation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Single documentation example
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub example: Option<Value>,

    /// Documentation examples
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<Value>,
}

/// A key that is present is `Some`, even when its value is `null`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl Field {
    /// Create an optional field.
    pub fn new(name: impl Into<String>, ty: TypeNode) -> Self {
        Self {
            name: name.into(),
            ty,
            required: false,
            default: None,
            description: None,
            example: None,
            examples: Vec::new(),
        }
    }

    /// Create a required field.
    pub fn required(name: impl Into<String>, ty: TypeNode) -> Self {
        Self {
            required: true,
            ..Self::new(name, ty)
        }
    }

    /// Set the default value. A defaulted field is never required.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self.required = false;
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the single example.
    pub fn with_example(mut self, example: impl Into<Value>) -> Self {
        self.example = Some(example.into());
        self
    }

    /// Set the examples list.
    pub fn with_examples(mut self, examples: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        self.examples = examples.into_iter().map(Into::into).collect();
        self
    }

    /// Required and without a default.
    ///
    /// Shapes loaded from documents may set both `required` and `default`;
    /// the default wins.
    pub fn is_required(&self) -> bool {
        self.required && self.default.is_none()
    }
}

/// Schema-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Document title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Document description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Reject undeclared input keys
    pub strict: bool,
}

/// A named, ordered set of fields plus configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    /// Stable identity, used as the reference target
    pub id: String,

    /// Fields in declaration order
    pub fields: Vec<Field>,

    /// Configuration
    #[serde(default)]
    pub config: SchemaConfig,
}

impl Schema {
    /// Create an empty schema.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Vec::new(),
            config: SchemaConfig::default(),
        }
    }

    /// Append a field.
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = Some(title.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.config.description = Some(description.into());
        self
    }

    /// Enable or disable strict mode.
    pub fn strict(mut self, strict: bool) -> Self {
        self.config.strict = strict;
        self
    }
}

/// Read contract for anything that can act as a schema.
///
/// Implemented by [`Schema`]; dynamically assembled shapes implement it
/// directly.
pub trait ShapeProvider: Debug + Send + Sync {
    /// Stable identity.
    fn identity(&self) -> &str;

    /// Fields in declaration order.
    fn fields(&self) -> &[Field];

    /// Schema configuration.
    fn config(&self) -> &SchemaConfig;

    /// Look up a field by name.
    fn field(&self, name: &str) -> Option<&Field> {
        self.fields().iter().find(|f| f.name == name)
    }
}

impl ShapeProvider for Schema {
    fn identity(&self) -> &str {
        &self.id
    }

    fn fields(&self) -> &[Field] {
        &self.fields
    }

    fn config(&self) -> &SchemaConfig {
        &self.config
    }
}
