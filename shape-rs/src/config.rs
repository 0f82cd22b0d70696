//! Engine options.

use serde::{Deserialize, Serialize};

/// Draft-7 meta-schema URI emitted when `include_schema_uri` is set.
pub const DRAFT_07_URI: &str = "http://json-schema.org/draft-07/schema#";

/// Options for both engines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Validation options
    pub validation: ValidationOptions,
    /// Projection options
    pub projection: ProjectionOptions,
}

/// Validation options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Coerce primitive representations before type checking
    pub coerce: bool,
}

/// Projection options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionOptions {
    /// Key holding definitions, also used in `$ref` pointers
    pub definitions_key: String,
    /// Emit the `$schema` URI on the root document
    pub include_schema_uri: bool,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            definitions_key: "definitions".to_string(),
            include_schema_uri: false,
        }
    }
}

impl ProjectionOptions {
    /// Pointer for a definition.
    pub fn ref_pointer(&self, identity: &str) -> String {
        format!("#/{}/{}", self.definitions_key, identity)
    }
}
