//! JSON Schema projection.
//!
//! Projection maps the root shape once, then drains the reference store as a
//! work-list: each discovered identity is generated exactly once, and
//! generating it may discover more identities. References never expand
//! inline, which is what lets cyclic shapes terminate.
//!
//! # Example
//!
//! ```rust
//! use shape_rs::{Field, Projector, Schema, ShapeRegistry, TypeNode};
//!
//! let node = Schema::new("Node")
//!     .field(Field::required("value", TypeNode::string()))
//!     .field(Field::new("children", TypeNode::array(TypeNode::reference("Node"))));
//!
//! let registry = ShapeRegistry::new().with_schemas([node.clone()]);
//! let document = Projector::new(&registry).project(&node).unwrap();
//!
//! assert_eq!(
//!     document["definitions"]["Node"]["properties"]["children"]["items"],
//!     serde_json::json!({"$ref": "#/definitions/Node"})
//! );
//! ```

mod mapper;
mod store;

pub use mapper::SchemaMapper;
pub use store::ReferenceStore;

use serde_json::{Map, Value as JsonValue};
use tracing::{debug, warn};

use crate::config::{ProjectionOptions, DRAFT_07_URI};
use crate::error::ShapeError;
use crate::ir::{ShapeProvider, TypeNode};
use crate::registry::{Shape, ShapeRegistry};

/// Projects shapes into JSON Schema documents.
#[derive(Debug, Clone)]
pub struct Projector<'r> {
    registry: &'r ShapeRegistry,
    options: ProjectionOptions,
}

impl<'r> Projector<'r> {
    /// Create a projector with default options.
    pub fn new(registry: &'r ShapeRegistry) -> Self {
        Self {
            registry,
            options: ProjectionOptions::default(),
        }
    }

    /// Replace the options.
    pub fn with_options(mut self, options: ProjectionOptions) -> Self {
        self.options = options;
        self
    }

    /// Current options.
    pub fn options(&self) -> &ProjectionOptions {
        &self.options
    }

    /// Project a schema into a document.
    pub fn project(&self, schema: &dyn ShapeProvider) -> Result<JsonValue, ShapeError> {
        let mut store = ReferenceStore::new();
        let root = self.mapper().map_schema(schema, &mut store);
        self.finish(root, store)
    }

    /// Project a registered shape into a document.
    pub fn project_shape(&self, identity: &str) -> Result<JsonValue, ShapeError> {
        let mut store = ReferenceStore::new();
        let root = match self.registry.resolve(identity)? {
            Shape::Schema(schema) => self.mapper().map_schema(schema.as_ref(), &mut store),
            Shape::Custom(custom) => self.mapper().map_custom(custom.as_ref(), &mut store),
        };
        self.finish(root, store)
    }

    /// Project a bare type node. The result carries any definitions the node
    /// pulled in.
    pub fn project_type(&self, node: &TypeNode) -> Result<JsonValue, ShapeError> {
        let mut store = ReferenceStore::new();
        let root = self.mapper().map_type(node, &mut store);
        self.finish(root, store)
    }

    fn mapper(&self) -> SchemaMapper<'_> {
        SchemaMapper::new(&self.options)
    }

    /// Generate a definition for every pending identity until none remain.
    fn drain(&self, store: &mut ReferenceStore) -> Result<(), ShapeError> {
        let mapper = self.mapper();
        let mut generated = 0usize;

        while let Some(identity) = store.next_pending() {
            let fragment = match self.registry.resolve(&identity)? {
                Shape::Schema(schema) => mapper.map_schema(schema.as_ref(), store),
                Shape::Custom(custom) => mapper.map_custom(custom.as_ref(), store),
            };
            store.define(identity, fragment);
            generated += 1;
        }

        debug!(
            generated,
            discovered = store.discovered_count(),
            "Reference store drained"
        );
        Ok(())
    }

    fn finish(&self, mut root: JsonValue, mut store: ReferenceStore) -> Result<JsonValue, ShapeError> {
        self.drain(&mut store)?;
        let definitions = store.into_definitions();

        match &mut root {
            JsonValue::Object(object) => {
                if !definitions.is_empty() {
                    let definitions: Map<String, JsonValue> = definitions.into_iter().collect();
                    object.insert(
                        self.options.definitions_key.clone(),
                        JsonValue::Object(definitions),
                    );
                }
                if self.options.include_schema_uri {
                    object.insert("$schema".into(), JsonValue::String(DRAFT_07_URI.into()));
                }
            }
            _ => {
                if !definitions.is_empty() {
                    warn!(
                        count = definitions.len(),
                        "Root fragment is not an object; definitions dropped"
                    );
                }
            }
        }

        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Field, Schema};
    use crate::traits::CustomType;
    use serde_json::json;

    #[derive(Debug)]
    struct Email;

    impl CustomType for Email {
        fn name(&self) -> &str {
            "Email"
        }

        fn type_definition(&self) -> TypeNode {
            TypeNode::string()
        }

        fn json_schema(&self) -> Option<JsonValue> {
            Some(json!({"type": "string", "format": "email"}))
        }
    }

    #[derive(Debug)]
    struct Score;

    impl CustomType for Score {
        fn name(&self) -> &str {
            "Score"
        }

        fn type_definition(&self) -> TypeNode {
            TypeNode::integer().with_constraint(crate::ir::Constraint::gteq(0.0))
        }
    }

    #[test]
    fn test_no_definitions_key_without_references() {
        let registry = ShapeRegistry::new();
        let schema = Schema::new("Flat").field(Field::required("a", TypeNode::string()));
        let document = Projector::new(&registry).project(&schema).unwrap();
        assert!(document.get("definitions").is_none());
        assert!(document.get("$schema").is_none());
    }

    #[test]
    fn test_transitive_definitions() {
        let registry = ShapeRegistry::new().with_schemas([
            Schema::new("Team").field(Field::required("owner", TypeNode::reference("User"))),
            Schema::new("User").field(Field::required("address", TypeNode::reference("Address"))),
            Schema::new("Address").field(Field::required("city", TypeNode::string())),
        ]);

        let document = Projector::new(&registry).project_shape("Team").unwrap();
        let definitions = document["definitions"].as_object().unwrap();
        let keys: Vec<_> = definitions.keys().cloned().collect();
        assert_eq!(keys, vec!["Address".to_string(), "User".to_string()]);
    }

    #[test]
    fn test_unknown_reference_fails() {
        let registry = ShapeRegistry::new();
        let result = Projector::new(&registry).project_type(&TypeNode::reference("Ghost"));
        assert_eq!(result, Err(ShapeError::UnknownShape("Ghost".into())));
    }

    #[test]
    fn test_custom_types() {
        let mut registry = ShapeRegistry::new();
        registry.register_custom(Email);
        registry.register_custom(Score);

        let node = TypeNode::tuple(vec![TypeNode::reference("Email"), TypeNode::reference("Score")]);
        let document = Projector::new(&registry).project_type(&node).unwrap();

        assert_eq!(
            document["definitions"]["Email"],
            json!({"type": "string", "format": "email"})
        );
        assert_eq!(
            document["definitions"]["Score"],
            json!({"type": "integer", "minimum": 0})
        );
    }

    #[test]
    fn test_options() {
        let registry = ShapeRegistry::new().with_schemas([
            Schema::new("Leaf").field(Field::required("id", TypeNode::integer())),
        ]);
        let options = ProjectionOptions {
            definitions_key: "$defs".into(),
            include_schema_uri: true,
        };
        let document = Projector::new(&registry)
            .with_options(options)
            .project_type(&TypeNode::reference("Leaf"))
            .unwrap();

        assert_eq!(document["$ref"], json!("#/$defs/Leaf"));
        assert!(document["$defs"]["Leaf"].is_object());
        assert_eq!(document["$schema"], json!(DRAFT_07_URI));
    }
}
