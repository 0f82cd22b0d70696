//! Shape registry resolving reference targets by identity.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use tracing::warn;

use crate::error::ShapeError;
use crate::ir::{Schema, ShapeProvider, TypeNode};
use crate::traits::CustomType;

/// A registered reference target.
#[derive(Debug, Clone)]
pub enum Shape {
    /// A schema (static or dynamically assembled)
    Schema(Arc<dyn ShapeProvider>),
    /// An externally defined custom type
    Custom(Arc<dyn CustomType>),
}

impl Shape {
    /// Identity the shape is registered under.
    pub fn identity(&self) -> &str {
        match self {
            Shape::Schema(schema) => schema.identity(),
            Shape::Custom(custom) => custom.name(),
        }
    }

    /// Direct reference targets, in encounter order.
    pub fn references(&self) -> Vec<String> {
        let mut refs = Vec::new();
        match self {
            Shape::Schema(schema) => {
                for field in schema.fields() {
                    field.ty.collect_references(&mut refs);
                }
            }
            Shape::Custom(custom) => custom.type_definition().collect_references(&mut refs),
        }
        refs
    }
}

/// Identity → shape lookup shared by validation and projection.
///
/// Built once, then read-only. Cycles between shapes are legal; they are
/// reported by [`detect_cycles`](ShapeRegistry::detect_cycles) for
/// diagnostics only.
#[derive(Debug, Default, Clone)]
pub struct ShapeRegistry {
    shapes: BTreeMap<String, Shape>,
}

impl ShapeRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema, replacing any shape with the same identity.
    pub fn register_schema(&mut self, schema: impl ShapeProvider + 'static) {
        let schema: Arc<dyn ShapeProvider> = Arc::new(schema);
        self.shapes
            .insert(schema.identity().to_string(), Shape::Schema(schema));
    }

    /// Register a custom type, replacing any shape with the same identity.
    pub fn register_custom(&mut self, custom: impl CustomType + 'static) {
        let custom: Arc<dyn CustomType> = Arc::new(custom);
        self.shapes
            .insert(custom.name().to_string(), Shape::Custom(custom));
    }

    /// Register many schemas at once.
    pub fn with_schemas(mut self, schemas: impl IntoIterator<Item = Schema>) -> Self {
        for schema in schemas {
            self.register_schema(schema);
        }
        self
    }

    /// Get a shape by identity.
    pub fn get(&self, identity: &str) -> Option<&Shape> {
        self.shapes.get(identity)
    }

    /// Get a shape by identity or fail with [`ShapeError::UnknownShape`].
    pub fn resolve(&self, identity: &str) -> Result<&Shape, ShapeError> {
        self.get(identity)
            .ok_or_else(|| ShapeError::UnknownShape(identity.to_string()))
    }

    /// Check whether an identity is registered.
    pub fn contains(&self, identity: &str) -> bool {
        self.shapes.contains_key(identity)
    }

    /// Get the number of registered shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Registered identities in sorted order.
    pub fn identities(&self) -> impl Iterator<Item = &str> {
        self.shapes.keys().map(String::as_str)
    }

    /// Direct reference targets of a shape. Empty for unknown identities.
    pub fn references_of(&self, identity: &str) -> Vec<String> {
        self.get(identity).map(Shape::references).unwrap_or_default()
    }

    /// All `(from, target)` pairs whose target is not registered.
    pub fn dangling_references(&self) -> Vec<(String, String)> {
        let mut dangling = Vec::new();
        for (identity, shape) in &self.shapes {
            for target in shape.references() {
                if !self.contains(&target) {
                    warn!(from = %identity, target = %target, "Dangling shape reference");
                    dangling.push((identity.clone(), target));
                }
            }
        }
        dangling
    }

    /// Fail with the first dangling reference, if any.
    pub fn check_references(&self) -> Result<(), ShapeError> {
        match self.dangling_references().into_iter().next() {
            Some((from, target)) => Err(ShapeError::DanglingReference { from, target }),
            None => Ok(()),
        }
    }

    /// Check that a bare type node only refers to registered shapes.
    pub fn check_type(&self, node: &TypeNode) -> Result<(), ShapeError> {
        let mut refs = Vec::new();
        node.collect_references(&mut refs);
        match refs.into_iter().find(|target| !self.contains(target)) {
            Some(target) => Err(ShapeError::UnknownShape(target)),
            None => Ok(()),
        }
    }

    /// Detect a reference cycle and return its path if found.
    ///
    /// The path starts and ends with the same identity. Self-references
    /// yield a two-element path.
    pub fn detect_cycles(&self) -> Option<Vec<String>> {
        let mut visited = HashSet::new();
        let mut path = Vec::new();

        for identity in self.shapes.keys() {
            if !visited.contains(identity) {
                if let Some(cycle) = self.find_cycle(identity, &mut visited, &mut path) {
                    return Some(cycle);
                }
            }
        }

        None
    }

    fn find_cycle(
        &self,
        identity: &str,
        visited: &mut HashSet<String>,
        path: &mut Vec<String>,
    ) -> Option<Vec<String>> {
        if let Some(start) = path.iter().position(|n| n == identity) {
            let mut cycle = path[start..].to_vec();
            cycle.push(identity.to_string());
            return Some(cycle);
        }

        if visited.contains(identity) {
            return None;
        }

        path.push(identity.to_string());

        for target in self.references_of(identity) {
            if let Some(cycle) = self.find_cycle(&target, visited, path) {
                return Some(cycle);
            }
        }

        path.pop();
        visited.insert(identity.to_string());
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Field;

    #[derive(Debug)]
    struct Email;

    impl CustomType for Email {
        fn name(&self) -> &str {
            "Email"
        }

        fn type_definition(&self) -> TypeNode {
            TypeNode::string()
        }
    }

    fn node_schema() -> Schema {
        Schema::new("Node")
            .field(Field::required("value", TypeNode::string()))
            .field(Field::new(
                "children",
                TypeNode::array(TypeNode::reference("Node")),
            ))
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ShapeRegistry::new();
        registry.register_schema(node_schema());
        registry.register_custom(Email);

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("Node"));
        assert!(matches!(registry.get("Email"), Some(Shape::Custom(_))));
        assert_eq!(registry.identities().collect::<Vec<_>>(), vec!["Email", "Node"]);
        assert_eq!(
            registry.resolve("Missing").unwrap_err(),
            ShapeError::UnknownShape("Missing".into())
        );
    }

    #[test]
    fn test_references_of() {
        let registry = ShapeRegistry::new().with_schemas([node_schema()]);
        assert_eq!(registry.references_of("Node"), vec!["Node".to_string()]);
        assert!(registry.references_of("Missing").is_empty());
    }

    #[test]
    fn test_detect_self_cycle() {
        let registry = ShapeRegistry::new().with_schemas([node_schema()]);
        assert_eq!(
            registry.detect_cycles(),
            Some(vec!["Node".to_string(), "Node".to_string()])
        );
    }

    #[test]
    fn test_detect_indirect_cycle() {
        let registry = ShapeRegistry::new().with_schemas([
            Schema::new("A").field(Field::new("b", TypeNode::reference("B"))),
            Schema::new("B").field(Field::new("a", TypeNode::reference("A"))),
            Schema::new("C").field(Field::new("name", TypeNode::string())),
        ]);
        let cycle = registry.detect_cycles().unwrap();
        assert_eq!(cycle.first(), cycle.last());
        assert_eq!(cycle.len(), 3);
    }

    #[test]
    fn test_no_cycle() {
        let registry = ShapeRegistry::new().with_schemas([
            Schema::new("A").field(Field::new("b", TypeNode::reference("B"))),
            Schema::new("B").field(Field::new("name", TypeNode::string())),
        ]);
        assert!(registry.detect_cycles().is_none());
    }

    #[test]
    fn test_check_references() {
        let registry = ShapeRegistry::new().with_schemas([
            Schema::new("Team").field(Field::new("owner", TypeNode::reference("User"))),
        ]);
        assert_eq!(
            registry.check_references(),
            Err(ShapeError::DanglingReference {
                from: "Team".into(),
                target: "User".into(),
            })
        );

        let registry = ShapeRegistry::new().with_schemas([node_schema()]);
        assert!(registry.check_references().is_ok());
        assert!(registry.check_type(&TypeNode::reference("Node")).is_ok());
        assert!(registry.check_type(&TypeNode::reference("Other")).is_err());
    }
}
