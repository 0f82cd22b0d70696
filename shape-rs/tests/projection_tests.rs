//! Integration tests for JSON Schema projection.

use serde_json::json;
use shape_rs::{
    Constraint, Field, ProjectionOptions, Projector, Schema, ShapeError, ShapeRegistry, TypeNode,
};

fn tree_schema() -> Schema {
    Schema::new("Node")
        .field(Field::required("value", TypeNode::string()))
        .field(Field::new(
            "children",
            TypeNode::array(TypeNode::reference("Node")),
        ))
}

// =============================================================================
// Reference resolution
// =============================================================================

#[test]
fn test_self_reference_terminates() {
    let registry = ShapeRegistry::new().with_schemas([tree_schema()]);
    let document = Projector::new(&registry).project(&tree_schema()).unwrap();

    let definitions = document["definitions"].as_object().unwrap();
    assert_eq!(definitions.len(), 1);
    assert_eq!(
        definitions["Node"]["properties"]["children"]["items"],
        json!({"$ref": "#/definitions/Node"})
    );
    assert_eq!(
        document["properties"]["children"]["items"],
        json!({"$ref": "#/definitions/Node"})
    );
}

#[test]
fn test_mutual_references_terminate() {
    let registry = ShapeRegistry::new().with_schemas([
        Schema::new("Author").field(Field::new(
            "books",
            TypeNode::array(TypeNode::reference("Book")),
        )),
        Schema::new("Book").field(Field::required("author", TypeNode::reference("Author"))),
    ]);

    let document = Projector::new(&registry).project_shape("Author").unwrap();
    let definitions = document["definitions"].as_object().unwrap();
    assert_eq!(definitions.len(), 2);
    assert_eq!(
        definitions["Book"]["properties"]["author"],
        json!({"$ref": "#/definitions/Author"})
    );
}

#[test]
fn test_references_inside_unions_and_maps() {
    let registry = ShapeRegistry::new().with_schemas([
        Schema::new("Cat").field(Field::required("meows", TypeNode::boolean())),
        Schema::new("Dog").field(Field::required("barks", TypeNode::boolean())),
        Schema::new("Shelter").field(Field::required(
            "pets",
            TypeNode::map(
                TypeNode::string(),
                TypeNode::union(vec![TypeNode::reference("Cat"), TypeNode::reference("Dog")]),
            ),
        )),
    ]);

    let document = Projector::new(&registry).project_shape("Shelter").unwrap();
    assert_eq!(
        document["properties"]["pets"],
        json!({
            "type": "object",
            "additionalProperties": {
                "oneOf": [
                    {"$ref": "#/definitions/Cat"},
                    {"$ref": "#/definitions/Dog"}
                ]
            }
        })
    );
    assert!(document["definitions"]["Cat"].is_object());
    assert!(document["definitions"]["Dog"].is_object());
}

#[test]
fn test_dangling_reference_is_an_error() {
    let schema = Schema::new("Team").field(Field::required("lead", TypeNode::reference("User")));
    let registry = ShapeRegistry::new().with_schemas([schema.clone()]);

    assert_eq!(
        Projector::new(&registry).project(&schema),
        Err(ShapeError::UnknownShape("User".into()))
    );
}

// =============================================================================
// Document shape
// =============================================================================

#[test]
fn test_full_document() {
    let schema = Schema::new("Signup")
        .with_title("Signup")
        .with_description("New account request")
        .strict(true)
        .field(
            Field::required(
                "email",
                TypeNode::string().with_constraint(Constraint::format("@").unwrap()),
            )
            .with_description("Contact address"),
        )
        .field(
            Field::required(
                "age",
                TypeNode::integer()
                    .with_constraint(Constraint::gteq(13.0))
                    .with_constraint(Constraint::lt(130.0)),
            ),
        )
        .field(
            Field::new(
                "plan",
                TypeNode::symbol().with_constraint(Constraint::choices(["free", "pro"])),
            )
            .with_default("free"),
        );

    let registry = ShapeRegistry::new();
    let document = Projector::new(&registry).project(&schema).unwrap();

    assert_eq!(
        document,
        json!({
            "type": "object",
            "title": "Signup",
            "description": "New account request",
            "properties": {
                "email": {"type": "string", "pattern": "@", "description": "Contact address"},
                "age": {"type": "integer", "minimum": 13, "exclusiveMaximum": 130},
                "plan": {"type": "string", "enum": ["free", "pro"], "default": "free"}
            },
            "required": ["email", "age"],
            "additionalProperties": false
        })
    );
}

#[test]
fn test_definitions_key_option() {
    let registry = ShapeRegistry::new().with_schemas([tree_schema()]);
    let options = ProjectionOptions {
        definitions_key: "$defs".into(),
        include_schema_uri: true,
    };
    let document = Projector::new(&registry)
        .with_options(options)
        .project(&tree_schema())
        .unwrap();

    assert!(document.get("definitions").is_none());
    assert_eq!(
        document["$defs"]["Node"]["properties"]["children"]["items"],
        json!({"$ref": "#/$defs/Node"})
    );
    assert_eq!(
        document["$schema"],
        json!("http://json-schema.org/draft-07/schema#")
    );
}

#[test]
fn test_projection_is_deterministic() {
    let registry = ShapeRegistry::new().with_schemas([
        tree_schema(),
        Schema::new("Forest")
            .field(Field::required("trees", TypeNode::array(TypeNode::reference("Node"))))
            .field(Field::new("largest", TypeNode::reference("Node"))),
    ]);
    let projector = Projector::new(&registry);

    let first = projector.project_shape("Forest").unwrap();
    let second = projector.project_shape("Forest").unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
