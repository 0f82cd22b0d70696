//! Property-based tests for shape-rs.
//!
//! Properties tested:
//! - Array exhaustiveness: every bad element is reported, in order
//! - Required short-circuit: only the first missing required field is reported
//! - Identity: valid primitives validate to themselves
//! - Determinism: projecting twice yields identical documents
//! - Cycle termination: reference rings of any length project once per shape
//! - Coercion is advisory: it never turns a valid value invalid

use proptest::prelude::*;
use std::collections::BTreeSet;

use shape_rs::validation::codes;
use shape_rs::{
    Field, Projector, Schema, ShapeRegistry, TypeNode, ValidationOptions, ValidationPath,
    Validator, Value,
};

// =============================================================================
// Generators
// =============================================================================

/// An element that is either a valid integer or an invalid string.
fn arb_element() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::Int),
        "[a-z]{0,6}".prop_map(Value::String),
    ]
}

fn arb_identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}"
}

/// A ring of schemas, each referring to the next and the last to the first.
fn ring(size: usize) -> ShapeRegistry {
    let schemas = (0..size).map(|i| {
        Schema::new(format!("S{}", i))
            .field(Field::required("id", TypeNode::integer()))
            .field(Field::new(
                "next",
                TypeNode::array(TypeNode::reference(format!("S{}", (i + 1) % size))),
            ))
    });
    ShapeRegistry::new().with_schemas(schemas)
}

// =============================================================================
// Validation properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_array_errors_cover_every_bad_index(items in prop::collection::vec(arb_element(), 0..20)) {
        let registry = ShapeRegistry::new();
        let validator = Validator::new(&registry);
        let node = TypeNode::array(TypeNode::integer());

        let expected: Vec<ValidationPath> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| !matches!(item, Value::Int(_)))
            .map(|(i, _)| ValidationPath::root().index(i))
            .collect();

        match validator.validate(&node, &Value::List(items.clone())) {
            Ok(validated) => {
                prop_assert!(expected.is_empty());
                prop_assert_eq!(validated, Value::List(items));
            }
            Err(err) => {
                let paths: Vec<ValidationPath> =
                    err.errors().unwrap().iter().map(|e| e.path.clone()).collect();
                prop_assert_eq!(paths, expected);
            }
        }
    }

    #[test]
    fn prop_only_first_missing_required_field_reported(
        names in prop::collection::btree_set(arb_identifier(), 1..8),
        present_mask in any::<u8>(),
    ) {
        let names: Vec<String> = names.into_iter().collect();
        let schema = names.iter().fold(Schema::new("Generated"), |schema, name| {
            schema.field(Field::required(name.clone(), TypeNode::integer()))
        });
        let present: Vec<&String> = names
            .iter()
            .enumerate()
            .filter(|(i, _)| present_mask & (1 << i) != 0)
            .map(|(_, name)| name)
            .collect();
        let data = Value::map(present.iter().map(|name| (name.as_str(), Value::Int(1))));

        let registry = ShapeRegistry::new();
        let result = Validator::new(&registry).validate_schema(&schema, &data);

        match names.iter().find(|name| !present.contains(name)) {
            Some(missing) => {
                let err = result.unwrap_err();
                let errors = err.errors().unwrap();
                prop_assert_eq!(errors.len(), 1);
                prop_assert_eq!(errors.first().code.as_str(), codes::REQUIRED);
                prop_assert_eq!(&errors.first().path, &ValidationPath::root().field(missing.as_str()));
            }
            None => prop_assert!(result.is_ok()),
        }
    }

    #[test]
    fn prop_valid_primitives_are_identity(
        text in ".{0,20}",
        number in any::<i64>(),
        flag in any::<bool>(),
    ) {
        let registry = ShapeRegistry::new();
        let validator = Validator::new(&registry);

        prop_assert_eq!(validator.validate(&TypeNode::string(), &Value::from(text.clone())), Ok(Value::from(text)));
        prop_assert_eq!(validator.validate(&TypeNode::integer(), &Value::Int(number)), Ok(Value::Int(number)));
        prop_assert_eq!(validator.validate(&TypeNode::boolean(), &Value::Bool(flag)), Ok(Value::Bool(flag)));
    }

    #[test]
    fn prop_coercion_keeps_valid_values(number in any::<i64>()) {
        let registry = ShapeRegistry::new();
        let validator = Validator::new(&registry).with_options(ValidationOptions { coerce: true });

        prop_assert_eq!(validator.validate(&TypeNode::integer(), &Value::Int(number)), Ok(Value::Int(number)));
        prop_assert_eq!(
            validator.validate(&TypeNode::integer(), &Value::from(number.to_string())),
            Ok(Value::Int(number))
        );
    }
}

// =============================================================================
// Projection properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_reference_rings_project_once_per_shape(size in 1usize..12, start in 0usize..12) {
        let registry = ring(size);
        let root = format!("S{}", start % size);

        let document = Projector::new(&registry).project_shape(&root).unwrap();
        let definitions = document["definitions"].as_object().unwrap();

        let expected: BTreeSet<String> = (0..size).map(|i| format!("S{}", i)).collect();
        let actual: BTreeSet<String> = definitions.keys().cloned().collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_projection_is_deterministic(size in 1usize..8) {
        let registry = ring(size);
        let projector = Projector::new(&registry);

        let first = projector.project_shape("S0").unwrap();
        let second = projector.project_shape("S0").unwrap();
        prop_assert_eq!(&first["definitions"], &second["definitions"]);
        prop_assert_eq!(&first["properties"], &second["properties"]);
    }
}
