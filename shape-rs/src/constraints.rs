//! Constraint evaluation.
//!
//! Rules that do not apply to a value's runtime type pass. The type check
//! of the owning node is what rejects a wrong type, so a `min_length` on an
//! integer or a `gt` on a string is simply inert.

use std::cmp::Ordering;

use crate::ir::{Constraint, Rule};
use crate::value::Value;

/// Evaluate a single rule against a value.
pub fn check_constraint(rule: &Rule, value: &Value) -> bool {
    match (rule, value) {
        (Rule::MinLength(n), Value::String(s)) => s.chars().count() >= *n,
        (Rule::MaxLength(n), Value::String(s)) => s.chars().count() <= *n,
        (Rule::MinItems(n), Value::List(items)) => items.len() >= *n,
        (Rule::MaxItems(n), Value::List(items)) => items.len() <= *n,
        (Rule::Size(n), Value::Map(entries)) => entries.len() == *n,
        (Rule::Gt(bound), _) => bound.compare(value).map_or(true, Ordering::is_gt),
        (Rule::Lt(bound), _) => bound.compare(value).map_or(true, Ordering::is_lt),
        (Rule::Gteq(bound), _) => bound.compare(value).map_or(true, Ordering::is_ge),
        (Rule::Lteq(bound), _) => bound.compare(value).map_or(true, Ordering::is_le),
        (Rule::Format(pattern), Value::String(s)) => pattern.is_match(s),
        (Rule::Choices(options), _) => options.contains(value),
        _ => true,
    }
}

/// Message used when a rule fails and no custom message is attached.
pub fn default_message(rule: &Rule) -> String {
    match rule {
        Rule::MinLength(n) => format!("should have at least {} characters", n),
        Rule::MaxLength(n) => format!("should have at most {} characters", n),
        Rule::MinItems(n) => format!("should have at least {} items", n),
        Rule::MaxItems(n) => format!("should have at most {} items", n),
        Rule::Size(n) => format!("should have exactly {} entries", n),
        Rule::Gt(bound) => format!("should be greater than {}", bound),
        Rule::Lt(bound) => format!("should be less than {}", bound),
        Rule::Gteq(bound) => format!("should be greater than or equal to {}", bound),
        Rule::Lteq(bound) => format!("should be less than or equal to {}", bound),
        Rule::Format(pattern) => format!("should match the pattern {}", pattern.as_str()),
        Rule::Choices(options) => {
            let options: Vec<String> = options.iter().map(ToString::to_string).collect();
            format!("should be one of: {}", options.join(", "))
        }
        Rule::Unknown { kind, .. } => format!("failed the '{}' check", kind),
    }
}

/// The message to report for a failed constraint.
pub fn message_for(constraint: &Constraint) -> String {
    constraint
        .message
        .clone()
        .unwrap_or_else(|| default_message(&constraint.rule))
}

/// The first constraint, in list order, that `value` violates.
pub fn first_violation<'c>(constraints: &'c [Constraint], value: &Value) -> Option<&'c Constraint> {
    constraints
        .iter()
        .find(|constraint| !check_constraint(&constraint.rule, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Bound;

    #[test]
    fn test_length_counts_characters() {
        assert!(check_constraint(&Rule::MinLength(3), &Value::from("héé")));
        assert!(!check_constraint(&Rule::MaxLength(2), &Value::from("héé")));
    }

    #[test]
    fn test_numeric_bounds_accept_int_and_float() {
        assert!(check_constraint(&Rule::Gt(Bound::Float(0.0)), &Value::Int(1)));
        assert!(!check_constraint(&Rule::Gt(Bound::Int(0)), &Value::Int(0)));
        assert!(check_constraint(&Rule::Gteq(Bound::Int(0)), &Value::Float(0.0)));
        assert!(!check_constraint(&Rule::Lt(Bound::Float(1.5)), &Value::Float(1.5)));
        assert!(check_constraint(&Rule::Lteq(Bound::Float(1.5)), &Value::Int(1)));
        assert!(!check_constraint(&Rule::Gt(Bound::Float(1.5)), &Value::Int(1)));
        assert!(check_constraint(&Rule::Gt(Bound::Int(1)), &Value::Float(1.5)));
    }

    #[test]
    fn test_large_integers_compare_exactly() {
        let above = Value::Int(9_007_199_254_740_993);
        assert!(check_constraint(&Rule::Gt(Bound::Float(9_007_199_254_740_992.0)), &above));
        assert!(check_constraint(&Rule::Gt(Bound::Int(9_007_199_254_740_992)), &above));
        assert!(!check_constraint(&Rule::Lteq(Bound::Int(9_007_199_254_740_992)), &above));
        assert!(check_constraint(&Rule::Lt(Bound::Int(i64::MAX)), &Value::Int(i64::MAX - 1)));
        assert!(!check_constraint(&Rule::Lt(Bound::Int(i64::MAX)), &Value::Int(i64::MAX)));
        assert!(check_constraint(&Rule::Lt(Bound::Float(1e19)), &Value::Int(i64::MAX)));
        assert!(check_constraint(&Rule::Gt(Bound::Float(-1e19)), &Value::Int(i64::MIN)));
    }

    #[test]
    fn test_nan_bound_passes() {
        assert!(check_constraint(&Rule::Gt(Bound::Float(f64::NAN)), &Value::Int(1)));
    }

    #[test]
    fn test_inapplicable_rules_pass() {
        assert!(check_constraint(&Rule::MinLength(10), &Value::Int(1)));
        assert!(check_constraint(&Rule::Gt(Bound::Int(100)), &Value::from("a")));
        assert!(check_constraint(&Rule::Size(1), &Value::List(vec![])));
        assert!(check_constraint(
            &Rule::Unknown {
                kind: "multiple_of".into(),
                value: serde_json::json!(3),
            },
            &Value::Int(4)
        ));
    }

    #[test]
    fn test_choices_and_size() {
        let rule = Rule::Choices(vec![Value::from("a"), Value::from("b")]);
        assert!(check_constraint(&rule, &Value::from("a")));
        assert!(!check_constraint(&rule, &Value::from("c")));

        let map = Value::map([("k", 1)]);
        assert!(check_constraint(&Rule::Size(1), &map));
        assert!(!check_constraint(&Rule::Size(2), &map));
    }

    #[test]
    fn test_first_violation_respects_order() {
        let constraints = vec![Constraint::min_length(5), Constraint::max_length(1)];
        let failed = first_violation(&constraints, &Value::from("abc")).unwrap();
        assert_eq!(failed.kind(), "min_length");
        assert!(first_violation(&constraints[1..], &Value::from("a")).is_none());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            default_message(&Rule::MinLength(3)),
            "should have at least 3 characters"
        );
        assert_eq!(default_message(&Rule::Gt(Bound::Float(0.0))), "should be greater than 0");
        assert_eq!(
            message_for(&Constraint::min_items(1).with_message("need one")),
            "need one"
        );
    }
}
