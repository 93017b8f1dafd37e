//! Semantic invariants not expressible via JSON Schema.

use std::collections::HashSet;

use crate::core::condition::Condition;
use crate::core::document::DecisionSet;
use crate::core::path::condition_path;
use crate::core::value::ValueRef;

/// Check semantic invariants not expressible in JSON Schema:
/// - No empty or duplicate ids (units, condition nodes, actions)
/// - Loop rules keep at least one rule unit
/// - No empty condition groups
/// - Value references carry an `id` iff they are catalog-backed
pub fn validate_invariants(doc: &DecisionSet) -> Vec<String> {
    let mut errors = Vec::new();

    let mut seen = HashSet::new();
    for id in doc.ids() {
        if id.is_empty() {
            errors.push("empty id".to_string());
        } else if !seen.insert(id) {
            errors.push(format!("duplicate id '{}'", id));
        }
    }

    if doc.is_loop() && doc.condition_rules.is_empty() {
        errors.push("loop rule has no rule units".to_string());
    }

    for unit in &doc.condition_rules {
        let root = &unit.root_condition;
        validate_condition(root, root, &unit.id, &mut errors);
    }

    for (key, list) in doc.action_lists() {
        for action in list {
            for value in action.value_refs() {
                check_value_ref(value, &format!("{}/{}", key, action.id), &mut errors);
            }
        }
    }

    errors
}

fn validate_condition(
    root: &Condition,
    node: &Condition,
    rule_id: &str,
    errors: &mut Vec<String>,
) {
    let path = || {
        let inner = condition_path(root, node.id()).unwrap_or_else(|| node.id().to_string());
        format!("{}/{}", rule_id, inner)
    };
    match node {
        Condition::Group(group) => {
            if group.children.is_empty() {
                errors.push(format!("{}: empty group", path()));
            }
            for child in &group.children {
                validate_condition(root, child, rule_id, errors);
            }
        }
        Condition::Comparison(leaf) => {
            check_value_ref(&leaf.left, &format!("{}.left", path()), errors);
            check_value_ref(&leaf.right, &format!("{}.right", path()), errors);
        }
    }
}

fn check_value_ref(value: &ValueRef, location: &str, errors: &mut Vec<String>) {
    if !value.is_well_formed() {
        errors.push(format!(
            "{}: {} reference must {}carry an id",
            location,
            value.kind,
            if value.kind.is_catalog_backed() { "" } else { "not " }
        ));
    }
}
