//! Read-time scan for catalog references that no longer resolve.
//!
//! Catalogs can change between sessions, so a dangling reference is a warning
//! for the rendering layer to flag, never an editing error.

use serde::Serialize;

use crate::core::action::{Action, ActionListKey};
use crate::core::catalog::Catalog;
use crate::core::document::DecisionSet;
use crate::core::path::condition_path;
use crate::core::types::ValueKind;
use crate::core::value::{Resolution, ValueRef};

/// A catalog-backed reference whose id is absent from the live catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingReference {
    /// Where the reference sits, e.g. `rule-1/cond-2/cond-3.left`.
    pub location: String,
    pub kind: ValueKind,
    pub id: String,
}

/// List dangling references in document order.
///
/// Function-call arguments are scanned recursively.
pub fn dangling_references(doc: &DecisionSet, catalog: &Catalog) -> Vec<DanglingReference> {
    let mut found = Vec::new();

    let target = &doc.loop_target;
    if let (Some(kind), Some(id)) = (target.value_type, &target.value_id) {
        let probe = ValueRef {
            kind,
            id: Some(id.clone()),
            value: target.value.clone(),
        };
        scan(&probe, "loopTarget", catalog, &mut found);
    }

    scan_list(&ActionListKey::StartActions, &doc.start_actions, catalog, &mut found);
    for unit in &doc.condition_rules {
        let root = &unit.root_condition;
        root.for_each_operand(&mut |node_id, side, value| {
            let path = condition_path(root, node_id).unwrap_or_else(|| node_id.to_string());
            scan(value, &format!("{}/{}.{}", unit.id, path, side), catalog, &mut found);
        });
        let rule_id = unit.id.clone();
        let key = ActionListKey::TrueActions { rule_id };
        scan_list(&key, &unit.true_actions, catalog, &mut found);
        let rule_id = unit.id.clone();
        let key = ActionListKey::FalseActions { rule_id };
        scan_list(&key, &unit.false_actions, catalog, &mut found);
    }
    scan_list(&ActionListKey::EndActions, &doc.end_actions, catalog, &mut found);

    found
}

fn scan_list(
    key: &ActionListKey,
    list: &[Action],
    catalog: &Catalog,
    found: &mut Vec<DanglingReference>,
) {
    for action in list {
        for value in action.value_refs() {
            scan(value, &format!("{}/{}", key, action.id), catalog, found);
        }
    }
}

fn scan(value: &ValueRef, location: &str, catalog: &Catalog, found: &mut Vec<DanglingReference>) {
    if let Resolution::Dangling { kind, id } = value.resolve(catalog) {
        found.push(DanglingReference {
            location: location.to_string(),
            kind,
            id,
        });
    }
    for (index, arg) in value.func_args().iter().enumerate() {
        scan(arg, &format!("{}[{}]", location, index), catalog, found);
    }
}
