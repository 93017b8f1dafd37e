//! Test-only helpers for constructing decision set documents.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;

use crate::core::action::Action;
use crate::core::catalog::{Catalog, CatalogEntry, FuncParam};
use crate::core::condition::{Condition, ConditionGroup};
use crate::core::document::{Attrs, ConditionRuleUnit, DecisionSet};
use crate::core::types::{Combinator, RuleType};
use crate::core::value::ValueRef;
use crate::session::DocumentObserver;

/// Placeholder comparison (`INPUT null EQ INPUT null`) with the given id.
pub fn leaf(id: &str) -> Condition {
    Condition::placeholder(id)
}

pub fn group(id: &str, combinator: Combinator, children: Vec<Condition>) -> Condition {
    Condition::Group(ConditionGroup {
        id: id.to_string(),
        combinator,
        children,
    })
}

/// `var.total := 1`.
pub fn assign(id: &str) -> Action {
    Action::assign(id, ValueRef::variable("var.total"), ValueRef::input(1))
}

/// Unit with a placeholder root `<id>.root` and no actions.
pub fn unit(id: &str) -> ConditionRuleUnit {
    ConditionRuleUnit {
        id: id.to_string(),
        name: String::new(),
        root_condition: leaf(&format!("{}.root", id)),
        true_actions: Vec::new(),
        false_actions: Vec::new(),
    }
}

/// Loop rule document with one placeholder unit per id.
pub fn loop_document(unit_ids: &[&str]) -> DecisionSet {
    DecisionSet {
        attrs: Attrs {
            name: String::new(),
            rule_type: Some(RuleType::Loop),
            extra: Default::default(),
        },
        condition_rules: unit_ids.iter().map(|id| unit(id)).collect(),
        ..DecisionSet::default()
    }
}

fn entry(id: &str, label: &str) -> CatalogEntry {
    CatalogEntry {
        id: id.to_string(),
        label: label.to_string(),
        params: Vec::new(),
        extra: Default::default(),
    }
}

/// Small deterministic catalog covering every kind.
pub fn sample_catalog() -> Catalog {
    let mut limit = entry("const.limit", "Limit");
    limit.extra.insert("value".to_string(), json!(1000));
    let mut round = entry("fn.round", "Round");
    round.params = vec![
        FuncParam {
            name: "x".to_string(),
            value_type: Some("number".to_string()),
            default: serde_json::Value::Null,
        },
        FuncParam {
            name: "digits".to_string(),
            value_type: Some("number".to_string()),
            default: json!(2),
        },
    ];
    Catalog {
        constants: vec![limit],
        variables: vec![
            entry("var.amount", "Amount"),
            entry("var.items", "Items"),
            entry("var.total", "Total"),
        ],
        funcs: vec![round],
    }
}

/// Observer that records every notification it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    pub changes: Rc<RefCell<Vec<DecisionSet>>>,
    pub submits: Rc<RefCell<Vec<DecisionSet>>>,
}

impl RecordingObserver {
    pub fn change_count(&self) -> usize {
        self.changes.borrow().len()
    }

    pub fn submit_count(&self) -> usize {
        self.submits.borrow().len()
    }
}

impl DocumentObserver for RecordingObserver {
    fn on_change(&mut self, document: &DecisionSet) {
        self.changes.borrow_mut().push(document.clone());
    }

    fn on_submit(&mut self, document: &DecisionSet) {
        self.submits.borrow_mut().push(document.clone());
    }
}
