//! Normalization of untrusted raw values into a valid [`DecisionSet`].
//!
//! Normalization never fails. Missing sections get defaults, malformed pieces
//! are dropped or replaced, and every repair is described in
//! [`Normalized::repairs`] so the caller can surface it. Normalizing an
//! already normalized document returns an equal document.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::core::action::Action;
use crate::core::condition::{Comparison, Condition, ConditionGroup};
use crate::core::document::{Attrs, ConditionRuleUnit, DecisionSet, LoopTarget};
use crate::core::ids::{ACTION_PREFIX, CONDITION_PREFIX, IdAllocator, UNIT_PREFIX};
use crate::core::types::{ActionOperator, Combinator, ComparisonOperator, RuleType, ValueKind};
use crate::core::value::ValueRef;

/// Result of [`normalize`].
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub document: DecisionSet,
    /// Human-readable descriptions of every repair, in document order.
    pub repairs: Vec<String>,
}

pub fn normalize(raw: &Value) -> Normalized {
    let mut repairs = Vec::new();
    let empty = Map::new();
    let object = match raw {
        Value::Object(object) => object,
        Value::Null => &empty,
        _ => {
            repairs.push("document is not an object; starting empty".to_string());
            &empty
        }
    };

    let mut document = DecisionSet {
        attrs: object
            .get("attrs")
            .map(|value| attrs(value, &mut repairs))
            .unwrap_or_default(),
        loop_target: object
            .get("loopTarget")
            .map(|value| lenient::<LoopTarget>(value, "loopTarget", &mut repairs))
            .unwrap_or_default(),
        condition_rules: array(object.get("conditionRules"), "conditionRules", &mut repairs)
            .iter()
            .enumerate()
            .filter_map(|(index, value)| unit(value, index, &mut repairs))
            .collect(),
        start_actions: actions(object.get("startActions"), "startActions", &mut repairs),
        end_actions: actions(object.get("endActions"), "endActions", &mut repairs),
    };

    let mut ids = assign_ids(&mut document, &mut repairs);
    if document.condition_rules.is_empty() {
        document
            .condition_rules
            .push(ConditionRuleUnit::empty(&mut ids));
    }

    Normalized { document, repairs }
}

fn lenient<T: DeserializeOwned + Default>(
    value: &Value,
    what: &str,
    repairs: &mut Vec<String>,
) -> T {
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => parsed,
        Err(err) => {
            repairs.push(format!("{what}: {err}; using default"));
            T::default()
        }
    }
}

fn array<'a>(value: Option<&'a Value>, what: &str, repairs: &mut Vec<String>) -> &'a [Value] {
    match value {
        None | Some(Value::Null) => &[],
        Some(Value::Array(items)) => items,
        Some(_) => {
            repairs.push(format!("{what} is not an array; using []"));
            &[]
        }
    }
}

fn string_field(
    object: &Map<String, Value>,
    key: &str,
    what: &str,
    repairs: &mut Vec<String>,
) -> String {
    match object.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(_) => {
            repairs.push(format!("{what}.{key} is not a string; using \"\""));
            String::new()
        }
    }
}

fn attrs(value: &Value, repairs: &mut Vec<String>) -> Attrs {
    let Value::Object(object) = value else {
        repairs.push("attrs is not an object; using {}".to_string());
        return Attrs::default();
    };
    let rule_type = match object.get("ruleType") {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(RuleType::from(text.clone())),
        Some(_) => {
            repairs.push("attrs.ruleType is not a string; dropped".to_string());
            None
        }
    };
    let extra = object
        .iter()
        .filter(|(key, _)| !matches!(key.as_str(), "name" | "ruleType"))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    Attrs {
        name: match object.get("name") {
            Some(Value::String(name)) => name.clone(),
            None | Some(Value::Null) => String::new(),
            Some(_) => {
                repairs.push("attrs.name is not a string; using \"\"".to_string());
                String::new()
            }
        },
        rule_type,
        extra,
    }
}

fn unit(value: &Value, index: usize, repairs: &mut Vec<String>) -> Option<ConditionRuleUnit> {
    let Value::Object(object) = value else {
        repairs.push(format!("conditionRules[{index}] is not an object; dropped"));
        return None;
    };
    let what = format!("conditionRules[{index}]");
    let root_condition = match object.get("rootCondition") {
        Some(raw) => condition(raw, &format!("{what}.rootCondition"), repairs),
        None => None,
    }
    .unwrap_or_else(|| Condition::placeholder(String::new()));

    Some(ConditionRuleUnit {
        id: string_field(object, "id", &what, repairs),
        name: string_field(object, "name", &what, repairs),
        root_condition,
        true_actions: actions(
            object.get("trueActions"),
            &format!("{what}.trueActions"),
            repairs,
        ),
        false_actions: actions(
            object.get("falseActions"),
            &format!("{what}.falseActions"),
            repairs,
        ),
    })
}

/// Parse a condition node; empty or malformed nodes yield `None`.
fn condition(value: &Value, what: &str, repairs: &mut Vec<String>) -> Option<Condition> {
    let Value::Object(object) = value else {
        repairs.push(format!("{what} is not an object; dropped"));
        return None;
    };
    let id = string_field(object, "id", what, repairs);
    let is_group = object.get("type").and_then(Value::as_str) == Some("group")
        || object.contains_key("children");

    if is_group {
        let raw_children = array(object.get("children"), &format!("{what}.children"), repairs);
        let children: Vec<Condition> = raw_children
            .iter()
            .enumerate()
            .filter_map(|(index, child)| {
                condition(child, &format!("{what}.children[{index}]"), repairs)
            })
            .collect();
        if children.is_empty() {
            repairs.push(format!("{what} is an empty group; dropped"));
            return None;
        }
        let combinator = match object.get("combinator") {
            None | Some(Value::Null) => Combinator::default(),
            Some(raw) => lenient::<Combinator>(raw, &format!("{what}.combinator"), repairs),
        };
        return Some(Condition::Group(ConditionGroup {
            id,
            combinator,
            children,
        }));
    }

    let operator = match object.get("operator") {
        None | Some(Value::Null) => ComparisonOperator::default(),
        Some(raw) => lenient::<ComparisonOperator>(raw, &format!("{what}.operator"), repairs),
    };
    Some(Condition::Comparison(Comparison {
        id,
        left: value_ref(object.get("left"), &format!("{what}.left"), repairs),
        operator,
        right: value_ref(object.get("right"), &format!("{what}.right"), repairs),
    }))
}

/// Parse a value reference, restoring the `id` iff catalog-backed rule.
fn value_ref(value: Option<&Value>, what: &str, repairs: &mut Vec<String>) -> ValueRef {
    let raw = match value {
        None | Some(Value::Null) => return ValueRef::default(),
        Some(raw @ Value::Object(_)) => raw,
        Some(literal) => {
            repairs.push(format!("{what} is a bare literal; stored as INPUT"));
            return ValueRef::input(literal.clone());
        }
    };
    let mut parsed = lenient::<ValueRef>(raw, what, repairs);
    let has_id = parsed.id.is_some();
    match (parsed.kind, has_id) {
        (ValueKind::Input, true) => {
            repairs.push(format!("{what}: INPUT carries an id; dropped"));
            parsed.id = None;
        }
        (kind, false) if kind.is_catalog_backed() => {
            repairs.push(format!("{what}: {kind} without id; stored as INPUT"));
            parsed.kind = ValueKind::Input;
        }
        _ => {}
    }
    parsed
}

fn actions(value: Option<&Value>, what: &str, repairs: &mut Vec<String>) -> Vec<Action> {
    array(value, what, repairs)
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| action(raw, &format!("{what}[{index}]"), repairs))
        .collect()
}

fn action(value: &Value, what: &str, repairs: &mut Vec<String>) -> Option<Action> {
    let Value::Object(object) = value else {
        repairs.push(format!("{what} is not an object; dropped"));
        return None;
    };
    let target = match object.get("target") {
        None | Some(Value::Null) => None,
        raw => Some(value_ref(raw, &format!("{what}.target"), repairs)),
    };
    let operator = match object.get("operator") {
        None | Some(Value::Null) => ActionOperator::default(),
        Some(raw) => lenient::<ActionOperator>(raw, &format!("{what}.operator"), repairs),
    };
    let args = array(object.get("args"), &format!("{what}.args"), repairs)
        .iter()
        .enumerate()
        .map(|(index, raw)| value_ref(Some(raw), &format!("{what}.args[{index}]"), repairs))
        .collect();
    Some(Action {
        id: string_field(object, "id", what, repairs),
        target,
        operator,
        args,
    })
}

/// Keeps the first occurrence of each id and re-keys blanks and duplicates
/// above every id already proposed by the input.
struct Rekey<'a> {
    seen: HashSet<String>,
    ids: IdAllocator,
    repairs: &'a mut Vec<String>,
}

impl Rekey<'_> {
    fn keep_or_fresh(&mut self, id: &str, prefix: &str) -> String {
        if !id.is_empty() && self.seen.insert(id.to_string()) {
            return id.to_string();
        }
        let fresh = self.ids.fresh(prefix);
        self.seen.insert(fresh.clone());
        if !id.is_empty() {
            self.repairs
                .push(format!("duplicate id '{id}' replaced by '{fresh}'"));
        }
        fresh
    }

    fn condition(&mut self, node: &mut Condition) {
        let id = self.keep_or_fresh(node.id(), CONDITION_PREFIX);
        node.set_id(id);
        if let Condition::Group(group) = node {
            for child in &mut group.children {
                self.condition(child);
            }
        }
    }

    fn actions(&mut self, list: &mut [Action]) {
        for action in list {
            action.id = self.keep_or_fresh(&action.id, ACTION_PREFIX);
        }
    }
}

fn assign_ids(document: &mut DecisionSet, repairs: &mut Vec<String>) -> IdAllocator {
    let proposed = document
        .ids()
        .into_iter()
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();
    let mut rekey = Rekey {
        seen: HashSet::new(),
        ids: IdAllocator::new(proposed),
        repairs,
    };
    rekey.actions(&mut document.start_actions);
    for unit in &mut document.condition_rules {
        unit.id = rekey.keep_or_fresh(&unit.id, UNIT_PREFIX);
        rekey.condition(&mut unit.root_condition);
        rekey.actions(&mut unit.true_actions);
        rekey.actions(&mut unit.false_actions);
    }
    rekey.actions(&mut document.end_actions);
    rekey.ids
}
