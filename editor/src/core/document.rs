//! The decision set document: aggregate root of the editing model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::action::{Action, ActionListKey};
use crate::core::condition::Condition;
use crate::core::error::EditError;
use crate::core::ids::{CONDITION_PREFIX, IdAllocator, UNIT_PREFIX};
use crate::core::types::{RuleType, ValueKind};

/// Document attributes shown in the properties panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attrs {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_type: Option<RuleType>,
    /// Attributes owned by the host, carried through unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Collection iterated by a loop rule.
///
/// Always replaced as a whole; the empty target serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopTarget {
    /// Owning container; reserved for nested loops.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<ValueKind>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub value: Value,
}

/// One if/then/else block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionRuleUnit {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub root_condition: Condition,
    #[serde(default)]
    pub true_actions: Vec<Action>,
    #[serde(default)]
    pub false_actions: Vec<Action>,
}

impl ConditionRuleUnit {
    /// Unnamed unit with a placeholder condition and no actions.
    pub fn empty(ids: &mut IdAllocator) -> Self {
        Self {
            id: ids.fresh(UNIT_PREFIX),
            name: String::new(),
            root_condition: Condition::placeholder(ids.fresh(CONDITION_PREFIX)),
            true_actions: Vec::new(),
            false_actions: Vec::new(),
        }
    }
}

/// Aggregate root. Each edit produces a new value; nothing mutates a
/// document that has been handed out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionSet {
    #[serde(default)]
    pub attrs: Attrs,
    #[serde(default)]
    pub loop_target: LoopTarget,
    #[serde(default)]
    pub condition_rules: Vec<ConditionRuleUnit>,
    #[serde(default)]
    pub start_actions: Vec<Action>,
    #[serde(default)]
    pub end_actions: Vec<Action>,
}

impl DecisionSet {
    pub fn is_loop(&self) -> bool {
        self.attrs.rule_type.as_ref().is_some_and(RuleType::is_loop)
    }

    pub fn unit_mut(&mut self, id: &str) -> Result<&mut ConditionRuleUnit, EditError> {
        self.condition_rules
            .iter_mut()
            .find(|unit| unit.id == id)
            .ok_or_else(|| EditError::UnknownUnit { id: id.to_string() })
    }

    pub fn action_list_mut(&mut self, key: &ActionListKey) -> Result<&mut Vec<Action>, EditError> {
        match key {
            ActionListKey::StartActions => Ok(&mut self.start_actions),
            ActionListKey::EndActions => Ok(&mut self.end_actions),
            ActionListKey::TrueActions { rule_id } => Ok(&mut self.unit_mut(rule_id)?.true_actions),
            ActionListKey::FalseActions { rule_id } => {
                Ok(&mut self.unit_mut(rule_id)?.false_actions)
            }
        }
    }

    /// Every action list with its key, in document order.
    pub fn action_lists(&self) -> Vec<(ActionListKey, &[Action])> {
        let mut lists = vec![(ActionListKey::StartActions, self.start_actions.as_slice())];
        for unit in &self.condition_rules {
            lists.push((
                ActionListKey::TrueActions {
                    rule_id: unit.id.clone(),
                },
                unit.true_actions.as_slice(),
            ));
            lists.push((
                ActionListKey::FalseActions {
                    rule_id: unit.id.clone(),
                },
                unit.false_actions.as_slice(),
            ));
        }
        lists.push((ActionListKey::EndActions, self.end_actions.as_slice()));
        lists
    }

    /// Find an action by id in any list.
    pub fn action_mut(&mut self, id: &str) -> Result<&mut Action, EditError> {
        let units = self
            .condition_rules
            .iter_mut()
            .flat_map(|unit| unit.true_actions.iter_mut().chain(unit.false_actions.iter_mut()));
        self.start_actions
            .iter_mut()
            .chain(units)
            .chain(self.end_actions.iter_mut())
            .find(|action| action.id == id)
            .ok_or_else(|| EditError::UnknownAction { id: id.to_string() })
    }

    /// All ids in document order: units, their condition nodes and actions.
    pub fn ids(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for action in &self.start_actions {
            out.push(&action.id);
        }
        for unit in &self.condition_rules {
            out.push(&unit.id);
            out.extend(unit.root_condition.ids());
            for action in unit.true_actions.iter().chain(&unit.false_actions) {
                out.push(&action.id);
            }
        }
        for action in &self.end_actions {
            out.push(&action.id);
        }
        out
    }

    pub fn id_allocator(&self) -> IdAllocator {
        IdAllocator::new(self.ids().into_iter().map(str::to_string).collect())
    }
}
