//! The pure document reducer.
//!
//! `reduce` never mutates its input and never panics on bad input. A command
//! that cannot be applied yields the previous document, `Outcome::Unchanged`
//! and the rejection reason.

use crate::core::action::{self, Action};
use crate::core::command::Command;
use crate::core::condition::{self, Condition};
use crate::core::document::{ConditionRuleUnit, DecisionSet, LoopTarget};
use crate::core::error::EditError;
use crate::core::ids::{ACTION_PREFIX, CONDITION_PREFIX};
use crate::core::types::Outcome;
use crate::core::value::ValueRef;

/// Result of applying one command.
#[derive(Debug, Clone, PartialEq)]
pub struct Reduction {
    pub document: DecisionSet,
    pub outcome: Outcome,
    pub rejection: Option<EditError>,
}

impl Reduction {
    pub fn is_changed(&self) -> bool {
        self.outcome == Outcome::Changed
    }
}

pub fn reduce(doc: &DecisionSet, command: &Command) -> Reduction {
    let mut next = doc.clone();
    match apply(&mut next, command) {
        Ok(()) => {
            // Accepted edits that restate the current value are not new versions.
            let outcome = if next == *doc {
                Outcome::Unchanged
            } else {
                Outcome::Changed
            };
            Reduction {
                document: next,
                outcome,
                rejection: None,
            }
        }
        Err(err) => Reduction {
            document: doc.clone(),
            outcome: Outcome::Unchanged,
            rejection: Some(err),
        },
    }
}

fn apply(doc: &mut DecisionSet, command: &Command) -> Result<(), EditError> {
    match command {
        Command::SetLoopTarget {
            parent_id,
            value_id,
            value,
            value_type,
        } => {
            doc.loop_target = LoopTarget {
                parent_id: parent_id.clone(),
                value_id: value_id.clone(),
                value_type: *value_type,
                value: value.clone(),
            };
        }
        Command::AddUnitRule => {
            let mut ids = doc.id_allocator();
            doc.condition_rules.push(ConditionRuleUnit::empty(&mut ids));
        }
        Command::DeleteUnitRule { id } => {
            let position = doc
                .condition_rules
                .iter()
                .position(|unit| unit.id == *id)
                .ok_or_else(|| EditError::UnknownUnit { id: id.clone() })?;
            if doc.is_loop() && doc.condition_rules.len() == 1 {
                return Err(EditError::UnitFloor { id: id.clone() });
            }
            doc.condition_rules.remove(position);
        }
        Command::SetUnitRuleName { id, name } => {
            doc.unit_mut(id)?.name = name.clone();
        }
        Command::SetName { name } => {
            doc.attrs.name = name.clone();
        }
        Command::SetRuleType { rule_type } => {
            doc.attrs.rule_type = rule_type.clone();
            if doc.is_loop() && doc.condition_rules.is_empty() {
                let mut ids = doc.id_allocator();
                doc.condition_rules.push(ConditionRuleUnit::empty(&mut ids));
            }
        }

        Command::SetOperator {
            rule_id,
            node_id,
            operator,
        } => {
            let root = &mut doc.unit_mut(rule_id)?.root_condition;
            condition::set_operator(root, rule_id, node_id, *operator)?;
        }
        Command::ReplaceOperand {
            rule_id,
            node_id,
            side,
            value,
        } => {
            check_value(value)?;
            let root = &mut doc.unit_mut(rule_id)?.root_condition;
            condition::replace_operand(root, rule_id, node_id, *side, value.clone())?;
        }
        Command::AddChild {
            rule_id,
            group_id,
            child,
        } => {
            let mut child = prepare_child(child)?;
            let mut ids = doc.id_allocator();
            child.claim_ids(&mut ids);
            let root = &mut doc.unit_mut(rule_id)?.root_condition;
            condition::add_child(root, rule_id, group_id, child)?;
        }
        Command::RemoveChild {
            rule_id,
            group_id,
            child_id,
        } => {
            let mut ids = doc.id_allocator();
            let root = &mut doc.unit_mut(rule_id)?.root_condition;
            condition::remove_child(root, rule_id, group_id, child_id, &mut ids)?;
        }
        Command::SetCombinator {
            rule_id,
            group_id,
            combinator,
        } => {
            let root = &mut doc.unit_mut(rule_id)?.root_condition;
            condition::set_combinator(root, rule_id, group_id, *combinator)?;
        }
        Command::WrapInGroup {
            rule_id,
            node_id,
            combinator,
        } => {
            let group_id = doc.id_allocator().fresh(CONDITION_PREFIX);
            let root = &mut doc.unit_mut(rule_id)?.root_condition;
            condition::wrap_in_group(root, rule_id, node_id, *combinator, group_id)?;
        }
        Command::UnwrapGroup { rule_id, group_id } => {
            let root = &mut doc.unit_mut(rule_id)?.root_condition;
            condition::unwrap_group(root, rule_id, group_id)?;
        }

        Command::AppendAction { list, action } => {
            let mut action: Action = action.clone();
            for value in action.value_refs() {
                check_value(value)?;
            }
            action.id = doc.id_allocator().claim_or_fresh(&action.id, ACTION_PREFIX);
            doc.action_list_mut(list)?.push(action);
        }
        Command::RemoveAction { list, action_id } => {
            action::remove_action(doc.action_list_mut(list)?, action_id)?;
        }
        Command::MoveAction {
            list,
            action_id,
            index,
        } => {
            action::move_action(doc.action_list_mut(list)?, action_id, *index)?;
        }
        Command::SetActionOperator {
            action_id,
            operator,
        } => {
            doc.action_mut(action_id)?.operator = *operator;
        }
        Command::SetActionArg {
            action_id,
            index,
            value,
        } => {
            check_value(value)?;
            doc.action_mut(action_id)?.set_arg(*index, value.clone())?;
        }
        Command::SetActionTarget { action_id, target } => {
            if let Some(value) = target {
                check_value(value)?;
            }
            doc.action_mut(action_id)?.target = target.clone();
        }
    }
    Ok(())
}

fn check_value(value: &ValueRef) -> Result<(), EditError> {
    if value.is_well_formed() {
        Ok(())
    } else {
        Err(EditError::IllFormedValue { kind: value.kind })
    }
}

/// Nested empty groups are dropped; an empty top-level group is rejected.
fn prepare_child(child: &Condition) -> Result<Condition, EditError> {
    let mut child = child.clone();
    condition::prune_empty_groups(&mut child);
    if child.is_empty_group() {
        return Err(EditError::EmptyGroup {
            node_id: child.id().to_string(),
        });
    }
    let mut bad = None;
    child.for_each_operand(&mut |_, _, value| {
        if bad.is_none() && !value.is_well_formed() {
            bad = Some(value.kind);
        }
    });
    match bad {
        Some(kind) => Err(EditError::IllFormedValue { kind }),
        None => Ok(child),
    }
}
