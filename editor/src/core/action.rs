//! Action lists: ordered assign/invoke operations.
//!
//! The four list roles share one element shape and one operation set and are
//! told apart by [`ActionListKey`]. List order is execution order and is
//! never changed implicitly.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::EditError;
use crate::core::types::ActionOperator;
use crate::core::value::ValueRef;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Blank in templates; the reducer assigns a fresh id on insert.
    #[serde(default)]
    pub id: String,
    /// Assignment target; `None` for a bare function invocation.
    #[serde(default)]
    pub target: Option<ValueRef>,
    #[serde(default)]
    pub operator: ActionOperator,
    #[serde(default)]
    pub args: Vec<ValueRef>,
}

impl Action {
    pub fn assign(id: impl Into<String>, target: ValueRef, value: ValueRef) -> Self {
        Self {
            id: id.into(),
            target: Some(target),
            operator: ActionOperator::Assign,
            args: vec![value],
        }
    }

    pub fn invoke(id: impl Into<String>, call: ValueRef) -> Self {
        Self {
            id: id.into(),
            target: None,
            operator: ActionOperator::Invoke,
            args: vec![call],
        }
    }

    /// Every value reference of the action: target first, then arguments.
    pub fn value_refs(&self) -> impl Iterator<Item = &ValueRef> {
        self.target.iter().chain(self.args.iter())
    }

    /// Replace argument `index`; `index == args.len()` appends.
    pub fn set_arg(&mut self, index: usize, value: ValueRef) -> Result<(), EditError> {
        let len = self.args.len();
        if index < len {
            self.args[index] = value;
        } else if index == len {
            self.args.push(value);
        } else {
            return Err(EditError::ArgIndexOutOfRange {
                id: self.id.clone(),
                index,
                len,
            });
        }
        Ok(())
    }
}

/// Addresses one of the action lists of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "position",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ActionListKey {
    /// Loop rules: run once before iterating.
    StartActions,
    /// Loop rules: run once after iterating.
    EndActions,
    /// Run when the unit's condition holds.
    TrueActions { rule_id: String },
    /// Run when the unit's condition does not hold.
    FalseActions { rule_id: String },
}

impl fmt::Display for ActionListKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionListKey::StartActions => f.write_str("startActions"),
            ActionListKey::EndActions => f.write_str("endActions"),
            ActionListKey::TrueActions { rule_id } => write!(f, "{rule_id}/trueActions"),
            ActionListKey::FalseActions { rule_id } => write!(f, "{rule_id}/falseActions"),
        }
    }
}

fn position_of(list: &[Action], id: &str) -> Result<usize, EditError> {
    list.iter()
        .position(|action| action.id == id)
        .ok_or_else(|| EditError::UnknownAction { id: id.to_string() })
}

pub fn remove_action(list: &mut Vec<Action>, id: &str) -> Result<(), EditError> {
    let position = position_of(list, id)?;
    list.remove(position);
    Ok(())
}

/// Move the action to `index`, clamped to the last position.
pub fn move_action(list: &mut Vec<Action>, id: &str, index: usize) -> Result<(), EditError> {
    let from = position_of(list, id)?;
    let action = list.remove(from);
    let to = index.min(list.len());
    list.insert(to, action);
    Ok(())
}
