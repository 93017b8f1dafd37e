//! The closed command vocabulary driven by the rendering layer.
//!
//! On the wire a command is `{ "type": ..., "payload": { ... } }`. In Rust it
//! is a plain enum and the reducer matches on it exhaustively.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::action::{Action, ActionListKey};
use crate::core::condition::Condition;
use crate::core::error::EditError;
use crate::core::types::{
    ActionOperator, Combinator, ComparisonOperator, OperandSide, RuleType, ValueKind,
};
use crate::core::value::ValueRef;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all_fields = "camelCase")]
pub enum Command {
    /// Replace the loop target as a whole. Fields left out are cleared.
    #[serde(rename = "decisionSet/setLoopTarget")]
    SetLoopTarget {
        #[serde(rename = "id", default)]
        parent_id: Option<String>,
        #[serde(default)]
        value_id: Option<String>,
        #[serde(default)]
        value: Value,
        #[serde(default)]
        value_type: Option<ValueKind>,
    },
    #[serde(rename = "decisionSet/addUnitRule")]
    AddUnitRule,
    #[serde(rename = "decisionSet/deleteUnitRule")]
    DeleteUnitRule { id: String },
    #[serde(rename = "decisionSet/setUnitRuleName")]
    SetUnitRuleName { id: String, name: String },
    #[serde(rename = "decisionSet/setName")]
    SetName { name: String },
    /// Loop-only sections are kept when switching away from a loop rule.
    #[serde(rename = "decisionSet/setRuleType")]
    SetRuleType {
        #[serde(default)]
        rule_type: Option<RuleType>,
    },

    #[serde(rename = "condition/setOperator")]
    SetOperator {
        rule_id: String,
        node_id: String,
        operator: ComparisonOperator,
    },
    #[serde(rename = "condition/replaceOperand")]
    ReplaceOperand {
        rule_id: String,
        node_id: String,
        side: OperandSide,
        value: ValueRef,
    },
    #[serde(rename = "condition/addChild")]
    AddChild {
        rule_id: String,
        group_id: String,
        child: Condition,
    },
    #[serde(rename = "condition/removeChild")]
    RemoveChild {
        rule_id: String,
        group_id: String,
        child_id: String,
    },
    #[serde(rename = "condition/setCombinator")]
    SetCombinator {
        rule_id: String,
        group_id: String,
        combinator: Combinator,
    },
    #[serde(rename = "condition/wrapInGroup")]
    WrapInGroup {
        rule_id: String,
        node_id: String,
        #[serde(default)]
        combinator: Combinator,
    },
    #[serde(rename = "condition/unwrapGroup")]
    UnwrapGroup { rule_id: String, group_id: String },

    #[serde(rename = "action/appendAction")]
    AppendAction { list: ActionListKey, action: Action },
    #[serde(rename = "action/removeAction")]
    RemoveAction {
        list: ActionListKey,
        action_id: String,
    },
    #[serde(rename = "action/moveAction")]
    MoveAction {
        list: ActionListKey,
        action_id: String,
        index: usize,
    },
    #[serde(rename = "action/setActionOperator")]
    SetActionOperator {
        action_id: String,
        operator: ActionOperator,
    },
    #[serde(rename = "action/setActionArg")]
    SetActionArg {
        action_id: String,
        index: usize,
        value: ValueRef,
    },
    #[serde(rename = "action/setActionTarget")]
    SetActionTarget {
        action_id: String,
        #[serde(default)]
        target: Option<ValueRef>,
    },
}

/// Every `type` string of the vocabulary, in declaration order.
pub const COMMAND_TYPES: &[&str] = &[
    "decisionSet/setLoopTarget",
    "decisionSet/addUnitRule",
    "decisionSet/deleteUnitRule",
    "decisionSet/setUnitRuleName",
    "decisionSet/setName",
    "decisionSet/setRuleType",
    "condition/setOperator",
    "condition/replaceOperand",
    "condition/addChild",
    "condition/removeChild",
    "condition/setCombinator",
    "condition/wrapInGroup",
    "condition/unwrapGroup",
    "action/appendAction",
    "action/removeAction",
    "action/moveAction",
    "action/setActionOperator",
    "action/setActionArg",
    "action/setActionTarget",
];

impl Command {
    /// Wire `type` of this command.
    pub fn command_type(&self) -> &'static str {
        let index = match self {
            Command::SetLoopTarget { .. } => 0,
            Command::AddUnitRule => 1,
            Command::DeleteUnitRule { .. } => 2,
            Command::SetUnitRuleName { .. } => 3,
            Command::SetName { .. } => 4,
            Command::SetRuleType { .. } => 5,
            Command::SetOperator { .. } => 6,
            Command::ReplaceOperand { .. } => 7,
            Command::AddChild { .. } => 8,
            Command::RemoveChild { .. } => 9,
            Command::SetCombinator { .. } => 10,
            Command::WrapInGroup { .. } => 11,
            Command::UnwrapGroup { .. } => 12,
            Command::AppendAction { .. } => 13,
            Command::RemoveAction { .. } => 14,
            Command::MoveAction { .. } => 15,
            Command::SetActionOperator { .. } => 16,
            Command::SetActionArg { .. } => 17,
            Command::SetActionTarget { .. } => 18,
        };
        COMMAND_TYPES[index]
    }

    /// Build `setLoopTarget` from what the value picker reports.
    pub fn set_loop_target(selection: ValueSelection) -> Self {
        Command::SetLoopTarget {
            parent_id: selection.parent_id,
            value_id: selection.value_id,
            value: selection.value,
            value_type: selection.kind,
        }
    }
}

/// Change event emitted by the value picker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueSelection {
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub value_id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<ValueKind>,
    #[serde(default)]
    pub value: Value,
}

/// Parse a raw `{type, payload}` object, classifying failures.
pub fn parse_command(raw: &Value) -> Result<Command, EditError> {
    serde_json::from_value(raw.clone()).map_err(|err| {
        let command_type = raw
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        if COMMAND_TYPES.contains(&command_type.as_str()) {
            EditError::MalformedCommand {
                command_type,
                reason: err.to_string(),
            }
        } else {
            EditError::UnknownCommand { command_type }
        }
    })
}
