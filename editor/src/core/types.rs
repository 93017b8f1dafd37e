//! Shared deterministic types for the decision set model.
//!
//! These enums are the closed vocabularies that appear on the wire. Their
//! serialized spellings are part of the persisted document format and must
//! stay stable.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a [`ValueRef`](crate::core::value::ValueRef) obtains its datum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueKind {
    /// Literal typed by the user.
    Input,
    /// Entry of the variables catalog.
    Variable,
    /// Entry of the constants catalog.
    Constant,
    /// Entry of the functions catalog, called with the stored arguments.
    Func,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Input => "INPUT",
            ValueKind::Variable => "VARIABLE",
            ValueKind::Constant => "CONSTANT",
            ValueKind::Func => "FUNC",
        }
    }

    /// True when values of this kind point into a catalog.
    pub fn is_catalog_backed(self) -> bool {
        !matches!(self, ValueKind::Input)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison operator of a condition leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComparisonOperator {
    #[default]
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Contains,
    NotContains,
    IsEmpty,
    IsNotEmpty,
}

/// Boolean combinator of a condition group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Combinator {
    #[default]
    And,
    Or,
}

/// Operation performed by an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionOperator {
    /// Store the first argument into the target.
    #[default]
    Assign,
    /// Call a function for its side effects; the target receives the result
    /// when present.
    Invoke,
}

/// Which operand of a comparison leaf a command addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperandSide {
    Left,
    Right,
}

impl fmt::Display for OperandSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandSide::Left => f.write_str("left"),
            OperandSide::Right => f.write_str("right"),
        }
    }
}

/// Rule type stored in the document attributes.
///
/// The set is open: strings other than the recognized ones are kept verbatim
/// so a document authored by a newer host survives a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RuleType {
    /// Iterates a collection: start actions, per-item units, end actions.
    Loop,
    /// Plain if/then/else decision.
    Simple,
    Other(String),
}

pub const LOOP_RULE: &str = "LOOP_RULE";
pub const SIMPLE_RULE: &str = "SIMPLE_RULE";

impl RuleType {
    pub fn as_str(&self) -> &str {
        match self {
            RuleType::Loop => LOOP_RULE,
            RuleType::Simple => SIMPLE_RULE,
            RuleType::Other(other) => other,
        }
    }

    pub fn is_loop(&self) -> bool {
        matches!(self, RuleType::Loop)
    }
}

impl From<String> for RuleType {
    fn from(value: String) -> Self {
        match value.as_str() {
            LOOP_RULE => RuleType::Loop,
            SIMPLE_RULE => RuleType::Simple,
            _ => RuleType::Other(value),
        }
    }
}

impl From<RuleType> for String {
    fn from(value: RuleType) -> Self {
        match value {
            RuleType::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

/// Whether a reduction produced a new document version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Changed,
    Unchanged,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_type_keeps_unknown_strings_verbatim() {
        let parsed: RuleType = serde_json::from_str("\"TABLE_RULE\"").expect("parse");
        assert_eq!(parsed, RuleType::Other("TABLE_RULE".to_string()));
        assert_eq!(
            serde_json::to_string(&parsed).expect("serialize"),
            "\"TABLE_RULE\""
        );
    }

    #[test]
    fn rule_type_recognizes_loop() {
        let parsed: RuleType = serde_json::from_str("\"LOOP_RULE\"").expect("parse");
        assert!(parsed.is_loop());
    }

    #[test]
    fn operators_use_screaming_case() {
        assert_eq!(
            serde_json::to_string(&ComparisonOperator::NotContains).expect("serialize"),
            "\"NOT_CONTAINS\""
        );
        assert_eq!(
            serde_json::to_string(&ValueKind::Func).expect("serialize"),
            "\"FUNC\""
        );
    }
}
