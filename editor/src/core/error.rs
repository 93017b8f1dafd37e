//! Typed rejection reasons for editing commands.

use crate::core::types::ValueKind;

/// Reasons a command was rejected and left the document unchanged.
///
/// Rejections are reported alongside the reduction result, never raised: the
/// editing session must stay usable after any single bad edit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    /// No condition rule unit carries this id.
    #[error("unknown rule unit '{id}'")]
    UnknownUnit { id: String },

    /// Deleting the unit would leave a loop rule without any unit.
    #[error("loop rules keep at least one rule unit; refusing to delete '{id}'")]
    UnitFloor { id: String },

    /// No condition node with this id exists in the unit.
    #[error("unknown condition node '{node_id}' in rule unit '{rule_id}'")]
    UnknownNode { rule_id: String, node_id: String },

    /// The addressed node is a comparison where a group is required.
    #[error("condition node '{node_id}' is not a group")]
    NotAGroup { node_id: String },

    /// The addressed node is a group where a comparison is required.
    #[error("condition node '{node_id}' is not a comparison")]
    NotAComparison { node_id: String },

    /// The child id is not a direct child of the group.
    #[error("'{child_id}' is not a child of group '{group_id}'")]
    NotAChild { group_id: String, child_id: String },

    /// Unwrapping a group with several children has no single replacement.
    #[error("cannot unwrap group '{group_id}' with {children} children")]
    AmbiguousUnwrap { group_id: String, children: usize },

    /// An inserted group (or a group nested in it) has no children.
    #[error("condition group '{node_id}' has no children")]
    EmptyGroup { node_id: String },

    /// A value reference whose `id` presence disagrees with its kind.
    #[error("{kind} value reference {}", if kind.is_catalog_backed() { "requires an id" } else { "must not carry an id" })]
    IllFormedValue { kind: ValueKind },

    /// No action with this id exists in the addressed list(s).
    #[error("unknown action '{id}'")]
    UnknownAction { id: String },

    /// Argument index is past the end of the argument list.
    #[error("argument index {index} out of range for action '{id}' ({len} args)")]
    ArgIndexOutOfRange { id: String, index: usize, len: usize },

    /// The `type` of a raw command is not part of the vocabulary.
    #[error("unknown command type '{command_type}'")]
    UnknownCommand { command_type: String },

    /// The `type` is known but the payload does not match its shape.
    #[error("malformed '{command_type}' command: {reason}")]
    MalformedCommand {
        command_type: String,
        reason: String,
    },
}
