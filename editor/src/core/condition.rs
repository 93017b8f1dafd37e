//! Condition trees: comparison leaves combined by AND/OR groups.
//!
//! Every node carries an id and all edits address nodes by id, never by
//! position. Group policy: a group is never left empty. Removing the last
//! child of a group removes the group as well (cascading upward), and an
//! emptied root is replaced by a placeholder comparison. Single-child groups
//! are valid; [`unwrap_group`] collapses them on request.

use serde::{Deserialize, Serialize};

use crate::core::error::EditError;
use crate::core::ids::{CONDITION_PREFIX, IdAllocator};
use crate::core::types::{Combinator, ComparisonOperator, OperandSide};
use crate::core::value::ValueRef;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Condition {
    Comparison(Comparison),
    Group(ConditionGroup),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub left: ValueRef,
    #[serde(default)]
    pub operator: ComparisonOperator,
    #[serde(default)]
    pub right: ValueRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionGroup {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub combinator: Combinator,
    #[serde(default)]
    pub children: Vec<Condition>,
}

impl Condition {
    /// `INPUT null EQ INPUT null`: the valid stand-in for "no condition yet".
    pub fn placeholder(id: impl Into<String>) -> Self {
        Condition::Comparison(Comparison {
            id: id.into(),
            left: ValueRef::default(),
            operator: ComparisonOperator::Eq,
            right: ValueRef::default(),
        })
    }

    pub fn id(&self) -> &str {
        match self {
            Condition::Comparison(leaf) => &leaf.id,
            Condition::Group(group) => &group.id,
        }
    }

    pub(crate) fn set_id(&mut self, id: String) {
        match self {
            Condition::Comparison(leaf) => leaf.id = id,
            Condition::Group(group) => group.id = id,
        }
    }

    pub fn children(&self) -> &[Condition] {
        match self {
            Condition::Comparison(_) => &[],
            Condition::Group(group) => &group.children,
        }
    }

    pub fn is_empty_group(&self) -> bool {
        matches!(self, Condition::Group(group) if group.children.is_empty())
    }

    pub fn find(&self, id: &str) -> Option<&Condition> {
        if self.id() == id {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Condition> {
        if self.id() == id {
            return Some(self);
        }
        match self {
            Condition::Comparison(_) => None,
            Condition::Group(group) => group
                .children
                .iter_mut()
                .find_map(|child| child.find_mut(id)),
        }
    }

    /// Pre-order list of node ids.
    pub fn ids(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_ids(&mut out);
        out
    }

    fn collect_ids<'a>(&'a self, out: &mut Vec<&'a str>) {
        out.push(self.id());
        for child in self.children() {
            child.collect_ids(out);
        }
    }

    /// Visit every comparison operand in pre-order.
    pub fn for_each_operand<'a>(
        &'a self,
        visit: &mut impl FnMut(&'a str, OperandSide, &'a ValueRef),
    ) {
        match self {
            Condition::Comparison(leaf) => {
                visit(&leaf.id, OperandSide::Left, &leaf.left);
                visit(&leaf.id, OperandSide::Right, &leaf.right);
            }
            Condition::Group(group) => {
                for child in &group.children {
                    child.for_each_operand(&mut *visit);
                }
            }
        }
    }

    /// Give every node of this subtree an id that is non-empty and unused.
    pub fn claim_ids(&mut self, ids: &mut IdAllocator) {
        let id = ids.claim_or_fresh(self.id(), CONDITION_PREFIX);
        self.set_id(id);
        if let Condition::Group(group) = self {
            for child in &mut group.children {
                child.claim_ids(ids);
            }
        }
    }
}

fn node_mut<'a>(
    root: &'a mut Condition,
    rule_id: &str,
    node_id: &str,
) -> Result<&'a mut Condition, EditError> {
    root.find_mut(node_id).ok_or_else(|| EditError::UnknownNode {
        rule_id: rule_id.to_string(),
        node_id: node_id.to_string(),
    })
}

fn group_mut<'a>(
    root: &'a mut Condition,
    rule_id: &str,
    group_id: &str,
) -> Result<&'a mut ConditionGroup, EditError> {
    match node_mut(root, rule_id, group_id)? {
        Condition::Group(group) => Ok(group),
        Condition::Comparison(_) => Err(EditError::NotAGroup {
            node_id: group_id.to_string(),
        }),
    }
}

fn comparison_mut<'a>(
    root: &'a mut Condition,
    rule_id: &str,
    node_id: &str,
) -> Result<&'a mut Comparison, EditError> {
    match node_mut(root, rule_id, node_id)? {
        Condition::Comparison(leaf) => Ok(leaf),
        Condition::Group(_) => Err(EditError::NotAComparison {
            node_id: node_id.to_string(),
        }),
    }
}

pub fn set_operator(
    root: &mut Condition,
    rule_id: &str,
    node_id: &str,
    operator: ComparisonOperator,
) -> Result<(), EditError> {
    comparison_mut(root, rule_id, node_id)?.operator = operator;
    Ok(())
}

pub fn replace_operand(
    root: &mut Condition,
    rule_id: &str,
    node_id: &str,
    side: OperandSide,
    value: ValueRef,
) -> Result<(), EditError> {
    let leaf = comparison_mut(root, rule_id, node_id)?;
    match side {
        OperandSide::Left => leaf.left = value,
        OperandSide::Right => leaf.right = value,
    }
    Ok(())
}

/// Append `child` as the last child of the group. The caller is responsible
/// for having claimed the ids of `child`.
pub fn add_child(
    root: &mut Condition,
    rule_id: &str,
    group_id: &str,
    child: Condition,
) -> Result<(), EditError> {
    group_mut(root, rule_id, group_id)?.children.push(child);
    Ok(())
}

pub fn remove_child(
    root: &mut Condition,
    rule_id: &str,
    group_id: &str,
    child_id: &str,
    ids: &mut IdAllocator,
) -> Result<(), EditError> {
    let group = group_mut(root, rule_id, group_id)?;
    let position = group
        .children
        .iter()
        .position(|child| child.id() == child_id)
        .ok_or_else(|| EditError::NotAChild {
            group_id: group_id.to_string(),
            child_id: child_id.to_string(),
        })?;
    group.children.remove(position);

    prune_empty_groups(root);
    if root.is_empty_group() {
        *root = Condition::placeholder(ids.fresh(CONDITION_PREFIX));
    }
    Ok(())
}

/// Drop empty groups bottom-up so emptiness cascades to the parents.
pub(crate) fn prune_empty_groups(node: &mut Condition) {
    if let Condition::Group(group) = node {
        for child in &mut group.children {
            prune_empty_groups(child);
        }
        group.children.retain(|child| !child.is_empty_group());
    }
}

pub fn set_combinator(
    root: &mut Condition,
    rule_id: &str,
    group_id: &str,
    combinator: Combinator,
) -> Result<(), EditError> {
    group_mut(root, rule_id, group_id)?.combinator = combinator;
    Ok(())
}

/// Replace the node with a single-child group holding it.
pub fn wrap_in_group(
    root: &mut Condition,
    rule_id: &str,
    node_id: &str,
    combinator: Combinator,
    group_id: String,
) -> Result<(), EditError> {
    let node = node_mut(root, rule_id, node_id)?;
    let wrapped = std::mem::replace(node, Condition::placeholder(String::new()));
    *node = Condition::Group(ConditionGroup {
        id: group_id,
        combinator,
        children: vec![wrapped],
    });
    Ok(())
}

/// Promote the sole child of a group into the group's slot.
pub fn unwrap_group(root: &mut Condition, rule_id: &str, group_id: &str) -> Result<(), EditError> {
    let node = node_mut(root, rule_id, group_id)?;
    let Condition::Group(group) = node else {
        return Err(EditError::NotAGroup {
            node_id: group_id.to_string(),
        });
    };
    if group.children.len() != 1 {
        return Err(EditError::AmbiguousUnwrap {
            group_id: group_id.to_string(),
            children: group.children.len(),
        });
    }
    let child = group.children.remove(0);
    *node = child;
    Ok(())
}
