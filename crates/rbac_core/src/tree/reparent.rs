//! Parent-change validation over a snapshot.
//!
//! # Invariants
//! - A node cannot become its own parent.
//! - The proposed parent must exist in the snapshot.
//! - A move must not place a node under one of its own descendants.

use super::TreeRecord;
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Reasons a proposed parent change is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReparentError<Id> {
    /// Node to move is absent from the snapshot.
    NodeNotFound(Id),
    /// Proposed parent is absent from the snapshot.
    ParentNotFound(Id),
    /// Proposed parent equals the node itself.
    SelfParent(Id),
    /// Proposed parent is a descendant of the node (or the snapshot already
    /// holds a cycle on the parent's ancestor chain).
    CycleDetected { node: Id, parent: Id },
}

impl<Id: Display> Display for ReparentError<Id> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NodeNotFound(id) => write!(f, "node not found: {id}"),
            Self::ParentNotFound(id) => write!(f, "parent not found: {id}"),
            Self::SelfParent(id) => write!(f, "node {id} cannot be its own parent"),
            Self::CycleDetected { node, parent } => {
                write!(f, "move would create cycle: node {node} under parent {parent}")
            }
        }
    }
}

impl<Id: Debug + Display> Error for ReparentError<Id> {}

/// Checks whether `node` may be moved under `new_parent`.
///
/// `None` (move to top level) is always accepted for an existing node.
pub fn check_reparent<T: TreeRecord>(
    records: &[T],
    node: &T::Id,
    new_parent: Option<&T::Id>,
) -> Result<(), ReparentError<T::Id>> {
    let by_id: HashMap<T::Id, &T> = records
        .iter()
        .map(|record| (record.id(), record))
        .collect();

    if !by_id.contains_key(node) {
        return Err(ReparentError::NodeNotFound(node.clone()));
    }
    let Some(parent) = new_parent else {
        return Ok(());
    };
    if parent == node {
        return Err(ReparentError::SelfParent(node.clone()));
    }
    if !by_id.contains_key(parent) {
        return Err(ReparentError::ParentNotFound(parent.clone()));
    }

    let cycle = || ReparentError::CycleDetected {
        node: node.clone(),
        parent: parent.clone(),
    };
    let mut visited = HashSet::new();
    let mut cursor = Some(parent.clone());
    while let Some(current) = cursor {
        if &current == node {
            return Err(cycle());
        }
        if !visited.insert(current.clone()) {
            return Err(cycle());
        }
        // A dangling ancestor ends the chain: it is treated as a root.
        cursor = by_id.get(&current).and_then(|record| record.parent_id());
    }
    Ok(())
}
