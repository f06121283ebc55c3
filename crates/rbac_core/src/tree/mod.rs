//! Flat-record to forest conversion.
//!
//! # Responsibility
//! - Turn parent-referencing flat records into ordered forests.
//! - Select the minimal ancestor-closed subset around matched records.
//! - Validate proposed parent changes against a snapshot.
//!
//! # Invariants
//! - Every input record appears exactly once in an assembled forest.
//! - A non-root node's parent in the forest has `id == node.parent_id`.
//! - Cycles never cause unbounded work; they are broken and reported.
//! - Functions here are pure: no I/O, no logging, no retained state.

mod ancestors;
mod assemble;
mod reparent;

use serde::Serialize;
use std::fmt::{Debug, Display};
use std::hash::Hash;

pub use ancestors::{select_with_ancestors, Selection};
pub use assemble::{assemble, Forest};
pub use reparent::{check_reparent, ReparentError};

/// Record that can be placed in a forest by `id`/`parent_id` reference.
pub trait TreeRecord {
    type Id: Clone + Eq + Hash + Debug + Display;

    fn id(&self) -> Self::Id;
    fn parent_id(&self) -> Option<Self::Id>;
}

/// One assembled node: the record's own fields plus ordered children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode<T> {
    #[serde(flatten)]
    pub item: T,
    pub children: Vec<TreeNode<T>>,
}

impl<T> TreeNode<T> {
    pub fn leaf(item: T) -> Self {
        Self {
            item,
            children: Vec::new(),
        }
    }

    /// Returns this node and all descendants in pre-order.
    pub fn preorder(&self) -> Vec<&T> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(&node.item);
            stack.extend(node.children.iter().rev());
        }
        out
    }
}

// Children are released iteratively; a deep chain must not overflow the stack.
impl<T> Drop for TreeNode<T> {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Non-fatal condition observed while assembling or selecting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeDiagnostic<Id> {
    /// `node`'s link to `parent` closed a cycle and was dropped; `node`
    /// became a root.
    CycleBroken { node: Id, parent: Id },
    /// An upward walk from `node` reached `parent` a second time. No link
    /// was changed.
    CycleDetected { node: Id, parent: Id },
    /// More than one input record carries `id`; children attach to the
    /// first occurrence.
    DuplicateId { id: Id },
    /// `parent` is absent from the input, so `node` became a root.
    DanglingParent { node: Id, parent: Id },
}

impl<Id> TreeDiagnostic<Id> {
    pub fn is_cycle(&self) -> bool {
        matches!(self, Self::CycleBroken { .. } | Self::CycleDetected { .. })
    }
}

impl<Id: Display> Display for TreeDiagnostic<Id> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CycleBroken { node, parent } => {
                write!(f, "cycle broken at node {node} (parent {parent})")
            }
            Self::CycleDetected { node, parent } => {
                write!(f, "cycle detected walking from node {node} to parent {parent}")
            }
            Self::DuplicateId { id } => write!(f, "duplicate node id {id}"),
            Self::DanglingParent { node, parent } => {
                write!(f, "node {node} references missing parent {parent}")
            }
        }
    }
}
