//! Single-pass forest assembly.
//!
//! Builds an `id -> position` index and per-node child lists once, so the
//! whole pass is O(n) expected. Nested nodes are built bottom-up without
//! recursion, and `TreeNode` drops iteratively, so deep chains do not grow
//! the call stack.

use super::{TreeDiagnostic, TreeNode, TreeRecord};
use serde::Serialize;
use std::collections::HashMap;

/// Assembled forest plus everything that was repaired on the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(bound(serialize = "T: Serialize, T::Id: Serialize"))]
pub struct Forest<T: TreeRecord> {
    pub roots: Vec<TreeNode<T>>,
    pub diagnostics: Vec<TreeDiagnostic<T::Id>>,
}

impl<T: TreeRecord> Forest<T> {
    /// Total number of nodes across all trees.
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(|root| root.preorder().len()).sum()
    }

    pub fn has_cycles(&self) -> bool {
        self.diagnostics.iter().any(TreeDiagnostic::is_cycle)
    }

    /// Drops diagnostics and returns the bare roots.
    pub fn into_roots(self) -> Vec<TreeNode<T>> {
        self.roots
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Pending,
    OnPath,
    Done,
}

/// Assembles flat records into an ordered forest.
///
/// # Contract
/// - Records whose `parent_id` is `None` or absent from the input become roots.
/// - Children keep input order; callers sort beforehand when order matters.
/// - When parent links form a cycle, the cycle member that appears first
///   in input order becomes a root and a `CycleBroken` diagnostic is emitted.
pub fn assemble<T: TreeRecord>(records: Vec<T>) -> Forest<T> {
    let len = records.len();
    let ids: Vec<T::Id> = records.iter().map(TreeRecord::id).collect();
    let mut diagnostics = Vec::new();

    let mut index: HashMap<T::Id, usize> = HashMap::with_capacity(len);
    for (position, id) in ids.iter().enumerate() {
        if index.contains_key(id) {
            diagnostics.push(TreeDiagnostic::DuplicateId { id: id.clone() });
        } else {
            index.insert(id.clone(), position);
        }
    }

    let mut parent_of: Vec<Option<usize>> = Vec::with_capacity(len);
    for (position, record) in records.iter().enumerate() {
        let link = match record.parent_id() {
            None => None,
            Some(parent) => match index.get(&parent) {
                Some(&parent_position) => Some(parent_position),
                None => {
                    diagnostics.push(TreeDiagnostic::DanglingParent {
                        node: ids[position].clone(),
                        parent,
                    });
                    None
                }
            },
        };
        parent_of.push(link);
    }

    break_cycles(&ids, &mut parent_of, &mut diagnostics);

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); len];
    let mut root_positions = Vec::new();
    for (position, parent) in parent_of.iter().enumerate() {
        match parent {
            Some(parent_position) => children[*parent_position].push(position),
            None => root_positions.push(position),
        }
    }

    let roots = build_nodes(records, &children, &root_positions);
    Forest { roots, diagnostics }
}

fn break_cycles<Id: Clone>(
    ids: &[Id],
    parent_of: &mut [Option<usize>],
    diagnostics: &mut Vec<TreeDiagnostic<Id>>,
) {
    let mut state = vec![Visit::Pending; parent_of.len()];
    let mut path: Vec<usize> = Vec::new();

    for start in 0..parent_of.len() {
        if state[start] != Visit::Pending {
            continue;
        }

        path.clear();
        let mut cursor = Some(start);
        while let Some(current) = cursor {
            match state[current] {
                Visit::Done => break,
                Visit::OnPath => {
                    let cycle_start = path
                        .iter()
                        .position(|&position| position == current)
                        .unwrap_or(0);
                    if let Some(&cut) = path[cycle_start..].iter().min() {
                        if let Some(parent) = parent_of[cut].take() {
                            diagnostics.push(TreeDiagnostic::CycleBroken {
                                node: ids[cut].clone(),
                                parent: ids[parent].clone(),
                            });
                        }
                    }
                    break;
                }
                Visit::Pending => {
                    state[current] = Visit::OnPath;
                    path.push(current);
                    cursor = parent_of[current];
                }
            }
        }

        for &position in &path {
            state[position] = Visit::Done;
        }
    }
}

fn build_nodes<T>(records: Vec<T>, children: &[Vec<usize>], roots: &[usize]) -> Vec<TreeNode<T>> {
    // Parents precede their children in `order`; building it in reverse
    // guarantees every child is finished before its parent claims it.
    let mut order = Vec::with_capacity(records.len());
    let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
    while let Some(position) = stack.pop() {
        order.push(position);
        stack.extend(children[position].iter().rev().copied());
    }

    let mut items: Vec<Option<T>> = records.into_iter().map(Some).collect();
    let mut built: Vec<Option<TreeNode<T>>> = Vec::new();
    built.resize_with(items.len(), || None);

    for &position in order.iter().rev() {
        let Some(item) = items[position].take() else {
            continue;
        };
        let node_children = children[position]
            .iter()
            .filter_map(|&child| built[child].take())
            .collect();
        built[position] = Some(TreeNode {
            item,
            children: node_children,
        });
    }

    roots
        .iter()
        .filter_map(|&position| built[position].take())
        .collect()
}
