//! Ancestor-closed selection around matched records.

use super::{TreeDiagnostic, TreeRecord};
use std::collections::HashMap;

/// Selected records plus cycles observed while walking upward.
///
/// Selection never changes parent links; a cycle reported here is cut only
/// once the nodes are assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<T: TreeRecord> {
    /// Matched records and their ancestors, in input order, each once.
    pub nodes: Vec<T>,
    pub diagnostics: Vec<TreeDiagnostic<T::Id>>,
}

/// Keeps every record whose id satisfies `is_match`, plus all of its
/// ancestors up to a root.
///
/// # Contract
/// - Output preserves input order and contains no record twice.
/// - The upward walk stops at a `None` parent, a parent absent from the
///   input, or an ancestor already selected.
/// - Feeding the output back in with the same predicate returns it unchanged.
pub fn select_with_ancestors<T, F>(records: Vec<T>, is_match: F) -> Selection<T>
where
    T: TreeRecord,
    F: Fn(&T::Id) -> bool,
{
    let ids: Vec<T::Id> = records.iter().map(TreeRecord::id).collect();
    let mut index: HashMap<&T::Id, usize> = HashMap::with_capacity(ids.len());
    for (position, id) in ids.iter().enumerate() {
        index.entry(id).or_insert(position);
    }

    let parent_of: Vec<Option<usize>> = records
        .iter()
        .map(|record| {
            record
                .parent_id()
                .and_then(|parent| index.get(&parent).copied())
        })
        .collect();

    let mut diagnostics = Vec::new();
    let mut selected = vec![false; records.len()];
    // Tags each record with the walk that last reached it, so a walk that
    // comes back to itself is recognized as a cycle.
    let mut walk_of = vec![usize::MAX; records.len()];

    for (walk, id) in ids.iter().enumerate() {
        if !is_match(id) {
            continue;
        }
        selected[walk] = true;
        walk_of[walk] = walk;

        let mut current = walk;
        while let Some(parent) = parent_of[current] {
            if walk_of[parent] == walk {
                diagnostics.push(TreeDiagnostic::CycleDetected {
                    node: ids[current].clone(),
                    parent: ids[parent].clone(),
                });
                break;
            }
            if selected[parent] {
                break;
            }
            selected[parent] = true;
            walk_of[parent] = walk;
            current = parent;
        }
    }

    let nodes = records
        .into_iter()
        .zip(selected)
        .filter_map(|(record, keep)| keep.then_some(record))
        .collect();
    Selection { nodes, diagnostics }
}
