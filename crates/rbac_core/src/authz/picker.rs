//! Permission-assignment pickers.
//!
//! A picker tree mixes menus with the button (or column) permissions they
//! own, and keeps only the menu branches that lead to at least one such
//! permission.

use crate::model::ids::TaggedId;
use crate::model::menu::{MenuKind, MenuNode, PermissionCategory, PermissionLeaf};
use crate::tree::{assemble, select_with_ancestors, Forest, TreeRecord};
use serde::Serialize;
use std::collections::HashMap;

/// Node type shown by the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PickerKind {
    Directory,
    Page,
    Button,
    Column,
}

impl From<MenuKind> for PickerKind {
    fn from(value: MenuKind) -> Self {
        match value {
            MenuKind::Directory => Self::Directory,
            MenuKind::Page => Self::Page,
            MenuKind::Button => Self::Button,
        }
    }
}

impl From<PermissionCategory> for PickerKind {
    fn from(value: PermissionCategory) -> Self {
        match value {
            PermissionCategory::Button => Self::Button,
            PermissionCategory::Column => Self::Column,
        }
    }
}

/// Menu or permission leaf inside a picker tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickerNode {
    pub id: TaggedId,
    pub parent_id: Option<TaggedId>,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: PickerKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
}

impl From<MenuNode> for PickerNode {
    fn from(menu: MenuNode) -> Self {
        Self {
            id: TaggedId::menu(menu.id),
            parent_id: menu.parent_id.map(TaggedId::menu),
            title: menu.name,
            kind: menu.kind.into(),
            code: None,
            path: menu.path,
            component: menu.component,
            icon: menu.icon,
            field_name: None,
        }
    }
}

impl From<PermissionLeaf> for PickerNode {
    fn from(leaf: PermissionLeaf) -> Self {
        Self {
            id: leaf.tagged_id(),
            parent_id: Some(TaggedId::menu(leaf.menu_id)),
            title: leaf.name,
            kind: leaf.category.into(),
            code: Some(leaf.code),
            path: None,
            component: None,
            icon: None,
            field_name: leaf.field_name,
        }
    }
}

impl TreeRecord for PickerNode {
    type Id = TaggedId;

    fn id(&self) -> TaggedId {
        self.id
    }

    fn parent_id(&self) -> Option<TaggedId> {
        self.parent_id
    }
}

/// Builds the picker tree of `category` permissions over `menus`.
///
/// # Contract
/// - Only leaves of `category` whose owning menu is in `menus` are used.
/// - Every picker leaf is a permission; every menu in the result is an
///   ancestor of at least one permission.
/// - Under one menu, its own leaves come before any sub-menu listed after it.
pub fn build_permission_picker(
    menus: Vec<MenuNode>,
    leaves: Vec<PermissionLeaf>,
    category: PermissionCategory,
) -> Forest<PickerNode> {
    let mut leaves_by_menu: HashMap<_, Vec<PermissionLeaf>> = HashMap::new();
    for leaf in leaves.into_iter().filter(|leaf| leaf.category == category) {
        leaves_by_menu.entry(leaf.menu_id).or_default().push(leaf);
    }

    let mut flat = Vec::with_capacity(menus.len());
    for menu in menus {
        let owned = leaves_by_menu.remove(&menu.id).unwrap_or_default();
        flat.push(PickerNode::from(menu));
        flat.extend(owned.into_iter().map(PickerNode::from));
    }

    let wanted = category.node_category();
    // Assembly cuts and reports any cycle the selection walked into.
    assemble(select_with_ancestors(flat, |id| id.is(wanted)).nodes)
}

#[cfg(test)]
mod tests {
    use super::{build_permission_picker, PickerKind};
    use crate::model::ids::TaggedId;
    use crate::model::menu::{MenuNode, PermissionCategory, PermissionLeaf};
    use crate::tree::TreeDiagnostic;

    #[test]
    fn own_leaves_precede_sub_menus() {
        let menus = vec![
            MenuNode::new(1, None, "System"),
            MenuNode::new(2, Some(1), "Users"),
        ];
        let leaves = vec![
            PermissionLeaf::button(7, 2, "Add", "system:user:add"),
            PermissionLeaf::button(8, 1, "Export", "system:export"),
            PermissionLeaf::column(9, 2, "phone", "system:user:phone"),
        ];

        let forest = build_permission_picker(menus, leaves, PermissionCategory::Button);

        let root = &forest.roots[0];
        let child_ids: Vec<TaggedId> = root.children.iter().map(|child| child.item.id).collect();
        assert_eq!(child_ids, vec![TaggedId::button(8), TaggedId::menu(2)]);
        assert_eq!(root.children[1].children.len(), 1);
        assert_eq!(root.children[1].children[0].item.kind, PickerKind::Button);
        assert!(forest.diagnostics.is_empty());
    }

    #[test]
    fn menus_without_matching_leaves_are_dropped() {
        let menus = vec![MenuNode::new(1, None, "System"), MenuNode::new(3, None, "Empty")];
        let leaves = vec![PermissionLeaf::column(4, 1, "salary", "user:salary")];

        let forest = build_permission_picker(menus, leaves, PermissionCategory::Column);

        assert_eq!(forest.roots.len(), 1);
        assert_eq!(forest.roots[0].item.id, TaggedId::menu(1));
        assert_eq!(forest.node_count(), 2);
    }

    #[test]
    fn cyclic_menu_chain_is_cut_once() {
        let menus = vec![MenuNode::new(1, Some(2), "A"), MenuNode::new(2, Some(1), "B")];
        let leaves = vec![PermissionLeaf::button(5, 2, "Run", "a:run")];

        let forest = build_permission_picker(menus, leaves, PermissionCategory::Button);

        assert_eq!(forest.roots.len(), 1);
        assert_eq!(forest.roots[0].item.id, TaggedId::menu(1));
        assert_eq!(forest.node_count(), 3);
        assert_eq!(
            forest.diagnostics,
            vec![TreeDiagnostic::CycleBroken {
                node: TaggedId::menu(1),
                parent: TaggedId::menu(2),
            }]
        );
    }
}
