//! Menu and leaf-permission records.
//!
//! # Responsibility
//! - Define the navigational menu record read from storage snapshots.
//! - Define button/column permission leaves owned by one menu.
//!
//! # Invariants
//! - A `PermissionLeaf` belongs to exactly one menu (`menu_id`).
//! - Buttons are modeled as leaves, never as `MenuKind` rows that carry
//!   permission codes.

use crate::model::ids::{MenuId, NodeCategory, PermissionId, TaggedId};
use crate::tree::TreeRecord;
use serde::{Deserialize, Serialize};

/// Enabled/disabled flag shared by menus and departments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Enabled,
    Disabled,
}

impl Status {
    pub fn is_enabled(self) -> bool {
        self == Self::Enabled
    }
}

/// Navigational role of one menu row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuKind {
    /// Grouping entry whose children are pages or nested directories.
    #[default]
    Directory,
    /// Routable page backed by a frontend component.
    Page,
    /// Legacy button row stored in the menu table; never routed.
    Button,
}

/// One menu row as read from a storage snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuNode {
    pub id: MenuId,
    /// `None` for top-level menus.
    pub parent_id: Option<MenuId>,
    pub name: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub component: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub kind: MenuKind,
    /// Sibling order key; callers sort by it before assembling.
    #[serde(default)]
    pub sort: i64,
    #[serde(default)]
    pub status: Status,
    /// Routable but hidden from the navigation sidebar.
    #[serde(default)]
    pub hidden: bool,
}

impl MenuNode {
    /// Creates an enabled directory entry with no route metadata.
    pub fn new(id: MenuId, parent_id: Option<MenuId>, name: impl Into<String>) -> Self {
        Self {
            id,
            parent_id,
            name: name.into(),
            path: None,
            component: None,
            icon: None,
            kind: MenuKind::Directory,
            sort: 0,
            status: Status::Enabled,
            hidden: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.status.is_enabled()
    }
}

impl TreeRecord for MenuNode {
    type Id = MenuId;

    fn id(&self) -> MenuId {
        self.id
    }

    fn parent_id(&self) -> Option<MenuId> {
        self.parent_id
    }
}

/// Leaf permission category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionCategory {
    Button,
    Column,
}

impl PermissionCategory {
    /// Node category used when the leaf is mixed into a menu tree.
    pub fn node_category(self) -> NodeCategory {
        match self {
            Self::Button => NodeCategory::Button,
            Self::Column => NodeCategory::Column,
        }
    }
}

/// Button- or column-level access grant owned by one menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionLeaf {
    pub id: PermissionId,
    pub menu_id: MenuId,
    pub category: PermissionCategory,
    pub name: String,
    /// Permission code checked by the frontend, e.g. `system:user:add`.
    pub code: String,
    /// Backing column name. Meaningful only for column permissions.
    #[serde(default)]
    pub field_name: Option<String>,
}

impl PermissionLeaf {
    pub fn button(
        id: PermissionId,
        menu_id: MenuId,
        name: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            id,
            menu_id,
            category: PermissionCategory::Button,
            name: name.into(),
            code: code.into(),
            field_name: None,
        }
    }

    pub fn column(
        id: PermissionId,
        menu_id: MenuId,
        field_name: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        let field_name = field_name.into();
        Self {
            id,
            menu_id,
            category: PermissionCategory::Column,
            name: field_name.clone(),
            code: code.into(),
            field_name: Some(field_name),
        }
    }

    /// Identifier of this leaf inside a mixed menu/permission tree.
    pub fn tagged_id(&self) -> TaggedId {
        TaggedId {
            category: self.category.node_category(),
            id: self.id,
        }
    }
}
