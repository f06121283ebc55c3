//! Role and user membership records.
//!
//! # Responsibility
//! - Hold the many-to-many references a role grants.
//! - Hold the role membership of one user.
//!
//! # Invariants
//! - A role references menus/permissions/departments by id only; it never
//!   owns those entities.
//! - A user's effective permissions are derived on demand, never stored.

use crate::model::ids::{DeptId, MenuId, PermissionId, RoleId, UserId};
use crate::model::menu::PermissionCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Role with its granted reference sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    #[serde(default)]
    pub menu_ids: BTreeSet<MenuId>,
    #[serde(default)]
    pub button_permission_ids: BTreeSet<PermissionId>,
    #[serde(default)]
    pub column_permission_ids: BTreeSet<PermissionId>,
    /// Departments whose data this role may see.
    #[serde(default)]
    pub dept_ids: BTreeSet<DeptId>,
}

impl Role {
    /// Creates a role that grants nothing yet.
    pub fn new(id: RoleId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns granted leaf ids for one permission category.
    pub fn permission_ids(&self, category: PermissionCategory) -> &BTreeSet<PermissionId> {
        match category {
            PermissionCategory::Button => &self.button_permission_ids,
            PermissionCategory::Column => &self.column_permission_ids,
        }
    }
}

/// Caller identity as yielded by an already-verified session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub role_ids: BTreeSet<RoleId>,
}

impl User {
    /// Creates a regular (non-superuser) user with the given role memberships.
    pub fn with_roles(id: UserId, role_ids: impl IntoIterator<Item = RoleId>) -> Self {
        Self {
            id,
            role_ids: role_ids.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Creates a superuser with no role memberships.
    pub fn superuser(id: UserId) -> Self {
        Self {
            id,
            is_superuser: true,
            ..Self::default()
        }
    }
}
