//! Role-based authorization views.
//!
//! # Responsibility
//! - Flatten a user's role memberships into permission-code sets.
//! - Select the menus a user may navigate and project them as routes.
//! - Build permission-assignment pickers and data scopes.
//!
//! # Invariants
//! - Superusers branch on `User::is_superuser`; there is no magic code.
//! - Unknown role or permission references are skipped and reported.
//! - Functions here are pure over caller-provided snapshots.

mod codes;
mod picker;
mod routes;

use crate::model::ids::{DeptId, MenuId, RoleId, TaggedId};
use crate::model::role::{Role, User};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::{Display, Formatter};

pub use codes::{resolve_permission_codes, PermissionCatalog};
pub use picker::{build_permission_picker, PickerKind, PickerNode};
pub use routes::{project_routes, select_routable_menus, RouteFilterMode, RouteMeta, RouteRecord};

/// Role lookup by id, supplied by the caller from its snapshot.
pub trait RoleLookup {
    fn role(&self, id: RoleId) -> Option<&Role>;
}

impl RoleLookup for HashMap<RoleId, Role> {
    fn role(&self, id: RoleId) -> Option<&Role> {
        self.get(&id)
    }
}

impl RoleLookup for BTreeMap<RoleId, Role> {
    fn role(&self, id: RoleId) -> Option<&Role> {
        self.get(&id)
    }
}

impl RoleLookup for [Role] {
    fn role(&self, id: RoleId) -> Option<&Role> {
        self.iter().find(|role| role.id == id)
    }
}

impl RoleLookup for Vec<Role> {
    fn role(&self, id: RoleId) -> Option<&Role> {
        self.as_slice().role(id)
    }
}

/// Reference that could not be resolved and was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ResolveDiagnostic {
    /// User is a member of a role that no longer exists.
    UnknownRole(RoleId),
    /// Role grants a permission that is absent from the catalog.
    UnknownPermission(TaggedId),
}

impl Display for ResolveDiagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownRole(id) => write!(f, "unknown role {id}"),
            Self::UnknownPermission(id) => write!(f, "unknown permission {id}"),
        }
    }
}

/// Resolution result plus skipped references.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub diagnostics: Vec<ResolveDiagnostic>,
}

impl<T> Resolved<T> {
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Set of ids a user may reach; `All` for superusers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope<Id: Ord> {
    All,
    Only(BTreeSet<Id>),
}

impl<Id: Ord> Scope<Id> {
    pub fn contains(&self, id: &Id) -> bool {
        match self {
            Self::All => true,
            Self::Only(ids) => ids.contains(id),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

/// Unions `menu_ids` over the user's roles.
pub fn resolve_menu_scope<L: RoleLookup + ?Sized>(user: &User, roles: &L) -> Resolved<Scope<MenuId>> {
    resolve_scope(user, roles, |role| &role.menu_ids)
}

/// Unions `dept_ids` over the user's roles.
pub fn resolve_dept_scope<L: RoleLookup + ?Sized>(user: &User, roles: &L) -> Resolved<Scope<DeptId>> {
    resolve_scope(user, roles, |role| &role.dept_ids)
}

fn resolve_scope<L, F>(user: &User, roles: &L, granted: F) -> Resolved<Scope<i64>>
where
    L: RoleLookup + ?Sized,
    F: Fn(&Role) -> &BTreeSet<i64>,
{
    if user.is_superuser {
        return Resolved {
            value: Scope::All,
            diagnostics: Vec::new(),
        };
    }

    let mut diagnostics = Vec::new();
    let mut ids = BTreeSet::new();
    for role in roles_of(user, roles, &mut diagnostics) {
        ids.extend(granted(role).iter().copied());
    }
    Resolved {
        value: Scope::Only(ids),
        diagnostics,
    }
}

/// Looks up every role the user belongs to, reporting unknown ones.
fn roles_of<'a, L: RoleLookup + ?Sized>(
    user: &User,
    roles: &'a L,
    diagnostics: &mut Vec<ResolveDiagnostic>,
) -> Vec<&'a Role> {
    user.role_ids
        .iter()
        .filter_map(|&id| {
            let role = roles.role(id);
            if role.is_none() {
                diagnostics.push(ResolveDiagnostic::UnknownRole(id));
            }
            role
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{resolve_dept_scope, resolve_menu_scope, ResolveDiagnostic, Scope};
    use crate::model::role::{Role, User};
    use std::collections::BTreeSet;

    fn role(id: i64, menus: &[i64], depts: &[i64]) -> Role {
        let mut role = Role::new(id, format!("role-{id}"));
        role.menu_ids = menus.iter().copied().collect();
        role.dept_ids = depts.iter().copied().collect();
        role
    }

    #[test]
    fn scopes_union_across_roles_and_skip_unknown_roles() {
        let roles = vec![role(1, &[10, 11], &[100]), role(2, &[11, 12], &[200])];
        let user = User::with_roles(7, [1, 2, 3]);

        let menus = resolve_menu_scope(&user, &roles);
        assert_eq!(menus.value, Scope::Only(BTreeSet::from([10, 11, 12])));
        assert_eq!(menus.diagnostics, vec![ResolveDiagnostic::UnknownRole(3)]);

        let depts = resolve_dept_scope(&user, &roles);
        assert!(depts.value.contains(&200));
        assert!(!depts.value.contains(&300));
    }

    #[test]
    fn superuser_scope_is_all() {
        let roles: Vec<Role> = Vec::new();
        let scope = resolve_dept_scope(&User::superuser(1), &roles).into_value();
        assert!(scope.is_all());
        assert!(scope.contains(&12345));
    }
}
