//! Permission-code resolution.

use super::{roles_of, ResolveDiagnostic, Resolved, RoleLookup};
use crate::model::ids::TaggedId;
use crate::model::menu::{PermissionCategory, PermissionLeaf};
use crate::model::role::User;
use std::collections::{BTreeSet, HashMap};

/// Every button and column permission that currently exists.
#[derive(Debug, Clone, Default)]
pub struct PermissionCatalog {
    codes: HashMap<TaggedId, String>,
}

impl PermissionCatalog {
    pub fn new(leaves: impl IntoIterator<Item = PermissionLeaf>) -> Self {
        let codes = leaves
            .into_iter()
            .map(|leaf| (leaf.tagged_id(), leaf.code))
            .collect();
        Self { codes }
    }

    /// Code of one leaf, if it exists.
    pub fn code(&self, id: TaggedId) -> Option<&str> {
        self.codes.get(&id).map(String::as_str)
    }

    /// All distinct codes of one category.
    pub fn full_codes(&self, category: PermissionCategory) -> BTreeSet<String> {
        let wanted = category.node_category();
        self.codes
            .iter()
            .filter(|(id, _)| id.is(wanted))
            .map(|(_, code)| code.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Resolves the button and column permission codes granted to `user`.
///
/// # Contract
/// - Superuser: every code in `catalog`, regardless of role membership.
/// - Otherwise: union of codes granted by the user's roles; a code granted
///   by several roles appears once.
/// - No roles and not superuser: empty set.
pub fn resolve_permission_codes<L: RoleLookup + ?Sized>(
    user: &User,
    roles: &L,
    catalog: &PermissionCatalog,
) -> Resolved<BTreeSet<String>> {
    if user.is_superuser {
        let mut codes = catalog.full_codes(PermissionCategory::Button);
        codes.extend(catalog.full_codes(PermissionCategory::Column));
        return Resolved {
            value: codes,
            diagnostics: Vec::new(),
        };
    }

    let mut diagnostics = Vec::new();
    let mut codes = BTreeSet::new();
    let mut unknown = BTreeSet::new();
    for role in roles_of(user, roles, &mut diagnostics) {
        for category in [PermissionCategory::Button, PermissionCategory::Column] {
            for &permission_id in role.permission_ids(category) {
                let id = TaggedId {
                    category: category.node_category(),
                    id: permission_id,
                };
                match catalog.code(id) {
                    Some(code) => {
                        codes.insert(code.to_string());
                    }
                    None => {
                        unknown.insert(id);
                    }
                }
            }
        }
    }

    diagnostics.extend(unknown.into_iter().map(ResolveDiagnostic::UnknownPermission));

    Resolved {
        value: codes,
        diagnostics,
    }
}
