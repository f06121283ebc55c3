use rbac_core::{
    resolve_permission_codes, PermissionCatalog, PermissionLeaf, ResolveDiagnostic, Role,
    TaggedId, User,
};
use std::collections::{BTreeSet, HashMap};

fn catalog() -> PermissionCatalog {
    PermissionCatalog::new([
        PermissionLeaf::button(1, 10, "X", "x"),
        PermissionLeaf::button(2, 10, "Y", "y"),
        PermissionLeaf::button(3, 11, "Z", "z"),
        PermissionLeaf::column(1, 10, "salary", "user:salary"),
        PermissionLeaf::column(2, 11, "phone", "user:phone"),
    ])
}

fn role(id: i64, buttons: &[i64], columns: &[i64]) -> Role {
    let mut role = Role::new(id, format!("role-{id}"));
    role.button_permission_ids = buttons.iter().copied().collect();
    role.column_permission_ids = columns.iter().copied().collect();
    role
}

fn codes(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn codes_union_across_roles_without_duplicates() {
    let roles = vec![role(1, &[1, 2], &[]), role(2, &[2, 3], &[])];
    let user = User::with_roles(7, [1, 2]);

    let resolved = resolve_permission_codes(&user, &roles, &catalog());

    assert_eq!(resolved.value, codes(&["x", "y", "z"]));
    assert!(resolved.diagnostics.is_empty());
}

#[test]
fn column_codes_join_button_codes() {
    let roles = vec![role(1, &[1], &[2])];
    let user = User::with_roles(7, [1]);

    let resolved = resolve_permission_codes(&user, &roles, &catalog());

    assert_eq!(resolved.value, codes(&["user:phone", "x"]));
}

#[test]
fn superuser_gets_full_catalog_even_without_roles() {
    let roles: Vec<Role> = Vec::new();

    let resolved = resolve_permission_codes(&User::superuser(1), &roles, &catalog());

    assert_eq!(
        resolved.value,
        codes(&["x", "y", "z", "user:salary", "user:phone"])
    );
}

#[test]
fn superuser_ignores_role_grants() {
    let roles = vec![role(1, &[1], &[])];
    let mut user = User::superuser(1);
    user.role_ids.insert(1);

    let resolved = resolve_permission_codes(&user, &roles, &catalog());

    assert_eq!(resolved.value.len(), 5);
}

#[test]
fn user_without_roles_resolves_to_empty_set() {
    let roles = vec![role(1, &[1, 2, 3], &[1, 2])];

    let resolved = resolve_permission_codes(&User::with_roles(7, []), &roles, &catalog());

    assert!(resolved.value.is_empty());
    assert!(resolved.diagnostics.is_empty());
}

#[test]
fn unknown_role_and_unknown_permission_are_skipped_and_reported() {
    let roles: HashMap<i64, Role> = [(1, role(1, &[1, 99], &[]))].into_iter().collect();
    let user = User::with_roles(7, [1, 2]);

    let resolved = resolve_permission_codes(&user, &roles, &catalog());

    assert_eq!(resolved.value, codes(&["x"]));
    assert_eq!(
        resolved.diagnostics,
        vec![
            ResolveDiagnostic::UnknownRole(2),
            ResolveDiagnostic::UnknownPermission(TaggedId::button(99)),
        ]
    );
}

#[test]
fn button_and_column_with_same_numeric_id_stay_distinct() {
    let roles = vec![role(1, &[], &[1])];

    let resolved = resolve_permission_codes(&User::with_roles(7, [1]), &roles, &catalog());

    assert_eq!(resolved.value, codes(&["user:salary"]));
}

#[test]
fn unknown_permission_shared_by_roles_is_reported_once_in_id_order() {
    let roles = vec![role(1, &[98, 1], &[97]), role(2, &[98, 99], &[])];

    let resolved = resolve_permission_codes(&User::with_roles(7, [1, 2]), &roles, &catalog());

    assert_eq!(resolved.value, codes(&["x"]));
    assert_eq!(
        resolved.diagnostics,
        vec![
            ResolveDiagnostic::UnknownPermission(TaggedId::button(98)),
            ResolveDiagnostic::UnknownPermission(TaggedId::button(99)),
            ResolveDiagnostic::UnknownPermission(TaggedId::column(97)),
        ]
    );
}
