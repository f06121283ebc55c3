use rbac_core::{
    project_routes, select_routable_menus, MenuKind, MenuNode, ResolveDiagnostic, Role,
    RouteFilterMode, Status, TreeDiagnostic, TreeNode, User,
};

fn menu(id: i64, parent: Option<i64>, status: Status) -> MenuNode {
    let mut menu = MenuNode::new(id, parent, format!("menu-{id}"));
    menu.status = status;
    menu
}

fn page(id: i64, parent: Option<i64>, path: &str) -> MenuNode {
    let mut menu = MenuNode::new(id, parent, format!("page-{id}"));
    menu.kind = MenuKind::Page;
    menu.path = Some(path.to_string());
    menu.component = Some(format!("{path}/index"));
    menu
}

fn role_with_menus(id: i64, menus: &[i64]) -> Role {
    let mut role = Role::new(id, format!("role-{id}"));
    role.menu_ids = menus.iter().copied().collect();
    role
}

/// `(id, children)` outline of a forest.
fn outline(nodes: &[TreeNode<MenuNode>]) -> Vec<(i64, Vec<i64>)> {
    nodes
        .iter()
        .map(|node| {
            (
                node.item.id,
                node.children.iter().map(|child| child.item.id).collect(),
            )
        })
        .collect()
}

#[test]
fn disabled_menu_is_absent_and_granted_menus_nest() {
    let menus = vec![
        menu(1, None, Status::Enabled),
        menu(2, Some(1), Status::Enabled),
        menu(3, Some(1), Status::Disabled),
    ];
    let roles = vec![role_with_menus(1, &[1, 2])];
    let user = User::with_roles(7, [1]);

    let resolved = select_routable_menus(&user, &roles, menus, RouteFilterMode::Strict);

    assert_eq!(outline(&resolved.value.roots), vec![(1, vec![2])]);
    assert!(resolved.value.roots[0].children[0].children.is_empty());
    assert!(resolved.diagnostics.is_empty());
}

#[test]
fn disabled_menu_stays_hidden_even_when_granted() {
    let menus = vec![
        menu(1, None, Status::Enabled),
        menu(3, Some(1), Status::Disabled),
    ];
    let roles = vec![role_with_menus(1, &[1, 3])];

    let resolved = select_routable_menus(
        &User::with_roles(7, [1]),
        &roles,
        menus,
        RouteFilterMode::Strict,
    );

    assert_eq!(outline(&resolved.value.roots), vec![(1, vec![])]);
}

#[test]
fn strict_mode_turns_ungranted_directory_children_into_roots() {
    let menus = vec![
        menu(1, None, Status::Enabled),
        page(2, Some(1), "/system/user"),
        menu(4, None, Status::Enabled),
    ];
    let roles = vec![role_with_menus(1, &[2, 4])];

    let resolved = select_routable_menus(
        &User::with_roles(7, [1]),
        &roles,
        menus,
        RouteFilterMode::Strict,
    );

    assert_eq!(outline(&resolved.value.roots), vec![(2, vec![]), (4, vec![])]);
    assert_eq!(
        resolved.value.diagnostics,
        vec![TreeDiagnostic::DanglingParent { node: 2, parent: 1 }]
    );
}

#[test]
fn include_ancestors_mode_nests_granted_pages_under_enabled_directories() {
    let menus = vec![
        menu(1, None, Status::Enabled),
        page(2, Some(1), "/system/user"),
        menu(4, None, Status::Enabled),
        menu(5, None, Status::Disabled),
        page(6, Some(5), "/hidden/page"),
    ];
    let roles = vec![role_with_menus(1, &[2, 6])];

    let resolved = select_routable_menus(
        &User::with_roles(7, [1]),
        &roles,
        menus,
        RouteFilterMode::IncludeAncestors,
    );

    // Disabled directory 5 is never pulled in, so page 6 stays a root.
    assert_eq!(outline(&resolved.value.roots), vec![(1, vec![2]), (6, vec![])]);
}

#[test]
fn superuser_sees_every_enabled_menu() {
    let menus = vec![
        menu(1, None, Status::Enabled),
        menu(2, Some(1), Status::Enabled),
        menu(3, Some(1), Status::Disabled),
        menu(4, None, Status::Enabled),
    ];
    let roles: Vec<Role> = Vec::new();

    let resolved =
        select_routable_menus(&User::superuser(1), &roles, menus, RouteFilterMode::Strict);

    assert_eq!(outline(&resolved.value.roots), vec![(1, vec![2]), (4, vec![])]);
}

#[test]
fn user_without_roles_gets_empty_forest() {
    let menus = vec![menu(1, None, Status::Enabled)];
    let roles = vec![role_with_menus(1, &[1])];

    let resolved = select_routable_menus(
        &User::with_roles(7, [2]),
        &roles,
        menus,
        RouteFilterMode::Strict,
    );

    assert!(resolved.value.roots.is_empty());
    assert_eq!(resolved.diagnostics, vec![ResolveDiagnostic::UnknownRole(2)]);
}

#[test]
fn routes_follow_the_routable_forest() {
    let mut system = menu(1, None, Status::Enabled);
    system.path = Some("/system".to_string());
    system.icon = Some("ion:settings-outline".to_string());
    let menus = vec![
        system,
        page(2, Some(1), "/system/user"),
        page(3, Some(1), "/system/role"),
    ];
    let roles = vec![role_with_menus(1, &[1, 3])];

    let forest = select_routable_menus(
        &User::with_roles(7, [1]),
        &roles,
        menus,
        RouteFilterMode::Strict,
    )
    .into_value();
    let routes = project_routes(&forest.roots);

    let json = serde_json::to_value(&routes).unwrap();
    assert_eq!(json[0]["path"], "/system");
    assert_eq!(json[0]["component"], "LAYOUT");
    assert_eq!(json[0]["redirect"], "/system/role");
    assert_eq!(json[0]["meta"]["icon"], "ion:settings-outline");
    assert_eq!(json[0]["children"][0]["component"], "/system/role/index");
    assert_eq!(json[0]["children"].as_array().map(Vec::len), Some(1));
}

#[test]
fn include_ancestors_reports_one_real_cut_for_a_cyclic_chain() {
    let menus = vec![
        menu(1, Some(2), Status::Enabled),
        menu(2, Some(1), Status::Enabled),
        menu(9, Some(1), Status::Enabled),
    ];
    let roles = vec![role_with_menus(1, &[9])];

    let forest = select_routable_menus(
        &User::with_roles(7, [1]),
        &roles,
        menus,
        RouteFilterMode::IncludeAncestors,
    )
    .into_value();

    assert_eq!(outline(&forest.roots), vec![(1, vec![2, 9])]);
    assert_eq!(
        forest.diagnostics,
        vec![TreeDiagnostic::CycleBroken { node: 1, parent: 2 }]
    );
}
