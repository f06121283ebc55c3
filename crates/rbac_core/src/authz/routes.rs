//! Routable menu selection and frontend route projection.

use super::{resolve_menu_scope, Resolved, RoleLookup};
use crate::model::menu::{MenuKind, MenuNode};
use crate::model::role::User;
use crate::tree::{assemble, select_with_ancestors, Forest, TreeNode};
use serde::Serialize;

/// Component placeholder rendered by the frontend for directory routes.
pub const LAYOUT_COMPONENT: &str = "LAYOUT";

/// How allowed menus relate to their ancestors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RouteFilterMode {
    /// Keep only menus granted to the user. A granted page whose directory
    /// is not granted becomes a root of its own.
    #[default]
    Strict,
    /// Also keep enabled ancestors of every granted menu, so granted pages
    /// always nest under their real directories.
    IncludeAncestors,
}

/// Selects the enabled menus `user` may navigate and assembles them.
///
/// # Contract
/// - Disabled menus never appear, not even as ancestors.
/// - Superuser: every enabled menu.
/// - Otherwise: enabled menus whose id is granted by one of the user's roles,
///   widened by `mode`.
/// - Sibling order follows input order.
pub fn select_routable_menus<L: RoleLookup + ?Sized>(
    user: &User,
    roles: &L,
    menus: Vec<MenuNode>,
    mode: RouteFilterMode,
) -> Resolved<Forest<MenuNode>> {
    let enabled: Vec<MenuNode> = menus.into_iter().filter(MenuNode::is_enabled).collect();
    let scope = resolve_menu_scope(user, roles);

    if scope.value.is_all() {
        return Resolved {
            value: assemble(enabled),
            diagnostics: scope.diagnostics,
        };
    }

    let forest = match mode {
        RouteFilterMode::Strict => assemble(
            enabled
                .into_iter()
                .filter(|menu| scope.value.contains(&menu.id))
                .collect(),
        ),
        // Assembly cuts and reports any cycle the selection walked into.
        RouteFilterMode::IncludeAncestors => {
            assemble(select_with_ancestors(enabled, |id| scope.value.contains(id)).nodes)
        }
    };

    Resolved {
        value: forest,
        diagnostics: scope.diagnostics,
    }
}

/// Display metadata of one frontend route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMeta {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub order_no: i64,
    pub hide_menu: bool,
}

/// Route record in the shape consumed by the frontend router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteRecord {
    pub path: String,
    pub name: String,
    pub component: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    pub meta: RouteMeta,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteRecord>,
}

/// Projects a routable menu forest into frontend route records.
///
/// Button rows are dropped together with anything nested under them.
pub fn project_routes(roots: &[TreeNode<MenuNode>]) -> Vec<RouteRecord> {
    roots.iter().filter_map(project_route).collect()
}

fn project_route(node: &TreeNode<MenuNode>) -> Option<RouteRecord> {
    let menu = &node.item;
    if menu.kind == MenuKind::Button {
        return None;
    }

    let children = project_routes(&node.children);
    let redirect = match menu.kind {
        MenuKind::Directory => node
            .children
            .iter()
            .map(|child| &child.item)
            .find(|child| child.kind == MenuKind::Page)
            .and_then(|child| child.path.clone()),
        MenuKind::Page | MenuKind::Button => None,
    };
    let component = match &menu.component {
        Some(component) if !component.trim().is_empty() => component.clone(),
        _ => LAYOUT_COMPONENT.to_string(),
    };

    Some(RouteRecord {
        path: menu.path.clone().unwrap_or_default(),
        name: menu.name.clone(),
        component,
        redirect,
        meta: RouteMeta {
            title: menu.name.clone(),
            icon: menu.icon.clone(),
            order_no: menu.sort,
            hide_menu: menu.hidden,
        },
        children,
    })
}

#[cfg(test)]
mod tests {
    use super::{project_routes, LAYOUT_COMPONENT};
    use crate::model::menu::{MenuKind, MenuNode};
    use crate::tree::assemble;

    fn page(id: i64, parent: Option<i64>, path: &str) -> MenuNode {
        let mut menu = MenuNode::new(id, parent, format!("page-{id}"));
        menu.kind = MenuKind::Page;
        menu.path = Some(path.to_string());
        menu.component = Some(format!("/system/{id}/index"));
        menu
    }

    #[test]
    fn directory_redirects_to_first_child_page() {
        let mut dir = MenuNode::new(1, None, "System");
        dir.path = Some("/system".to_string());
        let mut button = MenuNode::new(4, Some(1), "Export");
        button.kind = MenuKind::Button;

        let forest = assemble(vec![
            dir,
            button,
            page(2, Some(1), "/system/user"),
            page(3, Some(1), "/system/role"),
        ]);
        let routes = project_routes(&forest.roots);

        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].component, LAYOUT_COMPONENT);
        assert_eq!(routes[0].redirect.as_deref(), Some("/system/user"));
        let child_paths: Vec<&str> = routes[0]
            .children
            .iter()
            .map(|route| route.path.as_str())
            .collect();
        assert_eq!(child_paths, vec!["/system/user", "/system/role"]);
    }

    #[test]
    fn route_json_uses_frontend_field_names() {
        let mut menu = page(2, None, "/dashboard");
        menu.hidden = true;
        menu.sort = 3;
        let routes = project_routes(&assemble(vec![menu]).roots);

        let json = serde_json::to_value(&routes).unwrap();
        assert_eq!(json[0]["meta"]["orderNo"], 3);
        assert_eq!(json[0]["meta"]["hideMenu"], true);
        assert!(json[0].get("children").is_none());
        assert!(json[0].get("redirect").is_none());
    }
}
