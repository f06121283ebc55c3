//! Core RBAC authorization views.
//! Turns flat menu, department and role records into the per-user trees,
//! route lists and permission-code sets a frontend renders.

pub mod authz;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod tree;

pub use authz::{
    build_permission_picker, project_routes, resolve_dept_scope, resolve_menu_scope,
    resolve_permission_codes, select_routable_menus, PermissionCatalog, PickerKind, PickerNode,
    ResolveDiagnostic, Resolved, RoleLookup, RouteFilterMode, RouteMeta, RouteRecord, Scope,
};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LoggingError};
pub use model::dept::Dept;
pub use model::ids::{DeptId, MenuId, NodeCategory, PermissionId, RoleId, TaggedId, UserId};
pub use model::menu::{MenuKind, MenuNode, PermissionCategory, PermissionLeaf, Status};
pub use model::record::Record;
pub use model::role::{Role, User};
pub use repo::rbac_repo::{
    MenuListQuery, RbacRepoError, RbacRepoResult, RbacRepository, SqliteRbacRepository,
};
pub use service::view_service::{RbacServiceError, RbacServiceResult, RbacViewService, ViewOptions};
pub use tree::{
    assemble, check_reparent, select_with_ancestors, Forest, ReparentError, Selection,
    TreeDiagnostic, TreeNode, TreeRecord,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
