//! Authorization-view use-case service.
//!
//! # Responsibility
//! - Snapshot repository records for one request.
//! - Run the pure tree/authz components over that snapshot.
//! - Log diagnostics the components return; components never log.
//!
//! # Invariants
//! - A user id that does not resolve is an error, never an empty view.
//! - Skipped references and repaired cycles are logged at `warn`.

use crate::authz::{
    build_permission_picker, project_routes, resolve_dept_scope, resolve_permission_codes,
    select_routable_menus, PermissionCatalog, PickerNode, ResolveDiagnostic, RouteFilterMode,
    RouteRecord, Scope,
};
use crate::model::dept::Dept;
use crate::model::ids::{DeptId, MenuId, UserId};
use crate::model::menu::{MenuNode, PermissionCategory, Status};
use crate::model::role::{Role, User};
use crate::repo::rbac_repo::{MenuListQuery, RbacRepoError, RbacRepository};
use crate::tree::{assemble, check_reparent, Forest, ReparentError, TreeDiagnostic};
use log::{debug, info, warn};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Errors from authorization-view service operations.
#[derive(Debug)]
pub enum RbacServiceError {
    /// Session user no longer exists.
    UserNotFound(UserId),
    /// Proposed menu parent change is invalid.
    Reparent(ReparentError<MenuId>),
    /// Repository-level failure.
    Repo(RbacRepoError),
}

impl Display for RbacServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UserNotFound(id) => write!(f, "user not found: {id}"),
            Self::Reparent(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RbacServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Reparent(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::UserNotFound(_) => None,
        }
    }
}

impl From<RbacRepoError> for RbacServiceError {
    fn from(value: RbacRepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ReparentError<MenuId>> for RbacServiceError {
    fn from(value: ReparentError<MenuId>) -> Self {
        Self::Reparent(value)
    }
}

pub type RbacServiceResult<T> = Result<T, RbacServiceError>;

/// Runtime knobs for the views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewOptions {
    pub route_filter: RouteFilterMode,
}

/// Authorization-view service facade.
pub struct RbacViewService<R: RbacRepository> {
    repo: R,
    options: ViewOptions,
}

impl<R: RbacRepository> RbacViewService<R> {
    /// Creates service with default options.
    pub fn new(repo: R) -> Self {
        Self::with_options(repo, ViewOptions::default())
    }

    pub fn with_options(repo: R, options: ViewOptions) -> Self {
        Self { repo, options }
    }

    pub fn options(&self) -> ViewOptions {
        self.options
    }

    /// Builds the navigable menu forest of one user.
    pub fn route_menu_tree(&self, user_id: UserId) -> RbacServiceResult<Forest<MenuNode>> {
        let started_at = Instant::now();
        let (user, roles) = self.load_user_with_roles(user_id)?;
        let menus = self.repo.list_menus(&MenuListQuery::enabled())?;

        let resolved =
            select_routable_menus(&user, &roles, menus, self.options.route_filter);
        log_resolve_diagnostics("route_menu_tree", user_id, &resolved.diagnostics);
        log_tree_diagnostics("route_menu_tree", &resolved.value.diagnostics);

        info!(
            "event=route_menu_tree module=service status=ok user_id={user_id} superuser={} roots={} nodes={} duration_ms={}",
            user.is_superuser,
            resolved.value.roots.len(),
            resolved.value.node_count(),
            started_at.elapsed().as_millis()
        );
        Ok(resolved.value)
    }

    /// Builds the frontend route records of one user.
    pub fn routes(&self, user_id: UserId) -> RbacServiceResult<Vec<RouteRecord>> {
        let forest = self.route_menu_tree(user_id)?;
        Ok(project_routes(&forest.roots))
    }

    /// Collects the button and column permission codes of one user.
    pub fn permission_codes(&self, user_id: UserId) -> RbacServiceResult<BTreeSet<String>> {
        let started_at = Instant::now();
        let (user, roles) = self.load_user_with_roles(user_id)?;

        let mut leaves = self
            .repo
            .list_permission_leaves(PermissionCategory::Button, None)?;
        leaves.extend(
            self.repo
                .list_permission_leaves(PermissionCategory::Column, None)?,
        );
        let catalog = PermissionCatalog::new(leaves);

        let resolved = resolve_permission_codes(&user, &roles, &catalog);
        log_resolve_diagnostics("permission_codes", user_id, &resolved.diagnostics);
        info!(
            "event=permission_codes module=service status=ok user_id={user_id} superuser={} codes={} duration_ms={}",
            user.is_superuser,
            resolved.value.len(),
            started_at.elapsed().as_millis()
        );
        Ok(resolved.value)
    }

    /// Picker of menus and the button permissions under them.
    ///
    /// An empty `menu_ids` means all menus.
    pub fn menu_button_picker(&self, menu_ids: &[MenuId]) -> RbacServiceResult<Forest<PickerNode>> {
        self.permission_picker(PermissionCategory::Button, menu_ids)
    }

    /// Picker of menus and the column permissions under them.
    ///
    /// An empty `menu_ids` means all menus.
    pub fn menu_column_picker(&self, menu_ids: &[MenuId]) -> RbacServiceResult<Forest<PickerNode>> {
        self.permission_picker(PermissionCategory::Column, menu_ids)
    }

    /// Management tree of all menus, optionally filtered by status.
    pub fn menu_tree(&self, status: Option<Status>) -> RbacServiceResult<Forest<MenuNode>> {
        let menus = self.repo.list_menus(&MenuListQuery { status, ids: None })?;
        let forest = assemble(menus);
        log_tree_diagnostics("menu_tree", &forest.diagnostics);
        Ok(forest)
    }

    /// Management tree of all departments, optionally filtered by status.
    pub fn dept_tree(&self, status: Option<Status>) -> RbacServiceResult<Forest<Dept>> {
        let forest = assemble(self.repo.list_depts(status)?);
        log_tree_diagnostics("dept_tree", &forest.diagnostics);
        Ok(forest)
    }

    /// Departments whose data one user may see.
    pub fn dept_scope(&self, user_id: UserId) -> RbacServiceResult<Scope<DeptId>> {
        let (user, roles) = self.load_user_with_roles(user_id)?;
        let resolved = resolve_dept_scope(&user, &roles);
        log_resolve_diagnostics("dept_scope", user_id, &resolved.diagnostics);
        Ok(resolved.value)
    }

    /// Validates moving one menu under `new_parent` (or to top level).
    pub fn check_menu_reparent(
        &self,
        menu_id: MenuId,
        new_parent: Option<MenuId>,
    ) -> RbacServiceResult<()> {
        let menus = self.repo.list_menus(&MenuListQuery::default())?;
        check_reparent(&menus, &menu_id, new_parent.as_ref()).map_err(|err| {
            warn!(
                "event=menu_reparent module=service status=rejected menu_id={menu_id} reason={err}"
            );
            RbacServiceError::from(err)
        })
    }

    fn permission_picker(
        &self,
        category: PermissionCategory,
        menu_ids: &[MenuId],
    ) -> RbacServiceResult<Forest<PickerNode>> {
        let filter = (!menu_ids.is_empty()).then(|| menu_ids.to_vec());
        let menus = self.repo.list_menus(&MenuListQuery {
            status: None,
            ids: filter.clone(),
        })?;
        let leaves = self
            .repo
            .list_permission_leaves(category, filter.as_deref())?;

        let forest = build_permission_picker(menus, leaves, category);
        log_tree_diagnostics("permission_picker", &forest.diagnostics);
        info!(
            "event=permission_picker module=service status=ok category={category:?} roots={} nodes={}",
            forest.roots.len(),
            forest.node_count()
        );
        Ok(forest)
    }

    fn load_user_with_roles(&self, user_id: UserId) -> RbacServiceResult<(User, Vec<Role>)> {
        let user = self
            .repo
            .get_user(user_id)?
            .ok_or(RbacServiceError::UserNotFound(user_id))?;
        let role_ids: Vec<_> = user.role_ids.iter().copied().collect();
        let roles = self.repo.load_roles(&role_ids)?;
        Ok((user, roles))
    }
}

fn log_resolve_diagnostics(view: &str, user_id: UserId, diagnostics: &[ResolveDiagnostic]) {
    for diagnostic in diagnostics {
        warn!(
            "event=reference_skipped module=service status=warn view={view} user_id={user_id} detail={diagnostic}"
        );
    }
}

fn log_tree_diagnostics<Id: Display>(view: &str, diagnostics: &[TreeDiagnostic<Id>]) {
    for diagnostic in diagnostics {
        match diagnostic {
            // Orphaned pages are expected under strict route filtering.
            TreeDiagnostic::DanglingParent { .. } => {
                debug!(
                    "event=tree_repair module=service status=ok view={view} detail={diagnostic}"
                );
            }
            TreeDiagnostic::CycleBroken { .. }
            | TreeDiagnostic::CycleDetected { .. }
            | TreeDiagnostic::DuplicateId { .. } => {
                warn!(
                    "event=tree_repair module=service status=warn view={view} detail={diagnostic}"
                );
            }
        }
    }
}
