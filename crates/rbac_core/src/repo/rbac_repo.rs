//! RBAC snapshot repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Load menus, permission leaves, roles, users and departments as plain
//!   records for the authorization-view components.
//! - Keep SQL and storage encodings inside the repository boundary.
//!
//! # Invariants
//! - Repository APIs are read-only.
//! - Menu and department listings are ordered `sort ASC, id ASC`.
//! - Invalid persisted enum values are reported, never guessed.

use crate::db::migrations::{latest_version, schema_version};
use crate::db::DbError;
use crate::model::dept::Dept;
use crate::model::ids::{MenuId, RoleId, UserId};
use crate::model::menu::{MenuKind, MenuNode, PermissionCategory, PermissionLeaf, Status};
use crate::model::role::{Role, User};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RbacRepoResult<T> = Result<T, RbacRepoError>;

/// Errors from RBAC repository operations.
#[derive(Debug)]
pub enum RbacRepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Connection is not migrated to the version this binary expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Persisted row cannot be converted to a valid record.
    InvalidData(String),
}

impl Display for RbacRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "rbac repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::InvalidData(message) => write!(f, "invalid rbac data: {message}"),
        }
    }
}

impl Error for RbacRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::UninitializedConnection { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RbacRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RbacRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Filters for listing menus. Default lists every menu.
#[derive(Debug, Clone, Default)]
pub struct MenuListQuery {
    pub status: Option<Status>,
    /// Restrict to these ids; an empty list matches nothing.
    pub ids: Option<Vec<MenuId>>,
}

impl MenuListQuery {
    pub fn enabled() -> Self {
        Self {
            status: Some(Status::Enabled),
            ids: None,
        }
    }
}

/// Read-only snapshot access used by the authorization views.
pub trait RbacRepository {
    /// Lists menus ordered by `sort`, then `id`.
    fn list_menus(&self, query: &MenuListQuery) -> RbacRepoResult<Vec<MenuNode>>;
    /// Lists permission leaves of one category, optionally restricted to
    /// the given owning menus.
    fn list_permission_leaves(
        &self,
        category: PermissionCategory,
        menu_ids: Option<&[MenuId]>,
    ) -> RbacRepoResult<Vec<PermissionLeaf>>;
    /// Loads the roles with the given ids; unknown ids are simply absent.
    fn load_roles(&self, role_ids: &[RoleId]) -> RbacRepoResult<Vec<Role>>;
    /// Loads one user with its role memberships.
    fn get_user(&self, user_id: UserId) -> RbacRepoResult<Option<User>>;
    /// Lists departments ordered by `sort`, then `id`, optionally only
    /// those with `status`.
    fn list_depts(&self, status: Option<Status>) -> RbacRepoResult<Vec<Dept>>;
}

impl<R: RbacRepository + ?Sized> RbacRepository for &R {
    fn list_menus(&self, query: &MenuListQuery) -> RbacRepoResult<Vec<MenuNode>> {
        (**self).list_menus(query)
    }

    fn list_permission_leaves(
        &self,
        category: PermissionCategory,
        menu_ids: Option<&[MenuId]>,
    ) -> RbacRepoResult<Vec<PermissionLeaf>> {
        (**self).list_permission_leaves(category, menu_ids)
    }

    fn load_roles(&self, role_ids: &[RoleId]) -> RbacRepoResult<Vec<Role>> {
        (**self).load_roles(role_ids)
    }

    fn get_user(&self, user_id: UserId) -> RbacRepoResult<Option<User>> {
        (**self).get_user(user_id)
    }

    fn list_depts(&self, status: Option<Status>) -> RbacRepoResult<Vec<Dept>> {
        (**self).list_depts(status)
    }
}

/// SQLite-backed RBAC repository.
pub struct SqliteRbacRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRbacRepository<'conn> {
    /// Creates repository from a connection migrated to the latest version.
    pub fn try_new(conn: &'conn Connection) -> RbacRepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = schema_version(conn)?;
        if actual_version != expected_version {
            return Err(RbacRepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }

    fn query_rows<T>(
        &self,
        sql: &str,
        bind_values: Vec<Value>,
        parse: impl Fn(&Row<'_>) -> RbacRepoResult<T>,
    ) -> RbacRepoResult<Vec<T>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse(row)?);
        }
        Ok(items)
    }

    fn load_id_set(&self, sql: &str, owner_id: i64) -> RbacRepoResult<BTreeSet<i64>> {
        let mut stmt = self.conn.prepare(sql)?;
        let ids = stmt
            .query_map([owner_id], |row| row.get::<_, i64>(0))?
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(ids)
    }
}

impl RbacRepository for SqliteRbacRepository<'_> {
    fn list_menus(&self, query: &MenuListQuery) -> RbacRepoResult<Vec<MenuNode>> {
        let mut sql = String::from(
            "SELECT id, parent_id, name, path, component, icon, kind, sort, status, hidden
             FROM menus
             WHERE 1 = 1",
        );
        let mut bind_values = Vec::new();

        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Integer(status_to_db(status)));
        }
        if let Some(ids) = &query.ids {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            push_in_clause(&mut sql, &mut bind_values, "id", ids);
        }
        sql.push_str(" ORDER BY sort ASC, id ASC;");

        self.query_rows(&sql, bind_values, parse_menu_row)
    }

    fn list_permission_leaves(
        &self,
        category: PermissionCategory,
        menu_ids: Option<&[MenuId]>,
    ) -> RbacRepoResult<Vec<PermissionLeaf>> {
        let mut sql = String::from(match category {
            PermissionCategory::Button => {
                "SELECT id, menu_id, name, code, NULL AS field_name
                 FROM menu_buttons
                 WHERE 1 = 1"
            }
            PermissionCategory::Column => {
                "SELECT id, menu_id, field_name AS name, code, field_name
                 FROM menu_column_fields
                 WHERE 1 = 1"
            }
        });
        let mut bind_values = Vec::new();

        if let Some(menu_ids) = menu_ids {
            if menu_ids.is_empty() {
                return Ok(Vec::new());
            }
            push_in_clause(&mut sql, &mut bind_values, "menu_id", menu_ids);
        }
        sql.push_str(" ORDER BY menu_id ASC, id ASC;");

        self.query_rows(&sql, bind_values, |row| {
            Ok(PermissionLeaf {
                id: row.get("id")?,
                menu_id: row.get("menu_id")?,
                category,
                name: row.get("name")?,
                code: row.get("code")?,
                field_name: row.get("field_name")?,
            })
        })
    }

    fn load_roles(&self, role_ids: &[RoleId]) -> RbacRepoResult<Vec<Role>> {
        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut sql = String::from("SELECT id, name FROM roles WHERE 1 = 1");
        let mut bind_values = Vec::new();
        push_in_clause(&mut sql, &mut bind_values, "id", role_ids);
        sql.push_str(" ORDER BY id ASC;");

        let mut roles = self.query_rows(&sql, bind_values, |row| {
            Ok(Role::new(row.get("id")?, row.get::<_, String>("name")?))
        })?;

        for role in &mut roles {
            role.menu_ids =
                self.load_id_set("SELECT menu_id FROM role_menus WHERE role_id = ?1;", role.id)?;
            role.button_permission_ids = self.load_id_set(
                "SELECT button_id FROM role_buttons WHERE role_id = ?1;",
                role.id,
            )?;
            role.column_permission_ids = self.load_id_set(
                "SELECT column_id FROM role_columns WHERE role_id = ?1;",
                role.id,
            )?;
            role.dept_ids =
                self.load_id_set("SELECT dept_id FROM role_depts WHERE role_id = ?1;", role.id)?;
        }
        Ok(roles)
    }

    fn get_user(&self, user_id: UserId) -> RbacRepoResult<Option<User>> {
        let row: Option<(String, i64)> = self
            .conn
            .query_row(
                "SELECT username, is_superuser FROM users WHERE id = ?1;",
                [user_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        let Some((username, is_superuser)) = row else {
            return Ok(None);
        };

        Ok(Some(User {
            id: user_id,
            username,
            is_superuser: parse_flag(is_superuser, "users.is_superuser")?,
            role_ids: self
                .load_id_set("SELECT role_id FROM user_roles WHERE user_id = ?1;", user_id)?,
        }))
    }

    fn list_depts(&self, status: Option<Status>) -> RbacRepoResult<Vec<Dept>> {
        let mut sql = String::from(
            "SELECT id, parent_id, name, owner, sort, status
             FROM depts
             WHERE 1 = 1",
        );
        let mut bind_values = Vec::new();
        if let Some(status) = status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Integer(status_to_db(status)));
        }
        sql.push_str(" ORDER BY sort ASC, id ASC;");

        self.query_rows(&sql, bind_values, |row| {
            Ok(Dept {
                id: row.get("id")?,
                parent_id: row.get("parent_id")?,
                name: row.get("name")?,
                owner: row.get("owner")?,
                sort: row.get("sort")?,
                status: parse_status(row.get("status")?, "depts.status")?,
            })
        })
    }
}

fn push_in_clause(sql: &mut String, bind_values: &mut Vec<Value>, column: &str, ids: &[i64]) {
    let placeholders = vec!["?"; ids.len()].join(", ");
    sql.push_str(&format!(" AND {column} IN ({placeholders})"));
    bind_values.extend(ids.iter().map(|id| Value::Integer(*id)));
}

fn parse_menu_row(row: &Row<'_>) -> RbacRepoResult<MenuNode> {
    let kind_text: String = row.get("kind")?;
    let kind = parse_menu_kind(&kind_text).ok_or_else(|| {
        RbacRepoError::InvalidData(format!("invalid menu kind `{kind_text}` in menus.kind"))
    })?;

    Ok(MenuNode {
        id: row.get("id")?,
        parent_id: row.get("parent_id")?,
        name: row.get("name")?,
        path: row.get("path")?,
        component: row.get("component")?,
        icon: row.get("icon")?,
        kind,
        sort: row.get("sort")?,
        status: parse_status(row.get("status")?, "menus.status")?,
        hidden: parse_flag(row.get("hidden")?, "menus.hidden")?,
    })
}

fn parse_menu_kind(value: &str) -> Option<MenuKind> {
    match value {
        "directory" => Some(MenuKind::Directory),
        "page" => Some(MenuKind::Page),
        "button" => Some(MenuKind::Button),
        _ => None,
    }
}

fn parse_status(value: i64, column: &'static str) -> RbacRepoResult<Status> {
    match value {
        1 => Ok(Status::Enabled),
        0 => Ok(Status::Disabled),
        other => Err(RbacRepoError::InvalidData(format!(
            "invalid status value `{other}` in {column}"
        ))),
    }
}

fn status_to_db(status: Status) -> i64 {
    match status {
        Status::Enabled => 1,
        Status::Disabled => 0,
    }
}

fn parse_flag(value: i64, column: &'static str) -> RbacRepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RbacRepoError::InvalidData(format!(
            "invalid flag value `{other}` in {column}"
        ))),
    }
}
