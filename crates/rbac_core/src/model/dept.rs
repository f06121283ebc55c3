//! Department record.

use crate::model::ids::DeptId;
use crate::model::menu::Status;
use crate::tree::TreeRecord;
use serde::{Deserialize, Serialize};

/// One department row as read from a storage snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dept {
    pub id: DeptId,
    pub parent_id: Option<DeptId>,
    pub name: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub sort: i64,
    #[serde(default)]
    pub status: Status,
}

impl Dept {
    pub fn new(id: DeptId, parent_id: Option<DeptId>, name: impl Into<String>) -> Self {
        Self {
            id,
            parent_id,
            name: name.into(),
            owner: None,
            sort: 0,
            status: Status::Enabled,
        }
    }
}

impl TreeRecord for Dept {
    type Id = DeptId;

    fn id(&self) -> DeptId {
        self.id
    }

    fn parent_id(&self) -> Option<DeptId> {
        self.parent_id
    }
}
