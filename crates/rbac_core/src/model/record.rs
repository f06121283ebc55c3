//! Attribute-agnostic flat record.
//!
//! Used when a caller hands over rows whose display fields the core does
//! not know about; only `id` and `parent_id` are read.

use crate::tree::TreeRecord;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Flat record with identity, optional parent and arbitrary attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(flatten)]
    pub attrs: Map<String, Value>,
}

impl Record {
    pub fn new(id: i64, parent_id: Option<i64>) -> Self {
        Self {
            id,
            parent_id,
            attrs: Map::new(),
        }
    }

    /// Sets one attribute and returns the record for chaining.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }
}

impl TreeRecord for Record {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }

    fn parent_id(&self) -> Option<i64> {
        self.parent_id
    }
}

#[cfg(test)]
mod tests {
    use super::Record;
    use serde_json::json;

    #[test]
    fn unknown_fields_are_kept_as_attributes() {
        let record: Record =
            serde_json::from_value(json!({"id": 4, "parent_id": null, "title": "Ops", "sort": 2}))
                .unwrap();
        assert_eq!(record.id, 4);
        assert_eq!(record.parent_id, None);
        assert_eq!(record.attrs.get("title"), Some(&json!("Ops")));
        assert_eq!(record.attrs.get("sort"), Some(&json!(2)));
    }
}
