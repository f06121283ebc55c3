//! Identifier aliases and the tagged node identifier.
//!
//! # Responsibility
//! - Keep numeric entity identifiers explicit in signatures.
//! - Distinguish menu, button and column nodes that share one picker tree
//!   without encoding the category into string prefixes.
//!
//! # Invariants
//! - `TaggedId` equality covers both category and numeric id; a button with
//!   id `3` never equals menu `3`.
//! - Wire form is a bare number for menus and `b<id>` / `c<id>` for leaves.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Menu primary key.
pub type MenuId = i64;
/// Role primary key.
pub type RoleId = i64;
/// User primary key.
pub type UserId = i64;
/// Department primary key.
pub type DeptId = i64;
/// Button or column permission primary key.
pub type PermissionId = i64;

/// Category of a node inside a mixed menu/permission tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeCategory {
    Menu,
    Button,
    Column,
}

impl NodeCategory {
    fn wire_prefix(self) -> &'static str {
        match self {
            Self::Menu => "",
            Self::Button => "b",
            Self::Column => "c",
        }
    }
}

/// Identifier carrying its node category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaggedId {
    pub category: NodeCategory,
    pub id: i64,
}

impl TaggedId {
    pub fn menu(id: MenuId) -> Self {
        Self {
            category: NodeCategory::Menu,
            id,
        }
    }

    pub fn button(id: PermissionId) -> Self {
        Self {
            category: NodeCategory::Button,
            id,
        }
    }

    pub fn column(id: PermissionId) -> Self {
        Self {
            category: NodeCategory::Column,
            id,
        }
    }

    /// Returns whether this id belongs to `category`.
    pub fn is(self, category: NodeCategory) -> bool {
        self.category == category
    }
}

impl Display for TaggedId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.category.wire_prefix(), self.id)
    }
}

/// Parse failure for the `b<id>` / `c<id>` / `<id>` wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedIdParseError(pub String);

impl Display for TaggedIdParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid tagged id `{}`", self.0)
    }
}

impl Error for TaggedIdParseError {}

impl FromStr for TaggedId {
    type Err = TaggedIdParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let (category, digits) = if let Some(rest) = trimmed.strip_prefix('b') {
            (NodeCategory::Button, rest)
        } else if let Some(rest) = trimmed.strip_prefix('c') {
            (NodeCategory::Column, rest)
        } else {
            (NodeCategory::Menu, trimmed)
        };
        if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(TaggedIdParseError(value.to_string()));
        }
        let id = digits
            .parse::<i64>()
            .map_err(|_| TaggedIdParseError(value.to_string()))?;
        Ok(Self { category, id })
    }
}

impl Serialize for TaggedId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.category {
            NodeCategory::Menu => serializer.serialize_i64(self.id),
            NodeCategory::Button | NodeCategory::Column => {
                serializer.collect_str(self)
            }
        }
    }
}

impl<'de> Deserialize<'de> for TaggedId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TaggedIdVisitor)
    }
}

struct TaggedIdVisitor;

impl Visitor<'_> for TaggedIdVisitor {
    type Value = TaggedId;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("a menu id number or a `b<id>`/`c<id>` string")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<TaggedId, E> {
        Ok(TaggedId::menu(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<TaggedId, E> {
        i64::try_from(value)
            .map(TaggedId::menu)
            .map_err(|_| E::custom(format!("menu id out of range: {value}")))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<TaggedId, E> {
        value.parse().map_err(E::custom)
    }
}
