//! Context snapshot data model.
//!
//! A snapshot is an immutable value built fresh on every evaluation. The
//! sentinel snapshot stands for "no active context" and is produced from a
//! [`SnapshotSchema`], which knows the fixed placeholder for every attribute.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const NO_CASE: &str = "NO_CASE";
pub const NO_COMPANY: &str = "NO_COMPANY";

/// Identifier plus secondary attributes extracted at one point in time.
///
/// An attribute value of `None` means "present but unresolved". A missing key
/// compares equal to `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextSnapshot {
    pub identifier: Option<String>,
    pub attributes: BTreeMap<String, Option<String>>,
}

impl ContextSnapshot {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: Some(identifier.into()),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: Option<&str>) -> Self {
        self.attributes
            .insert(name.into(), value.map(str::to_string));
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(|value| value.as_deref())
    }
}

impl PartialEq for ContextSnapshot {
    fn eq(&self, other: &Self) -> bool {
        if self.identifier != other.identifier {
            return false;
        }

        self.attributes
            .keys()
            .chain(other.attributes.keys())
            .all(|key| self.attribute(key) == other.attribute(key))
    }
}

impl Eq for ContextSnapshot {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSpec {
    pub name: String,
    pub sentinel: String,
}

/// The attributes a deployment reports, and the sentinel for each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotSchema {
    pub identifier_sentinel: String,
    pub attributes: Vec<AttributeSpec>,
}

impl Default for SnapshotSchema {
    fn default() -> Self {
        Self {
            identifier_sentinel: NO_CASE.into(),
            attributes: vec![AttributeSpec {
                name: "company".into(),
                sentinel: NO_COMPANY.into(),
            }],
        }
    }
}

impl SnapshotSchema {
    /// The canonical "no active context" snapshot.
    pub fn sentinel(&self) -> ContextSnapshot {
        ContextSnapshot {
            identifier: Some(self.identifier_sentinel.clone()),
            attributes: self
                .attributes
                .iter()
                .map(|spec| (spec.name.clone(), Some(spec.sentinel.clone())))
                .collect(),
        }
    }

    pub fn is_sentinel(&self, snapshot: &ContextSnapshot) -> bool {
        *snapshot == self.sentinel()
    }

    pub fn sentinel_for(&self, attribute: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|spec| spec.name == attribute)
            .map(|spec| spec.sentinel.as_str())
    }
}
