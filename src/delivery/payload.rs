//! Flat wire payload.
//!
//! Every value on the wire is a string. Sentinels such as `NO_CASE` are plain
//! values here, not nulls, so an unresolved attribute is written as its
//! schema sentinel.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::models::{ContextSnapshot, SnapshotSchema};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Payload(BTreeMap<String, String>);

impl Payload {
    pub fn from_snapshot(
        snapshot: &ContextSnapshot,
        schema: &SnapshotSchema,
        identifier_field: &str,
    ) -> Self {
        let mut fields = BTreeMap::new();

        for spec in &schema.attributes {
            let value = snapshot
                .attribute(&spec.name)
                .unwrap_or(spec.sentinel.as_str());
            fields.insert(spec.name.clone(), value.to_string());
        }

        // Attributes outside the schema have no sentinel; only resolved ones go out.
        for (name, value) in &snapshot.attributes {
            if let (false, Some(value)) = (fields.contains_key(name), value) {
                fields.insert(name.clone(), value.clone());
            }
        }

        let identifier = snapshot
            .identifier
            .clone()
            .unwrap_or_else(|| schema.identifier_sentinel.clone());
        fields.insert(identifier_field.to_string(), identifier);

        Self(fields)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(&self.0) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "{:?}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttributeSpec, NO_CASE, NO_COMPANY};

    #[test]
    fn resolved_snapshot_is_flat() {
        let snapshot = ContextSnapshot::new("00012345").with_attribute("company", Some("Acme"));
        let payload = Payload::from_snapshot(&snapshot, &SnapshotSchema::default(), "case_number");

        assert_eq!(payload.len(), 2);
        assert!(!payload.is_empty());
        assert_eq!(payload.get("case_number"), Some("00012345"));
        assert_eq!(payload.get("company"), Some("Acme"));
        assert_eq!(
            payload.to_string(),
            r#"{"case_number":"00012345","company":"Acme"}"#
        );
    }

    #[test]
    fn sentinel_snapshot_uses_literal_values() {
        let schema = SnapshotSchema::default();
        let payload = Payload::from_snapshot(&schema.sentinel(), &schema, "case_number");
        assert_eq!(payload.get("case_number"), Some(NO_CASE));
        assert_eq!(payload.get("company"), Some(NO_COMPANY));
    }

    #[test]
    fn unresolved_attribute_falls_back_to_sentinel() {
        let snapshot = ContextSnapshot::new("00012345").with_attribute("company", None);
        let payload = Payload::from_snapshot(&snapshot, &SnapshotSchema::default(), "case_number");
        assert_eq!(payload.get("company"), Some(NO_COMPANY));
    }

    #[test]
    fn missing_identifier_uses_identifier_sentinel() {
        let payload = Payload::from_snapshot(
            &ContextSnapshot::default(),
            &SnapshotSchema::default(),
            "case_number",
        );
        assert_eq!(payload.get("case_number"), Some(NO_CASE));
    }

    #[test]
    fn extra_attributes_sent_only_when_resolved() {
        let schema = SnapshotSchema {
            identifier_sentinel: NO_CASE.into(),
            attributes: vec![AttributeSpec {
                name: "company".into(),
                sentinel: NO_COMPANY.into(),
            }],
        };
        let snapshot = ContextSnapshot::new("1")
            .with_attribute("owner", Some("pat"))
            .with_attribute("queue", None);
        let payload = Payload::from_snapshot(&snapshot, &schema, "id");

        assert_eq!(payload.get("owner"), Some("pat"));
        assert_eq!(payload.get("queue"), None);
        assert_eq!(payload.get("id"), Some("1"));
    }
}
