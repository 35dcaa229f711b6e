//! The compound document emitted by the assembler.

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use utoipa::ToSchema;

use super::entity_key::EntityKey;
use super::representation::Representation;

/// How to build a URL for one relation path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LinkDescriptor {
    /// Href template with a `{<path>}` placeholder for the id.
    pub href: String,
    /// Plural key of the relation's target type.
    #[serde(rename = "type")]
    pub target_type: String,
}

/// A relation id that no supplied instance resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DanglingReference {
    pub path: String,
    pub owner: EntityKey,
    pub target: EntityKey,
}

/// The primary section: a list for list responses, one object for detail.
#[derive(Debug, Clone, PartialEq)]
pub enum Primary {
    Many(Vec<Representation>),
    One(Box<Representation>),
}

impl Primary {
    pub fn representations(&self) -> &[Representation] {
        match self {
            Primary::Many(items) => items,
            Primary::One(item) => std::slice::from_ref(item.as_ref()),
        }
    }
}

/// A compound document: primary resources, the link registry and the
/// deduplicated pool of linked resources.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundDocument {
    primary_key: String,
    primary: Primary,
    links: IndexMap<String, LinkDescriptor>,
    linked: IndexMap<String, Vec<Representation>>,
    dangling: Vec<DanglingReference>,
}

impl CompoundDocument {
    pub(crate) fn new(
        primary_key: impl Into<String>,
        primary: Primary,
        links: IndexMap<String, LinkDescriptor>,
        linked: IndexMap<String, Vec<Representation>>,
        dangling: Vec<DanglingReference>,
    ) -> Self {
        Self {
            primary_key: primary_key.into(),
            primary,
            links,
            linked,
            dangling,
        }
    }

    /// The top-level key of the primary section.
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    pub fn primary(&self) -> &Primary {
        &self.primary
    }

    /// Link descriptors keyed by dot-joined path, in discovery order.
    pub fn links(&self) -> &IndexMap<String, LinkDescriptor> {
        &self.links
    }

    /// Linked representations grouped by plural key, in discovery order.
    pub fn linked(&self) -> &IndexMap<String, Vec<Representation>> {
        &self.linked
    }

    pub fn linked_of(&self, plural_key: &str) -> &[Representation] {
        self.linked
            .get(plural_key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Relation ids that could not be resolved. Not serialized.
    pub fn dangling(&self) -> &[DanglingReference] {
        &self.dangling
    }

    pub fn linked_count(&self) -> usize {
        self.linked.values().map(Vec::len).sum()
    }
}

impl Serialize for CompoundDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 1 + usize::from(!self.links.is_empty()) + usize::from(!self.linked.is_empty());
        let mut map = serializer.serialize_map(Some(len))?;
        match &self.primary {
            Primary::Many(items) => map.serialize_entry(&self.primary_key, items)?,
            Primary::One(item) => map.serialize_entry(&self.primary_key, item)?,
        }
        if !self.links.is_empty() {
            map.serialize_entry("links", &self.links)?;
        }
        if !self.linked.is_empty() {
            map.serialize_entry("linked", &self.linked)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sections_are_omitted() {
        let doc = CompoundDocument::new(
            "posts",
            Primary::Many(vec![]),
            IndexMap::new(),
            IndexMap::new(),
            vec![],
        );
        assert_eq!(serde_json::to_string(&doc).unwrap(), r#"{"posts":[]}"#);
        assert_eq!(doc.linked_count(), 0);
        assert!(doc.linked_of("people").is_empty());
    }

    #[test]
    fn test_link_descriptor_renames_type() {
        let descriptor = LinkDescriptor {
            href: "http://testserver/posts/{comments.post}/".into(),
            target_type: "posts".into(),
        };
        assert_eq!(
            serde_json::to_string(&descriptor).unwrap(),
            r#"{"href":"http://testserver/posts/{comments.post}/","type":"posts"}"#
        );
    }
}
