//! Rendered representations of resource instances.

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use utoipa::ToSchema;

use super::scalar_value::ScalarValue;

/// What a relation renders as inside a `links` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum LinkValue {
    /// A to-one relation: the id, or `null`.
    One(Option<String>),
    /// A to-many relation: ids in order, possibly empty.
    Many(Vec<String>),
}

/// One resource as it appears in the `primary` or `linked` section.
///
/// Serializes as `{<id attribute>, href, <attributes...>, links?}` in that
/// order. `links` is present, possibly empty, exactly for primary and embedded
/// representations.
#[derive(Debug, Clone, PartialEq)]
pub struct Representation {
    id_attribute: String,
    id: String,
    href: String,
    attributes: IndexMap<String, ScalarValue>,
    links: Option<IndexMap<String, LinkValue>>,
}

impl Representation {
    pub(crate) fn new(
        id_attribute: impl Into<String>,
        id: impl Into<String>,
        href: impl Into<String>,
        attributes: IndexMap<String, ScalarValue>,
    ) -> Self {
        Self {
            id_attribute: id_attribute.into(),
            id: id.into(),
            href: href.into(),
            attributes,
            links: None,
        }
    }

    pub(crate) fn with_links(mut self, links: IndexMap<String, LinkValue>) -> Self {
        self.links = Some(links);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn attributes(&self) -> &IndexMap<String, ScalarValue> {
        &self.attributes
    }

    /// The relation links, `None` for flat representations.
    pub fn links(&self) -> Option<&IndexMap<String, LinkValue>> {
        self.links.as_ref()
    }

    pub fn is_expanded(&self) -> bool {
        self.links.is_some()
    }
}

impl Serialize for Representation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 2 + self.attributes.len() + usize::from(self.links.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry(&self.id_attribute, &self.id)?;
        map.serialize_entry("href", &self.href)?;
        for (name, value) in &self.attributes {
            map.serialize_entry(name, value)?;
        }
        if let Some(links) = &self.links {
            map.serialize_entry("links", links)?;
        }
        map.end()
    }
}
