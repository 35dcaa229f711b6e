//! Concrete resource instances supplied per request.

use std::fmt::{Display, Formatter, Result as FmtResult};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::entity_key::EntityKey;
use super::scalar_value::ScalarValue;

/// The raw value of one relation field on an instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationValue {
    One(Option<String>),
    Many(Vec<String>),
}

impl RelationValue {
    /// The ids held, in order. `One(None)` holds nothing.
    pub fn ids(&self) -> Vec<&str> {
        match self {
            RelationValue::One(id) => id.as_deref().into_iter().collect(),
            RelationValue::Many(ids) => ids.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RelationValue::One(id) => id.is_none(),
            RelationValue::Many(ids) => ids.is_empty(),
        }
    }
}

/// A resource entity as handed to the assembler. Never mutated by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceInstance {
    #[serde(rename = "type")]
    type_name: String,
    id: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    attributes: IndexMap<String, ScalarValue>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    relations: IndexMap<String, RelationValue>,
}

impl Display for ResourceInstance {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, r#"{}::"{}""#, self.type_name, self.id)
    }
}

impl ResourceInstance {
    /// Create an instance of `type_name` with `id`.
    pub fn new(type_name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            id: id.into(),
            attributes: IndexMap::new(),
            relations: IndexMap::new(),
        }
    }

    /// Add a scalar attribute. Attribute order is preserved.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Point a to-one relation at `id`.
    pub fn with_one(mut self, field: impl Into<String>, id: impl Into<String>) -> Self {
        self.relations
            .insert(field.into(), RelationValue::One(Some(id.into())));
        self
    }

    /// Explicitly null a to-one relation.
    pub fn with_none(mut self, field: impl Into<String>) -> Self {
        self.relations.insert(field.into(), RelationValue::One(None));
        self
    }

    /// Point a to-many relation at `ids`, in order.
    pub fn with_many<I, S>(mut self, field: impl Into<String>, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relations.insert(
            field.into(),
            RelationValue::Many(ids.into_iter().map(Into::into).collect()),
        );
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn key(&self) -> EntityKey {
        EntityKey::new(&self.type_name, &self.id)
    }

    pub fn attributes(&self) -> &IndexMap<String, ScalarValue> {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&ScalarValue> {
        self.attributes.get(name)
    }

    /// The value of relation `field`; `None` means absent, i.e. empty.
    pub fn relation(&self, field: &str) -> Option<&RelationValue> {
        self.relations.get(field)
    }
}
