//! Static resource type and relation declarations.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

fn default_id_attribute() -> String {
    "id".to_string()
}

/// How many ids a relation holds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Cardinality {
    One,
    Many,
}

/// How a relation's target is carried in the compound document.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RelationMode {
    /// Sideload the target flat, by id.
    #[default]
    Reference,
    /// Sideload the target with its own links, and its references one tier deeper.
    Embedded,
    /// Show the id and register the path, never sideload the target.
    LinkOnly,
}

impl RelationMode {
    /// Whether targets reached through this mode enter the linked pool.
    pub fn sideloads(self) -> bool {
        !matches!(self, RelationMode::LinkOnly)
    }
}

/// A relation field declared on a resource type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RelationField {
    name: String,
    target_type: String,
    cardinality: Cardinality,
    #[serde(default)]
    mode: RelationMode,
}

impl RelationField {
    pub fn new(
        name: impl Into<String>,
        target_type: impl Into<String>,
        cardinality: Cardinality,
        mode: RelationMode,
    ) -> Self {
        Self {
            name: name.into(),
            target_type: target_type.into(),
            cardinality,
            mode,
        }
    }

    pub fn one(name: impl Into<String>, target_type: impl Into<String>) -> Self {
        Self::new(name, target_type, Cardinality::One, RelationMode::Reference)
    }

    pub fn many(name: impl Into<String>, target_type: impl Into<String>) -> Self {
        Self::new(name, target_type, Cardinality::Many, RelationMode::Reference)
    }

    /// Switch the field to embedded mode.
    pub fn embedded(mut self) -> Self {
        self.mode = RelationMode::Embedded;
        self
    }

    /// Switch the field to link-only mode.
    pub fn link_only(mut self) -> Self {
        self.mode = RelationMode::LinkOnly;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target_type(&self) -> &str {
        &self.target_type
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn mode(&self) -> RelationMode {
        self.mode
    }
}

/// A resource type: identity, output keys, rendered attributes and relations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ResourceType {
    /// Singular name, e.g. "post". Used as the key of single-instance responses.
    name: String,
    /// Grouping key in the document, e.g. "posts". Also the path segment.
    plural_key: String,
    #[serde(default = "default_id_attribute")]
    id_attribute: String,
    /// Attributes to render, in order. `None` renders every attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attributes: Option<Vec<String>>,
    #[serde(default)]
    relations: Vec<RelationField>,
}

impl ResourceType {
    pub fn new(name: impl Into<String>, plural_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            plural_key: plural_key.into(),
            id_attribute: default_id_attribute(),
            attributes: None,
            relations: Vec::new(),
        }
    }

    pub fn with_id_attribute(mut self, id_attribute: impl Into<String>) -> Self {
        self.id_attribute = id_attribute.into();
        self
    }

    pub fn with_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = Some(attributes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_relation(mut self, field: RelationField) -> Self {
        self.relations.push(field);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn plural_key(&self) -> &str {
        &self.plural_key
    }

    pub fn id_attribute(&self) -> &str {
        &self.id_attribute
    }

    pub fn attributes(&self) -> Option<&[String]> {
        self.attributes.as_deref()
    }

    /// Relation fields in declaration order.
    pub fn relations(&self) -> &[RelationField] {
        &self.relations
    }

    pub fn relation(&self, name: &str) -> Option<&RelationField> {
        self.relations.iter().find(|field| field.name == name)
    }
}
