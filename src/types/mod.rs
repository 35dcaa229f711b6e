//! Data model types for schemas, instances and compound documents.
//!
//! Naming conventions used across the crate:
//! - A resource type has a singular `name` ("post") and a `plural_key`
//!   ("posts"). Instances and relation targets refer to types by `name`;
//!   document sections and relation paths use the `plural_key`.
//! - Entities are identified by [`EntityKey`], rendered as `post::"1"`.

mod document;
mod entity_key;
mod instance;
mod relation_path;
mod representation;
mod resource_type;
mod scalar_value;
mod store;

pub use document::{CompoundDocument, DanglingReference, LinkDescriptor, Primary};
pub use entity_key::EntityKey;
pub use instance::{RelationValue, ResourceInstance};
pub use relation_path::RelationPath;
pub use representation::{LinkValue, Representation};
pub use resource_type::{Cardinality, RelationField, RelationMode, ResourceType};
pub use scalar_value::ScalarValue;
pub use store::ResourceStore;
