use serde::{Deserialize, Serialize};

use crate::error::AssemblyError;
use crate::schema::{SchemaRegistry, SchemaRegistryBuilder};
use crate::types::ResourceType;

/// Declarative schema definition, as loaded from configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaDefinition {
    pub types: Vec<ResourceType>,
}

/// Compile a JSON schema definition into a validated `SchemaRegistry`.
///
/// JSON syntax errors map to `AssemblyError::ParseError`; everything else is
/// validated by [`SchemaRegistryBuilder::build`].
///
/// Example:
/// ```rust
/// use sideload_core::compile_schema;
/// let text = r#"{"types": [
///     {"name": "post", "plural_key": "posts",
///      "relations": [{"name": "comments", "target_type": "comment", "cardinality": "many"}]},
///     {"name": "comment", "plural_key": "comments"}
/// ]}"#;
/// let registry = compile_schema(text).unwrap();
/// assert_eq!(registry.len(), 2);
/// ```
pub fn compile_schema(text: &str) -> Result<SchemaRegistry, AssemblyError> {
    let definition: SchemaDefinition = serde_json::from_str(text)?;
    SchemaRegistryBuilder::new()
        .add_types(definition.types)
        .build()
}
