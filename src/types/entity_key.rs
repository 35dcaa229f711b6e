use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identity of a resource entity within one document: `(type, id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub struct EntityKey {
    #[serde(rename = "type")]
    pub type_name: String,
    pub id: String,
}

impl EntityKey {
    pub fn new(type_name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            id: id.into(),
        }
    }
}

impl Display for EntityKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, r#"{}::"{}""#, self.type_name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_entity_key_display() {
        assert_eq!(EntityKey::new("post", "1").to_string(), r#"post::"1""#);
    }

    #[test]
    fn test_same_id_different_type_is_distinct() {
        let keys: HashSet<EntityKey> = [
            EntityKey::new("post", "1"),
            EntityKey::new("person", "1"),
            EntityKey::new("post", "1"),
        ]
        .into_iter()
        .collect();
        assert_eq!(keys.len(), 2);
    }
}
