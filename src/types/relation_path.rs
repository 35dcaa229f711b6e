//! Relation paths: the dot-joined route from a root type to a relation field.

use std::fmt::{Display, Formatter, Result as FmtResult};

use itertools::Itertools;
use serde::{Serialize, Serializer};

/// An ordered list of path segments, e.g. `["people", "posts", "author"]`.
///
/// Root-tier paths are `[root plural key, field]`. Paths below an embedded
/// relation use the embedded target's plural key as the middle segment, so
/// different fields reaching the same type share one path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationPath {
    segments: Vec<String>,
}

impl RelationPath {
    pub fn root(root_plural: &str, field: &str) -> Self {
        Self {
            segments: vec![root_plural.to_string(), field.to_string()],
        }
    }

    pub fn nested(root_plural: &str, target_plural: &str, field: &str) -> Self {
        Self {
            segments: vec![
                root_plural.to_string(),
                target_plural.to_string(),
                field.to_string(),
            ],
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The relation field this path ends in.
    pub fn field(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Client-side substitution placeholder, e.g. `{posts.comments}`.
    pub fn placeholder(&self) -> String {
        format!("{{{}}}", self)
    }
}

impl Display for RelationPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.segments.iter().join("."))
    }
}

impl Serialize for RelationPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
