use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("failed to parse schema definition: {0}")]
    ParseError(String),

    #[error("relation '{owner}.{field}' targets unknown resource type '{target}'")]
    UnknownTargetType {
        owner: String,
        field: String,
        target: String,
    },

    #[error("resource type '{0}' is declared more than once (by name or plural key)")]
    DuplicateType(String),

    #[error("relation '{field}' is declared more than once on resource type '{owner}'")]
    DuplicateRelation { owner: String, field: String },

    #[error("invalid name '{0}': expected letters, digits and underscores only")]
    InvalidName(String),

    #[error("embedded relations form a cycle: {0}")]
    EmbeddedCycle(String),

    #[error("no href template registered for '{0}'")]
    MissingHrefTemplate(String),

    #[error("invalid href template for '{plural_key}': {reason}")]
    InvalidHrefTemplate { plural_key: String, reason: String },

    #[error("schema registry already installed")]
    RegistryAlreadyInstalled,

    #[error("no schema registry installed")]
    RegistryNotInstalled,

    #[error("unknown resource type '{0}'")]
    UnknownResourceType(String),

    #[error("batch mixes resource types: expected '{expected}', found '{found}'")]
    HeterogeneousBatch { expected: String, found: String },

    #[error("cannot infer the resource type of an empty batch")]
    EmptyBatch,
}

impl From<serde_json::Error> for AssemblyError {
    fn from(err: serde_json::Error) -> Self {
        AssemblyError::ParseError(err.to_string())
    }
}
