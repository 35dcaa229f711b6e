// src/lib.rs
pub use assembler::Assembler;
pub use error::AssemblyError;
pub use hrefs::TemplateHrefBuilder;
pub use link_registry::LinkRegistry;
pub use loader::{SchemaDefinition, compile_schema};
pub use pool::LinkedPool;
pub use schema::{SchemaRegistry, SchemaRegistryBuilder};
pub use traits::{HrefBuilder, NoLookup, ResourceLookup};
pub use types::*;
pub use walker::{RelationWalker, Tier, WalkOutcome};

mod assembler;
mod error;
mod hrefs;
mod link_registry;
mod loader;
pub mod metrics;
mod pool;
mod render;
pub mod schema;
mod traits;
pub mod types;
mod walker;

#[cfg(feature = "bench-internal")]
pub mod bench_helpers;
