//! The schema registry: every resource type and its relation fields.
//!
//! A registry is built once at startup through [`SchemaRegistryBuilder`],
//! which rejects broken configurations before any request is served:
//! unknown relation targets, duplicate types or relations, names that cannot
//! be joined into dot paths, and cycles of embedded relations.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use indexmap::IndexMap;
use itertools::Itertools;
use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use tracing::{debug, info};

use crate::error::AssemblyError;
use crate::types::{RelationMode, ResourceType};

static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

static GLOBAL_REGISTRY: OnceCell<Arc<SchemaRegistry>> = OnceCell::new();

/// Immutable, validated set of resource types keyed by singular name.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaRegistry {
    types: IndexMap<String, ResourceType>,
    plural_index: HashMap<String, String>,
}

impl SchemaRegistry {
    /// Types in registration order.
    pub fn types(&self) -> impl Iterator<Item = &ResourceType> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ResourceType> {
        self.types.get(name)
    }

    pub fn get_by_plural(&self, plural_key: &str) -> Option<&ResourceType> {
        self.plural_index
            .get(plural_key)
            .and_then(|name| self.types.get(name))
    }

    /// Like [`get`](Self::get), but unknown names are a request error.
    pub fn resolve(&self, name: &str) -> Result<&ResourceType, AssemblyError> {
        self.get(name)
            .ok_or_else(|| AssemblyError::UnknownResourceType(name.to_string()))
    }
}

/// Collects resource types and validates them into a [`SchemaRegistry`].
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistryBuilder {
    types: Vec<ResourceType>,
}

impl SchemaRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_type(mut self, ty: ResourceType) -> Self {
        self.types.push(ty);
        self
    }

    pub fn add_types(mut self, types: impl IntoIterator<Item = ResourceType>) -> Self {
        self.types.extend(types);
        self
    }

    pub fn build(self) -> Result<SchemaRegistry, AssemblyError> {
        let mut types: IndexMap<String, ResourceType> = IndexMap::new();
        let mut plural_index: HashMap<String, String> = HashMap::new();

        for ty in self.types {
            validate_name(ty.name())?;
            validate_name(ty.plural_key())?;
            if types.contains_key(ty.name()) {
                return Err(AssemblyError::DuplicateType(ty.name().to_string()));
            }
            if plural_index.contains_key(ty.plural_key()) {
                return Err(AssemblyError::DuplicateType(ty.plural_key().to_string()));
            }

            let mut seen = HashSet::new();
            for field in ty.relations() {
                validate_name(field.name())?;
                if !seen.insert(field.name()) {
                    return Err(AssemblyError::DuplicateRelation {
                        owner: ty.name().to_string(),
                        field: field.name().to_string(),
                    });
                }
            }

            plural_index.insert(ty.plural_key().to_string(), ty.name().to_string());
            types.insert(ty.name().to_string(), ty);
        }

        for ty in types.values() {
            for field in ty.relations() {
                if !types.contains_key(field.target_type()) {
                    return Err(AssemblyError::UnknownTargetType {
                        owner: ty.name().to_string(),
                        field: field.name().to_string(),
                        target: field.target_type().to_string(),
                    });
                }
            }
        }

        if let Some(cycle) = find_embedded_cycle(&types) {
            return Err(AssemblyError::EmbeddedCycle(cycle));
        }

        info!(
            event = "Schema",
            phase = "Registered",
            types = types.len(),
            names = types.keys().join(",")
        );

        Ok(SchemaRegistry {
            types,
            plural_index,
        })
    }
}

fn validate_name(name: &str) -> Result<(), AssemblyError> {
    if NAME_PATTERN.is_match(name) {
        Ok(())
    } else {
        Err(AssemblyError::InvalidName(name.to_string()))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Depth-first search over embedded edges. Returns the first cycle found,
/// rendered as `person.favorite_post -> post.owner -> person`.
fn find_embedded_cycle(types: &IndexMap<String, ResourceType>) -> Option<String> {
    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut trail: Vec<(&str, &str)> = Vec::new();
    types
        .keys()
        .find_map(|name| visit(name, types, &mut marks, &mut trail))
}

fn visit<'a>(
    name: &'a str,
    types: &'a IndexMap<String, ResourceType>,
    marks: &mut HashMap<&'a str, Mark>,
    trail: &mut Vec<(&'a str, &'a str)>,
) -> Option<String> {
    match marks.get(name) {
        Some(Mark::Done) => return None,
        Some(Mark::Visiting) => {
            let start = trail.iter().position(|(owner, _)| *owner == name)?;
            let hops = trail[start..]
                .iter()
                .map(|(owner, field)| format!("{owner}.{field}"))
                .join(" -> ");
            return Some(format!("{hops} -> {name}"));
        }
        None => {}
    }

    let ty = types.get(name)?;
    marks.insert(name, Mark::Visiting);
    for field in ty.relations() {
        if field.mode() != RelationMode::Embedded {
            continue;
        }
        trail.push((name, field.name()));
        if let Some(cycle) = visit(field.target_type(), types, marks, trail) {
            return Some(cycle);
        }
        trail.pop();
    }
    marks.insert(name, Mark::Done);
    None
}

/// Install the process-wide registry. Call once at startup.
pub fn install_global(registry: SchemaRegistry) -> Result<Arc<SchemaRegistry>, AssemblyError> {
    let registry = Arc::new(registry);
    GLOBAL_REGISTRY
        .set(Arc::clone(&registry))
        .map_err(|_| AssemblyError::RegistryAlreadyInstalled)?;
    debug!(event = "Schema", phase = "Installed", types = registry.len());
    Ok(registry)
}

/// The process-wide registry, if one has been installed.
pub fn global() -> Option<Arc<SchemaRegistry>> {
    GLOBAL_REGISTRY.get().cloned()
}
