//! The relation walker: visits root instances and their declared relations.
//!
//! The walk is bounded by an explicit tier counter rather than open
//! recursion:
//!
//! - **Primary** (tier 0): the roots. Every declared relation registers its
//!   path `[root plural, field]`, whether or not it holds a value.
//! - **Direct** (tier 1): targets of a root's relations. `reference` targets
//!   are pooled flat, `embedded` targets are pooled expanded and walked one
//!   more tier, `link_only` targets are only checked for existence.
//! - **Nested** (tier 2): targets of an embedded target's relations, under the
//!   path `[root plural, embedded target plural, field]`. Always pooled flat;
//!   the walk stops here unconditionally.
//!
//! Per root, every tier-1 relation is handled before any embedded target is
//! descended into, so root paths always precede nested paths.

use std::collections::HashMap;

use strum_macros::Display;
use tracing::{debug, warn};

use crate::error::AssemblyError;
use crate::link_registry::LinkRegistry;
use crate::metrics;
use crate::pool::LinkedPool;
use crate::schema::SchemaRegistry;
use crate::traits::{HrefBuilder, ResourceLookup};
use crate::types::{
    Cardinality, DanglingReference, EntityKey, RelationField, RelationMode, RelationPath,
    ResourceInstance, ResourceType,
};

/// Traversal depth from a root instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub enum Tier {
    Primary = 0,
    Direct = 1,
    Nested = 2,
}

/// Everything a finished walk discovered.
pub struct WalkOutcome<'a> {
    pub links: LinkRegistry<'a>,
    pub pool: LinkedPool<'a>,
    pub dangling: Vec<DanglingReference>,
}

/// Per-request walker state. Not shared across requests.
pub struct RelationWalker<'a> {
    registry: &'a SchemaRegistry,
    lookup: &'a dyn ResourceLookup,
    primary: HashMap<EntityKey, &'a ResourceInstance>,
    links: LinkRegistry<'a>,
    pool: LinkedPool<'a>,
    dangling: Vec<DanglingReference>,
}

impl<'a> RelationWalker<'a> {
    /// Create a walker for one batch. `primary` is the whole batch; relation
    /// targets found in it resolve to the root itself.
    pub fn new(
        registry: &'a SchemaRegistry,
        hrefs: &'a dyn HrefBuilder,
        lookup: &'a dyn ResourceLookup,
        primary: impl IntoIterator<Item = &'a ResourceInstance>,
    ) -> Self {
        Self {
            registry,
            lookup,
            primary: primary
                .into_iter()
                .map(|instance| (instance.key(), instance))
                .collect(),
            links: LinkRegistry::new(hrefs),
            pool: LinkedPool::new(),
            dangling: Vec::new(),
        }
    }

    /// Walk one root instance.
    pub fn walk_root(&mut self, root: &'a ResourceInstance) -> Result<(), AssemblyError> {
        let registry = self.registry;
        let root_ty = registry.resolve(root.type_name())?;
        debug!(
            event = "Assemble",
            phase = "Walk",
            root = root.to_string(),
            relations = root_ty.relations().len()
        );

        let mut embedded: Vec<(&'a ResourceType, Vec<&'a ResourceInstance>)> = Vec::new();

        for field in root_ty.relations() {
            let target_ty = registry.resolve(field.target_type())?;
            let path = RelationPath::root(root_ty.plural_key(), field.name());
            self.links.register(&path, field, target_ty);

            match field.mode() {
                RelationMode::LinkOnly => {
                    self.resolve_targets(root, field, &path);
                }
                RelationMode::Reference => {
                    for target in self.resolve_targets(root, field, &path) {
                        self.pool.add(target, Tier::Direct, false);
                    }
                }
                RelationMode::Embedded => {
                    let targets = self.resolve_targets(root, field, &path);
                    for &target in &targets {
                        self.pool.add(target, Tier::Direct, true);
                    }
                    embedded.push((target_ty, targets));
                }
            }
        }

        for (embedded_ty, targets) in embedded {
            self.walk_embedded(root_ty, embedded_ty, &targets)?;
        }
        Ok(())
    }

    /// Register the nested paths under one embedded relation and pool the
    /// nested targets flat.
    fn walk_embedded(
        &mut self,
        root_ty: &'a ResourceType,
        embedded_ty: &'a ResourceType,
        targets: &[&'a ResourceInstance],
    ) -> Result<(), AssemblyError> {
        let registry = self.registry;
        let mut nested_paths = Vec::with_capacity(embedded_ty.relations().len());
        for field in embedded_ty.relations() {
            let target_ty = registry.resolve(field.target_type())?;
            let path = RelationPath::nested(root_ty.plural_key(), embedded_ty.plural_key(), field.name());
            self.links.register(&path, field, target_ty);
            nested_paths.push((field, path));
        }

        for &owner in targets {
            for (field, path) in &nested_paths {
                let resolved = self.resolve_targets(owner, field, path);
                if !field.mode().sideloads() {
                    continue;
                }
                for target in resolved {
                    self.pool.add(target, Tier::Nested, false);
                }
            }
        }
        Ok(())
    }

    /// Resolve the ids `owner` holds in `field`, first against the primary
    /// batch, then through the lookup. Unresolvable ids are recorded as
    /// dangling and skipped.
    fn resolve_targets(
        &mut self,
        owner: &'a ResourceInstance,
        field: &RelationField,
        path: &RelationPath,
    ) -> Vec<&'a ResourceInstance> {
        let Some(value) = owner.relation(field.name()) else {
            return Vec::new();
        };

        let mut ids = value.ids();
        if field.cardinality() == Cardinality::One && ids.len() > 1 {
            warn!(
                event = "Assemble",
                phase = "Walk",
                owner = owner.to_string(),
                path = path.to_string(),
                ids = ids.len(),
                "to-one relation holds several ids; keeping the first"
            );
            ids.truncate(1);
        }

        let lookup = self.lookup;
        let mut resolved = Vec::with_capacity(ids.len());
        for id in ids {
            let key = EntityKey::new(field.target_type(), id);
            if let Some(instance) = self.primary.get(&key) {
                resolved.push(*instance);
            } else if let Some(instance) = lookup.lookup(field.target_type(), id) {
                resolved.push(instance);
            } else {
                self.record_dangling(owner, path, key);
            }
        }
        resolved
    }

    fn record_dangling(&mut self, owner: &ResourceInstance, path: &RelationPath, target: EntityKey) {
        let reference = DanglingReference {
            path: path.to_string(),
            owner: owner.key(),
            target,
        };
        warn!(
            event = "Assemble",
            phase = "Walk",
            path = reference.path.as_str(),
            owner = reference.owner.to_string(),
            target = reference.target.to_string(),
            "relation id has no resolvable instance"
        );
        metrics::record_dangling(&reference);
        self.dangling.push(reference);
    }

    pub fn finish(self) -> WalkOutcome<'a> {
        WalkOutcome {
            links: self.links,
            pool: self.pool,
            dangling: self.dangling,
        }
    }
}
