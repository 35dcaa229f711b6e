use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::error::AssemblyError;
use crate::render::Renderer;
use crate::types::{EntityKey, Representation, ResourceInstance};
use crate::walker::Tier;

#[derive(Debug, Clone, Copy)]
struct PoolEntry<'a> {
    instance: &'a ResourceInstance,
    tier: Tier,
    expand: bool,
}

/// Secondary entities discovered by the walk, unique by `(type, id)`.
///
/// The first sighting fixes an entity's position. A later sighting through
/// an embedded relation upgrades it to an expanded rendering in place.
#[derive(Debug, Default)]
pub struct LinkedPool<'a> {
    entries: IndexMap<EntityKey, PoolEntry<'a>>,
}

impl<'a> LinkedPool<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `instance` seen at `tier`. Returns `true` on first sighting.
    pub fn add(&mut self, instance: &'a ResourceInstance, tier: Tier, expand: bool) -> bool {
        match self.entries.entry(instance.key()) {
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                entry.expand |= expand;
                entry.tier = entry.tier.min(tier);
                false
            }
            Entry::Vacant(vacant) => {
                vacant.insert(PoolEntry {
                    instance,
                    tier,
                    expand,
                });
                true
            }
        }
    }

    pub fn contains(&self, key: &EntityKey) -> bool {
        self.entries.contains_key(key)
    }

    /// The shallowest tier `key` was seen at.
    pub fn tier_of(&self, key: &EntityKey) -> Option<Tier> {
        self.entries.get(key).map(|entry| entry.tier)
    }

    pub fn is_expanded(&self, key: &EntityKey) -> bool {
        self.entries.get(key).is_some_and(|entry| entry.expand)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render every pooled entity not matched by `exclude`, grouped by plural
    /// key. Groups appear in the order of their first rendered member, so a
    /// type whose every member is excluded does not appear at all.
    pub(crate) fn render(
        &self,
        renderer: &Renderer<'_>,
        exclude: impl Fn(&EntityKey) -> bool,
    ) -> Result<IndexMap<String, Vec<Representation>>, AssemblyError> {
        let mut linked: IndexMap<String, Vec<Representation>> = IndexMap::new();
        for (key, entry) in &self.entries {
            if exclude(key) {
                continue;
            }
            let representation = if entry.expand {
                renderer.expanded(entry.instance)?
            } else {
                renderer.flat(entry.instance)?
            };
            linked
                .entry(renderer.plural_key(&key.type_name)?.to_string())
                .or_default()
                .push(representation);
        }
        Ok(linked)
    }
}
