use indexmap::IndexMap;

use crate::traits::ResourceLookup;

use super::entity_key::EntityKey;
use super::instance::ResourceInstance;

/// In-memory `(type, id) → instance` lookup for already-materialized data.
#[derive(Debug, Clone, Default)]
pub struct ResourceStore {
    instances: IndexMap<EntityKey, ResourceInstance>,
}

impl ResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an instance, replacing any earlier one with the same key.
    pub fn insert(&mut self, instance: ResourceInstance) -> Option<ResourceInstance> {
        self.instances.insert(instance.key(), instance)
    }

    pub fn with(mut self, instance: ResourceInstance) -> Self {
        self.insert(instance);
        self
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// All stored instances of `type_name`, in insertion order.
    pub fn of_type<'a>(&'a self, type_name: &'a str) -> impl Iterator<Item = &'a ResourceInstance> {
        self.instances
            .values()
            .filter(move |instance| instance.type_name() == type_name)
    }
}

impl FromIterator<ResourceInstance> for ResourceStore {
    fn from_iter<T: IntoIterator<Item = ResourceInstance>>(iter: T) -> Self {
        let mut store = ResourceStore::new();
        for instance in iter {
            store.insert(instance);
        }
        store
    }
}

impl ResourceLookup for ResourceStore {
    fn lookup(&self, type_name: &str, id: &str) -> Option<&ResourceInstance> {
        self.instances.get(&EntityKey::new(type_name, id))
    }
}
