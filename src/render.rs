use indexmap::IndexMap;
use tracing::debug;

use crate::error::AssemblyError;
use crate::schema::SchemaRegistry;
use crate::traits::HrefBuilder;
use crate::types::{
    Cardinality, LinkValue, Representation, ResourceInstance, ResourceType, ScalarValue,
};

/// Keys a representation emits itself; attributes with these names are dropped.
const RESERVED_KEYS: [&str; 2] = ["href", "links"];

/// Turns instances into representations: flat (id, href, attributes) or
/// expanded (flat plus `links`).
pub(crate) struct Renderer<'a> {
    registry: &'a SchemaRegistry,
    hrefs: &'a dyn HrefBuilder,
}

impl<'a> Renderer<'a> {
    pub(crate) fn new(registry: &'a SchemaRegistry, hrefs: &'a dyn HrefBuilder) -> Self {
        Self { registry, hrefs }
    }

    pub(crate) fn plural_key(&self, type_name: &str) -> Result<&'a str, AssemblyError> {
        Ok(self.registry.resolve(type_name)?.plural_key())
    }

    pub(crate) fn flat(&self, instance: &ResourceInstance) -> Result<Representation, AssemblyError> {
        let ty = self.registry.resolve(instance.type_name())?;
        Ok(Representation::new(
            ty.id_attribute(),
            instance.id(),
            self.hrefs.build_href(ty.plural_key(), instance.id()),
            attributes(ty, instance),
        ))
    }

    pub(crate) fn expanded(
        &self,
        instance: &ResourceInstance,
    ) -> Result<Representation, AssemblyError> {
        let ty = self.registry.resolve(instance.type_name())?;
        Ok(self.flat(instance)?.with_links(links(ty, instance)))
    }
}

fn attributes(ty: &ResourceType, instance: &ResourceInstance) -> IndexMap<String, ScalarValue> {
    let emits = |name: &str| name != ty.id_attribute() && !RESERVED_KEYS.contains(&name);
    match ty.attributes() {
        Some(selected) => selected
            .iter()
            .filter(|name| emits(name))
            .filter_map(|name| {
                let value = instance.attribute(name);
                if value.is_none() {
                    debug!(
                        event = "Render",
                        instance = instance.to_string(),
                        attribute = name.as_str(),
                        "selected attribute missing on instance"
                    );
                }
                value.map(|value| (name.clone(), value.clone()))
            })
            .collect(),
        None => instance
            .attributes()
            .iter()
            .filter(|(name, _)| emits(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect(),
    }
}

/// One entry per declared relation, in declaration order. Absent values
/// render as `null` or `[]`; a to-one field holding several ids keeps the first.
fn links(ty: &ResourceType, instance: &ResourceInstance) -> IndexMap<String, LinkValue> {
    ty.relations()
        .iter()
        .map(|field| {
            let ids = instance
                .relation(field.name())
                .map(|value| value.ids())
                .unwrap_or_default();
            let value = match field.cardinality() {
                Cardinality::One => LinkValue::One(ids.first().map(|id| id.to_string())),
                Cardinality::Many => LinkValue::Many(ids.iter().map(|id| id.to_string()).collect()),
            };
            (field.name().to_string(), value)
        })
        .collect()
}
