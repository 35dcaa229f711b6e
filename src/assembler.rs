use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::error::AssemblyError;
use crate::metrics::{self, AssemblyPhases, AssemblyStats};
use crate::render::Renderer;
use crate::schema::{self, SchemaRegistry};
use crate::traits::{HrefBuilder, ResourceLookup};
use crate::types::{CompoundDocument, Primary, ResourceInstance, ResourceType};
use crate::walker::RelationWalker;

/// Builds compound documents. Cloneable and thread-safe; all per-request
/// state lives on the stack of a single `assemble_*` call.
#[derive(Clone)]
pub struct Assembler {
    registry: Arc<SchemaRegistry>,
    hrefs: Arc<dyn HrefBuilder>,
}

impl std::fmt::Debug for Assembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assembler")
            .field("types", &self.registry.len())
            .finish_non_exhaustive()
    }
}

impl Assembler {
    /// Every registered type must have an href template.
    pub fn new(
        registry: Arc<SchemaRegistry>,
        hrefs: Arc<dyn HrefBuilder>,
    ) -> Result<Self, AssemblyError> {
        if let Some(ty) = registry
            .types()
            .find(|ty| !hrefs.has_template(ty.plural_key()))
        {
            return Err(AssemblyError::MissingHrefTemplate(ty.plural_key().to_string()));
        }
        Ok(Self { registry, hrefs })
    }

    /// Build an assembler over the registry installed with
    /// [`schema::install_global`].
    pub fn from_global(hrefs: Arc<dyn HrefBuilder>) -> Result<Self, AssemblyError> {
        let registry = schema::global().ok_or(AssemblyError::RegistryNotInstalled)?;
        Self::new(registry, hrefs)
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Assemble a list response. The primary type is taken from the first
    /// root; every root must share it.
    pub fn assemble_list(
        &self,
        roots: &[ResourceInstance],
        lookup: &dyn ResourceLookup,
    ) -> Result<CompoundDocument, AssemblyError> {
        let first = roots.first().ok_or(AssemblyError::EmptyBatch)?;
        self.assemble_list_of(first.type_name(), roots, lookup)
    }

    /// Assemble a list response of `type_name`. An empty batch yields an
    /// empty primary list.
    pub fn assemble_list_of(
        &self,
        type_name: &str,
        roots: &[ResourceInstance],
        lookup: &dyn ResourceLookup,
    ) -> Result<CompoundDocument, AssemblyError> {
        let ty = self.registry.resolve(type_name)?;
        self.assemble(ty, roots, lookup, false)
    }

    /// Assemble a detail response: the primary key is the singular type
    /// name and its value a single object.
    pub fn assemble_one(
        &self,
        root: &ResourceInstance,
        lookup: &dyn ResourceLookup,
    ) -> Result<CompoundDocument, AssemblyError> {
        let ty = self.registry.resolve(root.type_name())?;
        self.assemble(ty, std::slice::from_ref(root), lookup, true)
    }

    fn assemble(
        &self,
        ty: &ResourceType,
        roots: &[ResourceInstance],
        lookup: &dyn ResourceLookup,
        detail: bool,
    ) -> Result<CompoundDocument, AssemblyError> {
        let start = Instant::now();
        debug!(
            event = "Assemble",
            phase = "Request",
            primary_type = ty.name(),
            roots = roots.len(),
            detail
        );

        let roots = unique_roots(ty, roots)?;

        let walk_start = Instant::now();
        let mut walker = RelationWalker::new(
            &self.registry,
            self.hrefs.as_ref(),
            lookup,
            roots.iter().copied(),
        );
        for &root in &roots {
            walker.walk_root(root)?;
        }
        let outcome = walker.finish();
        let walk_ms = walk_start.elapsed().as_secs_f64() * 1_000.0;

        let render_start = Instant::now();
        let renderer = Renderer::new(&self.registry, self.hrefs.as_ref());
        let mut representations = roots
            .iter()
            .map(|root| renderer.expanded(root))
            .collect::<Result<Vec<_>, _>>()?;
        let primary_keys: HashSet<_> = roots.iter().map(|root| root.key()).collect();
        let linked = outcome
            .pool
            .render(&renderer, |key| primary_keys.contains(key))?;
        let render_ms = render_start.elapsed().as_secs_f64() * 1_000.0;

        let primary_count = representations.len();
        let (primary_key, primary) = if detail {
            let representation = representations.pop().ok_or(AssemblyError::EmptyBatch)?;
            (ty.name().to_string(), Primary::One(Box::new(representation)))
        } else {
            (ty.plural_key().to_string(), Primary::Many(representations))
        };

        let document = CompoundDocument::new(
            primary_key,
            primary,
            outcome.links.into_links(),
            linked,
            outcome.dangling,
        );

        let duration = start.elapsed();
        debug!(
            event = "Assemble",
            phase = "Result",
            primary_type = ty.name(),
            primary = primary_count,
            links = document.links().len(),
            linked = document.linked_count(),
            dangling = document.dangling().len(),
            duration_ms = duration.as_secs_f64() * 1_000.0
        );

        metrics::record_assembly(
            AssemblyStats {
                duration,
                primary_type: ty.name().to_string(),
                primary_count,
                linked_count: document.linked_count(),
                link_count: document.links().len(),
                dangling_count: document.dangling().len(),
            },
            AssemblyPhases {
                walk_ms,
                render_ms,
                total_ms: duration.as_secs_f64() * 1_000.0,
            },
        );

        Ok(document)
    }
}

/// Check the batch is homogeneous and drop repeated roots, keeping the first.
fn unique_roots<'a>(
    ty: &ResourceType,
    roots: &'a [ResourceInstance],
) -> Result<Vec<&'a ResourceInstance>, AssemblyError> {
    let mut seen = HashSet::with_capacity(roots.len());
    let mut unique = Vec::with_capacity(roots.len());
    for root in roots {
        if root.type_name() != ty.name() {
            return Err(AssemblyError::HeterogeneousBatch {
                expected: ty.name().to_string(),
                found: root.type_name().to_string(),
            });
        }
        if seen.insert(root.id()) {
            unique.push(root);
        } else {
            warn!(
                event = "Assemble",
                phase = "Request",
                root = root.to_string(),
                "duplicate root in batch; keeping the first"
            );
        }
    }
    Ok(unique)
}

#[cfg(test)]
mod tests;
