use crate::types::ResourceInstance;

/// Builds URLs for resources. Implementations must be pure functions of their
/// inputs, as one builder is shared by concurrent assemblies.
pub trait HrefBuilder: Send + Sync {
    /// Whether hrefs can be built for `plural_key`.
    fn has_template(&self, plural_key: &str) -> bool;

    /// Href of a single resource, e.g. `http://host/posts/1/`. `id` is the
    /// raw resource id; implementations escape it for use in a URL.
    fn build_href(&self, plural_key: &str, id: &str) -> String;

    /// Href addressing several resources of one type at once, each id escaped
    /// and the ids joined with `,` in the single-id slot.
    fn build_many_href(&self, plural_key: &str, ids: &[&str]) -> String;

    /// Href template for a relation path. `placeholder` (e.g.
    /// `{posts.comments}`) goes in unescaped, for clients to substitute.
    fn build_link_template(&self, plural_key: &str, placeholder: &str) -> String;
}

/// Resolves relation targets. The assembler never queries storage itself;
/// the caller supplies everything reachable through this lookup.
pub trait ResourceLookup {
    /// The instance of `type_name` (singular name) with `id`, if supplied.
    fn lookup(&self, type_name: &str, id: &str) -> Option<&ResourceInstance>;
}

/// A lookup that resolves nothing. Useful when only the primary batch matters.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLookup;

impl ResourceLookup for NoLookup {
    fn lookup(&self, _type_name: &str, _id: &str) -> Option<&ResourceInstance> {
        None
    }
}

impl<L: ResourceLookup + ?Sized> ResourceLookup for &L {
    fn lookup(&self, type_name: &str, id: &str) -> Option<&ResourceInstance> {
        (**self).lookup(type_name, id)
    }
}
