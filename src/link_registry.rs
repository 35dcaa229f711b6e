use indexmap::IndexMap;
use tracing::trace;

use crate::traits::HrefBuilder;
use crate::types::{LinkDescriptor, RelationField, RelationPath, ResourceType};

/// Deduplicated relation paths with their href templates, in first-seen order.
pub struct LinkRegistry<'a> {
    hrefs: &'a dyn HrefBuilder,
    entries: IndexMap<String, LinkDescriptor>,
}

impl<'a> LinkRegistry<'a> {
    pub fn new(hrefs: &'a dyn HrefBuilder) -> Self {
        Self {
            hrefs,
            entries: IndexMap::new(),
        }
    }

    /// Register `path`, reached through `field` and ending at `target`.
    ///
    /// Returns `false` if the path was already known; the first registration
    /// wins and later ones are no-ops.
    pub fn register(
        &mut self,
        path: &RelationPath,
        field: &RelationField,
        target: &ResourceType,
    ) -> bool {
        let key = path.to_string();
        if self.entries.contains_key(&key) {
            return false;
        }

        let href = self
            .hrefs
            .build_link_template(target.plural_key(), &path.placeholder());
        trace!(
            event = "Assemble",
            phase = "Link",
            path = key.as_str(),
            field = field.name(),
            href = href.as_str()
        );

        self.entries.insert(
            key,
            LinkDescriptor {
                href,
                target_type: target.plural_key().to_string(),
            },
        );
        true
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn get(&self, path: &str) -> Option<&LinkDescriptor> {
        self.entries.get(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_links(self) -> IndexMap<String, LinkDescriptor> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hrefs::TemplateHrefBuilder;

    fn hrefs() -> TemplateHrefBuilder {
        TemplateHrefBuilder::new("http://testserver")
            .with_template("comments", "comments/{id}/")
            .unwrap()
            .with_template("people", "people/{id}/")
            .unwrap()
    }

    #[test]
    fn test_register_builds_placeholder_template() {
        let hrefs = hrefs();
        let mut registry = LinkRegistry::new(&hrefs);
        let comments = ResourceType::new("comment", "comments");
        let field = RelationField::many("comments", "comment");

        assert!(registry.register(&RelationPath::root("posts", "comments"), &field, &comments));
        assert_eq!(
            registry.get("posts.comments"),
            Some(&LinkDescriptor {
                href: "http://testserver/comments/{posts.comments}/".into(),
                target_type: "comments".into(),
            })
        );
    }

    #[test]
    fn test_register_is_idempotent() {
        let hrefs = hrefs();
        let mut registry = LinkRegistry::new(&hrefs);
        let people = ResourceType::new("person", "people");
        let field = RelationField::one("author", "person");
        let path = RelationPath::root("posts", "author");

        assert!(registry.register(&path, &field, &people));
        assert!(!registry.register(&path, &field, &people));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_first_seen_order_is_kept() {
        let hrefs = hrefs();
        let mut registry = LinkRegistry::new(&hrefs);
        let people = ResourceType::new("person", "people");
        let comments = ResourceType::new("comment", "comments");

        registry.register(
            &RelationPath::root("posts", "comments"),
            &RelationField::many("comments", "comment"),
            &comments,
        );
        registry.register(
            &RelationPath::root("posts", "author"),
            &RelationField::one("author", "person"),
            &people,
        );
        registry.register(
            &RelationPath::root("posts", "comments"),
            &RelationField::many("comments", "comment"),
            &comments,
        );

        let keys: Vec<String> = registry.into_links().into_keys().collect();
        assert_eq!(keys, vec!["posts.comments", "posts.author"]);
    }
}
