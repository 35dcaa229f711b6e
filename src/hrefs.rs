//! Template-based href construction.

use std::collections::HashMap;

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

use crate::error::AssemblyError;
use crate::schema::SchemaRegistry;
use crate::traits::HrefBuilder;

static ID_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{id\}").unwrap());

#[derive(Debug, Clone)]
struct Template {
    pattern: String,
    /// Carries its own scheme and host; the base URL is not prepended.
    absolute: bool,
}

impl Template {
    fn new(pattern: String) -> Self {
        let absolute = pattern.contains("://");
        Self { pattern, absolute }
    }
}

/// Href builder driven by per-type URL templates containing one `{id}`.
///
/// Relative templates are joined onto the base URL; templates containing
/// `://` are used as-is. Resource ids are percent-encoded before they are
/// substituted, link placeholders are not.
#[derive(Debug, Clone, Default)]
pub struct TemplateHrefBuilder {
    base_url: String,
    templates: HashMap<String, Template>,
}

impl TemplateHrefBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            templates: HashMap::new(),
        }
    }

    /// Register `{base}/{plural_key}/{id}/` for every type in `registry`.
    pub fn conventional(base_url: impl Into<String>, registry: &SchemaRegistry) -> Self {
        let mut builder = Self::new(base_url);
        for ty in registry.types() {
            builder.templates.insert(
                ty.plural_key().to_string(),
                Template::new(format!("{}/{{id}}/", ty.plural_key())),
            );
        }
        builder
    }

    /// Register a template for `plural_key`. It must contain `{id}` exactly once.
    pub fn with_template(
        mut self,
        plural_key: impl Into<String>,
        template: impl Into<String>,
    ) -> Result<Self, AssemblyError> {
        let plural_key = plural_key.into();
        let template = template.into();
        let placeholders = ID_PLACEHOLDER.find_iter(&template).count();
        if placeholders != 1 {
            return Err(AssemblyError::InvalidHrefTemplate {
                plural_key,
                reason: format!("expected exactly one {{id}} placeholder, found {placeholders}"),
            });
        }
        self.templates.insert(plural_key, Template::new(template));
        Ok(self)
    }

    /// Substitute `value` verbatim into the template of `plural_key`.
    fn fill(&self, plural_key: &str, value: &str) -> String {
        match self.templates.get(plural_key) {
            Some(template) => {
                let path = ID_PLACEHOLDER.replace(&template.pattern, NoExpand(value));
                if template.absolute {
                    path.into_owned()
                } else {
                    self.join(&path)
                }
            }
            None => self.join(&format!("{plural_key}/{value}/")),
        }
    }

    fn join(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl HrefBuilder for TemplateHrefBuilder {
    fn has_template(&self, plural_key: &str) -> bool {
        self.templates.contains_key(plural_key)
    }

    fn build_href(&self, plural_key: &str, id: &str) -> String {
        self.fill(plural_key, &urlencoding::encode(id))
    }

    fn build_many_href(&self, plural_key: &str, ids: &[&str]) -> String {
        let joined = ids.iter().map(|id| urlencoding::encode(id)).join(",");
        self.fill(plural_key, &joined)
    }

    fn build_link_template(&self, plural_key: &str, placeholder: &str) -> String {
        self.fill(plural_key, placeholder)
    }
}
