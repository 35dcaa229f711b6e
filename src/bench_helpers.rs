// Benchmarks live in benches/ and only see the public API. The helpers here
// build reproducible blog batches and wrap the pub(crate) renderer so the
// render phase can be measured on its own. Compiled only with the
// `bench-internal` feature.

use std::sync::Arc;

use crate::hrefs::TemplateHrefBuilder;
use crate::render::Renderer;
use crate::schema::{SchemaRegistry, SchemaRegistryBuilder};
use crate::types::{RelationField, ResourceInstance, ResourceStore, ResourceType};
use crate::Assembler;

#[derive(Debug, Clone, Copy)]
pub struct ScenarioSpec {
    pub name: &'static str,
    /// People in the primary batch.
    pub roots: usize,
    /// Distinct posts the roots pick their favorite from.
    pub posts: usize,
    pub comments_per_post: usize,
    /// Comments each root likes, spread over all comments.
    pub likes_per_root: usize,
}

pub struct Scenario {
    pub name: &'static str,
    pub assembler: Assembler,
    pub roots: Vec<ResourceInstance>,
    pub store: ResourceStore,
    registry: Arc<SchemaRegistry>,
    hrefs: Arc<TemplateHrefBuilder>,
}

fn blog_registry() -> SchemaRegistry {
    SchemaRegistryBuilder::new()
        .add_type(
            ResourceType::new("person", "people")
                .with_relation(RelationField::one("favorite_post", "post").embedded())
                .with_relation(RelationField::many("liked_comments", "comment")),
        )
        .add_type(
            ResourceType::new("post", "posts")
                .with_relation(RelationField::one("author", "person").link_only())
                .with_relation(RelationField::many("comments", "comment")),
        )
        .add_type(
            ResourceType::new("comment", "comments")
                .with_relation(RelationField::one("post", "post")),
        )
        .build()
        .expect("benchmark schema must build")
}

pub fn build_scenario(spec: ScenarioSpec) -> Scenario {
    let registry = Arc::new(blog_registry());
    let hrefs = Arc::new(TemplateHrefBuilder::conventional(
        "http://bench.example",
        &registry,
    ));
    let assembler = Assembler::new(Arc::clone(&registry), hrefs.clone())
        .expect("benchmark hrefs must cover the schema");

    let posts = spec.posts.max(1);
    let total_comments = posts * spec.comments_per_post;
    let mut store = ResourceStore::new();
    for post in 1..=posts {
        let first = (post - 1) * spec.comments_per_post + 1;
        let comments: Vec<String> = (first..first + spec.comments_per_post)
            .map(|id| id.to_string())
            .collect();
        for id in &comments {
            store.insert(
                ResourceInstance::new("comment", id.as_str())
                    .with_attr("body", format!("comment {id}"))
                    .with_one("post", post.to_string()),
            );
        }
        store.insert(
            ResourceInstance::new("post", post.to_string())
                .with_attr("title", format!("post {post}"))
                .with_one("author", "1")
                .with_many("comments", comments),
        );
    }

    let roots = (1..=spec.roots)
        .map(|person| {
            let liked = (0..spec.likes_per_root)
                .filter(|_| total_comments > 0)
                .map(|n| ((person * 7 + n * 13) % total_comments + 1).to_string());
            ResourceInstance::new("person", person.to_string())
                .with_attr("name", format!("person {person}"))
                .with_one("favorite_post", ((person - 1) % posts + 1).to_string())
                .with_many("liked_comments", liked)
        })
        .collect();

    Scenario {
        name: spec.name,
        assembler,
        roots,
        store,
        registry,
        hrefs,
    }
}

pub fn matrix_specs() -> Vec<ScenarioSpec> {
    vec![
        ScenarioSpec {
            name: "single_root",
            roots: 1,
            posts: 1,
            comments_per_post: 2,
            likes_per_root: 0,
        },
        ScenarioSpec {
            name: "page_shared_posts",
            roots: 25,
            posts: 3,
            comments_per_post: 10,
            likes_per_root: 4,
        },
        ScenarioSpec {
            name: "page_distinct_posts",
            roots: 25,
            posts: 25,
            comments_per_post: 10,
            likes_per_root: 4,
        },
        ScenarioSpec {
            name: "large_page",
            roots: 200,
            posts: 50,
            comments_per_post: 20,
            likes_per_root: 8,
        },
    ]
}

/// Render every root expanded, bypassing the walk. Returns the number of
/// links emitted.
pub fn render_roots_expanded(scenario: &Scenario) -> usize {
    let renderer = Renderer::new(&scenario.registry, scenario.hrefs.as_ref());
    scenario
        .roots
        .iter()
        .map(|root| {
            renderer
                .expanded(root)
                .expect("benchmark roots must render")
                .links()
                .map_or(0, |links| links.len())
        })
        .sum()
}
