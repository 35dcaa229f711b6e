use std::sync::Arc;

use super::*;
use crate::hrefs::TemplateHrefBuilder;
use crate::schema::SchemaRegistryBuilder;
use crate::traits::NoLookup;
use crate::types::{
    Cardinality, DanglingReference, EntityKey, LinkValue, RelationField, RelationMode,
    ResourceStore,
};
use serde_json::json;
use yare::parameterized;


const BASE_URL: &str = "http://testserver";

const FIRST_POST: &str = "One amazing test post.";
const SECOND_POST: &str = "A second amazing test post.";
const FIRST_COMMENT: &str = "This is a test comment.";
const SECOND_COMMENT: &str = "One more comment.";
const LAST_COMMENT: &str = "One last comment.";

fn blog_registry_with_author(author: RelationField) -> SchemaRegistry {
    SchemaRegistryBuilder::new()
        .add_type(
            ResourceType::new("person", "people")
                .with_relation(RelationField::one("favorite_post", "post").embedded())
                .with_relation(RelationField::many("liked_comments", "comment")),
        )
        .add_type(
            ResourceType::new("post", "posts")
                .with_relation(author)
                .with_relation(RelationField::many("comments", "comment")),
        )
        .add_type(
            ResourceType::new("comment", "comments")
                .with_relation(RelationField::one("post", "post")),
        )
        .build()
        .expect("blog schema should build")
}

fn blog_registry() -> SchemaRegistry {
    blog_registry_with_author(RelationField::one("author", "person").link_only())
}

fn assembler_for(registry: SchemaRegistry) -> Assembler {
    let hrefs = TemplateHrefBuilder::conventional(BASE_URL, &registry);
    Assembler::new(Arc::new(registry), Arc::new(hrefs)).expect("every type has an href")
}

fn assembler() -> Assembler {
    assembler_for(blog_registry())
}

fn person(id: &str) -> ResourceInstance {
    ResourceInstance::new("person", id).with_attr("name", "test")
}

fn post<const N: usize>(id: &str, title: &str, comments: [&str; N]) -> ResourceInstance {
    ResourceInstance::new("post", id)
        .with_attr("title", title)
        .with_one("author", "1")
        .with_many("comments", comments)
}

fn comment(id: &str, post: &str, body: &str) -> ResourceInstance {
    ResourceInstance::new("comment", id)
        .with_attr("body", body)
        .with_one("post", post)
}

fn to_json(doc: &CompoundDocument) -> String {
    serde_json::to_string(doc).expect("documents always serialize")
}

/// Compact JSON of `value`, keys in the order written.
fn expected(value: serde_json::Value) -> String {
    serde_json::to_string(&value).expect("json values always serialize")
}

include!("scenarios.rs");
include!("requests.rs");
