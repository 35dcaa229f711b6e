fn friends_assembler() -> Assembler {
    assembler_for(
        SchemaRegistryBuilder::new()
            .add_type(
                ResourceType::new("person", "people")
                    .with_relation(RelationField::many("friends", "person")),
            )
            .build()
            .unwrap(),
    )
}

#[test]
fn test_detail_uses_singular_key() {
    let store: ResourceStore = [comment("1", "1", FIRST_COMMENT)].into_iter().collect();
    let root = post("1", FIRST_POST, ["1"]);

    let doc = assembler().assemble_one(&root, &store).unwrap();

    assert_eq!(doc.primary_key(), "post");
    assert!(matches!(doc.primary(), Primary::One(_)));
    let json = to_json(&doc);
    assert!(json.starts_with(r#"{"post":{"id":"1","href":"http://testserver/posts/1/""#));
    assert_eq!(doc.linked_of("comments").len(), 1);
}

#[test]
fn test_empty_batch_needs_a_type() {
    let assembler = assembler();
    assert_eq!(
        assembler.assemble_list(&[], &NoLookup),
        Err(AssemblyError::EmptyBatch)
    );

    let doc = assembler.assemble_list_of("post", &[], &NoLookup).unwrap();
    assert_eq!(to_json(&doc), r#"{"posts":[]}"#);
}

#[parameterized(
    list_of_unknown = { Some("tag"), "post", AssemblyError::UnknownResourceType("tag".into()) },
    list_of_other_type = { Some("comment"), "post", AssemblyError::HeterogeneousBatch { expected: "comment".into(), found: "post".into() } },
    unknown_root = { None, "tag", AssemblyError::UnknownResourceType("tag".into()) },
)]
fn test_request_errors(type_name: Option<&str>, root_type: &str, expected: AssemblyError) {
    let assembler = assembler();
    let roots = [ResourceInstance::new(root_type, "1")];
    let result = match type_name {
        Some(type_name) => assembler.assemble_list_of(type_name, &roots, &NoLookup),
        None => assembler.assemble_list(&roots, &NoLookup),
    };
    assert_eq!(result, Err(expected));
}

#[test]
fn test_mixed_batch_is_rejected() {
    let roots = [post("1", FIRST_POST, []), comment("1", "1", FIRST_COMMENT)];
    assert_eq!(
        assembler().assemble_list(&roots, &NoLookup),
        Err(AssemblyError::HeterogeneousBatch {
            expected: "post".into(),
            found: "comment".into(),
        })
    );
}

#[test]
fn test_duplicate_roots_collapse_to_first() {
    let roots = [
        post("1", FIRST_POST, []),
        post("1", SECOND_POST, []),
        post("2", SECOND_POST, []),
    ];

    let doc = assembler().assemble_list(&roots, &NoLookup).unwrap();

    let primary = doc.primary().representations();
    assert_eq!(primary.len(), 2);
    assert_eq!(primary[0].attributes().get("title"), Some(&FIRST_POST.into()));
    assert_eq!(primary[1].id(), "2");
}

#[test]
fn test_dangling_ids_stay_in_links_only() {
    let store: ResourceStore = [comment("1", "1", FIRST_COMMENT), person("1")]
        .into_iter()
        .collect();
    let roots = [post("1", FIRST_POST, ["1", "404"])];

    let doc = assembler().assemble_list(&roots, &store).unwrap();

    assert_eq!(
        doc.primary().representations()[0].links().unwrap().get("comments"),
        Some(&LinkValue::Many(vec!["1".into(), "404".into()]))
    );
    let linked: Vec<&str> = doc.linked_of("comments").iter().map(|c| c.id()).collect();
    assert_eq!(linked, vec!["1"]);
    assert_eq!(
        doc.dangling(),
        &[DanglingReference {
            path: "posts.comments".into(),
            owner: EntityKey::new("post", "1"),
            target: EntityKey::new("comment", "404"),
        }]
    );
    assert!(!to_json(&doc).contains("dangling"));
}

#[test]
fn test_primary_entities_are_not_repeated_in_linked() {
    let store: ResourceStore = [ResourceInstance::new("person", "3").with_attr("name", "carol")]
        .into_iter()
        .collect();
    let roots = [
        ResourceInstance::new("person", "1").with_many("friends", ["2"]),
        ResourceInstance::new("person", "2").with_many("friends", ["1", "3"]),
    ];

    let doc = friends_assembler().assemble_list(&roots, &store).unwrap();

    assert!(doc.dangling().is_empty());
    let linked: Vec<&str> = doc.linked_of("people").iter().map(|p| p.id()).collect();
    assert_eq!(linked, vec!["3"]);
}

#[test]
fn test_detail_self_reference_is_not_linked() {
    let root = ResourceInstance::new("person", "1").with_many("friends", ["1"]);

    let doc = friends_assembler().assemble_one(&root, &NoLookup).unwrap();

    assert!(doc.linked().is_empty());
    assert!(doc.dangling().is_empty());
}

#[test]
fn test_missing_href_template_is_rejected() {
    let registry = blog_registry();
    let hrefs = TemplateHrefBuilder::new(BASE_URL)
        .with_template("posts", "posts/{id}/")
        .unwrap();
    assert_eq!(
        Assembler::new(Arc::new(registry), Arc::new(hrefs)).unwrap_err(),
        AssemblyError::MissingHrefTemplate("people".into())
    );
}

#[test]
fn test_from_global_uses_installed_registry() {
    let registry = match crate::schema::global() {
        Some(registry) => registry,
        None => crate::schema::install_global(blog_registry()).unwrap(),
    };
    let hrefs = TemplateHrefBuilder::conventional(BASE_URL, &registry);

    let assembler = Assembler::from_global(Arc::new(hrefs)).unwrap();
    assert_eq!(assembler.registry(), registry.as_ref());
}

#[test]
fn test_concurrent_assembly() {
    use std::thread;

    let assembler = assembler();
    let store = Arc::new(
        [
            comment("1", "1", FIRST_COMMENT),
            comment("2", "1", SECOND_COMMENT),
        ]
        .into_iter()
        .collect::<ResourceStore>(),
    );
    let reference = to_json(
        &assembler
            .assemble_list(&[post("1", FIRST_POST, ["1", "2"])], store.as_ref())
            .unwrap(),
    );

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let assembler = assembler.clone();
            let store = Arc::clone(&store);
            let reference = reference.clone();
            thread::spawn(move || {
                for _ in 0..50 {
                    let roots = [post("1", FIRST_POST, ["1", "2"])];
                    let doc = assembler.assemble_list(&roots, store.as_ref()).unwrap();
                    assert_eq!(to_json(&doc), reference);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_dangling_link_only_id_is_reported() {
    let roots = [post("1", FIRST_POST, [])];

    let doc = assembler().assemble_list(&roots, &NoLookup).unwrap();

    assert_eq!(
        doc.dangling(),
        &[DanglingReference {
            path: "posts.author".into(),
            owner: EntityKey::new("post", "1"),
            target: EntityKey::new("person", "1"),
        }]
    );
    assert!(doc.linked().is_empty());
}

#[test]
fn test_primary_without_relations_keeps_empty_links() {
    let assembler = assembler_for(
        SchemaRegistryBuilder::new()
            .add_type(ResourceType::new("tag", "tags"))
            .build()
            .unwrap(),
    );
    let roots = [ResourceInstance::new("tag", "rust").with_attr("label", "Rust")];

    let doc = assembler.assemble_list(&roots, &NoLookup).unwrap();

    assert_eq!(
        to_json(&doc),
        r#"{"tags":[{"id":"rust","href":"http://testserver/tags/rust/","label":"Rust","links":{}}]}"#
    );
}

#[test]
fn test_ids_are_escaped_in_hrefs_only() {
    let store: ResourceStore = [
        comment("a/b?c#d e", "x://evil", FIRST_COMMENT),
        person("1"),
    ]
    .into_iter()
    .collect();
    let roots = [post("x://evil", FIRST_POST, ["a/b?c#d e"])];

    let doc = assembler().assemble_list(&roots, &store).unwrap();

    let primary = &doc.primary().representations()[0];
    assert_eq!(primary.id(), "x://evil");
    assert_eq!(primary.href(), "http://testserver/posts/x%3A%2F%2Fevil/");
    assert_eq!(
        primary.links().unwrap().get("comments"),
        Some(&LinkValue::Many(vec!["a/b?c#d e".into()]))
    );
    assert_eq!(
        doc.linked_of("comments")[0].href(),
        "http://testserver/comments/a%2Fb%3Fc%23d%20e/"
    );
    assert_eq!(
        doc.links()["posts.comments"].href,
        "http://testserver/comments/{posts.comments}/"
    );
}
