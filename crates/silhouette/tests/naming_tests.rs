//! Template path naming and alternate generation through the public API

use pretty_assertions::assert_eq;
use silhouette::*;

#[test]
fn test_versioned_template_path_joins_hello_world_group() {
    let config = NamingConfig::default();
    let name = path_to_shape_name("Views/Hello.World-85.cshtml", &config);

    assert_eq!(name.as_str(), "Hello_World__85");
    assert!(name.is_alternate_of("Hello_World"));
    assert!(!name.is_alternate_of("Hello_World_Shape"));
    assert_eq!(name.parent(), Some(ShapeName::new("Hello_World")));
}

#[test]
fn test_candidate_paths_map_back_to_the_name() {
    let config = NamingConfig::default();

    let paths = shape_name_to_candidate_paths("Hello_World__85", &config);
    assert_eq!(
        paths,
        vec![
            "Views/Hello.World-85.cshtml".to_string(),
            "Views/Hello/World-85.cshtml".to_string(),
        ]
    );
    for path in &paths {
        assert_eq!(path_to_shape_name(path, &config), ShapeName::new("Hello_World__85"));
    }
}

#[test]
fn test_custom_view_roots_and_extensions() {
    let config = NamingConfig::from_lookup(|key| match key {
        "SILHOUETTE_VIEW_ROOTS" => Some("Templates, Views".to_string()),
        "SILHOUETTE_EXTENSIONS" => Some(".hbs".to_string()),
        "SILHOUETTE_DEFAULT_EXTENSION" => Some("hbs".to_string()),
        _ => None,
    })
    .unwrap();

    assert_eq!(
        path_to_shape_name("Templates/Menu-Main.hbs", &config).as_str(),
        "Menu__Main"
    );
    // unrecognised extensions are kept as part of the name
    assert_eq!(
        path_to_shape_name("Views/Menu.cshtml", &config).as_str(),
        "Menu_cshtml"
    );
    assert_eq!(
        shape_name_to_candidate_paths("Menu__Main", &config),
        vec!["Templates/Menu-Main.hbs".to_string()]
    );
}

#[test]
fn test_content_alternates_for_summary_blog_post() {
    let occurrence = ShapeOccurrence::builder("Content")
        .display_type("Summary")
        .attribute(ContextAttribute::ContentType, "BlogPost")
        .attribute(ContextAttribute::Id, "42")
        .build()
        .unwrap();

    let names: Vec<String> = generate_alternates(&occurrence)
        .into_iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "Content_Summary__42",
            "Content_Summary__BlogPost",
            "Content__42",
            "Content__BlogPost",
            "Content_Summary",
            "Content",
        ]
    );
}

#[test]
fn test_field_alternates_are_generated_most_specific_first() {
    let occurrence = ShapeOccurrence::builder("Fields_Common_Text")
        .attribute(ContextAttribute::ContentType, "BlogPost")
        .attribute(ContextAttribute::PartName, "BodyPart")
        .attribute(ContextAttribute::FieldName, "Subtitle")
        .build()
        .unwrap();

    let candidates = generate_candidates(&occurrence);
    assert_eq!(
        candidates.first().map(|c| c.name.as_str()),
        Some("Fields_Common_Text__BlogPost__BodyPart__Subtitle")
    );
    assert!(
        candidates
            .windows(2)
            .all(|pair| pair[0].specificity >= pair[1].specificity)
    );
    assert_eq!(candidates.last().map(|c| c.origin), Some(CandidateOrigin::Base));
    assert!(
        candidates
            .iter()
            .all(|c| c.name.is_alternate_of("Fields_Common_Text"))
    );
}

#[test]
fn test_shape_method_output() {
    let mut factory = ShapeFactory::new();
    factory
        .bind_method(
            "Pager",
            ShapeMethod::new(|shape| {
                let page: u32 = shape.properties().get_as("Page")?.unwrap_or(1);
                Ok(format!("page {}", page))
            }),
        )
        .unwrap();

    let mut shape = factory.create("pager").unwrap();
    shape.properties_mut().insert("Page", 3).unwrap();

    let method = shape.method().expect("bound method");
    assert_eq!(method.invoke(&shape).unwrap(), "page 3");
}
