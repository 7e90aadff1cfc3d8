use forumkit::prelude::*;
use forumkit::render::NoHooks;

#[test]
fn in_memory_kit_registers_configured_providers() {
    let config = Config::from_toml_str(
        r#"
        [[embed.providers]]
        embed_type = "flickr"
        domains = ["flickr.com"]
        endpoint = "https://www.flickr.com/services/oembed"
        id_regex = "/(?P<id>[0-9]+)_"
        "#,
    )
    .unwrap();
    let kit = ForumKit::in_memory(&config).unwrap();

    let types: Vec<String> = kit.embed_types().iter().map(ToString::to_string).collect();
    assert_eq!(types, ["imgur", "giphy", "flickr"]);
    assert!(kit.embeds().supports(&EmbedType::Custom("flickr".into())));
}

#[test]
fn bad_provider_regex_is_rejected_up_front() {
    let config = Config::from_toml_str(
        r#"
        [[embed.providers]]
        embed_type = "broken"
        domains = ["example.com"]
        endpoint = "https://example.com/oembed"
        id_regex = "/(?P<id>[0-9]+"
        "#,
    )
    .unwrap();
    let err = ForumKit::in_memory(&config).err().unwrap();
    assert!(matches!(err, ForumError::InvalidProvider { field: "id_regex", .. }));
}

#[test]
fn renders_category_page() {
    let kit = ForumKit::in_memory(&Config::default()).unwrap();
    let tree: Vec<CategoryNode> = serde_json::from_str(
        r#"[{"categoryId": 1, "name": "General", "urlCode": "general", "countDiscussions": 3}]"#,
    )
    .unwrap();
    let page = CategoriesPage { title: "Categories".into(), description: None, tree };
    let html = kit.render_categories(&page, &NoHooks);
    assert!(html.starts_with("<h1 class=\"H HomepageTitle\">Categories</h1><ul class=\"DataList CategoryList\">"));
    assert!(html.contains("3 discussions"));
}

#[tokio::test]
async fn invalid_url_is_reported() {
    let kit = ForumKit::in_memory(&Config::default()).unwrap();
    let err = kit.create_embed("not a url", false).await.unwrap_err();
    assert!(matches!(err, ForumError::InvalidUrl { .. }));
}

#[test]
fn config_without_theme_resets_the_shared_cache() {
    let themed = Config::from_toml_str(
        r##"
        [theme]
        key = "dark"

        [theme.variables.global.mainColors]
        bg = "#000"
        "##,
    )
    .unwrap();
    let _dark = ForumKit::in_memory(&themed).unwrap();

    let plain = ForumKit::in_memory(&Config::default()).unwrap();
    assert_eq!(plain.themes().theme().key, "default");
    assert!(plain.themes().theme().variables.is_empty());
}
