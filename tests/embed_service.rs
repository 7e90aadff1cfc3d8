use std::sync::Arc;
use std::time::Duration;

use forumkit::embed::{EmbedService, EmbedType, ProviderDefinition};
use forumkit::error::ForumError;
use forumkit::storage::{MemoryStorage, Storage};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GIF_URL: &str = "https://giphy.com/gifs/hello-kW8mnYSNkUYKc";

fn service(server: &MockServer, storage: Arc<dyn Storage>) -> EmbedService {
    let giphy = ProviderDefinition::giphy().with_endpoint(format!("{}/services/oembed", server.uri()));
    EmbedService::with_providers(&[giphy], reqwest::Client::new(), storage, 60).unwrap()
}

#[tokio::test]
async fn resolves_giphy_url_through_oembed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/oembed"))
        .and(query_param("url", GIF_URL))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "width": 650,
            "title": "Hello GIF",
            "url": "https://media.giphy.com/media/kW8mnYSNkUYKc/giphy.gif",
            "type": "photo",
            "height": 491
        })))
        .expect(1)
        .mount(&server)
        .await;

    let embeds = service(&server, Arc::new(MemoryStorage::new()));
    let embed = embeds.create_embed_for_url(GIF_URL, false).await.unwrap();

    assert_eq!(embed.embed_type(), &EmbedType::Giphy);
    assert_eq!(embed.url(), GIF_URL);
    assert_eq!(embed.name(), "Hello GIF");
    assert_eq!(embed.height(), Some(491));
    assert_eq!(embed.width(), Some(650));
    assert_eq!(embed.provider_id(), Some("kW8mnYSNkUYKc"));
}

#[tokio::test]
async fn missing_fields_leave_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"type": "photo"})))
        .mount(&server)
        .await;

    let embed = service(&server, Arc::new(MemoryStorage::new()))
        .create_embed_for_url(GIF_URL, false)
        .await
        .unwrap();

    assert_eq!(embed.name(), "");
    assert_eq!(embed.height(), None);
    assert_eq!(embed.width(), None);
    assert_eq!(embed.provider_id(), None);
}

#[tokio::test]
async fn provider_failure_still_yields_an_embed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let embed = service(&server, Arc::new(MemoryStorage::new()))
        .create_embed_for_url(GIF_URL, false)
        .await
        .unwrap();

    assert_eq!(embed.embed_type(), &EmbedType::Giphy);
    assert_eq!(embed.url(), GIF_URL);
    assert_eq!(embed.provider_id(), None);
}

#[tokio::test]
async fn non_json_body_still_yields_an_embed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let embed = service(&server, Arc::new(MemoryStorage::new()))
        .create_embed_for_url(GIF_URL, false)
        .await
        .unwrap();

    assert_eq!(embed.name(), "");
    assert_eq!(embed.provider_id(), None);
}

#[tokio::test]
async fn unsupported_domain_never_hits_the_provider() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let err = service(&server, Arc::new(MemoryStorage::new()))
        .create_embed_for_url("https://example.com/cat.gif", false)
        .await
        .unwrap_err();

    assert!(matches!(err, ForumError::NoMatchingFactory { .. }));
}

#[tokio::test]
async fn cached_embed_is_reused_until_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"title": "Hello GIF"})))
        .expect(2)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    let embeds = service(&server, storage.clone());

    let first = embeds.create_embed_for_url(GIF_URL, false).await.unwrap();
    let second = embeds.create_embed_for_url(GIF_URL, false).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(storage.len().await, 1);

    embeds.create_embed_for_url(GIF_URL, true).await.unwrap();
    assert_eq!(embeds.clear_cache(None).await.unwrap(), 1);
    assert!(storage.is_empty().await);
}

#[tokio::test]
async fn batch_results_follow_input_order() {
    let server = MockServer::start().await;
    // earlier URLs answer slower than later ones
    for (i, delay_ms) in [(1, 400u64), (2, 200), (4, 0)] {
        Mock::given(method("GET"))
            .and(query_param("url", format!("https://giphy.com/gifs/{i}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"title": format!("gif {i}")}))
                    .set_delay(Duration::from_millis(delay_ms)),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let embeds = service(&server, Arc::new(MemoryStorage::new()));
    let urls: Vec<String> = vec![
        "https://giphy.com/gifs/1".into(),
        "https://giphy.com/gifs/2".into(),
        "https://example.com/3".into(),
        "https://giphy.com/gifs/4".into(),
    ];
    let results = embeds.create_embeds_for_urls(&urls).await;

    assert_eq!(results.len(), urls.len());
    assert_eq!(results[0].as_ref().unwrap().name(), "gif 1");
    assert_eq!(results[1].as_ref().unwrap().name(), "gif 2");
    assert!(matches!(results[2], Err(ForumError::NoMatchingFactory { .. })));
    assert_eq!(results[3].as_ref().unwrap().name(), "gif 4");
    for (result, url) in results.iter().zip(&urls) {
        if let Ok(embed) = result {
            assert_eq!(embed.url(), url);
        }
    }
}
