use rickmorty_api::domain::models::{ResourceKind, UpstreamConfig};
use rickmorty_api::services::collect_all;
use rickmorty_api::{FetchError, PageFetcher, RickMortyClient};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, max_retries: u32) -> RickMortyClient {
    let config = UpstreamConfig {
        base_url: server.uri(),
        timeout_secs: 5,
        requests_per_second: 100.0, // High limit for tests
        max_retries,
        initial_backoff_ms: 10,
        max_backoff_ms: 50,
    };
    RickMortyClient::new(&config).unwrap()
}

fn character(id: u64, name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "status": "Alive",
        "species": "Human",
        "url": format!("https://rickandmortyapi.com/api/character/{id}"),
        "episode": ["https://rickandmortyapi.com/api/episode/1"]
    })
}

#[tokio::test]
async fn test_follows_next_links_across_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/character"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "info": {"count": 3, "pages": 2, "next": null, "prev": null},
            "results": [character(3, "Summer Smith")]
        })))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/character"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "info": {"count": 3, "pages": 2, "next": format!("{}/character?page=2", server.uri()), "prev": null},
            "results": [character(1, "Rick Sanchez"), character(2, "Morty Smith")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, 3);
    let records = collect_all(&client, ResourceKind::Character, None)
        .await
        .unwrap();

    let names: Vec<&str> = records.iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["Rick Sanchez", "Morty Smith", "Summer Smith"]);
}

#[tokio::test]
async fn test_name_filter_is_sent_as_query_parameter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/location"))
        .and(query_param("name", "citadel of ricks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "info": {"next": null},
            "results": [{
                "id": 3,
                "name": "Citadel of Ricks",
                "type": "Space station",
                "url": "https://rickandmortyapi.com/api/location/3",
                "residents": []
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, 3);
    let page = client
        .fetch_page(ResourceKind::Location, Some("citadel of ricks"), None)
        .await
        .unwrap();

    assert_eq!(page.records.len(), 1);
    assert_eq!(page.records[0].kind(), ResourceKind::Location);
    assert!(page.next.is_none());
}

#[tokio::test]
async fn test_not_found_is_an_empty_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/episode"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({"error": "There is nothing here"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, 3);
    let page = client
        .fetch_page(ResourceKind::Episode, Some("zzzNoMatch"), None)
        .await
        .unwrap();

    assert!(page.records.is_empty());
    assert!(page.next.is_none());
}

#[tokio::test]
async fn test_server_error_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/character"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/character"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "info": {"next": null},
            "results": [character(1, "Rick Sanchez")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, 3);
    let page = client
        .fetch_page(ResourceKind::Character, None, None)
        .await
        .unwrap();

    assert_eq!(page.records.len(), 1);
}

#[tokio::test]
async fn test_gives_up_after_max_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/character"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(3)
        .mount(&server)
        .await;

    let client = client(&server, 2);
    let err = client
        .fetch_page(ResourceKind::Character, None, None)
        .await
        .unwrap_err();

    match err {
        FetchError::Status { status, body, .. } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("Expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/character"))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, 3);
    let err = client
        .fetch_page(ResourceKind::Character, None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 400, .. }));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_unexpected_body_is_a_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/episode"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, 3);
    let err = client
        .fetch_page(ResourceKind::Episode, None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Decode { .. }));
}
