//! Integration tests for the history clients using wiremock HTTP mocks.

use namehist_providers::{
    HistoryProvider, HistoryQuery, LolArchiverClient, MemoryLolClient, ProviderError,
    WaybackClient,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const UA: &str = "namehist-test/0.1";

fn by_username(username: &str) -> HistoryQuery {
    HistoryQuery {
        username: Some(username.to_string()),
        user_id: None,
    }
}

fn lolarchiver(base_url: &str) -> LolArchiverClient {
    LolArchiverClient::with_base_url("test-key", 5, UA, base_url)
        .expect("client construction should not fail")
}

fn memory_lol(base_url: &str) -> MemoryLolClient {
    MemoryLolClient::with_base_url(5, UA, base_url).expect("client construction should not fail")
}

#[tokio::test]
async fn lolarchiver_sends_credentials_as_headers() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "success": true,
        "data": {
            "username_history": [
                { "username": "jack", "start_date": "2011-01-01", "end_date": "current" },
                { "username": "jackd", "start_date": "2009-03-03", "end_date": "2011-01-01" }
            ]
        }
    });

    Mock::given(method("POST"))
        .and(path("/twitter_history_lookup"))
        .and(header("apikey", "test-key"))
        .and(header("handle", "jack"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let names = lolarchiver(&server.uri())
        .fetch_history(&by_username("jack"))
        .await
        .expect("should parse history");

    assert_eq!(names.len(), 2);
    assert_eq!(names[0].username, "jack");
    assert_eq!(names[0].end_date, None, "\"current\" means still in use");
    assert_eq!(names[1].end_date.as_deref(), Some("2011-01-01"));
}

#[tokio::test]
async fn lolarchiver_416_is_quota_exhausted() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/twitter_history_lookup"))
        .respond_with(ResponseTemplate::new(416))
        .mount(&server)
        .await;

    let err = lolarchiver(&server.uri())
        .fetch_history(&by_username("jack"))
        .await
        .unwrap_err();

    assert!(err.is_quota_exhausted(), "got {err:?}");
    assert_eq!(err.provider(), "lolarchiver");
}

#[tokio::test]
async fn lolarchiver_401_is_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = lolarchiver(&server.uri())
        .fetch_history(&by_username("jack"))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Unauthorized { .. }), "got {err:?}");
}

#[tokio::test]
async fn lolarchiver_unsuccessful_body_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "success": false, "error": "bad handle" })),
        )
        .mount(&server)
        .await;

    let err = lolarchiver(&server.uri())
        .fetch_history(&by_username("jack"))
        .await
        .unwrap_err();

    match err {
        ProviderError::Api { message, .. } => assert_eq!(message, "bad handle"),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn lolarchiver_requires_username() {
    let query = HistoryQuery {
        username: None,
        user_id: Some("12".to_string()),
    };
    let err = lolarchiver("http://127.0.0.1:9")
        .fetch_history(&query)
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::MissingInput { .. }), "got {err:?}");
}

#[tokio::test]
async fn memory_lol_reads_account_screen_names() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "accounts": [{
            "id": 12,
            "id_str": "12",
            "screen_names": {
                "jack": ["2011-01-01"],
                "jackd": ["2009-03-03", "2010-12-31"]
            }
        }]
    });

    Mock::given(method("GET"))
        .and(path("/v1/tw/jack"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let names = memory_lol(&server.uri())
        .fetch_history(&by_username("jack"))
        .await
        .expect("should parse archive");

    assert_eq!(names.len(), 2);
    let jackd = names.iter().find(|n| n.username == "jackd").unwrap();
    assert_eq!(jackd.start_date.as_deref(), Some("2009-03-03"));
    assert_eq!(jackd.end_date.as_deref(), Some("2010-12-31"));
}

#[tokio::test]
async fn memory_lol_keeps_only_the_account_currently_holding_the_handle() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "accounts": [
            {
                "id_str": "1",
                "screen_names": {
                    "jack": ["2008-01-01", "2010-01-01"],
                    "alice_old": ["2010-01-02", "2024-06-01"]
                }
            },
            {
                "id_str": "2",
                "screen_names": {
                    "bob_old": ["2009-01-01", "2012-01-01"],
                    "jack": ["2012-01-02", "2024-06-01"]
                }
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/v1/tw/jack"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let names = memory_lol(&server.uri())
        .fetch_history(&by_username("jack"))
        .await
        .expect("should parse archive");

    let mut handles: Vec<&str> = names.iter().map(|n| n.username.as_str()).collect();
    handles.sort_unstable();
    assert_eq!(handles, vec!["bob_old", "jack"]);

    let jack = names.iter().find(|n| n.username == "jack").unwrap();
    assert_eq!(jack.start_date.as_deref(), Some("2012-01-02"));
    assert_eq!(jack.end_date, None, "last crawl date is not an end date");
    let bob = names.iter().find(|n| n.username == "bob_old").unwrap();
    assert_eq!(bob.end_date.as_deref(), Some("2012-01-01"));
}

#[tokio::test]
async fn memory_lol_looks_up_by_id_when_no_username() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "accounts": [{ "screen_names": { "jack": ["2011-01-01"] } }]
    });

    Mock::given(method("GET"))
        .and(path("/v1/tw/id/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let query = HistoryQuery {
        username: None,
        user_id: Some("12".to_string()),
    };
    let names = memory_lol(&server.uri())
        .fetch_history(&query)
        .await
        .expect("should parse archive");

    assert_eq!(names.len(), 1);
    assert_eq!(names[0].username, "jack");
}

#[tokio::test]
async fn memory_lol_empty_accounts_is_no_data() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "accounts": [] })))
        .mount(&server)
        .await;

    let err = memory_lol(&server.uri())
        .fetch_history(&by_username("nobody"))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::NoData { .. }), "got {err:?}");
}

#[tokio::test]
async fn memory_lol_server_error_is_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = memory_lol(&server.uri())
        .fetch_history(&by_username("jack"))
        .await
        .unwrap_err();

    assert!(
        matches!(err, ProviderError::UnexpectedStatus { status: 503, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn memory_lol_slow_response_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "accounts": [] }))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = MemoryLolClient::with_base_url(1, UA, &server.uri()).unwrap();
    let err = client.fetch_history(&by_username("jack")).await.unwrap_err();

    assert!(matches!(err, ProviderError::Timeout { .. }), "got {err:?}");
}

#[tokio::test]
async fn wayback_reports_snapshot_count_without_records() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        ["urlkey", "timestamp", "original"],
        ["com,twitter)/jack", "20120101000000", "http://twitter.com/jack"]
    ]);

    Mock::given(method("GET"))
        .and(path("/cdx/search/cdx"))
        .and(query_param("url", "twitter.com/jack"))
        .and(query_param("output", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = WaybackClient::with_base_url(5, UA, &server.uri()).unwrap();
    let err = client.fetch_history(&by_username("jack")).await.unwrap_err();

    match err {
        ProviderError::NoData { reason, .. } => assert!(reason.contains("1 archived")),
        other => panic!("expected NoData, got {other:?}"),
    }
}
