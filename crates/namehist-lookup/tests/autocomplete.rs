//! Autocomplete against a mocked TwitterAPI.io.

use namehist_lookup::{Suggester, Suggestion};
use namehist_providers::TwitterApiIoClient;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn suggester(base_url: &str) -> Suggester {
    let client = TwitterApiIoClient::with_base_url("test-key", 2, "namehist-test/0.1", base_url)
        .expect("client construction should not fail");
    Suggester::new(Some(client))
}

#[tokio::test]
async fn uses_real_display_name_when_available() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/twitter/user/info"))
        .and(query_param("userName", "jack"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "data": { "name": "Jack Dorsey" }
        })))
        .mount(&server)
        .await;

    let suggestions = suggester(&server.uri()).suggest("@jack").await;

    assert_eq!(
        suggestions,
        vec![Suggestion {
            username: "jack".to_string(),
            name: "Jack Dorsey".to_string(),
            profile_image_url: "https://unavatar.io/twitter/jack".to_string(),
        }]
    );
}

#[tokio::test]
async fn falls_back_to_formatted_name_on_quota_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(402))
        .mount(&server)
        .await;

    let suggestions = suggester(&server.uri()).suggest("john_doe").await;

    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].name, "John Doe");
}
