//! Profile enrichment through real provider clients against mocked servers.

use std::time::Duration;

use namehist_lookup::ProfileEnricher;
use namehist_providers::{ProfileProvider, UnavatarClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn slow_unavatar_name_lookup_keeps_the_avatar() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/twitter/jack"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(600)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/twitter/jack"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "name": "Jack Dorsey" }))
                .set_delay(Duration::from_millis(800)),
        )
        .mount(&server)
        .await;

    let unavatar: Box<dyn ProfileProvider> = Box::new(
        UnavatarClient::with_base_url(1, "namehist-test/0.1", &server.uri()).unwrap(),
    );
    let profile = ProfileEnricher::new(vec![unavatar]).enrich("jack").await;

    assert_eq!(profile.source, "unavatar");
    assert_eq!(profile.name, "Jack Dorsey");
    assert_eq!(
        profile.profile_image_url,
        format!("{}/twitter/jack", server.uri())
    );
}
