//! Remotely configured base URLs, end to end: a Flagr server decides which
//! API server each endpoint goes to.

use dynamic_api_client::api::ExampleApi;
use dynamic_api_client::remote_config::{self, FlagrSource, RemoteConfigStore};
use dynamic_api_client::{ApiClient, CallContext, ClientConfig, HttpClient};
use mockito::Server;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn config(api: &Server, flagr: &Server) -> ClientConfig {
    ClientConfig {
        base_url: Some(api.url()),
        flagr_url: Some(flagr.url()),
        ..Default::default()
    }
}

fn build_api(config: &ClientConfig) -> ApiClient {
    let source = Arc::new(FlagrSource::from_config(config).expect("flagr source"));
    let store = Arc::new(RemoteConfigStore::new(source, config.min_fetch_interval));
    let builder = HttpClient::builder().config(config.clone());
    let client = remote_config::install(builder, store).build().expect("build client");
    ApiClient::new(Arc::new(client))
}

#[tokio::test]
async fn test_remote_base_url_routes_configured_endpoint() {
    let mut default_api = Server::new_async().await;
    let mut eu_api = Server::new_async().await;
    let mut flagr = Server::new_async().await;

    let attachment = json!({ "base_url": { "/something": eu_api.url() } });
    let evaluation = flagr
        .mock("POST", "/evaluation")
        .with_status(200)
        .with_body(json!({ "flagID": 12, "variantAttachment": attachment }).to_string())
        .expect(1)
        .create_async()
        .await;
    let eu = eu_api
        .mock("GET", "/something")
        .with_status(200)
        .with_body(r#""EU""#)
        .expect(2)
        .create_async()
        .await;
    let default = default_api
        .mock("GET", "/another-thing")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#""DEFAULT""#)
        .create_async()
        .await;

    let api = build_api(&config(&default_api, &flagr));

    let resp = api.get_something(&CallContext::None).await.unwrap();
    assert_eq!(resp.data, json!("EU"));
    // Within the fetch interval the cached config is reused.
    let resp = api.get_something(&CallContext::None).await.unwrap();
    assert_eq!(resp.data, json!("EU"));

    let resp = api
        .get_another_thing(&CallContext::None, "a", "b")
        .await
        .unwrap();
    assert_eq!(resp.data, json!("DEFAULT"));

    evaluation.assert_async().await;
    eu.assert_async().await;
    default.assert_async().await;
}

#[tokio::test]
async fn test_flagr_outage_falls_back_to_default_base_url() {
    let mut default_api = Server::new_async().await;
    let mut flagr = Server::new_async().await;

    flagr
        .mock("POST", "/evaluation")
        .with_status(503)
        .create_async()
        .await;
    let default = default_api
        .mock("GET", "/something")
        .with_status(200)
        .with_body(r#""DEFAULT""#)
        .create_async()
        .await;

    let api = build_api(&config(&default_api, &flagr));
    let resp = api.get_something(&CallContext::None).await.unwrap();
    assert_eq!(resp.data, json!("DEFAULT"));
    default.assert_async().await;
}

#[tokio::test]
async fn test_remote_base_url_wins_over_call_override() {
    let default_api = Server::new_async().await;
    let mut eu_api = Server::new_async().await;
    let mut flagr = Server::new_async().await;

    flagr
        .mock("POST", "/evaluation")
        .with_status(200)
        .with_body(
            json!({ "variantAttachment": { "base_url": { "/something": eu_api.url() } } })
                .to_string(),
        )
        .create_async()
        .await;
    let eu = eu_api
        .mock("GET", "/something")
        .with_status(200)
        .with_body(r#""EU""#)
        .create_async()
        .await;

    let api = build_api(&config(&default_api, &flagr));
    let ctx = CallContext::overrides(json!({ "baseURL": default_api.url() }));
    let resp = api.get_something(&ctx).await.unwrap();

    // Interceptors run after the override has been merged.
    assert_eq!(resp.data, json!("EU"));
    eu.assert_async().await;
}

#[tokio::test]
async fn test_missing_flagr_url_is_configuration_error() {
    let config = ClientConfig {
        min_fetch_interval: Duration::from_secs(1),
        ..Default::default()
    };
    let err = FlagrSource::from_config(&config).unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("Flagr URL must be set"));
}
