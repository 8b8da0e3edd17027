//! reqwest transport against a local mockito server.

use dynamic_api_client::transport::{HttpTransport, TransportError};
use dynamic_api_client::{ClientInstance, Error, HttpClient, RequestDescriptor};
use mockito::{Matcher, Server};
use serde_json::json;
use std::sync::Arc;

fn client_for(server: &Server) -> HttpClient {
    HttpClient::builder()
        .base_url(server.url())
        .header("x-axios-instance", "custom")
        .build()
        .expect("build client")
}

#[tokio::test]
async fn test_get_with_query_and_default_headers() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("GET", "/another-thing")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("param1".into(), "one".into()),
            Matcher::UrlEncoded("param2".into(), "two words".into()),
        ]))
        .match_header("x-axios-instance", "custom")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok":true}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let resp = client
        .execute(
            RequestDescriptor::get("/another-thing")
                .param("param1", "one")
                .param("param2", "two words"),
        )
        .await
        .unwrap();

    assert_eq!(resp.status, 200);
    assert_eq!(resp.data, json!({"ok": true}));
    assert_eq!(resp.header("Content-Type"), Some("application/json"));
    m.assert_async().await;
}

#[tokio::test]
async fn test_non_json_body_is_text() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/something")
        .with_status(200)
        .with_body("RESPONSE")
        .create_async()
        .await;

    let resp = client_for(&server)
        .execute(RequestDescriptor::get("/something"))
        .await
        .unwrap();
    assert_eq!(resp.data, json!("RESPONSE"));
}

#[tokio::test]
async fn test_empty_body_is_null() {
    let mut server = Server::new_async().await;
    server
        .mock("DELETE", "/something")
        .with_status(204)
        .create_async()
        .await;

    let resp = client_for(&server)
        .execute(RequestDescriptor::delete("/something"))
        .await
        .unwrap();
    assert_eq!(resp.status, 204);
    assert!(resp.data.is_null());
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("POST", "/something")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({"name": "thing", "count": 2})))
        .with_status(201)
        .with_body(r#"{"id":7}"#)
        .create_async()
        .await;

    let resp = client_for(&server)
        .execute(RequestDescriptor::post("/something").json(json!({"name": "thing", "count": 2})))
        .await
        .unwrap();
    assert_eq!(resp.status, 201);
    assert_eq!(resp.data["id"], 7);
    m.assert_async().await;
}

#[tokio::test]
async fn test_error_status_carries_response_and_request() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/something")
        .with_status(500)
        .with_body(r#"{"message":"ERROR"}"#)
        .create_async()
        .await;

    let err = client_for(&server)
        .execute(RequestDescriptor::get("/something"))
        .await
        .unwrap_err();

    match &err {
        Error::Transport(transport) => {
            assert!(matches!(transport, TransportError::Status { .. }));
            assert_eq!(transport.status(), Some(500));
        }
        other => panic!("unexpected error: {other}"),
    }
    let response = err.response().unwrap();
    assert_eq!(response.status, 500);
    assert_eq!(response.data["message"], "ERROR");
    assert_eq!(response.request.url, "/something");
    assert_eq!(
        response.request.headers.get("x-axios-instance").map(String::as_str),
        Some("custom")
    );
}

#[tokio::test]
async fn test_absolute_url_ignores_base_url() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("GET", "/absolute")
        .with_status(200)
        .create_async()
        .await;

    let client = HttpClient::builder()
        .base_url("http://unused.invalid")
        .build()
        .unwrap();
    let resp = client
        .execute(RequestDescriptor::get(format!("{}/absolute", server.url())))
        .await
        .unwrap();
    assert_eq!(resp.status, 200);
    m.assert_async().await;
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let client = HttpClient::builder()
        .base_url("http://127.0.0.1:1")
        .build()
        .unwrap();
    let err = client
        .execute(RequestDescriptor::get("/something"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport(TransportError::Network { .. })));
    assert_eq!(err.request().map(|r| r.url.as_str()), Some("/something"));
}

#[tokio::test]
async fn test_unbuildable_url_is_reported() {
    let client = HttpClient::builder().build().unwrap();
    let err = client
        .execute(RequestDescriptor::get("/no-base-url"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport(TransportError::Other { .. })));
}

#[tokio::test]
async fn test_shared_reqwest_client() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("GET", "/something")
        .with_status(200)
        .with_body(r#""RESPONSE""#)
        .create_async()
        .await;

    let transport = HttpTransport::from_client(reqwest::Client::new());
    let client = HttpClient::builder()
        .base_url(server.url())
        .transport(Arc::new(transport))
        .build()
        .unwrap();
    let resp = client
        .execute(RequestDescriptor::get("/something"))
        .await
        .unwrap();
    assert_eq!(resp.data, json!("RESPONSE"));
    assert_eq!(client.transport_name(), "http");
    m.assert_async().await;
}
