use std::net::SocketAddr;

use serde_json::{json, Value};
use townsquare::config::ProxyConfig;
use townsquare::proxy::{router, ProxyState};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

async fn spawn_proxy(backend_url: String, fallback_token: Option<&str>) -> SocketAddr {
    let config = ProxyConfig {
        backend_url,
        fallback_token: fallback_token.map(str::to_string),
        ..ProxyConfig::default()
    };
    let state = ProxyState::new(&config).expect("proxy state");
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    addr
}

async fn backend() -> (MockServer, String) {
    let server = MockServer::start().await;
    let url = format!("{}/api", server.uri());
    (server, url)
}

#[tokio::test]
async fn mirrors_backend_status_and_body() {
    let (server, url) = backend().await;
    let body = json!({ "success": false, "code": "ANSWER_404", "message": "missing", "data": null });
    Mock::given(method("DELETE"))
        .and(path("/api/answers/12"))
        .respond_with(ResponseTemplate::new(404).set_body_json(body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let addr = spawn_proxy(url, None).await;
    let resp = reqwest::Client::new()
        .delete(format!("http://{addr}/api/answers/12"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 404);
    assert_eq!(resp.json::<Value>().await.unwrap(), body);
}

#[tokio::test]
async fn forwards_json_body_and_inbound_authorization() {
    let (server, url) = backend().await;
    Mock::given(method("POST"))
        .and(path("/api/questions/3/answers"))
        .and(header("authorization", "Bearer caller"))
        .and(body_json(json!({ "content": "Try the bakery on 5th" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": null })))
        .expect(1)
        .mount(&server)
        .await;

    let addr = spawn_proxy(url, Some("dev-token")).await;
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/api/questions/3/answers"))
        .header("authorization", "Bearer caller")
        .json(&json!({ "content": "Try the bakery on 5th" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
}

#[tokio::test]
async fn fallback_token_used_without_inbound_header() {
    let (server, url) = backend().await;
    Mock::given(method("PATCH"))
        .and(path("/api/answers/4/accept"))
        .and(header("authorization", "Bearer dev-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let addr = spawn_proxy(url, Some("dev-token")).await;
    let resp = reqwest::Client::new()
        .patch(format!("http://{addr}/api/answers/4/accept"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
}

#[tokio::test]
async fn no_authorization_without_header_or_fallback() {
    let (server, url) = backend().await;
    Mock::given(method("GET"))
        .and(path("/api/questions/3/answers"))
        .and(|req: &Request| !req.headers.contains_key("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let addr = spawn_proxy(url, None).await;
    let resp = reqwest::get(format!("http://{addr}/api/questions/3/answers"))
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
}

#[tokio::test]
async fn unreachable_backend_yields_proxy_error() {
    let closed = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let dead = format!("http://{}/api", closed.local_addr().unwrap());
    drop(closed);

    let addr = spawn_proxy(dead, None).await;
    let resp = reqwest::get(format!("http://{addr}/api/questions/1/answers"))
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["code"], json!("PROXY_ERROR"));
}

#[tokio::test]
async fn non_json_backend_body_yields_proxy_error() {
    let (server, url) = backend().await;
    Mock::given(method("PATCH"))
        .and(path("/api/answers/4/unaccept"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let addr = spawn_proxy(url, None).await;
    let resp = reqwest::Client::new()
        .patch(format!("http://{addr}/api/answers/4/unaccept"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 500);
    assert_eq!(resp.json::<Value>().await.unwrap()["code"], json!("PROXY_ERROR"));
}

#[tokio::test]
async fn invalid_inbound_json_is_rejected_before_forwarding() {
    let (server, url) = backend().await;
    Mock::given(method("PATCH"))
        .and(path("/api/answers/4"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let addr = spawn_proxy(url, None).await;
    let resp = reqwest::Client::new()
        .patch(format!("http://{addr}/api/answers/4"))
        .body("not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 500);
}

#[tokio::test]
async fn health_reports_ok() {
    let addr = spawn_proxy("http://127.0.0.1:1/api".to_string(), None).await;
    let body: Value = reqwest::get(format!("http://{addr}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], json!("ok"));
}
