#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::broadcast::Receiver;
use townsquare::auth::{AccessToken, HttpReissuer, MemoryTokenStore, Session};
use townsquare::client::ApiClient;
use townsquare::config::ClientConfig;
use townsquare::events::SessionEvent;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const REISSUE: &str = "/api/users/token/reissue";

pub fn config(server: &MockServer) -> ClientConfig {
    ClientConfig::new(server.uri()).with_timeout(Duration::from_secs(5))
}

pub fn api(server: &MockServer) -> ApiClient {
    ApiClient::new(config(server)).expect("build api client")
}

pub fn api_with_token(server: &MockServer, token: &str) -> ApiClient {
    let store = Arc::new(MemoryTokenStore::with_token(AccessToken::new(token)));
    ApiClient::with_token_store(config(server), store).expect("build api client")
}

/// A session whose reissuer talks to `server`, without an `ApiClient`.
pub fn session(server: &MockServer) -> Session {
    let reissuer = HttpReissuer::new(reqwest::Client::new(), &server.uri());
    Session::new(Arc::new(MemoryTokenStore::new()), Arc::new(reissuer))
}

pub fn ok(data: Value) -> Value {
    json!({ "success": true, "code": "SUCCESS", "message": "ok", "data": data })
}

pub fn fail(code: &str, message: &str) -> Value {
    json!({ "success": false, "code": code, "message": message, "data": null })
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub async fn mount_reissue_ok(server: &MockServer, token: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(REISSUE))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({ "accessToken": token }))))
        .expect(expected_calls)
        .mount(server)
        .await;
}

pub async fn mount_reissue_fail(server: &MockServer, code: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(REISSUE))
        .respond_with(ResponseTemplate::new(401).set_body_json(fail(code, "reissue refused")))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Drain everything already published on `rx`.
pub fn drain(rx: &mut Receiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(TryRecvError::Lagged(_)) => continue,
            Err(_) => return events,
        }
    }
}
