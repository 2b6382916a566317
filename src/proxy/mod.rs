//! Same-origin proxy for the answers API.
//!
//! Browsers talking to this server avoid cross-origin calls to the backend:
//! each route forwards to the matching backend path, attaches the inbound
//! `Authorization` header (or the configured fallback token) and mirrors the
//! backend's status and JSON body. Transport failures and unreadable bodies
//! become a 500 `PROXY_ERROR` envelope.

pub mod forward;

pub use forward::{forward, ProxyError, ProxyState, PROXY_ERROR_MESSAGE};

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ProxyConfig;
use crate::error::{Result, TownError};

/// Build the proxy router over `state`.
pub fn router(state: ProxyState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/questions/{id}/answers",
            get(list_answers).post(create_answer),
        )
        .route(
            "/api/answers/{id}",
            patch(update_answer).delete(delete_answer),
        )
        .route("/api/answers/{id}/accept", patch(accept_answer))
        .route("/api/answers/{id}/unaccept", patch(unaccept_answer))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `config.bind_addr()` and serve until the process is stopped.
pub async fn serve(config: &ProxyConfig) -> Result<()> {
    let state = ProxyState::new(config)?;
    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!(
        addr = %listener.local_addr()?,
        backend = state.backend_url(),
        "proxy listening"
    );
    axum::serve(listener, router(state))
        .await
        .map_err(TownError::Io)
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "townsquare-proxy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

type Proxied = std::result::Result<Response, ProxyError>;

async fn list_answers(State(state): State<ProxyState>, Path(id): Path<String>, headers: HeaderMap) -> Proxied {
    forward(&state, Method::GET, &format!("/questions/{id}/answers"), &headers, None).await
}

async fn create_answer(
    State(state): State<ProxyState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Proxied {
    forward(&state, Method::POST, &format!("/questions/{id}/answers"), &headers, Some(body)).await
}

async fn update_answer(
    State(state): State<ProxyState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Proxied {
    forward(&state, Method::PATCH, &format!("/answers/{id}"), &headers, Some(body)).await
}

async fn delete_answer(State(state): State<ProxyState>, Path(id): Path<String>, headers: HeaderMap) -> Proxied {
    forward(&state, Method::DELETE, &format!("/answers/{id}"), &headers, None).await
}

async fn accept_answer(State(state): State<ProxyState>, Path(id): Path<String>, headers: HeaderMap) -> Proxied {
    forward(&state, Method::PATCH, &format!("/answers/{id}/accept"), &headers, None).await
}

async fn unaccept_answer(State(state): State<ProxyState>, Path(id): Path<String>, headers: HeaderMap) -> Proxied {
    forward(&state, Method::PATCH, &format!("/answers/{id}/unaccept"), &headers, None).await
}
