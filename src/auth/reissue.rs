//! Single-flight access token reissue.
//!
//! Concurrent 401s from unrelated requests must not each rotate the refresh
//! cookie. [`ReissueCoordinator`] coalesces every reissue request made while
//! one is in flight into that one network call, and every caller observes the
//! same [`ReissueOutcome`].

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use serde::Deserialize;
use tracing::{debug, warn};

use super::store::TokenStore;
use super::token::AccessToken;
use crate::client::envelope::{safe_json, ApiResponse};
use crate::error::unified::NOT_AUTHENTICATED_CODE;

pub const REISSUE_PATH: &str = "/api/users/token/reissue";

/// Result of one reissue attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReissueOutcome {
    Issued(AccessToken),
    /// Transport failure, non-2xx status, `success: false`, or no token in the
    /// payload. `code` is the backend error code when one was returned.
    Failed { code: Option<String> },
}

impl ReissueOutcome {
    pub fn failed(code: Option<String>) -> Self {
        Self::Failed { code }
    }

    pub fn token(&self) -> Option<&AccessToken> {
        match self {
            Self::Issued(token) => Some(token),
            Self::Failed { .. } => None,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Failed { code } => code.as_deref(),
            Self::Issued(_) => None,
        }
    }

    /// The caller simply has no session; not an expiry worth alerting about.
    pub fn is_unauthenticated(&self) -> bool {
        self.code() == Some(NOT_AUTHENTICATED_CODE)
    }
}

/// Performs the actual reissue round-trip.
#[async_trait]
pub trait Reissuer: Send + Sync {
    async fn reissue(&self) -> ReissueOutcome;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReissuePayload {
    access_token: Option<String>,
}

/// Reissues through `POST /api/users/token/reissue`.
///
/// The refresh credential is an HTTP-only cookie, so `client` must carry the
/// cookie jar that received it at login.
#[derive(Debug, Clone)]
pub struct HttpReissuer {
    client: reqwest::Client,
    url: String,
}

impl HttpReissuer {
    pub fn new(client: reqwest::Client, api_base_url: &str) -> Self {
        Self {
            client,
            url: format!("{}{REISSUE_PATH}", api_base_url.trim_end_matches('/')),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[async_trait]
impl Reissuer for HttpReissuer {
    async fn reissue(&self) -> ReissueOutcome {
        let resp = match self.client.post(&self.url).send().await {
            Ok(resp) => resp,
            Err(err) => {
                warn!(error = %err, "token reissue request failed");
                return ReissueOutcome::failed(None);
            }
        };
        let status = resp.status();
        let body: Option<ApiResponse<ReissuePayload>> = safe_json(resp).await;

        let Some(body) = body else {
            warn!(status = status.as_u16(), "token reissue returned an unreadable body");
            return ReissueOutcome::failed(None);
        };
        if !status.is_success() || !body.success {
            debug!(status = status.as_u16(), code = ?body.code, "token reissue rejected");
            return ReissueOutcome::failed(body.code);
        }
        match body.data.and_then(|d| d.access_token).filter(|t| !t.is_empty()) {
            Some(token) => ReissueOutcome::Issued(AccessToken::new(token)),
            None => ReissueOutcome::failed(body.code),
        }
    }
}

type PendingReissue = Shared<BoxFuture<'static, ReissueOutcome>>;

#[derive(Default)]
struct PendingSlot {
    generation: u64,
    handle: Option<PendingReissue>,
}

/// Coalesces concurrent reissue requests into one in-flight call.
///
/// On success the new token is written to the token store before any caller
/// sees the outcome. The pending slot is cleared when the call settles, so the
/// next request after a settled attempt starts a fresh one.
#[derive(Clone)]
pub struct ReissueCoordinator {
    reissuer: Arc<dyn Reissuer>,
    store: Arc<dyn TokenStore>,
    pending: Arc<Mutex<PendingSlot>>,
}

impl ReissueCoordinator {
    pub fn new(reissuer: Arc<dyn Reissuer>, store: Arc<dyn TokenStore>) -> Self {
        Self {
            reissuer,
            store,
            pending: Arc::new(Mutex::new(PendingSlot::default())),
        }
    }

    /// Whether a reissue is currently in flight.
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .handle
            .is_some()
    }

    /// Reissue the access token, joining an in-flight attempt if there is one.
    pub async fn reissue(&self) -> ReissueOutcome {
        let handle = {
            let mut slot = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(handle) = slot.handle.clone() {
                debug!("joining in-flight token reissue");
                handle
            } else {
                slot.generation += 1;
                let handle = self.start(slot.generation);
                slot.handle = Some(handle.clone());
                handle
            }
        };
        handle.await
    }

    fn start(&self, generation: u64) -> PendingReissue {
        let reissuer = Arc::clone(&self.reissuer);
        let store = Arc::clone(&self.store);
        let pending = Arc::clone(&self.pending);

        async move {
            debug!(generation, "starting token reissue");
            let outcome = reissuer.reissue().await;
            if let ReissueOutcome::Issued(token) = &outcome {
                store.set(Some(token.clone()));
            }
            let mut slot = pending.lock().unwrap_or_else(PoisonError::into_inner);
            if slot.generation == generation {
                slot.handle = None;
            }
            outcome
        }
        .boxed()
        .shared()
    }
}
