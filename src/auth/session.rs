use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use super::reissue::{ReissueCoordinator, ReissueOutcome, Reissuer};
use super::store::TokenStore;
use super::token::AccessToken;
use crate::events::{EventBus, SessionEvent, ToastVariant};
use crate::resources::towns::Town;

pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

/// Explicit per-user session context: token store, reissue coordinator,
/// notification bus and the currently selected town.
///
/// Clones share all state.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use townsquare::auth::{AccessToken, HttpReissuer, MemoryTokenStore, Session};
///
/// let reissuer = HttpReissuer::new(reqwest::Client::new(), "http://localhost:8080");
/// let session = Session::new(Arc::new(MemoryTokenStore::new()), Arc::new(reissuer));
/// session.set_token(AccessToken::new("abc"));
/// assert!(session.is_authenticated());
/// ```
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
    reissue: ReissueCoordinator,
    events: EventBus,
    town: Arc<RwLock<Option<Town>>>,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>, reissuer: Arc<dyn Reissuer>) -> Self {
        Self {
            reissue: ReissueCoordinator::new(reissuer, Arc::clone(&store)),
            store,
            events: EventBus::new(),
            town: Arc::new(RwLock::new(None)),
        }
    }

    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn token(&self) -> Option<AccessToken> {
        self.store.get()
    }

    pub fn set_token(&self, token: AccessToken) {
        self.store.set(Some(token));
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.get().is_some()
    }

    /// Single-flight reissue; see [`ReissueCoordinator::reissue`].
    pub async fn reissue(&self) -> ReissueOutcome {
        self.reissue.reissue().await
    }

    pub fn reissue_pending(&self) -> bool {
        self.reissue.is_pending()
    }

    pub fn selected_town(&self) -> Option<Town> {
        self.town
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn select_town(&self, town: Town) {
        *self.town.write().unwrap_or_else(PoisonError::into_inner) = Some(town);
    }

    pub fn clear_town(&self) {
        *self.town.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Drop the token and the selected town.
    pub fn end(&self) {
        self.store.clear();
        self.clear_town();
    }

    /// Spawn a listener that ends the session and raises an error toast
    /// whenever a [`SessionEvent::SessionExpired`] is published.
    pub fn watch_session_expired(&self) -> JoinHandle<()> {
        let session = self.clone();
        let mut rx = self.events.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(SessionEvent::SessionExpired) => {
                        tracing::info!("session expired, clearing credentials");
                        session.end();
                        session
                            .events
                            .emit_toast(SESSION_EXPIRED_MESSAGE, ToastVariant::Error);
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "session event listener lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::store::MemoryTokenStore;
    use async_trait::async_trait;

    struct NeverReissue;

    #[async_trait]
    impl Reissuer for NeverReissue {
        async fn reissue(&self) -> ReissueOutcome {
            ReissueOutcome::failed(None)
        }
    }

    fn session() -> Session {
        Session::new(Arc::new(MemoryTokenStore::new()), Arc::new(NeverReissue))
    }

    fn town() -> Town {
        Town {
            id: 7,
            province: "Seoul".to_string(),
            city: "Mapo-gu".to_string(),
        }
    }

    #[test]
    fn end_clears_token_and_town() {
        let session = session();
        session.set_token(AccessToken::new("tok"));
        session.select_town(town());

        session.end();

        assert!(!session.is_authenticated());
        assert!(session.selected_town().is_none());
    }

    #[test]
    fn clones_share_state() {
        let a = session();
        let b = a.clone();
        a.set_token(AccessToken::new("tok"));
        b.select_town(town());
        assert_eq!(b.token(), Some(AccessToken::new("tok")));
        assert_eq!(a.selected_town(), Some(town()));
    }

    #[tokio::test]
    async fn expired_event_ends_session_and_toasts() {
        let session = session();
        session.set_token(AccessToken::new("tok"));
        session.select_town(town());
        let mut rx = session.events().subscribe();
        let listener = session.watch_session_expired();

        session.events().emit_session_expired();

        assert_eq!(rx.recv().await.unwrap(), SessionEvent::SessionExpired);
        match rx.recv().await.unwrap() {
            SessionEvent::Toast { variant, .. } => assert_eq!(variant, ToastVariant::Error),
            other => panic!("expected toast, got {other:?}"),
        }
        assert!(!session.is_authenticated());
        assert!(session.selected_town().is_none());
        listener.abort();
    }
}
