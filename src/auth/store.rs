use tokio::sync::watch;

use super::token::AccessToken;

/// Holder for the current bearer token.
///
/// Implementations keep the token in memory only; a restarted process has to
/// obtain a new one through reissue.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<AccessToken>;
    /// Replace the stored token (or clear it with `None`) and notify subscribers.
    fn set(&self, token: Option<AccessToken>);
    /// Receiver that observes every `set`.
    fn subscribe(&self) -> watch::Receiver<Option<AccessToken>>;

    fn clear(&self) {
        self.set(None);
    }
}

/// Process-local token store backed by a `watch` channel.
///
/// Each `set` is a single replacement of the channel value, so readers never
/// observe a partially written token.
///
/// # Example
/// ```
/// use townsquare::auth::{AccessToken, MemoryTokenStore, TokenStore};
///
/// let store = MemoryTokenStore::new();
/// store.set(Some(AccessToken::new("abc")));
/// assert_eq!(store.get().unwrap().as_str(), "abc");
/// store.clear();
/// assert!(store.get().is_none());
/// ```
#[derive(Debug)]
pub struct MemoryTokenStore {
    tx: watch::Sender<Option<AccessToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    pub fn with_token(token: AccessToken) -> Self {
        let store = Self::new();
        store.set(Some(token));
        store
    }
}

impl Default for MemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<AccessToken> {
        self.tx.borrow().clone()
    }

    fn set(&self, token: Option<AccessToken>) {
        // Empty strings count as "no token".
        let token = token.filter(|t| !t.as_str().is_empty());
        tracing::debug!(present = token.is_some(), "access token updated");
        self.tx.send_replace(token);
    }

    fn subscribe(&self) -> watch::Receiver<Option<AccessToken>> {
        self.tx.subscribe()
    }
}
