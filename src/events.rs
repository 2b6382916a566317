//! Session-level notifications for the presentation layer.
//!
//! The client never decides how a notification is shown; it publishes
//! [`SessionEvent`]s on a broadcast channel and whatever renders the UI
//! subscribes.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 64;

/// Visual flavor of a toast notification.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ToastVariant {
    #[default]
    Info,
    Success,
    Error,
}

/// Events broadcast by a [`Session`](crate::auth::Session).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A 401 could not be recovered by reissue; the user must log in again.
    SessionExpired,
    Toast {
        message: String,
        variant: ToastVariant,
        duration: Option<Duration>,
    },
}

/// Cloneable publisher/subscriber handle for [`SessionEvent`]s.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    /// Publish an event. Having no subscribers is fine.
    pub fn emit(&self, event: SessionEvent) {
        let receivers = self.tx.send(event).unwrap_or(0);
        tracing::trace!(receivers, "session event emitted");
    }

    pub fn emit_session_expired(&self) {
        self.emit(SessionEvent::SessionExpired);
    }

    pub fn emit_toast(&self, message: impl Into<String>, variant: ToastVariant) {
        self.emit(SessionEvent::Toast {
            message: message.into(),
            variant,
            duration: None,
        });
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
