//! # Event Subscriber
//!
//! Defines the subscription side of the broadcaster: the per-session queue a
//! viewer reads from, and the RAII [`LiveSession`] that unsubscribes when it
//! goes away.

use crate::events::{BroadcastMessage, Channel};
use crate::publisher::SubscriptionRegistry;
use serde::{Deserialize, Serialize};
use shared_types::entities::CompanyId;
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::Stream;
use tracing::debug;
use uuid::Uuid;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// Every sender for this session is gone.
    #[error("Session closed")]
    Closed,
}

/// Identifies one viewer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle returned by `subscribe`, needed to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionToken(Uuid);

impl SubscriptionToken {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriptionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trait for registering sessions on a company channel.
pub trait EventSubscriber: Send + Sync {
    /// Start delivering `company_id`'s quote-list events to `session`.
    fn subscribe(&self, company_id: CompanyId, session: SessionHandle) -> SubscriptionToken;

    /// Stop delivering to the session behind `token`.
    ///
    /// Returns `false` if the token was unknown or already removed.
    fn unsubscribe(&self, token: SubscriptionToken) -> bool;
}

/// Sending half of a session queue, held by the broadcaster.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: SessionId,
    sender: mpsc::Sender<BroadcastMessage>,
}

impl SessionHandle {
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Enqueue without waiting.
    pub fn try_deliver(&self, message: BroadcastMessage) -> Result<(), TrySendError<BroadcastMessage>> {
        self.sender.try_send(message)
    }

    /// True once the receiving side has been dropped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Receiving half of a session queue, held by the viewer.
#[derive(Debug)]
pub struct SessionReceiver {
    id: SessionId,
    receiver: mpsc::Receiver<BroadcastMessage>,
}

impl SessionReceiver {
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Wait for the next message.
    ///
    /// Returns `None` once every handle for this session is gone.
    pub async fn recv(&mut self) -> Option<BroadcastMessage> {
        self.receiver.recv().await
    }

    /// Take the next message if one is queued.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(message))` - A message was queued
    /// - `Ok(None)` - Nothing queued right now
    /// - `Err(SubscriptionError::Closed)` - No handle can deliver any more
    pub fn try_recv(&mut self) -> Result<Option<BroadcastMessage>, SubscriptionError> {
        match self.receiver.try_recv() {
            Ok(message) => Ok(Some(message)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(SubscriptionError::Closed),
        }
    }

    #[must_use]
    pub fn into_stream(self) -> ReceiverStream<BroadcastMessage> {
        ReceiverStream::new(self.receiver)
    }
}

/// Create a bounded session queue holding at most `capacity` undelivered
/// messages.
#[must_use]
pub fn session_channel(capacity: usize) -> (SessionHandle, SessionReceiver) {
    let id = SessionId::new();
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    (
        SessionHandle { id, sender },
        SessionReceiver { id, receiver },
    )
}

/// A subscribed viewer session.
///
/// When dropped, the subscription is removed from the broadcaster.
pub struct LiveSession {
    token: SubscriptionToken,
    channel: Channel,
    receiver: SessionReceiver,
    registry: Arc<SubscriptionRegistry>,
}

impl LiveSession {
    pub(crate) fn new(
        token: SubscriptionToken,
        channel: Channel,
        receiver: SessionReceiver,
        registry: Arc<SubscriptionRegistry>,
    ) -> Self {
        Self {
            token,
            channel,
            receiver,
            registry,
        }
    }

    #[must_use]
    pub fn token(&self) -> SubscriptionToken {
        self.token
    }

    #[must_use]
    pub fn channel(&self) -> Channel {
        self.channel
    }

    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.receiver.id()
    }

    pub async fn recv(&mut self) -> Option<BroadcastMessage> {
        self.receiver.recv().await
    }

    pub fn try_recv(&mut self) -> Result<Option<BroadcastMessage>, SubscriptionError> {
        self.receiver.try_recv()
    }
}

impl Drop for LiveSession {
    fn drop(&mut self) {
        if self.registry.remove(self.token) {
            debug!(channel = %self.channel, token = %self.token, "Session dropped");
        }
    }
}

impl Stream for LiveSession {
    type Item = BroadcastMessage;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.receiver.poll_recv(cx)
    }
}
