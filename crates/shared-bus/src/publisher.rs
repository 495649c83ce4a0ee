//! # Event Publisher
//!
//! Defines the publishing side of the broadcaster.

use crate::events::{BroadcastMessage, Channel, QuoteEvent};
use crate::subscriber::{
    session_channel, EventSubscriber, LiveSession, SessionHandle, SubscriptionToken,
};
use crate::DEFAULT_CHANNEL_CAPACITY;
use shared_types::entities::CompanyId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

/// Trait for publishing quote-list events.
///
/// Publishing never blocks and never fails: the caller has already committed
/// the change and only wants it fanned out.
pub trait QuoteEventPublisher: Send + Sync {
    /// Publish an event on `company_id`'s channel.
    ///
    /// # Returns
    ///
    /// The number of sessions the event was enqueued for.
    fn publish(&self, company_id: CompanyId, event: QuoteEvent) -> usize;

    /// Get the total number of events published.
    fn events_published(&self) -> u64;
}

/// Called with the total number of live subscriptions after every
/// subscribe or unsubscribe, including a [`LiveSession`] being dropped.
pub type SubscriptionListener = Arc<dyn Fn(usize) + Send + Sync>;

/// Session registry shared between the bus and every [`LiveSession`].
#[derive(Default)]
pub(crate) struct SubscriptionRegistry {
    state: RwLock<RegistryState>,
    listener: Option<SubscriptionListener>,
}

#[derive(Default)]
struct RegistryState {
    channels: HashMap<CompanyId, HashMap<SubscriptionToken, SessionHandle>>,
    owners: HashMap<SubscriptionToken, CompanyId>,
}

impl SubscriptionRegistry {
    fn with_listener(listener: Option<SubscriptionListener>) -> Self {
        Self {
            state: RwLock::default(),
            listener,
        }
    }

    fn insert(&self, company_id: CompanyId, session: SessionHandle) -> SubscriptionToken {
        let token = SubscriptionToken::new();
        let total = {
            let mut state = self.state.write();
            state
                .channels
                .entry(company_id)
                .or_default()
                .insert(token, session);
            state.owners.insert(token, company_id);
            state.owners.len()
        };
        self.notify(total);
        token
    }

    /// Returns `true` if the token was registered.
    pub(crate) fn remove(&self, token: SubscriptionToken) -> bool {
        let total = {
            let mut state = self.state.write();
            let Some(company_id) = state.owners.remove(&token) else {
                return false;
            };
            if let Some(sessions) = state.channels.get_mut(&company_id) {
                sessions.remove(&token);
                if sessions.is_empty() {
                    state.channels.remove(&company_id);
                }
            }
            state.owners.len()
        };
        self.notify(total);
        true
    }

    fn count(&self, company_id: CompanyId) -> usize {
        self.state
            .read()
            .channels
            .get(&company_id)
            .map_or(0, HashMap::len)
    }

    fn total(&self) -> usize {
        self.state.read().owners.len()
    }

    // Outside the lock: the listener may read the registry.
    fn notify(&self, total: usize) {
        if let Some(listener) = &self.listener {
            listener(total);
        }
    }
}

/// In-memory implementation of the broadcaster.
///
/// Each session owns a bounded `tokio::sync::mpsc` queue. Publishing walks the
/// company's sessions and `try_send`s a copy into each queue, so one slow
/// viewer can only lose its own events.
pub struct InMemoryEventBus {
    /// Registered sessions by company.
    registry: Arc<SubscriptionRegistry>,

    /// Last sequence number issued per channel.
    sequences: Mutex<HashMap<CompanyId, u64>>,

    /// Total events published.
    events_published: AtomicU64,

    /// Total messages enqueued across all sessions.
    deliveries: AtomicU64,

    /// Total messages lost to full or closed sessions.
    dropped: AtomicU64,

    /// Queue capacity for sessions opened through `open_session`.
    capacity: usize,
}

impl InMemoryEventBus {
    /// Create a new bus with default session capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new bus whose sessions buffer at most `capacity` messages.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::build(capacity, None)
    }

    /// Like [`with_capacity`](Self::with_capacity), reporting the number of
    /// live subscriptions to `listener` whenever it changes.
    #[must_use]
    pub fn with_subscription_listener(capacity: usize, listener: SubscriptionListener) -> Self {
        Self::build(capacity, Some(listener))
    }

    fn build(capacity: usize, listener: Option<SubscriptionListener>) -> Self {
        Self {
            registry: Arc::new(SubscriptionRegistry::with_listener(listener)),
            sequences: Mutex::new(HashMap::new()),
            events_published: AtomicU64::new(0),
            deliveries: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            capacity,
        }
    }

    /// Open a session on `company_id`'s channel.
    ///
    /// The session only sees events published after this call returns.
    #[must_use]
    pub fn open_session(&self, company_id: CompanyId) -> LiveSession {
        let (handle, receiver) = session_channel(self.capacity);
        let token = self.subscribe(company_id, handle);
        LiveSession::new(
            token,
            Channel::quotes(company_id),
            receiver,
            self.registry.clone(),
        )
    }

    /// Sessions currently subscribed to `company_id`.
    #[must_use]
    pub fn subscriber_count(&self, company_id: CompanyId) -> usize {
        self.registry.count(company_id)
    }

    /// Sessions currently subscribed across every company.
    #[must_use]
    pub fn active_subscriptions(&self) -> usize {
        self.registry.total()
    }

    #[must_use]
    pub fn deliveries(&self) -> u64 {
        self.deliveries.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Get the per-session capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn next_sequence(&self, company_id: CompanyId) -> u64 {
        let mut sequences = self.sequences.lock();
        let sequence = sequences.entry(company_id).or_insert(0);
        *sequence += 1;
        *sequence
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSubscriber for InMemoryEventBus {
    fn subscribe(&self, company_id: CompanyId, session: SessionHandle) -> SubscriptionToken {
        let session_id = session.id();
        let token = self.registry.insert(company_id, session);
        debug!(
            channel = %Channel::quotes(company_id),
            session = %session_id,
            token = %token,
            "New subscription created"
        );
        token
    }

    fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        let removed = self.registry.remove(token);
        if removed {
            debug!(token = %token, "Subscription removed");
        }
        removed
    }
}

impl QuoteEventPublisher for InMemoryEventBus {
    fn publish(&self, company_id: CompanyId, event: QuoteEvent) -> usize {
        let kind = event.kind();
        let channel = Channel::quotes(company_id);

        // Always increment counter (event was attempted)
        self.events_published.fetch_add(1, Ordering::Relaxed);

        let message = BroadcastMessage {
            channel,
            sequence: self.next_sequence(company_id),
            event,
        };

        let mut delivered = 0;
        let mut closed = Vec::new();
        {
            let state = self.registry.state.read();
            let Some(sessions) = state.channels.get(&company_id) else {
                debug!(channel = %channel, kind = kind.as_str(), "No subscribers");
                return 0;
            };

            for (token, session) in sessions {
                match session.try_deliver(message.clone()) {
                    Ok(()) => delivered += 1,
                    Err(TrySendError::Full(_)) => {
                        self.dropped.fetch_add(1, Ordering::Relaxed);
                        warn!(
                            channel = %channel,
                            session = %session.id(),
                            sequence = message.sequence,
                            "Session queue full, event dropped"
                        );
                    }
                    Err(TrySendError::Closed(_)) => {
                        self.dropped.fetch_add(1, Ordering::Relaxed);
                        closed.push(*token);
                    }
                }
            }
        }

        for token in closed {
            if self.registry.remove(token) {
                debug!(channel = %channel, token = %token, "Pruned closed session");
            }
        }

        self.deliveries.fetch_add(delivered as u64, Ordering::Relaxed);
        debug!(
            channel = %channel,
            kind = kind.as_str(),
            sequence = message.sequence,
            receivers = delivered,
            "Event published"
        );
        delivered
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}

/// Publisher that discards everything. Used where live updates are disabled.
#[derive(Debug, Default)]
pub struct NoOpPublisher {
    events_published: AtomicU64,
}

impl QuoteEventPublisher for NoOpPublisher {
    fn publish(&self, _company_id: CompanyId, _event: QuoteEvent) -> usize {
        self.events_published.fetch_add(1, Ordering::Relaxed);
        0
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}
