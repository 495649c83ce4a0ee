//! # Shared Bus - Live Update Broadcaster
//!
//! Publish/subscribe fan-out of quote-list changes, one logical channel per
//! company.
//!
//! ```text
//! ┌──────────────────┐   publish(company, event)   ┌──────────────────┐
//! │ Mutation Gateway │ ──────────────────────────→ │  InMemoryEventBus │
//! └──────────────────┘                             └────────┬─────────┘
//!                                                           │ try_send
//!                             ┌─────────────────────────────┼──────────────┐
//!                             ↓                             ↓              ↓
//!                      session (company A)          session (company A)   …
//! ```
//!
//! ## Delivery Rules
//!
//! - Only sessions subscribed at publish time receive an event; there is no
//!   replay or backlog.
//! - Delivery is best-effort: a closed or saturated session loses the event
//!   and `publish` still returns normally.
//! - Dropping a [`LiveSession`] unsubscribes it.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{BroadcastMessage, Channel, EventKind, QuoteEvent};
pub use publisher::{InMemoryEventBus, NoOpPublisher, QuoteEventPublisher, SubscriptionListener};
pub use subscriber::{
    session_channel, EventSubscriber, LiveSession, SessionHandle, SessionId, SessionReceiver,
    SubscriptionError, SubscriptionToken,
};

/// Maximum messages buffered per session before deliveries are dropped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
