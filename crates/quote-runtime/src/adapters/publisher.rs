//! # Metered Publisher
//!
//! Wraps the in-memory broadcaster so every publish is timed and counted.
//! The subscription gauge follows the bus registry directly, so sessions
//! dropped by disconnecting clients are reflected immediately.

use std::sync::Arc;

use quote_telemetry::{
    metric_inc, time_histogram, BUS_ACTIVE_SUBSCRIPTIONS, BUS_DELIVERIES, BUS_EVENTS_PUBLISHED,
    BUS_PUBLISH_DURATION,
};
use shared_bus::{
    InMemoryEventBus, LiveSession, QuoteEvent, QuoteEventPublisher, SubscriptionListener,
};
use shared_types::entities::CompanyId;

/// `QuoteEventPublisher` that records metrics around the real bus.
pub struct MeteredPublisher {
    inner: Arc<InMemoryEventBus>,
}

impl MeteredPublisher {
    /// Create a bus whose sessions buffer `capacity` messages.
    pub fn with_capacity(capacity: usize) -> Self {
        let bus = InMemoryEventBus::with_subscription_listener(capacity, subscription_gauge());
        Self {
            inner: Arc::new(bus),
        }
    }

    pub fn open_session(&self, company_id: CompanyId) -> LiveSession {
        self.inner.open_session(company_id)
    }

    pub fn bus(&self) -> &Arc<InMemoryEventBus> {
        &self.inner
    }
}

/// Listener that mirrors the live subscription count into
/// `qs_bus_active_subscriptions`.
pub fn subscription_gauge() -> SubscriptionListener {
    Arc::new(|total| BUS_ACTIVE_SUBSCRIPTIONS.set(total as i64))
}

impl QuoteEventPublisher for MeteredPublisher {
    fn publish(&self, company_id: CompanyId, event: QuoteEvent) -> usize {
        let kind = event.kind();
        let delivered = {
            let _timer = time_histogram!(BUS_PUBLISH_DURATION);
            self.inner.publish(company_id, event)
        };

        metric_inc!(BUS_EVENTS_PUBLISHED, &[kind.as_str()]);
        BUS_DELIVERIES.inc_by(delivered as u64);
        delivered
    }

    fn events_published(&self) -> u64 {
        self.inner.events_published()
    }
}
