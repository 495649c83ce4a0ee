//! # Outbound Ports (Driven Ports)
//!
//! Besides the store, the gateway reports to two collaborators: the
//! broadcaster (`QuoteEventPublisher`, from `shared-bus`) and an observer that
//! sees every outcome, successful or not.

use crate::domain::MutationAction;
use shared_types::errors::{EntityKind, QuoteError};

pub use shared_bus::QuoteEventPublisher;

/// Receives one call per gateway operation.
pub trait MutationObserver: Send + Sync {
    /// `error` is `None` for a committed write.
    fn mutation_recorded(
        &self,
        entity: EntityKind,
        action: MutationAction,
        error: Option<&QuoteError>,
    );
}

/// Observer that ignores everything.
#[derive(Debug, Default)]
pub struct NoOpObserver;

impl MutationObserver for NoOpObserver {
    fn mutation_recorded(&self, _: EntityKind, _: MutationAction, _: Option<&QuoteError>) {}
}
