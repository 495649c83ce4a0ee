//! # Quote-List Events
//!
//! The three changes a quote list can observe, plus the envelope they travel
//! in.

use serde::{Deserialize, Serialize};
use shared_types::entities::{CompanyId, Quote, QuoteId};
use std::fmt;

/// A change to a company's quote list.
///
/// On the wire: `{"type": "QuoteCreated", "payload": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum QuoteEvent {
    /// A quote was created; clients insert it at the top of the list.
    QuoteCreated(Quote),

    /// A quote was renamed; clients replace it in place.
    QuoteUpdated(Quote),

    /// A quote was destroyed (directly or by company cascade); clients remove it.
    QuoteDestroyed(QuoteId),
}

impl QuoteEvent {
    /// The quote this event concerns.
    #[must_use]
    pub fn quote_id(&self) -> QuoteId {
        match self {
            Self::QuoteCreated(quote) | Self::QuoteUpdated(quote) => quote.id,
            Self::QuoteDestroyed(id) => *id,
        }
    }

    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::QuoteCreated(_) => EventKind::Created,
            Self::QuoteUpdated(_) => EventKind::Updated,
            Self::QuoteDestroyed(_) => EventKind::Destroyed,
        }
    }
}

/// Event discriminant, used for logging and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Created,
    Updated,
    Destroyed,
}

impl EventKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Destroyed => "destroyed",
        }
    }
}

/// The quote-list channel of one company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Channel(CompanyId);

impl Channel {
    #[must_use]
    pub fn quotes(company_id: CompanyId) -> Self {
        Self(company_id)
    }

    #[must_use]
    pub fn company_id(&self) -> CompanyId {
        self.0
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "quotes:company:{}", self.0)
    }
}

/// What a session actually receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastMessage {
    pub channel: Channel,
    /// Per-channel publish counter, starting at 1.
    pub sequence: u64,
    pub event: QuoteEvent,
}
