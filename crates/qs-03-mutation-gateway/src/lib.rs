//! # Mutation Gateway (qs-03)
//!
//! The single write path into the quote tree. Each operation:
//!
//! 1. Confines the write to the acting user's company.
//! 2. Applies it through the quote store (validation, uniqueness, cascades).
//! 3. On commit, publishes the quote-list event to that company's channel.
//! 4. Returns the record with a notice, or the untouched input with the
//!    reason it was refused.
//!
//! ## Events Published
//!
//! | Operation | Event |
//! |-----------|-------|
//! | create quote | `QuoteCreated` |
//! | update quote | `QuoteUpdated` |
//! | destroy quote | `QuoteDestroyed` |
//! | destroy company | `QuoteDestroyed` per quote |
//! | date / item writes | none |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Outcomes and notices
//! - `ports/` - Gateway API, observer SPI
//! - `service/` - The gateway itself

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{notice, GatewayResult, Mutation, MutationAction, Rejected};
pub use ports::inbound::MutationGatewayApi;
pub use ports::outbound::{MutationObserver, NoOpObserver, QuoteEventPublisher};
pub use service::MutationGateway;
