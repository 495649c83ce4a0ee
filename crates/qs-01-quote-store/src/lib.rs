//! # Quote Store (qs-01)
//!
//! The authoritative persistence layer for tenants and the quote tree.
//!
//! ```text
//! Company ─┬─ User
//!          └─ Quote ── LineItemDate ── LineItem
//! ```
//!
//! ## Domain Invariants
//!
//! | Invariant | Description |
//! |-----------|-------------|
//! | Tenant Scoping | Every key starts with the owning company |
//! | Date Uniqueness | `(quote, date)` unique, re-checked at commit time |
//! | Cascading Deletes | Children removed in the same batch as their parent |
//! | Atomic Writes | All or nothing - no partial writes |
//! | Monotonic Ids | Ids only grow, also across restarts |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Keys, validation, substrate errors
//! - `ports/` - Port traits (inbound API, outbound SPI)
//! - `adapters/` - In-memory substrate and clocks
//! - `service/` - Application service implementing the API
//!
//! ## Usage
//!
//! ```ignore
//! use qs_01_quote_store::{QuoteHierarchyApi, QuoteStoreService};
//!
//! let store = QuoteStoreService::new_in_memory();
//! let quote = store.create_quote(actor.scope(), &QuoteParams::named("First quote"))?;
//! let quotes = store.list_quotes(actor.scope())?;
//! ```

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export key types for convenience
pub use adapters::{InMemoryKVStore, ManualTimeSource, SystemTimeSource};
pub use domain::errors::KVStoreError;
pub use domain::keys::KeyPrefix;
pub use domain::tree::{DateBranch, QuoteTree};
pub use ports::inbound::{QuoteHierarchyApi, TenantStoreApi};
pub use ports::outbound::{BatchOperation, KeyValueStore, ScanResult, TimeSource};
pub use service::QuoteStoreService;

/// Store over the in-memory substrate and the system clock.
pub type InMemoryQuoteStore = QuoteStoreService<InMemoryKVStore, SystemTimeSource>;
