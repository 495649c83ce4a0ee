//! # Pricing Aggregator (qs-02)
//!
//! Read-only totals for the quote tree:
//!
//! | Total | Definition |
//! |-------|------------|
//! | line item | `quantity × unit_price` |
//! | date | Σ line item totals (zero if none) |
//! | quote | Σ date totals (zero if none) |
//!
//! Amounts are `Money` (fixed-point, two fractional digits); binary floating
//! point is never involved. The pure functions in `domain` are deterministic
//! and side-effect free; `PricingService` adds loading through the store.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{
    date_total, line_item_total, quote_total, DateGroup, DatePricing, LineItemPricing,
    QuotePricing,
};
pub use ports::inbound::PricingApi;
pub use service::PricingService;
