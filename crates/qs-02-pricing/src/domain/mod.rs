//! # Domain Layer
//!
//! Pure pricing rules and the priced views built from them.

pub mod breakdown;
pub mod totals;

pub use breakdown::{DatePricing, LineItemPricing, QuotePricing};
pub use totals::{date_total, line_item_total, quote_total, DateGroup};
