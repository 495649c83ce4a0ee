//! # Inbound Ports (Driving Ports)
//!
//! Read-side pricing API. Every call is scoped to the caller's company.

use crate::domain::QuotePricing;
use shared_types::entities::{LineItemDateId, QuoteId};
use shared_types::errors::QuoteResult;
use shared_types::money::Money;
use shared_types::security::TenantScope;

/// Primary API for the Pricing Aggregator.
pub trait PricingApi: Send + Sync {
    /// Full breakdown of a quote: every date in ascending order with its
    /// items, plus the grand total.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: quote not in scope
    fn price_quote(&self, scope: TenantScope, quote_id: QuoteId) -> QuoteResult<QuotePricing>;

    /// Grand total of a quote.
    fn quote_total(&self, scope: TenantScope, quote_id: QuoteId) -> QuoteResult<Money>;

    /// Total of one date.
    fn date_total(
        &self,
        scope: TenantScope,
        quote_id: QuoteId,
        date_id: LineItemDateId,
    ) -> QuoteResult<Money>;
}
