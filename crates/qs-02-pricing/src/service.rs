//! # Pricing Service
//!
//! Loads a quote tree through the store's read API and prices it. The tree
//! comes from one snapshot, so a concurrent write is priced either fully or
//! not at all. Holds no state of its own.

use crate::domain::{date_total, DateGroup, QuotePricing};
use crate::ports::inbound::PricingApi;
use qs_01_quote_store::QuoteHierarchyApi;
use shared_types::entities::{LineItemDateId, QuoteId};
use shared_types::errors::{EntityKind, QuoteError, QuoteResult};
use shared_types::money::Money;
use shared_types::security::TenantScope;
use std::sync::Arc;
use tracing::debug;

/// Pricing over any hierarchy store.
pub struct PricingService<S: QuoteHierarchyApi> {
    store: Arc<S>,
}

impl<S: QuoteHierarchyApi> PricingService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    fn load_groups(&self, scope: TenantScope, quote_id: QuoteId) -> QuoteResult<Vec<DateGroup>> {
        let tree = self.store.load_quote_tree(scope, quote_id)?;
        Ok(tree
            .dates
            .into_iter()
            .map(|branch| DateGroup {
                date: branch.date,
                items: branch.items,
            })
            .collect())
    }
}

impl<S: QuoteHierarchyApi> PricingApi for PricingService<S> {
    fn price_quote(&self, scope: TenantScope, quote_id: QuoteId) -> QuoteResult<QuotePricing> {
        let groups = self.load_groups(scope, quote_id)?;
        let pricing = QuotePricing::from_groups(quote_id, &groups);
        debug!(
            company = %scope.company_id(),
            quote = %quote_id,
            dates = pricing.dates.len(),
            total = %pricing.total,
            "Quote priced"
        );
        Ok(pricing)
    }

    fn quote_total(&self, scope: TenantScope, quote_id: QuoteId) -> QuoteResult<Money> {
        let groups = self.load_groups(scope, quote_id)?;
        Ok(crate::domain::quote_total(&groups))
    }

    fn date_total(
        &self,
        scope: TenantScope,
        quote_id: QuoteId,
        date_id: LineItemDateId,
    ) -> QuoteResult<Money> {
        let tree = self.store.load_quote_tree(scope, quote_id)?;
        tree.branch(date_id)
            .map(|branch| date_total(&branch.items))
            .ok_or_else(|| QuoteError::not_found(EntityKind::LineItemDate, date_id))
    }
}
