//! # Inbound Ports (Driving Ports)
//!
//! The only externally reachable write path. Every call acts on behalf of an
//! authenticated [`Actor`] and is confined to the actor's company.

use crate::domain::GatewayResult;
use shared_types::entities::{
    LineItem, LineItemDate, LineItemDateId, LineItemId, Quote, QuoteId,
};
use shared_types::params::{LineItemDateParams, LineItemParams, QuoteParams};
use shared_types::security::Actor;

/// Primary API for the Mutation Gateway.
///
/// ## Event Rules
///
/// - Each successful Quote create/update/destroy publishes exactly one event
///   on the actor's company channel.
/// - Date and item mutations publish nothing.
/// - A rejected mutation persists and publishes nothing.
pub trait MutationGatewayApi: Send + Sync {
    fn create_quote(&self, actor: &Actor, params: QuoteParams) -> GatewayResult<Quote, QuoteParams>;

    fn update_quote(
        &self,
        actor: &Actor,
        quote_id: QuoteId,
        params: QuoteParams,
    ) -> GatewayResult<Quote, QuoteParams>;

    fn destroy_quote(&self, actor: &Actor, quote_id: QuoteId) -> GatewayResult<QuoteId>;

    fn create_line_item_date(
        &self,
        actor: &Actor,
        quote_id: QuoteId,
        params: LineItemDateParams,
    ) -> GatewayResult<LineItemDate, LineItemDateParams>;

    fn update_line_item_date(
        &self,
        actor: &Actor,
        quote_id: QuoteId,
        date_id: LineItemDateId,
        params: LineItemDateParams,
    ) -> GatewayResult<LineItemDate, LineItemDateParams>;

    fn destroy_line_item_date(
        &self,
        actor: &Actor,
        quote_id: QuoteId,
        date_id: LineItemDateId,
    ) -> GatewayResult<LineItemDateId>;

    fn create_line_item(
        &self,
        actor: &Actor,
        quote_id: QuoteId,
        date_id: LineItemDateId,
        params: LineItemParams,
    ) -> GatewayResult<LineItem, LineItemParams>;

    fn update_line_item(
        &self,
        actor: &Actor,
        quote_id: QuoteId,
        date_id: LineItemDateId,
        item_id: LineItemId,
        params: LineItemParams,
    ) -> GatewayResult<LineItem, LineItemParams>;

    fn destroy_line_item(
        &self,
        actor: &Actor,
        quote_id: QuoteId,
        date_id: LineItemDateId,
        item_id: LineItemId,
    ) -> GatewayResult<LineItemId>;

    /// Destroy the actor's own company. Publishes one `QuoteDestroyed` per
    /// quote removed by the cascade.
    fn destroy_company(&self, actor: &Actor) -> GatewayResult<Vec<QuoteId>>;
}
