//! # Mutation Gateway Service
//!
//! Runs each write against the store and, once it is committed, publishes the
//! matching quote-list event.
//!
//! ## Ordering
//!
//! A per-tenant lock is held from the store call until the publish returns.
//! Commits and publishes of one company therefore interleave exactly once
//! each, so every subscriber sees a quote's events in commit order.


use crate::domain::{notice, GatewayResult, Mutation, MutationAction, Rejected};
use crate::ports::inbound::MutationGatewayApi;
use crate::ports::outbound::{MutationObserver, NoOpObserver, QuoteEventPublisher};
use dashmap::DashMap;
use parking_lot::Mutex;
use qs_01_quote_store::{QuoteHierarchyApi, TenantStoreApi};
use shared_bus::QuoteEvent;
use shared_types::entities::{
    CompanyId, LineItem, LineItemDate, LineItemDateId, LineItemId, Quote, QuoteId,
};
use shared_types::errors::{EntityKind, QuoteResult};
use shared_types::params::{LineItemDateParams, LineItemParams, QuoteParams};
use shared_types::security::Actor;
use std::sync::Arc;
use tracing::{info, warn};

/// The Mutation Gateway.
pub struct MutationGateway<S>
where
    S: TenantStoreApi + QuoteHierarchyApi,
{
    store: Arc<S>,
    publisher: Arc<dyn QuoteEventPublisher>,
    observer: Arc<dyn MutationObserver>,
    tenant_locks: DashMap<CompanyId, Arc<Mutex<()>>>,
}

impl<S> MutationGateway<S>
where
    S: TenantStoreApi + QuoteHierarchyApi,
{
    pub fn new(store: Arc<S>, publisher: Arc<dyn QuoteEventPublisher>) -> Self {
        Self::with_observer(store, publisher, Arc::new(NoOpObserver))
    }

    pub fn with_observer(
        store: Arc<S>,
        publisher: Arc<dyn QuoteEventPublisher>,
        observer: Arc<dyn MutationObserver>,
    ) -> Self {
        Self {
            store,
            publisher,
            observer,
            tenant_locks: DashMap::new(),
        }
    }

    /// The store this gateway writes to, for read-side callers.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    fn tenant_lock(&self, company_id: CompanyId) -> Arc<Mutex<()>> {
        self.tenant_locks
            .entry(company_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Apply `write` under the tenant lock, then publish whatever `events`
    /// derives from the committed record.
    fn run<T, P>(
        &self,
        actor: &Actor,
        entity: EntityKind,
        action: MutationAction,
        params: P,
        write: impl FnOnce(&P) -> QuoteResult<T>,
        events: impl FnOnce(&T) -> Vec<QuoteEvent>,
    ) -> GatewayResult<T, P> {
        let company_id = actor.company_id;
        let lock = self.tenant_lock(company_id);
        let _guard = lock.lock();

        match write(&params) {
            Ok(record) => {
                self.observer.mutation_recorded(entity, action, None);
                let mut receivers = 0;
                let mut published = 0;
                for event in events(&record) {
                    receivers += self.publisher.publish(company_id, event);
                    published += 1;
                }
                info!(
                    company = %company_id,
                    user = %actor.user_id,
                    entity = %entity,
                    action = action.as_str(),
                    events = published,
                    receivers,
                    "Mutation committed"
                );
                Ok(Mutation {
                    record,
                    notice: notice(entity, action),
                })
            }
            Err(error) => {
                self.observer.mutation_recorded(entity, action, Some(&error));
                warn!(
                    company = %company_id,
                    user = %actor.user_id,
                    entity = %entity,
                    action = action.as_str(),
                    reason = error.kind(),
                    %error,
                    "Mutation rejected"
                );
                Err(Rejected { params, error })
            }
        }
    }
}

impl<S> MutationGatewayApi for MutationGateway<S>
where
    S: TenantStoreApi + QuoteHierarchyApi,
{
    fn create_quote(&self, actor: &Actor, params: QuoteParams) -> GatewayResult<Quote, QuoteParams> {
        let scope = actor.scope();
        self.run(
            actor,
            EntityKind::Quote,
            MutationAction::Create,
            params,
            |params| self.store.create_quote(scope, params),
            |quote| vec![QuoteEvent::QuoteCreated(quote.clone())],
        )
    }

    fn update_quote(
        &self,
        actor: &Actor,
        quote_id: QuoteId,
        params: QuoteParams,
    ) -> GatewayResult<Quote, QuoteParams> {
        let scope = actor.scope();
        self.run(
            actor,
            EntityKind::Quote,
            MutationAction::Update,
            params,
            |params| self.store.update_quote(scope, quote_id, params),
            |quote| vec![QuoteEvent::QuoteUpdated(quote.clone())],
        )
    }

    fn destroy_quote(&self, actor: &Actor, quote_id: QuoteId) -> GatewayResult<QuoteId> {
        let scope = actor.scope();
        self.run(
            actor,
            EntityKind::Quote,
            MutationAction::Destroy,
            (),
            |_| self.store.destroy_quote(scope, quote_id).map(|()| quote_id),
            |quote_id| vec![QuoteEvent::QuoteDestroyed(*quote_id)],
        )
    }

    fn create_line_item_date(
        &self,
        actor: &Actor,
        quote_id: QuoteId,
        params: LineItemDateParams,
    ) -> GatewayResult<LineItemDate, LineItemDateParams> {
        let scope = actor.scope();
        self.run(
            actor,
            EntityKind::LineItemDate,
            MutationAction::Create,
            params,
            |params| self.store.create_line_item_date(scope, quote_id, params),
            |_| Vec::new(),
        )
    }

    fn update_line_item_date(
        &self,
        actor: &Actor,
        quote_id: QuoteId,
        date_id: LineItemDateId,
        params: LineItemDateParams,
    ) -> GatewayResult<LineItemDate, LineItemDateParams> {
        let scope = actor.scope();
        self.run(
            actor,
            EntityKind::LineItemDate,
            MutationAction::Update,
            params,
            |params| {
                self.store
                    .update_line_item_date(scope, quote_id, date_id, params)
            },
            |_| Vec::new(),
        )
    }

    fn destroy_line_item_date(
        &self,
        actor: &Actor,
        quote_id: QuoteId,
        date_id: LineItemDateId,
    ) -> GatewayResult<LineItemDateId> {
        let scope = actor.scope();
        self.run(
            actor,
            EntityKind::LineItemDate,
            MutationAction::Destroy,
            (),
            |_| {
                self.store
                    .destroy_line_item_date(scope, quote_id, date_id)
                    .map(|()| date_id)
            },
            |_| Vec::new(),
        )
    }

    fn create_line_item(
        &self,
        actor: &Actor,
        quote_id: QuoteId,
        date_id: LineItemDateId,
        params: LineItemParams,
    ) -> GatewayResult<LineItem, LineItemParams> {
        let scope = actor.scope();
        self.run(
            actor,
            EntityKind::LineItem,
            MutationAction::Create,
            params,
            |params| self.store.create_line_item(scope, quote_id, date_id, params),
            |_| Vec::new(),
        )
    }

    fn update_line_item(
        &self,
        actor: &Actor,
        quote_id: QuoteId,
        date_id: LineItemDateId,
        item_id: LineItemId,
        params: LineItemParams,
    ) -> GatewayResult<LineItem, LineItemParams> {
        let scope = actor.scope();
        self.run(
            actor,
            EntityKind::LineItem,
            MutationAction::Update,
            params,
            |params| {
                self.store
                    .update_line_item(scope, quote_id, date_id, item_id, params)
            },
            |_| Vec::new(),
        )
    }

    fn destroy_line_item(
        &self,
        actor: &Actor,
        quote_id: QuoteId,
        date_id: LineItemDateId,
        item_id: LineItemId,
    ) -> GatewayResult<LineItemId> {
        let scope = actor.scope();
        self.run(
            actor,
            EntityKind::LineItem,
            MutationAction::Destroy,
            (),
            |_| {
                self.store
                    .destroy_line_item(scope, quote_id, date_id, item_id)
                    .map(|()| item_id)
            },
            |_| Vec::new(),
        )
    }

    fn destroy_company(&self, actor: &Actor) -> GatewayResult<Vec<QuoteId>> {
        let outcome = self.run(
            actor,
            EntityKind::Company,
            MutationAction::Destroy,
            (),
            |_| self.store.destroy_company(actor.company_id),
            |quote_ids| {
                quote_ids
                    .iter()
                    .map(|id| QuoteEvent::QuoteDestroyed(*id))
                    .collect()
            },
        );
        let gone = match &outcome {
            Ok(_) => true,
            Err(rejected) => rejected.error.is_not_found(),
        };
        if gone {
            // Company ids are never reused.
            self.tenant_locks.remove(&actor.company_id);
        }
        outcome
    }
}
