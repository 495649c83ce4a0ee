//! # Live Update Flows
//!
//! Gateway writes observed through the broadcaster by viewer sessions.
//!
//! ## Flows Tested:
//!
//! 1. **Channel isolation**: a company's sessions see only its own quotes
//! 2. **Convergence**: every viewer's quote list matches the store
//! 3. **Disconnects**: dropped and saturated sessions never fail a write
//! 4. **Concurrent writes**: the date constraint holds under contention

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Barrier};
    use std::time::Duration;
    use tokio::time::timeout;

    use qs_01_quote_store::{QuoteHierarchyApi, TenantStoreApi};
    use qs_03_mutation_gateway::MutationGatewayApi;
    use quote_runtime::container::{BusConfig, RuntimeConfig, ServiceContainer};
    use quote_runtime::handlers::QuoteListView;
    use shared_bus::{LiveSession, QuoteEvent, QuoteEventPublisher};
    use shared_types::params::{CompanyParams, LineItemDateParams, QuoteParams};
    use shared_types::security::Actor;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn container_with_capacity(session_capacity: usize) -> ServiceContainer {
        ServiceContainer::new(RuntimeConfig {
            bus: BusConfig { session_capacity },
            ..RuntimeConfig::default()
        })
    }

    fn sign_up(container: &ServiceContainer, company: &str, email: &str) -> Actor {
        let company = container
            .store
            .create_company(&CompanyParams::named(company))
            .unwrap();
        container.store.register_user(company.id, email).unwrap();
        container.authenticator.sign_in(email).unwrap()
    }

    /// Drain whatever is queued for `session` into `view`.
    fn catch_up(view: &mut QuoteListView, session: &mut LiveSession) -> usize {
        let mut applied = 0;
        while let Some(message) = session.try_recv().unwrap() {
            view.apply(&message);
            applied += 1;
        }
        applied
    }

    // =============================================================================
    // CHANNEL ISOLATION
    // =============================================================================

    /// Session S on A gets exactly one `QuoteCreated`; a session on B gets
    /// nothing.
    #[tokio::test]
    async fn test_quote_created_reaches_only_own_company() {
        let c = container_with_capacity(16);
        let kpmg = sign_up(&c, "KPMG", "accountant@kpmg.com");
        let pwc = sign_up(&c, "PwC", "eavesdropper@pwc.com");
        let mut s = c.open_session(kpmg.company_id);
        let mut other = c.open_session(pwc.company_id);

        let created = c
            .gateway
            .create_quote(&kpmg, QuoteParams::named("First quote"))
            .unwrap()
            .record;

        let message = timeout(Duration::from_secs(1), s.recv())
            .await
            .expect("timed out")
            .expect("session closed");
        assert_eq!(message.channel.to_string(), format!("quotes:company:{}", kpmg.company_id));
        assert_eq!(message.event, QuoteEvent::QuoteCreated(created));

        assert_eq!(s.try_recv().unwrap(), None);
        assert_eq!(other.try_recv().unwrap(), None);
    }

    // =============================================================================
    // CONVERGENCE
    // =============================================================================

    #[tokio::test]
    async fn test_viewers_converge_on_store_state() {
        let c = container_with_capacity(64);
        let kpmg = sign_up(&c, "KPMG", "accountant@kpmg.com");
        c.store
            .register_user(kpmg.company_id, "colleague@kpmg.com")
            .unwrap();
        let colleague = c.authenticator.sign_in("colleague@kpmg.com").unwrap();

        let early = c
            .gateway
            .create_quote(&kpmg, QuoteParams::named("Before anyone looked"))
            .unwrap()
            .record;

        // Both viewers render the index, then subscribe.
        let mut first_view = QuoteListView::load(c.store.as_ref(), kpmg.scope()).unwrap();
        let mut first = c.open_session(kpmg.company_id);
        let mut second_view = QuoteListView::load(c.store.as_ref(), colleague.scope()).unwrap();
        let mut second = c.open_session(colleague.company_id);

        let a = c
            .gateway
            .create_quote(&kpmg, QuoteParams::named("Quote A"))
            .unwrap()
            .record;
        let b = c
            .gateway
            .create_quote(&colleague, QuoteParams::named("Quote B"))
            .unwrap()
            .record;
        c.gateway
            .update_quote(&colleague, a.id, QuoteParams::named("Quote A, revised"))
            .unwrap();
        c.gateway.destroy_quote(&kpmg, early.id).unwrap();
        // Rejected writes leave no trace on the wire.
        let _ = c.gateway.create_quote(&kpmg, QuoteParams::named(""));

        assert_eq!(catch_up(&mut first_view, &mut first), 4);
        assert_eq!(catch_up(&mut second_view, &mut second), 4);

        let stored = c.store.list_quotes(kpmg.scope()).unwrap();
        assert_eq!(first_view.quotes(), stored.as_slice());
        assert_eq!(second_view.quotes(), stored.as_slice());
        let names: Vec<_> = stored.iter().map(|q| q.name.as_str()).collect();
        assert_eq!(names, vec!["Quote B", "Quote A, revised"]);
        assert_eq!(stored[0].id, b.id);
    }

    // =============================================================================
    // DISCONNECTS
    // =============================================================================

    #[tokio::test]
    async fn test_disconnected_session_never_fails_a_write() {
        let c = container_with_capacity(16);
        let kpmg = sign_up(&c, "KPMG", "accountant@kpmg.com");
        let bus = Arc::clone(c.publisher.bus());

        let session = c.open_session(kpmg.company_id);
        assert_eq!(bus.subscriber_count(kpmg.company_id), 1);
        drop(session);
        assert_eq!(bus.subscriber_count(kpmg.company_id), 0);

        c.gateway
            .create_quote(&kpmg, QuoteParams::named("Nobody watching"))
            .unwrap();
        assert_eq!(bus.events_published(), 1);
        assert_eq!(bus.deliveries(), 0);
    }

    #[tokio::test]
    async fn test_saturated_session_loses_events_but_stays_subscribed() {
        let c = container_with_capacity(1);
        let kpmg = sign_up(&c, "KPMG", "accountant@kpmg.com");
        let bus = Arc::clone(c.publisher.bus());
        let mut slow = c.open_session(kpmg.company_id);

        let first = c
            .gateway
            .create_quote(&kpmg, QuoteParams::named("First"))
            .unwrap()
            .record;
        c.gateway
            .create_quote(&kpmg, QuoteParams::named("Second"))
            .unwrap();
        assert_eq!(bus.dropped(), 1);

        let message = slow.try_recv().unwrap().unwrap();
        assert_eq!(message.event, QuoteEvent::QuoteCreated(first));
        assert_eq!(slow.try_recv().unwrap(), None);

        let third = c
            .gateway
            .create_quote(&kpmg, QuoteParams::named("Third"))
            .unwrap()
            .record;
        let message = timeout(Duration::from_secs(1), slow.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(message.event, QuoteEvent::QuoteCreated(third));
        assert_eq!(bus.subscriber_count(kpmg.company_id), 1);
    }

    // =============================================================================
    // CONCURRENT WRITES
    // =============================================================================

    /// Two concurrent creates of one date: exactly one wins, the other sees
    /// a uniqueness error, exactly one date exists.
    #[test]
    fn test_concurrent_same_date_creates() {
        let c = container_with_capacity(16);
        let kpmg = sign_up(&c, "KPMG", "accountant@kpmg.com");
        let quote = c
            .gateway
            .create_quote(&kpmg, QuoteParams::named("Contended"))
            .unwrap()
            .record;

        let barrier = Barrier::new(2);
        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..2)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        c.gateway.create_line_item_date(
                            &kpmg,
                            quote.id,
                            LineItemDateParams::raw("2024-01-01"),
                        )
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let won = results.iter().filter(|r| r.is_ok()).count();
        let lost: Vec<_> = results.iter().filter_map(|r| r.as_ref().err()).collect();
        assert_eq!(won, 1);
        assert_eq!(lost.len(), 1);
        assert!(lost[0].error.is_uniqueness());
        assert_eq!(
            c.store
                .list_line_item_dates(kpmg.scope(), quote.id)
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_concurrent_tenants_do_not_interfere() {
        let c = container_with_capacity(256);
        let tenants: Vec<_> = (0..4)
            .map(|i| sign_up(&c, &format!("Firm {i}"), &format!("staff@firm{i}.com")))
            .collect();
        let sessions: Vec<_> = tenants.iter().map(|t| c.open_session(t.company_id)).collect();

        std::thread::scope(|scope| {
            for tenant in &tenants {
                let c = &c;
                scope.spawn(move || {
                    for n in 0..25 {
                        c.gateway
                            .create_quote(tenant, QuoteParams::named(format!("Quote {n}")))
                            .unwrap();
                    }
                });
            }
        });

        for (tenant, mut session) in tenants.iter().zip(sessions) {
            let mut view = QuoteListView::new(tenant.company_id);
            assert_eq!(catch_up(&mut view, &mut session), 25);
            assert_eq!(view.quotes(), c.store.list_quotes(tenant.scope()).unwrap().as_slice());
            assert_eq!(view.quotes()[0].name, "Quote 24");
        }
    }
}
