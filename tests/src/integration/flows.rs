//! # Integration Test Flows
//!
//! Store, gateway and pricing working together through the runtime's
//! service container.
//!
//! ## Flows Tested:
//!
//! 1. **Tenant isolation**: another company's records look absent
//! 2. **Date uniqueness**: per quote, not global
//! 3. **Cascading deletes**: a destroyed quote takes its dates and items along
//! 4. **Pricing**: totals over the committed tree

#[cfg(test)]
mod tests {
    use qs_01_quote_store::{QuoteHierarchyApi, TenantStoreApi};
    use qs_02_pricing::{line_item_total, PricingApi};
    use qs_03_mutation_gateway::MutationGatewayApi;
    use quote_runtime::container::{RuntimeConfig, ServiceContainer};
    use shared_types::entities::{LineItemDateId, QuoteId};
    use shared_types::money::Money;
    use shared_types::params::{CompanyParams, LineItemDateParams, LineItemParams, QuoteParams};
    use shared_types::security::Actor;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn container() -> ServiceContainer {
        ServiceContainer::new(RuntimeConfig::default())
    }

    fn sign_up(container: &ServiceContainer, company: &str, email: &str) -> Actor {
        let company = container
            .store
            .create_company(&CompanyParams::named(company))
            .unwrap();
        container.store.register_user(company.id, email).unwrap();
        container.authenticator.sign_in(email).unwrap()
    }

    /// Quote with one date holding one item; returns (quote, date) ids.
    fn quote_with_item(
        container: &ServiceContainer,
        actor: &Actor,
        date: &str,
        item: LineItemParams,
    ) -> (QuoteId, LineItemDateId) {
        let quote = container
            .gateway
            .create_quote(actor, QuoteParams::named("First quote"))
            .unwrap()
            .record;
        let date = container
            .gateway
            .create_line_item_date(actor, quote.id, LineItemDateParams::raw(date))
            .unwrap()
            .record;
        container
            .gateway
            .create_line_item(actor, quote.id, date.id, item)
            .unwrap();
        (quote.id, date.id)
    }

    // =============================================================================
    // TENANT ISOLATION
    // =============================================================================

    #[test]
    fn test_cross_tenant_access_is_not_found() {
        let c = container();
        let kpmg = sign_up(&c, "KPMG", "accountant@kpmg.com");
        let pwc = sign_up(&c, "PwC", "eavesdropper@pwc.com");
        let (quote_id, date_id) = quote_with_item(
            &c,
            &kpmg,
            "2024-01-01",
            LineItemParams::new("Room today", 1, Money::from_cents(25_000)),
        );
        let item_id = c
            .store
            .list_line_items(kpmg.scope(), quote_id, date_id)
            .unwrap()[0]
            .id;

        // Reads
        assert!(c.store.get_quote(pwc.scope(), quote_id).unwrap_err().is_not_found());
        assert!(c
            .store
            .list_line_item_dates(pwc.scope(), quote_id)
            .unwrap_err()
            .is_not_found());
        assert!(c
            .store
            .get_line_item(pwc.scope(), quote_id, date_id, item_id)
            .unwrap_err()
            .is_not_found());
        assert!(c
            .pricing
            .price_quote(pwc.scope(), quote_id)
            .unwrap_err()
            .is_not_found());
        assert!(c.store.list_quotes(pwc.scope()).unwrap().is_empty());

        // Writes
        assert!(c
            .gateway
            .create_line_item_date(&pwc, quote_id, LineItemDateParams::raw("2024-01-02"))
            .unwrap_err()
            .error
            .is_not_found());
        assert!(c
            .gateway
            .update_line_item(
                &pwc,
                quote_id,
                date_id,
                item_id,
                LineItemParams::new("Stolen", 9, Money::ZERO),
            )
            .unwrap_err()
            .error
            .is_not_found());
        assert!(c
            .gateway
            .destroy_line_item_date(&pwc, quote_id, date_id)
            .unwrap_err()
            .error
            .is_not_found());

        // Owner still sees the untouched tree
        let item = c
            .store
            .get_line_item(kpmg.scope(), quote_id, date_id, item_id)
            .unwrap();
        assert_eq!(item.name, "Room today");
        assert_eq!(item.quantity, 1);
    }

    // =============================================================================
    // DATE UNIQUENESS
    // =============================================================================

    #[test]
    fn test_date_unique_per_quote_only() {
        let c = container();
        let kpmg = sign_up(&c, "KPMG", "accountant@kpmg.com");
        let first = c
            .gateway
            .create_quote(&kpmg, QuoteParams::named("First"))
            .unwrap()
            .record;
        let second = c
            .gateway
            .create_quote(&kpmg, QuoteParams::named("Second"))
            .unwrap()
            .record;

        c.gateway
            .create_line_item_date(&kpmg, first.id, LineItemDateParams::raw("2024-01-01"))
            .unwrap();
        let duplicate = c
            .gateway
            .create_line_item_date(&kpmg, first.id, LineItemDateParams::raw("2024-01-01"))
            .unwrap_err();
        assert!(duplicate.error.is_uniqueness());

        c.gateway
            .create_line_item_date(&kpmg, second.id, LineItemDateParams::raw("2024-01-01"))
            .unwrap();
    }

    #[test]
    fn test_moving_date_onto_sibling_is_rejected() {
        let c = container();
        let kpmg = sign_up(&c, "KPMG", "accountant@kpmg.com");
        let quote = c
            .gateway
            .create_quote(&kpmg, QuoteParams::named("Trip"))
            .unwrap()
            .record;
        let monday = c
            .gateway
            .create_line_item_date(&kpmg, quote.id, LineItemDateParams::raw("2024-01-01"))
            .unwrap()
            .record;
        let tuesday = c
            .gateway
            .create_line_item_date(&kpmg, quote.id, LineItemDateParams::raw("2024-01-02"))
            .unwrap()
            .record;

        let moved = c.gateway.update_line_item_date(
            &kpmg,
            quote.id,
            tuesday.id,
            LineItemDateParams::raw("2024-01-01"),
        );
        assert!(moved.unwrap_err().error.is_uniqueness());

        // Keeping the current date is fine.
        c.gateway
            .update_line_item_date(&kpmg, quote.id, monday.id, LineItemDateParams::raw("2024-01-01"))
            .unwrap();

        let previous = c
            .store
            .previous_date(kpmg.scope(), quote.id, tuesday.id)
            .unwrap()
            .unwrap();
        assert_eq!(previous.id, monday.id);
        assert_eq!(
            c.store.previous_date(kpmg.scope(), quote.id, monday.id).unwrap(),
            None
        );
    }

    // =============================================================================
    // CASCADING DELETES
    // =============================================================================

    #[test]
    fn test_destroyed_quote_takes_children_along() {
        let c = container();
        let kpmg = sign_up(&c, "KPMG", "accountant@kpmg.com");
        let (quote_id, date_id) = quote_with_item(
            &c,
            &kpmg,
            "2024-01-01",
            LineItemParams::new("Room today", 1, Money::from_cents(25_000)),
        );
        let item_id = c
            .store
            .list_line_items(kpmg.scope(), quote_id, date_id)
            .unwrap()[0]
            .id;

        c.gateway.destroy_quote(&kpmg, quote_id).unwrap();

        assert!(c.store.get_quote(kpmg.scope(), quote_id).unwrap_err().is_not_found());
        assert!(c
            .store
            .get_line_item_date(kpmg.scope(), quote_id, date_id)
            .unwrap_err()
            .is_not_found());
        assert!(c
            .store
            .get_line_item(kpmg.scope(), quote_id, date_id, item_id)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_destroyed_date_takes_items_along() {
        let c = container();
        let kpmg = sign_up(&c, "KPMG", "accountant@kpmg.com");
        let (quote_id, date_id) = quote_with_item(
            &c,
            &kpmg,
            "2024-01-01",
            LineItemParams::new("Room today", 1, Money::from_cents(25_000)),
        );

        c.gateway.destroy_line_item_date(&kpmg, quote_id, date_id).unwrap();

        assert!(c
            .store
            .list_line_items(kpmg.scope(), quote_id, date_id)
            .unwrap_err()
            .is_not_found());
        assert_eq!(c.pricing.quote_total(kpmg.scope(), quote_id).unwrap(), Money::ZERO);
    }

    #[test]
    fn test_destroyed_company_leaves_nothing_readable() {
        let c = container();
        let kpmg = sign_up(&c, "KPMG", "accountant@kpmg.com");
        let (quote_id, _) = quote_with_item(
            &c,
            &kpmg,
            "2024-01-01",
            LineItemParams::new("Room today", 1, Money::from_cents(25_000)),
        );

        let destroyed = c.gateway.destroy_company(&kpmg).unwrap();
        assert_eq!(destroyed.record, vec![quote_id]);

        assert!(c.store.get_quote(kpmg.scope(), quote_id).unwrap_err().is_not_found());
        assert!(c
            .authenticator
            .sign_in("accountant@kpmg.com")
            .unwrap_err()
            .is_not_found());
    }

    // =============================================================================
    // PRICING
    // =============================================================================

    #[test]
    fn test_first_quote_scenario() {
        let c = container();
        let kpmg = sign_up(&c, "KPMG", "accountant@kpmg.com");
        let (quote_id, date_id) = quote_with_item(
            &c,
            &kpmg,
            "2024-01-01",
            LineItemParams::new("Room today", 1, Money::from_cents(25_000)),
        );

        assert_eq!(
            c.pricing.date_total(kpmg.scope(), quote_id, date_id).unwrap().to_string(),
            "250.00"
        );
        assert_eq!(
            c.pricing.quote_total(kpmg.scope(), quote_id).unwrap().to_string(),
            "250.00"
        );
    }

    #[test]
    fn test_line_item_total_is_exact() {
        let c = container();
        let kpmg = sign_up(&c, "KPMG", "accountant@kpmg.com");
        let (quote_id, date_id) = quote_with_item(
            &c,
            &kpmg,
            "2024-01-01",
            LineItemParams::new("Meeting room", 1, Money::parse("1234.00").unwrap()),
        );

        let item = &c.store.list_line_items(kpmg.scope(), quote_id, date_id).unwrap()[0];
        assert_eq!(line_item_total(item), Money::parse("1234.00").unwrap());
        assert_eq!(line_item_total(item).to_currency_string(), "$1,234.00");
    }

    #[test]
    fn test_totals_sum_across_dates() {
        let c = container();
        let kpmg = sign_up(&c, "KPMG", "accountant@kpmg.com");
        let quote = c
            .gateway
            .create_quote(&kpmg, QuoteParams::named("Offsite"))
            .unwrap()
            .record;

        let items = [
            ("2024-05-01", "Room", 3, "0.10"),
            ("2024-05-01", "Lunch", 12, "15.25"),
            ("2024-05-02", "Room", 3, "0.20"),
        ];
        for (day, name, quantity, price) in items {
            let date = match c
                .gateway
                .create_line_item_date(&kpmg, quote.id, LineItemDateParams::raw(day))
            {
                Ok(created) => created.record,
                Err(rejected) => {
                    assert!(rejected.error.is_uniqueness());
                    c.store
                        .list_line_item_dates(kpmg.scope(), quote.id)
                        .unwrap()
                        .into_iter()
                        .find(|d| d.date.to_string() == day)
                        .unwrap()
                }
            };
            c.gateway
                .create_line_item(
                    &kpmg,
                    quote.id,
                    date.id,
                    LineItemParams::new(name, quantity, Money::parse(price).unwrap()),
                )
                .unwrap();
        }
        c.gateway
            .create_line_item_date(&kpmg, quote.id, LineItemDateParams::raw("2024-05-03"))
            .unwrap();

        let priced = c.pricing.price_quote(kpmg.scope(), quote.id).unwrap();
        let totals: Vec<_> = priced.dates.iter().map(|d| d.total.to_string()).collect();
        assert_eq!(totals, vec!["183.30", "0.60", "0.00"]);
        assert_eq!(priced.total.to_string(), "183.90");
    }
}
