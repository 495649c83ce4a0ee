//! # Quote-Stream Benchmarks
//!
//! | Component | Operation | Target |
//! |-----------|-----------|--------|
//! | qs-02 Pricing | quote total over 30 dates × 10 items | < 1ms |
//! | shared-bus | publish to N sessions of one company | < 1ms for 100 |
//! | qs-03 Gateway | create quote incl. publish | < 100µs |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::time::Duration;

use qs_01_quote_store::{QuoteStoreService, TenantStoreApi};
use qs_02_pricing::{quote_total, DateGroup};
use qs_03_mutation_gateway::{MutationGateway, MutationGatewayApi};
use shared_bus::{InMemoryEventBus, QuoteEvent, QuoteEventPublisher};
use shared_types::entities::{CompanyId, LineItem, LineItemDate, LineItemDateId, LineItemId, QuoteId};
use shared_types::money::Money;
use shared_types::params::{CompanyParams, QuoteParams};
use shared_types::security::Actor;

// ============================================================================
// qs-02: Pricing
// ============================================================================

fn bench_pricing(c: &mut Criterion) {
    let mut group = c.benchmark_group("qs-02-pricing");
    group.measurement_time(Duration::from_secs(5));

    let now = chrono::Utc::now();
    let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
    let groups: Vec<DateGroup> = (0..30u64)
        .map(|d| DateGroup {
            date: LineItemDate {
                id: LineItemDateId(d),
                company_id: CompanyId(1),
                quote_id: QuoteId(1),
                date: start + chrono::Days::new(d),
                created_at: now,
                updated_at: now,
            },
            items: (0..10u64)
                .map(|i| LineItem {
                    id: LineItemId(d * 10 + i),
                    company_id: CompanyId(1),
                    quote_id: QuoteId(1),
                    line_item_date_id: LineItemDateId(d),
                    name: "Room".to_string(),
                    description: None,
                    quantity: (i % 5 + 1) as i32,
                    unit_price: Money::from_cents(12_345 + i as i64),
                    created_at: now,
                    updated_at: now,
                })
                .collect(),
        })
        .collect();

    group.throughput(Throughput::Elements(300));
    group.bench_function("quote_total_300_items", |b| {
        b.iter(|| black_box(quote_total(&groups)))
    });

    group.finish();
}

// ============================================================================
// shared-bus: Fan-out
// ============================================================================

fn bench_publish_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("shared-bus-fanout");
    group.measurement_time(Duration::from_secs(5));

    for sessions in [1usize, 10, 100] {
        let bus = InMemoryEventBus::with_capacity(1024);
        let company = CompanyId(1);
        let mut live: Vec<_> = (0..sessions).map(|_| bus.open_session(company)).collect();

        group.throughput(Throughput::Elements(sessions as u64));
        group.bench_with_input(BenchmarkId::new("publish", sessions), &sessions, |b, _| {
            b.iter(|| {
                let delivered = bus.publish(company, QuoteEvent::QuoteDestroyed(QuoteId(7)));
                for session in &mut live {
                    while let Ok(Some(_)) = session.try_recv() {}
                }
                black_box(delivered)
            })
        });
    }

    group.finish();
}

// ============================================================================
// qs-03: Gateway
// ============================================================================

fn bench_gateway_create_quote(c: &mut Criterion) {
    let mut group = c.benchmark_group("qs-03-gateway");
    group.measurement_time(Duration::from_secs(5));

    let store = Arc::new(QuoteStoreService::new_in_memory());
    let bus = Arc::new(InMemoryEventBus::new());
    let gateway = MutationGateway::new(Arc::clone(&store), bus.clone());

    let Ok(company) = store.create_company(&CompanyParams::named("Bench")) else {
        return;
    };
    let Ok(user) = store.register_user(company.id, "bench@example.com") else {
        return;
    };
    let actor = Actor {
        user_id: user.id,
        company_id: company.id,
        email: user.email,
    };

    group.bench_function("create_quote", |b| {
        b.iter(|| black_box(gateway.create_quote(&actor, QuoteParams::named("Bench quote")).is_ok()))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_pricing,
    bench_publish_fanout,
    bench_gateway_create_quote,
);

criterion_main!(benches);
