//! Prometheus metrics for Quote-Stream.
//!
//! All metrics follow the naming convention: `qs_<component>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., mutations_total)
//! - **Gauge**: Value that can go up or down (e.g., active_subscriptions)
//! - **Histogram**: Distribution of values (e.g., publish_duration_seconds)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge,
    Opts, Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // MUTATION GATEWAY METRICS
    // =========================================================================

    /// Gateway operations by entity, action and outcome
    pub static ref GATEWAY_MUTATIONS: IntCounterVec = IntCounterVec::new(
        Opts::new("qs_gateway_mutations_total", "Mutations handled by the gateway"),
        &["entity", "action", "outcome"]  // outcome: committed/validation/uniqueness/not_found/storage
    ).expect("metric creation failed");

    // =========================================================================
    // BROADCASTER METRICS
    // =========================================================================

    /// Events published by kind
    pub static ref BUS_EVENTS_PUBLISHED: IntCounterVec = IntCounterVec::new(
        Opts::new("qs_bus_events_published_total", "Quote-list events published"),
        &["kind"]
    ).expect("metric creation failed");

    /// Successful per-session deliveries
    pub static ref BUS_DELIVERIES: IntCounter = IntCounter::new(
        "qs_bus_deliveries_total",
        "Events handed to a subscribed session"
    ).expect("metric creation failed");

    /// Sessions currently subscribed across all companies
    pub static ref BUS_ACTIVE_SUBSCRIPTIONS: IntGauge = IntGauge::new(
        "qs_bus_active_subscriptions",
        "Sessions subscribed to a quote channel"
    ).expect("metric creation failed");

    /// Time spent fanning one event out
    pub static ref BUS_PUBLISH_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "qs_bus_publish_duration_seconds",
            "Time to publish one event to every session of a company"
        ).buckets(exponential_buckets(0.00001, 2.0, 14).expect("bucket creation failed"))
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once; metrics already registered are skipped.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Gateway
        Box::new(GATEWAY_MUTATIONS.clone()),
        // Broadcaster
        Box::new(BUS_EVENTS_PUBLISHED.clone()),
        Box::new(BUS_DELIVERIES.clone()),
        Box::new(BUS_ACTIVE_SUBSCRIPTIONS.clone()),
        Box::new(BUS_PUBLISH_DURATION.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}
