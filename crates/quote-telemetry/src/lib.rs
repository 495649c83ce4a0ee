//! # Quote Telemetry
//!
//! Observability for Quote-Stream.
//!
//! ## Components
//!
//! - **Logs**: `tracing` events rendered by `tracing-subscriber`, JSON lines
//!   in containers and compact text in development
//! - **Metrics**: Prometheus counters for gateway outcomes and broadcaster
//!   fan-out, scraped from `encode_metrics()`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quote_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_telemetry(&TelemetryConfig::from_env())?;
//!     // Logs and metrics are now being collected
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `QS_SERVICE_NAME` | `quote-stream` | Service name in logs |
//! | `QS_LOG_LEVEL` | `info` | Log level filter |
//! | `QS_JSON_LOGS` | `false` (`true` in containers) | JSON output |
//! | `QS_CONSOLE_OUTPUT` | `true` | Write logs to stdout |

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod config;
pub mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{
    encode_metrics, register_metrics, HistogramTimer, BUS_ACTIVE_SUBSCRIPTIONS, BUS_DELIVERIES,
    BUS_EVENTS_PUBLISHED, BUS_PUBLISH_DURATION, GATEWAY_MUTATIONS,
};
pub use tracing_setup::env_filter;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Register metrics, then install the global log subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    tracing_setup::init_tracing(config)
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
