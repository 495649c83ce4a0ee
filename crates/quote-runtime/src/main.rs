//! # Quote-Stream Runtime
//!
//! Entry point: loads configuration, initializes telemetry, starts the
//! runtime and waits for Ctrl-C.

use anyhow::{Context, Result};
use tracing::info;

use quote_runtime::container::RuntimeConfig;
use quote_runtime::QuoteRuntime;
use quote_telemetry::{init_telemetry, TelemetryConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry = TelemetryConfig::from_env();
    init_telemetry(&telemetry).context("Failed to initialize telemetry")?;

    let config = RuntimeConfig::from_env().context("Invalid runtime configuration")?;

    let runtime = QuoteRuntime::new(config);
    runtime.start().await?;

    info!(service = %telemetry.service_name, "Runtime is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    runtime.shutdown().await;

    Ok(())
}
