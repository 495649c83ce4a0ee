//! # Quote Runtime Library
//!
//! Exposes the runtime's modules for the binary and for tests.
//!
//! ## Modular Structure
//!
//! - `container/` - Configuration and the service container
//! - `adapters/` - Metrics decorators and sign-in
//! - `handlers/` - Broadcaster consumers (the live quote list)
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment
//! 2. Initialize telemetry
//! 3. Build the service container
//! 4. Bootstrap the configured tenant, if any
//! 5. Follow the bootstrap tenant's quote list
//! 6. Wait for Ctrl-C, then signal handlers to stop

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod container;
pub mod handlers;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use parking_lot::RwLock;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::container::{RuntimeConfig, ServiceContainer};
use crate::handlers::{QuoteListHandler, QuoteListView};

/// A running Quote-Stream process.
pub struct QuoteRuntime {
    container: Arc<ServiceContainer>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    handlers: parking_lot::Mutex<Vec<JoinHandle<()>>>,
}

impl QuoteRuntime {
    pub fn new(config: RuntimeConfig) -> Self {
        info!("Creating Quote-Stream runtime");
        let container = Arc::new(ServiceContainer::new(config));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            container,
            shutdown_tx,
            shutdown_rx,
            handlers: parking_lot::Mutex::new(Vec::new()),
        }
    }

    /// Bootstrap and start handlers. Returns the bootstrap tenant's live
    /// quote list, if a tenant was configured.
    pub async fn start(&self) -> Result<Option<Arc<RwLock<QuoteListView>>>> {
        info!("===========================================");
        info!("  Quote-Stream Runtime v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");

        let actor = self
            .container
            .bootstrap()
            .context("Failed to bootstrap tenant")?;

        let Some(actor) = actor else {
            info!("No bootstrap tenant configured");
            return Ok(None);
        };

        // Subscribe before the snapshot so no commit falls between them.
        let session = self.container.open_session(actor.company_id);
        let handler =
            QuoteListHandler::follow(self.container.store.as_ref(), actor.scope(), session)
                .context("Failed to load quote list")?;
        let view = handler.view();
        let task = tokio::spawn(handler.run(self.shutdown_rx.clone()));
        self.handlers.lock().push(task);

        info!(
            company = %actor.company_id,
            user = %actor.display_name(),
            "Following quote list"
        );
        Ok(Some(view))
    }

    /// Signal every handler to stop and wait for them, up to a deadline.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        let handlers: Vec<_> = self.handlers.lock().drain(..).collect();
        for handler in handlers {
            match tokio::time::timeout(Duration::from_secs(2), handler).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!("Handler task failed: {}", e),
                Err(_) => error!("Handler did not stop within 2s"),
            }
        }

        match quote_telemetry::encode_metrics() {
            Ok(metrics) => debug!(%metrics, "Final metrics"),
            Err(e) => error!("Failed to encode metrics: {}", e),
        }

        info!("Shutdown complete");
    }

    pub fn container(&self) -> Arc<ServiceContainer> {
        Arc::clone(&self.container)
    }
}
