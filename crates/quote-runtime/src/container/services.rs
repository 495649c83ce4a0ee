//! # Service Container
//!
//! Owns one instance of every component, wired in dependency order.

use std::sync::Arc;

use qs_01_quote_store::{InMemoryQuoteStore, QuoteStoreService, TenantStoreApi};
use qs_02_pricing::PricingService;
use qs_03_mutation_gateway::MutationGateway;
use shared_bus::LiveSession;
use shared_types::entities::CompanyId;
use shared_types::errors::{QuoteError, QuoteResult};
use shared_types::params::CompanyParams;
use shared_types::security::Actor;
use tracing::info;

use crate::adapters::{MeteredPublisher, PrometheusObserver, SessionAuthenticator};
use crate::container::config::{BootstrapConfig, RuntimeConfig};

/// Every component of a running process.
pub struct ServiceContainer {
    pub config: RuntimeConfig,
    pub store: Arc<InMemoryQuoteStore>,
    pub publisher: Arc<MeteredPublisher>,
    pub gateway: Arc<MutationGateway<InMemoryQuoteStore>>,
    pub pricing: Arc<PricingService<InMemoryQuoteStore>>,
    pub authenticator: SessionAuthenticator<InMemoryQuoteStore>,
}

impl ServiceContainer {
    /// Build all components.
    ///
    /// ## Initialization Order
    ///
    /// 1. Quote store (in-memory substrate, system clock)
    /// 2. Broadcaster with metrics
    /// 3. Mutation gateway over store and broadcaster
    /// 4. Pricing and sign-in over the store
    pub fn new(config: RuntimeConfig) -> Self {
        let store = Arc::new(QuoteStoreService::new_in_memory());

        let publisher = Arc::new(MeteredPublisher::with_capacity(config.bus.session_capacity));

        let gateway = Arc::new(MutationGateway::with_observer(
            Arc::clone(&store),
            publisher.clone(),
            Arc::new(PrometheusObserver),
        ));

        let pricing = Arc::new(PricingService::new(Arc::clone(&store)));
        let authenticator = SessionAuthenticator::new(Arc::clone(&store));

        info!(
            session_capacity = config.bus.session_capacity,
            "Service container initialized"
        );

        Self {
            config,
            store,
            publisher,
            gateway,
            pricing,
            authenticator,
        }
    }

    /// Subscribe a viewer session to a company's quote list.
    pub fn open_session(&self, company_id: CompanyId) -> LiveSession {
        self.publisher.open_session(company_id)
    }

    /// Create the configured tenant unless its user already exists, and sign
    /// that user in.
    pub fn bootstrap(&self) -> QuoteResult<Option<Actor>> {
        let Some(bootstrap) = self.config.bootstrap.clone() else {
            return Ok(None);
        };

        match self.authenticator.sign_in(&bootstrap.user_email) {
            Ok(actor) => {
                info!(company = %actor.company_id, "Bootstrap tenant already present");
                Ok(Some(actor))
            }
            Err(QuoteError::NotFound { .. }) => self.create_tenant(&bootstrap).map(Some),
            Err(error) => Err(error),
        }
    }

    fn create_tenant(&self, bootstrap: &BootstrapConfig) -> QuoteResult<Actor> {
        let company = self
            .store
            .create_company(&CompanyParams::named(bootstrap.company_name.as_str()))?;
        self.store
            .register_user(company.id, &bootstrap.user_email)?;
        info!(
            company = %company.id,
            name = %company.name,
            "Bootstrap tenant created"
        );
        self.authenticator.sign_in(&bootstrap.user_email)
    }
}
