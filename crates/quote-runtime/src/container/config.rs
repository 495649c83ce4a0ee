//! # Runtime Configuration
//!
//! Defaults suit a development process; every value can be overridden from
//! the environment.

use std::env;
use thiserror::Error;

/// Complete runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    /// Broadcaster configuration.
    pub bus: BusConfig,
    /// Tenant to create at startup, if any.
    pub bootstrap: Option<BootstrapConfig>,
}

/// Broadcaster configuration.
#[derive(Debug, Clone)]
pub struct BusConfig {
    /// Messages buffered per session before deliveries are dropped.
    pub session_capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            session_capacity: shared_bus::DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// A company and its first staff member, created when the store is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapConfig {
    pub company_name: String,
    pub user_email: String,
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("QS_BUS_CAPACITY must be a positive integer, got {0:?}")]
    InvalidBusCapacity(String),

    #[error("QS_BOOTSTRAP_COMPANY and QS_BOOTSTRAP_USER must be set together")]
    IncompleteBootstrap,

    #[error("bootstrap company name is blank")]
    BlankBootstrapCompany,

    #[error("bootstrap user email {0:?} is not an email address")]
    InvalidBootstrapEmail(String),
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `QS_BUS_CAPACITY`: Per-session queue size (default: 1000)
    /// - `QS_BOOTSTRAP_COMPANY`: Company to create at startup
    /// - `QS_BOOTSTRAP_USER`: Email of that company's first user
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, validating the result.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup("QS_BUS_CAPACITY") {
            config.bus.session_capacity = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidBusCapacity(raw.clone()))?;
        }

        config.bootstrap = match (lookup("QS_BOOTSTRAP_COMPANY"), lookup("QS_BOOTSTRAP_USER")) {
            (Some(company_name), Some(user_email)) => Some(BootstrapConfig {
                company_name,
                user_email,
            }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteBootstrap),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the runtime cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bus.session_capacity == 0 {
            return Err(ConfigError::InvalidBusCapacity("0".to_string()));
        }
        if let Some(bootstrap) = &self.bootstrap {
            if bootstrap.company_name.trim().is_empty() {
                return Err(ConfigError::BlankBootstrapCompany);
            }
            if bootstrap.user_email.split('@').count() != 2 {
                return Err(ConfigError::InvalidBootstrapEmail(
                    bootstrap.user_email.clone(),
                ));
            }
        }
        Ok(())
    }
}
