//! # Service Container
//!
//! Holds every component instance with its lifetime and wiring:
//!
//! - store first (no dependencies)
//! - broadcaster, wrapped with metrics
//! - gateway over store and broadcaster
//! - read-side services (pricing, sign-in) over the store

pub mod config;
pub mod services;

pub use config::{BootstrapConfig, BusConfig, ConfigError, RuntimeConfig};
pub use services::ServiceContainer;
