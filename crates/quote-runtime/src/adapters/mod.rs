//! # Runtime Adapters
//!
//! Implementations of component ports that need runtime-wide concerns:
//!
//! - `publisher` - broadcaster decorated with Prometheus metrics
//! - `observer` - gateway outcomes counted in Prometheus
//! - `auth` - resolves a signed-in email to an `Actor`

pub mod auth;
pub mod observer;
pub mod publisher;

pub use auth::SessionAuthenticator;
pub use observer::PrometheusObserver;
pub use publisher::MeteredPublisher;
