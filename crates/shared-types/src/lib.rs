//! # Shared Types Crate
//!
//! This crate contains the tenant and quote entities, the fixed-point `Money`
//! type, raw form parameters and the `QuoteError` enum shared by every
//! subsystem of the quote builder.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Explicit Tenancy**: Every read or write takes a `TenantScope`; there is
//!   no ambient "current company".
//! - **Derived, Not Stored**: Totals and display names are computed on demand.

pub mod entities;
pub mod errors;
pub mod money;
pub mod params;
pub mod security;

pub use entities::*;
pub use errors::*;
pub use money::{Money, MoneyError};
pub use params::*;
pub use security::{Actor, TenantScope};
