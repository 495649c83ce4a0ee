//! # Core Domain Entities
//!
//! Defines the tenant hierarchy:
//!
//! ```text
//! Company ─┬─ User
//!          └─ Quote ── LineItemDate ── LineItem
//! ```
//!
//! Children carry the ids of every ancestor. Storage keys are built from that
//! chain, which is what makes a lookup outside the owning company impossible.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// UTC timestamp used for `created_at` / `updated_at`.
pub type Timestamp = DateTime<Utc>;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Raw numeric value.
            #[must_use]
            pub fn as_u64(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Identifier of a tenant.
    CompanyId
);
define_id!(
    /// Identifier of a staff member.
    UserId
);
define_id!(
    /// Identifier of a quote. Increases monotonically on creation.
    QuoteId
);
define_id!(
    /// Identifier of a dated group of line items.
    LineItemDateId
);
define_id!(
    /// Identifier of a billable line item.
    LineItemId
);

// =============================================================================
// TENANCY
// =============================================================================

/// Tenant root. Everything else is reachable from exactly one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A staff member of a company. Credentials live with the external
/// authentication provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub company_id: CompanyId,
    /// Login identifier, stored lower-cased.
    pub email: String,
    pub created_at: Timestamp,
}

impl User {
    /// Display name derived from the login identifier.
    #[must_use]
    pub fn name(&self) -> String {
        display_name(&self.email)
    }
}

/// Derives a display name from a login identifier: the part before `@`,
/// capitalized.
///
/// `"accountant@kpmg.com"` becomes `"Accountant"`.
#[must_use]
pub fn display_name(login: &str) -> String {
    let local = login.split('@').next().unwrap_or_default();
    let mut chars = local.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

// =============================================================================
// QUOTE HIERARCHY
// =============================================================================

/// A price quote owned by one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub company_id: CompanyId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A calendar date grouping line items inside a quote.
///
/// `(quote_id, date)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemDate {
    pub id: LineItemDateId,
    pub company_id: CompanyId,
    pub quote_id: QuoteId,
    pub date: NaiveDate,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A billable line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: LineItemId,
    pub company_id: CompanyId,
    pub quote_id: QuoteId,
    pub line_item_date_id: LineItemDateId,
    pub name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub unit_price: Money,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl LineItem {
    /// `quantity × unit_price`, computed on every call.
    #[must_use]
    pub fn total_price(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}
