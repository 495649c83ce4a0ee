//! # Form Parameters
//!
//! Raw, unvalidated input as submitted by a client. Every field is an
//! `Option<String>` so a rejected submission can be handed back exactly as it
//! arrived.
//!
//! The same structs double as patches for updates: `None` leaves a field
//! unchanged, `Some(..)` replaces it (and is validated like a fresh value).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Input for creating a company.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyParams {
    pub name: Option<String>,
}

impl CompanyParams {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// Input for creating or renaming a quote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteParams {
    pub name: Option<String>,
}

impl QuoteParams {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// Input for creating or moving a line item date. Dates are ISO-8601
/// (`YYYY-MM-DD`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemDateParams {
    pub date: Option<String>,
}

impl LineItemDateParams {
    pub fn on(date: NaiveDate) -> Self {
        Self {
            date: Some(date.format("%Y-%m-%d").to_string()),
        }
    }

    pub fn raw(date: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
        }
    }
}

/// Input for creating or editing a line item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemParams {
    pub name: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<String>,
    pub unit_price: Option<String>,
}

impl LineItemParams {
    /// A complete submission without description.
    pub fn new(name: impl Into<String>, quantity: i32, unit_price: Money) -> Self {
        Self {
            name: Some(name.into()),
            description: None,
            quantity: Some(quantity.to_string()),
            unit_price: Some(unit_price.to_string()),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
