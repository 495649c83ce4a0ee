//! # Error Types
//!
//! Defines the error kinds surfaced by the store and the mutation gateway.
//!
//! `NotFound` deliberately covers both "does not exist" and "belongs to
//! another company": callers cannot tell the two apart.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The kind of entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Company,
    User,
    Quote,
    LineItemDate,
    LineItem,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Company => "Company",
            Self::User => "User",
            Self::Quote => "Quote",
            Self::LineItemDate => "Date",
            Self::LineItem => "Item",
        };
        f.write_str(name)
    }
}

/// A single rejected field with a human readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut chars = self.field.chars();
        match chars.next() {
            Some(first) => {
                let label: String = first
                    .to_uppercase()
                    .chain(chars.map(|c| if c == '_' { ' ' } else { c }))
                    .collect();
                write!(f, "{} {}", label, self.message)
            }
            None => f.write_str(&self.message),
        }
    }
}

/// Every field that failed validation, in the order they were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// First error recorded for `field`, if any.
    #[must_use]
    pub fn on(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// `Ok(())` when nothing was recorded, otherwise `QuoteError::Validation`.
    pub fn into_result(self) -> Result<(), QuoteError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(QuoteError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, error) in self.errors.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

/// Errors returned by the quote store and the mutation gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    /// A required field is missing or malformed.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// A uniqueness constraint would be violated.
    #[error("{entity} {field} {value} has already been taken")]
    Uniqueness {
        entity: EntityKind,
        field: &'static str,
        value: String,
    },

    /// The entity does not exist within the caller's tenant.
    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: String },

    /// The persistence substrate or record codec failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl QuoteError {
    pub fn not_found(entity: EntityKind, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Single-field validation failure.
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, message);
        Self::Validation(errors)
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    #[must_use]
    pub fn is_uniqueness(&self) -> bool {
        matches!(self, Self::Uniqueness { .. })
    }

    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Short label used for metrics and logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Uniqueness { .. } => "uniqueness",
            Self::NotFound { .. } => "not_found",
            Self::Storage(_) => "storage",
        }
    }
}

pub type QuoteResult<T> = Result<T, QuoteError>;
