//! # Mutation Outcomes
//!
//! What the gateway hands back: the committed record with a user-facing
//! notice, or the untouched input with the reason it was refused.

use serde::{Deserialize, Serialize};
use shared_types::errors::{EntityKind, QuoteError};
use std::fmt;

/// The kind of write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationAction {
    Create,
    Update,
    Destroy,
}

impl MutationAction {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Destroy => "destroy",
        }
    }

    fn past_tense(&self) -> &'static str {
        match self {
            Self::Create => "created",
            Self::Update => "updated",
            Self::Destroy => "destroyed",
        }
    }
}

impl fmt::Display for MutationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flash message shown after a successful write, e.g.
/// `"Quote was successfully created."`.
#[must_use]
pub fn notice(entity: EntityKind, action: MutationAction) -> String {
    format!("{entity} was successfully {}.", action.past_tense())
}

/// A committed write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation<T> {
    pub record: T,
    pub notice: String,
}

/// A refused write. Nothing was persisted and nothing was published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected<P> {
    /// The input exactly as submitted, for re-rendering the form.
    pub params: P,
    pub error: QuoteError,
}

impl<P> fmt::Display for Rejected<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

pub type GatewayResult<T, P = ()> = Result<Mutation<T>, Rejected<P>>;
