//! # Session Authenticator
//!
//! Turns a login identifier into the `Actor` every gateway call needs.
//! Credential checks belong to the authentication provider in front of this
//! process; only registration is verified here.

use std::sync::Arc;

use qs_01_quote_store::TenantStoreApi;
use shared_types::errors::QuoteResult;
use shared_types::security::Actor;
use tracing::{debug, warn};

pub struct SessionAuthenticator<S: TenantStoreApi> {
    store: Arc<S>,
}

impl<S: TenantStoreApi> SessionAuthenticator<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Resolve a registered user to an `Actor` bound to their company.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: no user with this email
    pub fn sign_in(&self, email: &str) -> QuoteResult<Actor> {
        let user = self.store.find_user_by_email(email).map_err(|error| {
            warn!(%error, "Sign-in refused");
            error
        })?;
        debug!(user = %user.id, company = %user.company_id, "Signed in");
        Ok(Actor {
            user_id: user.id,
            company_id: user.company_id,
            email: user.email,
        })
    }
}
