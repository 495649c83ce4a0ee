//! # Tenant Scoping
//!
//! The authentication provider hands the core an `Actor`. Its company
//! affiliation is trusted completely and becomes the `TenantScope` threaded
//! through every store and gateway call.

use serde::{Deserialize, Serialize};

use crate::entities::{display_name, CompanyId, UserId};

/// The company boundary for a read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantScope(CompanyId);

impl TenantScope {
    #[must_use]
    pub fn new(company_id: CompanyId) -> Self {
        Self(company_id)
    }

    #[must_use]
    pub fn company_id(&self) -> CompanyId {
        self.0
    }
}

impl From<CompanyId> for TenantScope {
    fn from(company_id: CompanyId) -> Self {
        Self(company_id)
    }
}

/// An authenticated staff member acting on behalf of their company.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub company_id: CompanyId,
    pub email: String,
}

impl Actor {
    #[must_use]
    pub fn scope(&self) -> TenantScope {
        TenantScope(self.company_id)
    }

    #[must_use]
    pub fn display_name(&self) -> String {
        display_name(&self.email)
    }
}
