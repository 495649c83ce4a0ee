//! # Domain Layer
//!
//! Key layout, input validation and substrate errors for the quote store.

pub mod errors;
pub mod keys;
pub mod tree;
pub mod validation;

use serde::{Deserialize, Serialize};
use shared_types::entities::{CompanyId, UserId};

/// Value of the global email index: where the user record lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLogin {
    pub company_id: CompanyId,
    pub user_id: UserId,
}
