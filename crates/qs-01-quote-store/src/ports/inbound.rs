//! # Inbound Ports (Driving Ports)
//!
//! The public API of the quote store.
//!
//! Hierarchy operations take a [`TenantScope`]; the scope's company becomes
//! the first segment of every key touched. A record outside the scope is
//! reported exactly like one that does not exist.

use shared_types::entities::{
    Company, CompanyId, LineItem, LineItemDate, LineItemDateId, LineItemId, Quote, QuoteId, User,
};
use crate::domain::tree::QuoteTree;
use shared_types::errors::QuoteResult;
use shared_types::params::{CompanyParams, LineItemDateParams, LineItemParams, QuoteParams};
use shared_types::security::TenantScope;

/// Tenant administration: companies and their staff.
pub trait TenantStoreApi: Send + Sync {
    /// Create a company.
    ///
    /// ## Errors
    ///
    /// - `Validation`: name missing or blank
    fn create_company(&self, params: &CompanyParams) -> QuoteResult<Company>;

    fn get_company(&self, id: CompanyId) -> QuoteResult<Company>;

    /// Register a staff member under `company_id`.
    ///
    /// ## Errors
    ///
    /// - `Validation`: email missing or malformed
    /// - `Uniqueness`: email already registered (in any company)
    /// - `NotFound`: company does not exist
    fn register_user(&self, company_id: CompanyId, email: &str) -> QuoteResult<User>;

    /// Look up a user by login identifier, case-insensitively.
    fn find_user_by_email(&self, email: &str) -> QuoteResult<User>;

    /// Users of a company, in registration order.
    fn list_users(&self, company_id: CompanyId) -> QuoteResult<Vec<User>>;

    /// Destroy a company with its users and every quote it owns.
    ///
    /// Applied as a single atomic batch. Returns the ids of the destroyed
    /// quotes, oldest first.
    fn destroy_company(&self, id: CompanyId) -> QuoteResult<Vec<QuoteId>>;
}

/// The Company → Quote → LineItemDate → LineItem tree.
pub trait QuoteHierarchyApi: Send + Sync {
    // -------------------------------------------------------------------------
    // Quotes
    // -------------------------------------------------------------------------

    fn create_quote(&self, scope: TenantScope, params: &QuoteParams) -> QuoteResult<Quote>;

    /// Rename a quote. `None` fields are left unchanged.
    fn update_quote(
        &self,
        scope: TenantScope,
        quote_id: QuoteId,
        params: &QuoteParams,
    ) -> QuoteResult<Quote>;

    /// Destroy a quote with all of its dates and items.
    fn destroy_quote(&self, scope: TenantScope, quote_id: QuoteId) -> QuoteResult<()>;

    fn get_quote(&self, scope: TenantScope, quote_id: QuoteId) -> QuoteResult<Quote>;

    /// Quotes of the scope's company, newest first.
    fn list_quotes(&self, scope: TenantScope) -> QuoteResult<Vec<Quote>>;

    /// A quote with all of its dates and items, read from a single snapshot.
    ///
    /// Concurrent writes are either fully visible or not at all.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: quote not in scope
    fn load_quote_tree(&self, scope: TenantScope, quote_id: QuoteId) -> QuoteResult<QuoteTree>;

    // -------------------------------------------------------------------------
    // Line item dates
    // -------------------------------------------------------------------------

    /// ## Errors
    ///
    /// - `Validation`: date missing or not `YYYY-MM-DD`
    /// - `Uniqueness`: the quote already has this date
    /// - `NotFound`: quote not in scope
    fn create_line_item_date(
        &self,
        scope: TenantScope,
        quote_id: QuoteId,
        params: &LineItemDateParams,
    ) -> QuoteResult<LineItemDate>;

    /// Move a date. Keeping the current date is not a conflict.
    fn update_line_item_date(
        &self,
        scope: TenantScope,
        quote_id: QuoteId,
        date_id: LineItemDateId,
        params: &LineItemDateParams,
    ) -> QuoteResult<LineItemDate>;

    /// Destroy a date with all of its items.
    fn destroy_line_item_date(
        &self,
        scope: TenantScope,
        quote_id: QuoteId,
        date_id: LineItemDateId,
    ) -> QuoteResult<()>;

    fn get_line_item_date(
        &self,
        scope: TenantScope,
        quote_id: QuoteId,
        date_id: LineItemDateId,
    ) -> QuoteResult<LineItemDate>;

    /// Dates of a quote, ascending.
    fn list_line_item_dates(
        &self,
        scope: TenantScope,
        quote_id: QuoteId,
    ) -> QuoteResult<Vec<LineItemDate>>;

    /// Nearest earlier date of the same quote, if any.
    fn previous_date(
        &self,
        scope: TenantScope,
        quote_id: QuoteId,
        date_id: LineItemDateId,
    ) -> QuoteResult<Option<LineItemDate>>;

    // -------------------------------------------------------------------------
    // Line items
    // -------------------------------------------------------------------------

    /// ## Errors
    ///
    /// - `Validation`: name blank, quantity or unit price missing/non-numeric
    /// - `NotFound`: quote or date not in scope
    fn create_line_item(
        &self,
        scope: TenantScope,
        quote_id: QuoteId,
        date_id: LineItemDateId,
        params: &LineItemParams,
    ) -> QuoteResult<LineItem>;

    /// Edit an item. `None` fields are left unchanged; the merged result is
    /// validated as a whole.
    fn update_line_item(
        &self,
        scope: TenantScope,
        quote_id: QuoteId,
        date_id: LineItemDateId,
        item_id: LineItemId,
        params: &LineItemParams,
    ) -> QuoteResult<LineItem>;

    fn destroy_line_item(
        &self,
        scope: TenantScope,
        quote_id: QuoteId,
        date_id: LineItemDateId,
        item_id: LineItemId,
    ) -> QuoteResult<()>;

    fn get_line_item(
        &self,
        scope: TenantScope,
        quote_id: QuoteId,
        date_id: LineItemDateId,
        item_id: LineItemId,
    ) -> QuoteResult<LineItem>;

    /// Items of a date, in creation order.
    fn list_line_items(
        &self,
        scope: TenantScope,
        quote_id: QuoteId,
        date_id: LineItemDateId,
    ) -> QuoteResult<Vec<LineItem>>;
}
