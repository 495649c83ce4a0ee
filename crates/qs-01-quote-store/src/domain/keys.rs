//! # Storage Keys
//!
//! Every record key starts with its owning company, so a lookup built from a
//! `TenantScope` can never land in another tenant's data.
//!
//! | Prefix | Key | Value |
//! |--------|-----|-------|
//! | `c:` | `c:{company}` | `Company` |
//! | `u:` | `u:{company}:{user}` | `User` |
//! | `e:` | `e:{email}` | `UserLogin` |
//! | `q:` | `q:{company}:{quote}` | `Quote` |
//! | `d:` | `d:{company}:{quote}:{date_id}` | `LineItemDate` |
//! | `x:` | `x:{company}:{quote}:{yyyy-mm-dd}` | `LineItemDateId` |
//! | `i:` | `i:{company}:{quote}:{date_id}:{item}` | `LineItem` |
//!
//! Ids are zero-padded to 20 digits so byte order equals numeric order, and
//! ISO dates already sort chronologically.

use chrono::NaiveDate;
use shared_types::entities::{CompanyId, LineItemDateId, LineItemId, QuoteId, UserId};

/// Key namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPrefix {
    Company,
    User,
    Email,
    Quote,
    LineItemDate,
    DateIndex,
    LineItem,
}

impl KeyPrefix {
    /// Get the byte prefix for this key type.
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            KeyPrefix::Company => b"c:",
            KeyPrefix::User => b"u:",
            KeyPrefix::Email => b"e:",
            KeyPrefix::Quote => b"q:",
            KeyPrefix::LineItemDate => b"d:",
            KeyPrefix::DateIndex => b"x:",
            KeyPrefix::LineItem => b"i:",
        }
    }

    /// Build a key from `:`-joined segments.
    fn key(&self, segments: &[String]) -> Vec<u8> {
        let mut key = self.as_bytes().to_vec();
        key.extend_from_slice(segments.join(":").as_bytes());
        key
    }

    /// Like `key`, with a trailing separator so the result only matches
    /// children.
    fn scan(&self, segments: &[String]) -> Vec<u8> {
        let mut key = self.key(segments);
        key.push(b':');
        key
    }

    pub fn company_key(company: CompanyId) -> Vec<u8> {
        KeyPrefix::Company.key(&[pad(company.0)])
    }

    pub fn user_key(company: CompanyId, user: UserId) -> Vec<u8> {
        KeyPrefix::User.key(&[pad(company.0), pad(user.0)])
    }

    pub fn users_of(company: CompanyId) -> Vec<u8> {
        KeyPrefix::User.scan(&[pad(company.0)])
    }

    pub fn email_key(email: &str) -> Vec<u8> {
        KeyPrefix::Email.key(&[email.to_string()])
    }

    pub fn quote_key(company: CompanyId, quote: QuoteId) -> Vec<u8> {
        KeyPrefix::Quote.key(&[pad(company.0), pad(quote.0)])
    }

    pub fn quotes_of(company: CompanyId) -> Vec<u8> {
        KeyPrefix::Quote.scan(&[pad(company.0)])
    }

    pub fn line_item_date_key(company: CompanyId, quote: QuoteId, date: LineItemDateId) -> Vec<u8> {
        KeyPrefix::LineItemDate.key(&[pad(company.0), pad(quote.0), pad(date.0)])
    }

    pub fn line_item_dates_of(company: CompanyId, quote: QuoteId) -> Vec<u8> {
        KeyPrefix::LineItemDate.scan(&[pad(company.0), pad(quote.0)])
    }

    /// Unique index entry for `(quote, date)`.
    pub fn date_index_key(company: CompanyId, quote: QuoteId, date: NaiveDate) -> Vec<u8> {
        KeyPrefix::DateIndex.key(&[pad(company.0), pad(quote.0), iso(date)])
    }

    pub fn date_index_of(company: CompanyId, quote: QuoteId) -> Vec<u8> {
        KeyPrefix::DateIndex.scan(&[pad(company.0), pad(quote.0)])
    }

    pub fn line_item_key(
        company: CompanyId,
        quote: QuoteId,
        date: LineItemDateId,
        item: LineItemId,
    ) -> Vec<u8> {
        KeyPrefix::LineItem.key(&[pad(company.0), pad(quote.0), pad(date.0), pad(item.0)])
    }

    pub fn line_items_of(company: CompanyId, quote: QuoteId, date: LineItemDateId) -> Vec<u8> {
        KeyPrefix::LineItem.scan(&[pad(company.0), pad(quote.0), pad(date.0)])
    }

    /// Every line item of a quote, across its dates.
    pub fn line_items_of_quote(company: CompanyId, quote: QuoteId) -> Vec<u8> {
        KeyPrefix::LineItem.scan(&[pad(company.0), pad(quote.0)])
    }

    /// Every key of `prefix` belonging to `company`.
    pub fn tenant_scan(&self, company: CompanyId) -> Vec<u8> {
        self.scan(&[pad(company.0)])
    }
}

fn pad(id: u64) -> String {
    format!("{id:020}")
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_sort_numerically() {
        let nine = KeyPrefix::quote_key(CompanyId(1), QuoteId(9));
        let ten = KeyPrefix::quote_key(CompanyId(1), QuoteId(10));
        assert!(nine < ten);
    }

    #[test]
    fn test_scan_prefix_does_not_cross_tenants() {
        let company_1 = KeyPrefix::quotes_of(CompanyId(1));
        let company_10_quote = KeyPrefix::quote_key(CompanyId(10), QuoteId(1));
        assert!(!company_10_quote.starts_with(&company_1));
        assert!(KeyPrefix::quote_key(CompanyId(1), QuoteId(1)).starts_with(&company_1));
    }

    #[test]
    fn test_date_index_key_is_iso() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let key = KeyPrefix::date_index_key(CompanyId(1), QuoteId(2), date);
        assert!(String::from_utf8(key).unwrap().ends_with(":2024-01-01"));
    }

    #[test]
    fn test_item_keys_nest_under_quote() {
        let item = KeyPrefix::line_item_key(CompanyId(1), QuoteId(2), LineItemDateId(3), LineItemId(4));
        assert!(item.starts_with(&KeyPrefix::line_items_of(CompanyId(1), QuoteId(2), LineItemDateId(3))));
        assert!(item.starts_with(&KeyPrefix::line_items_of_quote(CompanyId(1), QuoteId(2))));
        assert!(item.starts_with(&KeyPrefix::LineItem.tenant_scan(CompanyId(1))));
    }
}
