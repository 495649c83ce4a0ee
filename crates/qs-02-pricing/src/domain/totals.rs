//! # Totals
//!
//! Pure aggregation over already-loaded records. All arithmetic is
//! fixed-point with two fractional digits.

use shared_types::entities::{LineItem, LineItemDate};
use shared_types::money::Money;

/// A date together with its items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateGroup {
    pub date: LineItemDate,
    pub items: Vec<LineItem>,
}

/// `quantity × unit_price`.
#[must_use]
pub fn line_item_total(item: &LineItem) -> Money {
    item.unit_price.times(item.quantity)
}

/// Sum of the item totals; zero for no items.
#[must_use]
pub fn date_total(items: &[LineItem]) -> Money {
    items.iter().map(line_item_total).sum()
}

/// Sum of the date totals; zero for no dates.
#[must_use]
pub fn quote_total(groups: &[DateGroup]) -> Money {
    groups.iter().map(|group| date_total(&group.items)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use shared_types::entities::{CompanyId, LineItemDateId, LineItemId, QuoteId};

    fn item(id: u64, quantity: i32, unit_price: &str) -> LineItem {
        let now = Utc::now();
        LineItem {
            id: LineItemId(id),
            company_id: CompanyId(1),
            quote_id: QuoteId(1),
            line_item_date_id: LineItemDateId(1),
            name: format!("Item {id}"),
            description: None,
            quantity,
            unit_price: Money::parse(unit_price).unwrap(),
            created_at: now,
            updated_at: now,
        }
    }

    fn group(day: u32, items: Vec<LineItem>) -> DateGroup {
        let now = Utc::now();
        DateGroup {
            date: LineItemDate {
                id: LineItemDateId(u64::from(day)),
                company_id: CompanyId(1),
                quote_id: QuoteId(1),
                date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
                created_at: now,
                updated_at: now,
            },
            items,
        }
    }

    #[test]
    fn test_line_item_total_exact() {
        assert_eq!(line_item_total(&item(1, 1, "1234.00")).to_string(), "1234.00");
        assert_eq!(line_item_total(&item(2, 3, "0.10")).to_string(), "0.30");
        assert_eq!(line_item_total(&item(3, 0, "99.99")), Money::ZERO);
    }

    #[test]
    fn test_empty_totals_are_zero() {
        assert_eq!(date_total(&[]), Money::ZERO);
        assert_eq!(quote_total(&[]), Money::ZERO);
        assert_eq!(quote_total(&[group(1, vec![])]).to_string(), "0.00");
    }

    #[test]
    fn test_quote_total_sums_dates() {
        let groups = vec![
            group(1, vec![item(1, 1, "250.00"), item(2, 2, "12.50")]),
            group(2, vec![item(3, 10, "0.01")]),
        ];
        assert_eq!(date_total(&groups[0].items).to_string(), "275.00");
        assert_eq!(quote_total(&groups).to_string(), "275.10");
    }
}
