//! Priced views of a quote, ready for display.

use super::totals::{date_total, line_item_total, quote_total, DateGroup};
use chrono::NaiveDate;
use serde::Serialize;
use shared_types::entities::{LineItemDateId, LineItemId, QuoteId};
use shared_types::money::Money;

/// One priced line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItemPricing {
    pub line_item_id: LineItemId,
    pub name: String,
    pub quantity: i32,
    pub unit_price: Money,
    pub total: Money,
}

/// One priced date with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatePricing {
    pub line_item_date_id: LineItemDateId,
    pub date: NaiveDate,
    pub items: Vec<LineItemPricing>,
    pub total: Money,
}

/// Per-date totals in date order plus the grand total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuotePricing {
    pub quote_id: QuoteId,
    pub dates: Vec<DatePricing>,
    pub total: Money,
}

impl QuotePricing {
    /// Price `groups`, which must already be in display order.
    #[must_use]
    pub fn from_groups(quote_id: QuoteId, groups: &[DateGroup]) -> Self {
        let dates = groups
            .iter()
            .map(|group| DatePricing {
                line_item_date_id: group.date.id,
                date: group.date.date,
                items: group
                    .items
                    .iter()
                    .map(|item| LineItemPricing {
                        line_item_id: item.id,
                        name: item.name.clone(),
                        quantity: item.quantity,
                        unit_price: item.unit_price,
                        total: line_item_total(item),
                    })
                    .collect(),
                total: date_total(&group.items),
            })
            .collect();

        Self {
            quote_id,
            dates,
            total: quote_total(groups),
        }
    }

    /// Total of one date, if the quote has it.
    #[must_use]
    pub fn date_total(&self, line_item_date_id: LineItemDateId) -> Option<Money> {
        self.dates
            .iter()
            .find(|date| date.line_item_date_id == line_item_date_id)
            .map(|date| date.total)
    }
}
