//! A quote with everything beneath it, read from one consistent view.

use serde::Serialize;
use shared_types::entities::{LineItem, LineItemDate, LineItemDateId, Quote};

/// One date with its items, in creation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateBranch {
    pub date: LineItemDate,
    pub items: Vec<LineItem>,
}

/// A quote, its dates ascending, and their items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteTree {
    pub quote: Quote,
    pub dates: Vec<DateBranch>,
}

impl QuoteTree {
    /// Assemble a tree from flat scans. Items whose date is not in `dates`
    /// are discarded.
    #[must_use]
    pub fn assemble(quote: Quote, mut dates: Vec<LineItemDate>, items: Vec<LineItem>) -> Self {
        dates.sort_by_key(|record| (record.date, record.id));
        let mut branches: Vec<DateBranch> = dates
            .into_iter()
            .map(|date| DateBranch {
                date,
                items: Vec::new(),
            })
            .collect();

        for item in items {
            if let Some(branch) = branches
                .iter_mut()
                .find(|branch| branch.date.id == item.line_item_date_id)
            {
                branch.items.push(item);
            }
        }

        Self {
            quote,
            dates: branches,
        }
    }

    /// The branch for `date_id`, if the quote has it.
    #[must_use]
    pub fn branch(&self, date_id: LineItemDateId) -> Option<&DateBranch> {
        self.dates.iter().find(|branch| branch.date.id == date_id)
    }
}
