//! QuoteHierarchyApi implementation.

use super::{decode, decode_all, no_conflict, IdSequences, QuoteStoreService};
use crate::domain::keys::KeyPrefix;
use crate::domain::tree::QuoteTree;
use crate::domain::validation;
use crate::ports::inbound::QuoteHierarchyApi;
use crate::ports::outbound::{BatchOperation, KeyValueStore, TimeSource};
use chrono::NaiveDate;
use shared_types::entities::{
    LineItem, LineItemDate, LineItemDateId, LineItemId, Quote, QuoteId,
};
use shared_types::errors::{EntityKind, QuoteError, QuoteResult};
use shared_types::params::{LineItemDateParams, LineItemParams, QuoteParams};
use shared_types::security::TenantScope;
use tracing::debug;

fn duplicate_date(date: NaiveDate) -> impl FnOnce() -> QuoteError {
    move || QuoteError::Uniqueness {
        entity: EntityKind::LineItemDate,
        field: "date",
        value: date.format("%Y-%m-%d").to_string(),
    }
}

impl<KV, TS> QuoteStoreService<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    fn require_quote(&self, scope: TenantScope, quote_id: QuoteId) -> QuoteResult<Quote> {
        self.read(&KeyPrefix::quote_key(scope.company_id(), quote_id))?
            .ok_or_else(|| QuoteError::not_found(EntityKind::Quote, quote_id))
    }

    fn require_date(
        &self,
        scope: TenantScope,
        quote_id: QuoteId,
        date_id: LineItemDateId,
    ) -> QuoteResult<LineItemDate> {
        self.require_quote(scope, quote_id)?;
        self.read(&KeyPrefix::line_item_date_key(
            scope.company_id(),
            quote_id,
            date_id,
        ))?
        .ok_or_else(|| QuoteError::not_found(EntityKind::LineItemDate, date_id))
    }

    fn require_item(
        &self,
        scope: TenantScope,
        quote_id: QuoteId,
        date_id: LineItemDateId,
        item_id: LineItemId,
    ) -> QuoteResult<LineItem> {
        self.require_date(scope, quote_id, date_id)?;
        self.read(&KeyPrefix::line_item_key(
            scope.company_id(),
            quote_id,
            date_id,
            item_id,
        ))?
        .ok_or_else(|| QuoteError::not_found(EntityKind::LineItem, item_id))
    }

    /// Deletes for every key under `prefix`.
    fn delete_all(&self, prefix: &[u8]) -> QuoteResult<Vec<BatchOperation>> {
        Ok(self
            .scan_keys(prefix)?
            .into_iter()
            .map(BatchOperation::delete)
            .collect())
    }
}

impl<KV, TS> QuoteHierarchyApi for QuoteStoreService<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    // =========================================================================
    // QUOTES
    // =========================================================================

    fn create_quote(&self, scope: TenantScope, params: &QuoteParams) -> QuoteResult<Quote> {
        let company_id = scope.company_id();
        let lock = self.tenant_lock(company_id);
        let _guard = lock.lock();

        self.require_company(company_id)?;
        let name = validation::name(params.name.as_deref())?;

        let now = self.now();
        let quote = Quote {
            id: QuoteId(IdSequences::next(&self.sequences.quote)),
            company_id,
            name,
            created_at: now,
            updated_at: now,
        };
        self.commit(
            vec![BatchOperation::put(
                KeyPrefix::quote_key(company_id, quote.id),
                Self::encode(&quote)?,
            )],
            no_conflict,
        )?;

        debug!(company = %company_id, quote = %quote.id, "Quote created");
        Ok(quote)
    }

    fn update_quote(
        &self,
        scope: TenantScope,
        quote_id: QuoteId,
        params: &QuoteParams,
    ) -> QuoteResult<Quote> {
        let lock = self.tenant_lock(scope.company_id());
        let _guard = lock.lock();

        let mut quote = self.require_quote(scope, quote_id)?;
        let name = params.name.as_deref().unwrap_or(&quote.name);
        quote.name = validation::name(Some(name))?;
        quote.updated_at = self.now();

        self.commit(
            vec![BatchOperation::put(
                KeyPrefix::quote_key(scope.company_id(), quote_id),
                Self::encode(&quote)?,
            )],
            no_conflict,
        )?;

        debug!(company = %scope.company_id(), quote = %quote_id, "Quote updated");
        Ok(quote)
    }

    fn destroy_quote(&self, scope: TenantScope, quote_id: QuoteId) -> QuoteResult<()> {
        let company_id = scope.company_id();
        let lock = self.tenant_lock(company_id);
        let _guard = lock.lock();

        self.require_quote(scope, quote_id)?;

        let mut operations = vec![BatchOperation::delete(KeyPrefix::quote_key(
            company_id, quote_id,
        ))];
        operations.extend(self.delete_all(&KeyPrefix::line_item_dates_of(company_id, quote_id))?);
        operations.extend(self.delete_all(&KeyPrefix::date_index_of(company_id, quote_id))?);
        operations.extend(self.delete_all(&KeyPrefix::line_items_of_quote(company_id, quote_id))?);

        let removed = operations.len();
        self.commit(operations, no_conflict)?;

        debug!(company = %company_id, quote = %quote_id, keys = removed, "Quote destroyed");
        Ok(())
    }

    fn get_quote(&self, scope: TenantScope, quote_id: QuoteId) -> QuoteResult<Quote> {
        self.require_quote(scope, quote_id)
    }

    fn list_quotes(&self, scope: TenantScope) -> QuoteResult<Vec<Quote>> {
        let mut quotes: Vec<Quote> = self.scan(&KeyPrefix::quotes_of(scope.company_id()))?;
        quotes.reverse();
        debug!(company = %scope.company_id(), count = quotes.len(), "Listed quotes");
        Ok(quotes)
    }

    fn load_quote_tree(&self, scope: TenantScope, quote_id: QuoteId) -> QuoteResult<QuoteTree> {
        let company_id = scope.company_id();

        // One read guard for all three lookups; writers commit whole batches
        // under the write guard.
        let (quote, dates, items) = {
            let kv = self.kv_store.read();
            let quote: Quote = kv
                .get(&KeyPrefix::quote_key(company_id, quote_id))?
                .map(|bytes| decode(&bytes))
                .transpose()?
                .ok_or_else(|| QuoteError::not_found(EntityKind::Quote, quote_id))?;
            let dates: Vec<LineItemDate> =
                decode_all(&kv.prefix_scan(&KeyPrefix::line_item_dates_of(company_id, quote_id))?)?;
            let items: Vec<LineItem> =
                decode_all(&kv.prefix_scan(&KeyPrefix::line_items_of_quote(company_id, quote_id))?)?;
            (quote, dates, items)
        };

        let tree = QuoteTree::assemble(quote, dates, items);
        debug!(quote = %quote_id, dates = tree.dates.len(), "Loaded quote tree");
        Ok(tree)
    }

    // =========================================================================
    // LINE ITEM DATES
    // =========================================================================

    fn create_line_item_date(
        &self,
        scope: TenantScope,
        quote_id: QuoteId,
        params: &LineItemDateParams,
    ) -> QuoteResult<LineItemDate> {
        let company_id = scope.company_id();
        let lock = self.tenant_lock(company_id);
        let _guard = lock.lock();

        self.require_quote(scope, quote_id)?;
        let date = validation::date(params)?;

        let now = self.now();
        let record = LineItemDate {
            id: LineItemDateId(IdSequences::next(&self.sequences.line_item_date)),
            company_id,
            quote_id,
            date,
            created_at: now,
            updated_at: now,
        };

        self.commit(
            vec![
                BatchOperation::put_if_absent(
                    KeyPrefix::date_index_key(company_id, quote_id, date),
                    Self::encode(&record.id)?,
                ),
                BatchOperation::put(
                    KeyPrefix::line_item_date_key(company_id, quote_id, record.id),
                    Self::encode(&record)?,
                ),
            ],
            duplicate_date(date),
        )?;

        debug!(quote = %quote_id, line_item_date = %record.id, %date, "Line item date created");
        Ok(record)
    }

    fn update_line_item_date(
        &self,
        scope: TenantScope,
        quote_id: QuoteId,
        date_id: LineItemDateId,
        params: &LineItemDateParams,
    ) -> QuoteResult<LineItemDate> {
        let company_id = scope.company_id();
        let lock = self.tenant_lock(company_id);
        let _guard = lock.lock();

        let mut record = self.require_date(scope, quote_id, date_id)?;
        let previous = record.date;
        if params.date.is_some() {
            record.date = validation::date(params)?;
        }
        record.updated_at = self.now();

        let mut operations = Vec::with_capacity(3);
        if record.date != previous {
            operations.push(BatchOperation::delete(KeyPrefix::date_index_key(
                company_id, quote_id, previous,
            )));
            operations.push(BatchOperation::put_if_absent(
                KeyPrefix::date_index_key(company_id, quote_id, record.date),
                Self::encode(&record.id)?,
            ));
        }
        operations.push(BatchOperation::put(
            KeyPrefix::line_item_date_key(company_id, quote_id, date_id),
            Self::encode(&record)?,
        ));
        self.commit(operations, duplicate_date(record.date))?;

        debug!(quote = %quote_id, line_item_date = %date_id, date = %record.date, "Line item date updated");
        Ok(record)
    }

    fn destroy_line_item_date(
        &self,
        scope: TenantScope,
        quote_id: QuoteId,
        date_id: LineItemDateId,
    ) -> QuoteResult<()> {
        let company_id = scope.company_id();
        let lock = self.tenant_lock(company_id);
        let _guard = lock.lock();

        let record = self.require_date(scope, quote_id, date_id)?;

        let mut operations = vec![
            BatchOperation::delete(KeyPrefix::line_item_date_key(company_id, quote_id, date_id)),
            BatchOperation::delete(KeyPrefix::date_index_key(company_id, quote_id, record.date)),
        ];
        operations.extend(self.delete_all(&KeyPrefix::line_items_of(company_id, quote_id, date_id))?);

        let removed = operations.len();
        self.commit(operations, no_conflict)?;

        debug!(quote = %quote_id, line_item_date = %date_id, keys = removed, "Line item date destroyed");
        Ok(())
    }

    fn get_line_item_date(
        &self,
        scope: TenantScope,
        quote_id: QuoteId,
        date_id: LineItemDateId,
    ) -> QuoteResult<LineItemDate> {
        self.require_date(scope, quote_id, date_id)
    }

    fn list_line_item_dates(
        &self,
        scope: TenantScope,
        quote_id: QuoteId,
    ) -> QuoteResult<Vec<LineItemDate>> {
        self.require_quote(scope, quote_id)?;
        let mut dates: Vec<LineItemDate> =
            self.scan(&KeyPrefix::line_item_dates_of(scope.company_id(), quote_id))?;
        dates.sort_by_key(|record| (record.date, record.id));
        debug!(quote = %quote_id, count = dates.len(), "Listed line item dates");
        Ok(dates)
    }

    fn previous_date(
        &self,
        scope: TenantScope,
        quote_id: QuoteId,
        date_id: LineItemDateId,
    ) -> QuoteResult<Option<LineItemDate>> {
        let current = self.require_date(scope, quote_id, date_id)?;
        Ok(self
            .list_line_item_dates(scope, quote_id)?
            .into_iter()
            .filter(|record| record.date < current.date)
            .last())
    }

    // =========================================================================
    // LINE ITEMS
    // =========================================================================

    fn create_line_item(
        &self,
        scope: TenantScope,
        quote_id: QuoteId,
        date_id: LineItemDateId,
        params: &LineItemParams,
    ) -> QuoteResult<LineItem> {
        let company_id = scope.company_id();
        let lock = self.tenant_lock(company_id);
        let _guard = lock.lock();

        self.require_date(scope, quote_id, date_id)?;
        let fields = validation::line_item(params)?;

        let now = self.now();
        let item = LineItem {
            id: LineItemId(IdSequences::next(&self.sequences.line_item)),
            company_id,
            quote_id,
            line_item_date_id: date_id,
            name: fields.name,
            description: fields.description,
            quantity: fields.quantity,
            unit_price: fields.unit_price,
            created_at: now,
            updated_at: now,
        };
        self.commit(
            vec![BatchOperation::put(
                KeyPrefix::line_item_key(company_id, quote_id, date_id, item.id),
                Self::encode(&item)?,
            )],
            no_conflict,
        )?;

        debug!(quote = %quote_id, line_item_date = %date_id, line_item = %item.id, "Line item created");
        Ok(item)
    }

    fn update_line_item(
        &self,
        scope: TenantScope,
        quote_id: QuoteId,
        date_id: LineItemDateId,
        item_id: LineItemId,
        params: &LineItemParams,
    ) -> QuoteResult<LineItem> {
        let company_id = scope.company_id();
        let lock = self.tenant_lock(company_id);
        let _guard = lock.lock();

        let mut item = self.require_item(scope, quote_id, date_id, item_id)?;
        let merged = LineItemParams {
            name: params.name.clone().or_else(|| Some(item.name.clone())),
            description: params.description.clone().or_else(|| item.description.clone()),
            quantity: params
                .quantity
                .clone()
                .or_else(|| Some(item.quantity.to_string())),
            unit_price: params
                .unit_price
                .clone()
                .or_else(|| Some(item.unit_price.to_string())),
        };
        let fields = validation::line_item(&merged)?;

        item.name = fields.name;
        item.description = fields.description;
        item.quantity = fields.quantity;
        item.unit_price = fields.unit_price;
        item.updated_at = self.now();

        self.commit(
            vec![BatchOperation::put(
                KeyPrefix::line_item_key(company_id, quote_id, date_id, item_id),
                Self::encode(&item)?,
            )],
            no_conflict,
        )?;

        debug!(quote = %quote_id, line_item = %item_id, "Line item updated");
        Ok(item)
    }

    fn destroy_line_item(
        &self,
        scope: TenantScope,
        quote_id: QuoteId,
        date_id: LineItemDateId,
        item_id: LineItemId,
    ) -> QuoteResult<()> {
        let company_id = scope.company_id();
        let lock = self.tenant_lock(company_id);
        let _guard = lock.lock();

        self.require_item(scope, quote_id, date_id, item_id)?;
        self.commit(
            vec![BatchOperation::delete(KeyPrefix::line_item_key(
                company_id, quote_id, date_id, item_id,
            ))],
            no_conflict,
        )?;

        debug!(quote = %quote_id, line_item = %item_id, "Line item destroyed");
        Ok(())
    }

    fn get_line_item(
        &self,
        scope: TenantScope,
        quote_id: QuoteId,
        date_id: LineItemDateId,
        item_id: LineItemId,
    ) -> QuoteResult<LineItem> {
        self.require_item(scope, quote_id, date_id, item_id)
    }

    fn list_line_items(
        &self,
        scope: TenantScope,
        quote_id: QuoteId,
        date_id: LineItemDateId,
    ) -> QuoteResult<Vec<LineItem>> {
        self.require_date(scope, quote_id, date_id)?;
        self.scan(&KeyPrefix::line_items_of(scope.company_id(), quote_id, date_id))
    }
}
