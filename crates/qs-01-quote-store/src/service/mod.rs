//! # Quote Store Service
//!
//! The main service implementing the tenant and hierarchy APIs.
//!
//! ## Architecture
//!
//! This service:
//! 1. Implements `TenantStoreApi` and `QuoteHierarchyApi`
//! 2. Builds every key from the caller's company, so scoping cannot be skipped
//! 3. Commits each mutation, cascades included, as one atomic batch
//! 4. Uses dependency injection for the substrate and the clock

mod hierarchy;
mod tenants;

use crate::adapters::{InMemoryKVStore, SystemTimeSource};
use crate::domain::errors::{codec_error, KVStoreError};
use crate::domain::keys::KeyPrefix;
use crate::ports::outbound::{BatchOperation, KeyValueStore, ScanResult, TimeSource};
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::entities::{
    Company, CompanyId, LineItem, LineItemDate, Quote, Timestamp, User,
};
use shared_types::errors::{QuoteError, QuoteResult};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Monotonic id counters, one per entity kind.
#[derive(Debug, Default)]
pub(crate) struct IdSequences {
    company: AtomicU64,
    user: AtomicU64,
    quote: AtomicU64,
    line_item_date: AtomicU64,
    line_item: AtomicU64,
}

impl IdSequences {
    fn next(counter: &AtomicU64) -> u64 {
        counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Never moves a counter backwards.
    fn resume(counter: &AtomicU64, highest: u64) {
        counter.fetch_max(highest, Ordering::SeqCst);
    }
}

/// The Quote Store Service.
///
/// Safe to share across threads. Writes for one company are serialized by a
/// per-tenant lock; companies never contend with each other.
pub struct QuoteStoreService<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    /// Key-value store for persistence.
    pub(crate) kv_store: RwLock<KV>,
    /// Time source for timestamps.
    pub(crate) time_source: TS,
    /// Next id per entity kind.
    pub(crate) sequences: IdSequences,
    /// One write lock per company.
    tenant_locks: DashMap<CompanyId, Arc<Mutex<()>>>,
}

impl QuoteStoreService<InMemoryKVStore, SystemTimeSource> {
    /// Create a service over a fresh in-memory substrate.
    pub fn new_in_memory() -> Self {
        Self::new(InMemoryKVStore::new(), SystemTimeSource)
    }
}

impl<KV, TS> QuoteStoreService<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    /// Create a new service over `kv_store`.
    ///
    /// Id sequences resume after the highest id already persisted.
    pub fn new(kv_store: KV, time_source: TS) -> Self {
        let service = Self {
            kv_store: RwLock::new(kv_store),
            time_source,
            sequences: IdSequences::default(),
            tenant_locks: DashMap::new(),
        };

        if let Err(err) = service.recover_sequences() {
            warn!(error = %err, "Could not recover id sequences from storage");
        }

        service
    }

    /// Shut the service down and hand back the substrate.
    pub fn into_kv_store(self) -> KV {
        self.kv_store.into_inner()
    }

    fn recover_sequences(&self) -> QuoteResult<()> {
        let companies: Vec<Company> = self.scan(KeyPrefix::Company.as_bytes())?;
        let users: Vec<User> = self.scan(KeyPrefix::User.as_bytes())?;
        let quotes: Vec<Quote> = self.scan(KeyPrefix::Quote.as_bytes())?;
        let dates: Vec<LineItemDate> = self.scan(KeyPrefix::LineItemDate.as_bytes())?;
        let items: Vec<LineItem> = self.scan(KeyPrefix::LineItem.as_bytes())?;

        let max = |ids: Vec<u64>| ids.into_iter().max().unwrap_or(0);
        let seq = &self.sequences;
        IdSequences::resume(&seq.company, max(companies.iter().map(|c| c.id.0).collect()));
        IdSequences::resume(&seq.user, max(users.iter().map(|u| u.id.0).collect()));
        IdSequences::resume(&seq.quote, max(quotes.iter().map(|q| q.id.0).collect()));
        IdSequences::resume(&seq.line_item_date, max(dates.iter().map(|d| d.id.0).collect()));
        IdSequences::resume(&seq.line_item, max(items.iter().map(|i| i.id.0).collect()));

        debug!(
            companies = companies.len(),
            quotes = quotes.len(),
            line_item_dates = dates.len(),
            line_items = items.len(),
            "Recovered id sequences"
        );
        Ok(())
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    /// Serialize writes for `company_id`.
    pub(crate) fn tenant_lock(&self, company_id: CompanyId) -> Arc<Mutex<()>> {
        self.tenant_locks
            .entry(company_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Forget a destroyed company's lock. Ids are never reused, so a writer
    /// still queued on the old lock fails its company lookup.
    pub(crate) fn release_tenant_lock(&self, company_id: CompanyId) {
        self.tenant_locks.remove(&company_id);
    }

    pub(crate) fn read<T: DeserializeOwned>(&self, key: &[u8]) -> QuoteResult<Option<T>> {
        let bytes = self.kv_store.read().get(key)?;
        bytes.map(|bytes| decode(&bytes)).transpose()
    }

    /// Decode every record under `prefix`, in key order.
    pub(crate) fn scan<T: DeserializeOwned>(&self, prefix: &[u8]) -> QuoteResult<Vec<T>> {
        let entries = self.kv_store.read().prefix_scan(prefix)?;
        decode_all(&entries)
    }

    /// Keys under `prefix`, in key order.
    pub(crate) fn scan_keys(&self, prefix: &[u8]) -> QuoteResult<Vec<Vec<u8>>> {
        let entries = self.kv_store.read().prefix_scan(prefix)?;
        Ok(entries.into_iter().map(|(key, _)| key).collect())
    }

    pub(crate) fn encode<T: Serialize>(value: &T) -> QuoteResult<Vec<u8>> {
        serde_json::to_vec(value).map_err(codec_error)
    }

    /// Apply `operations` as one batch. A failed `PutIfAbsent` becomes
    /// `on_conflict()`.
    pub(crate) fn commit(
        &self,
        operations: Vec<BatchOperation>,
        on_conflict: impl FnOnce() -> QuoteError,
    ) -> QuoteResult<()> {
        let count = operations.len();
        match self.kv_store.write().atomic_batch_write(operations) {
            Ok(()) => {
                debug!(operations = count, "Batch committed");
                Ok(())
            }
            Err(KVStoreError::KeyExists { .. }) => Err(on_conflict()),
            Err(err) => Err(err.into()),
        }
    }

    pub(crate) fn now(&self) -> Timestamp {
        self.time_source.now()
    }
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> QuoteResult<T> {
    serde_json::from_slice(bytes).map_err(codec_error)
}

pub(crate) fn decode_all<T: DeserializeOwned>(entries: &ScanResult) -> QuoteResult<Vec<T>> {
    entries.iter().map(|(_, value)| decode(value)).collect()
}

/// Conflict handler for batches without conditional puts.
pub(crate) fn no_conflict() -> QuoteError {
    QuoteError::Storage("unexpected key conflict".to_string())
}
