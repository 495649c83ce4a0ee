//! # Quote List
//!
//! The live quote index of one company, kept current from broadcaster
//! events the way a browser tab viewing the index would:
//!
//! | Event | Effect |
//! |-------|--------|
//! | `QuoteCreated` | insert at the top |
//! | `QuoteUpdated` | replace in place |
//! | `QuoteDestroyed` | remove |
//!
//! A create for a quote already listed and an update for a quote not listed
//! are ignored. That makes it safe to subscribe before rendering from the
//! store and then replay whatever queued up meanwhile.

use std::sync::Arc;

use parking_lot::RwLock;
use qs_01_quote_store::QuoteHierarchyApi;
use shared_bus::{BroadcastMessage, LiveSession, QuoteEvent};
use shared_types::entities::{CompanyId, Quote};
use shared_types::errors::QuoteResult;
use shared_types::security::TenantScope;
use tokio::sync::watch;
use tracing::{debug, info};

/// Newest-first list of a company's quotes.
#[derive(Debug, Clone)]
pub struct QuoteListView {
    company_id: CompanyId,
    quotes: Vec<Quote>,
    last_sequence: Option<u64>,
}

impl QuoteListView {
    pub fn new(company_id: CompanyId) -> Self {
        Self {
            company_id,
            quotes: Vec::new(),
            last_sequence: None,
        }
    }

    /// Initial render from the store.
    pub fn load<S: QuoteHierarchyApi>(store: &S, scope: TenantScope) -> QuoteResult<Self> {
        Ok(Self {
            company_id: scope.company_id(),
            quotes: store.list_quotes(scope)?,
            last_sequence: None,
        })
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Sequence number of the last message applied.
    pub fn last_sequence(&self) -> Option<u64> {
        self.last_sequence
    }

    /// Apply a broadcast message. Messages for another company are ignored.
    ///
    /// Returns `true` if the list changed.
    pub fn apply(&mut self, message: &BroadcastMessage) -> bool {
        if message.channel.company_id() != self.company_id {
            return false;
        }
        self.last_sequence = Some(message.sequence);
        self.apply_event(&message.event)
    }

    /// Returns `true` if the list changed.
    pub fn apply_event(&mut self, event: &QuoteEvent) -> bool {
        match event {
            QuoteEvent::QuoteCreated(quote) => {
                if self.position(quote).is_some() {
                    return false;
                }
                self.quotes.insert(0, quote.clone());
                true
            }
            QuoteEvent::QuoteUpdated(quote) => match self.position(quote) {
                Some(index) => {
                    self.quotes[index] = quote.clone();
                    true
                }
                None => false,
            },
            QuoteEvent::QuoteDestroyed(quote_id) => {
                let before = self.quotes.len();
                self.quotes.retain(|q| q.id != *quote_id);
                self.quotes.len() != before
            }
        }
    }

    fn position(&self, quote: &Quote) -> Option<usize> {
        self.quotes.iter().position(|q| q.id == quote.id)
    }
}

/// Drives a shared `QuoteListView` from a live session.
pub struct QuoteListHandler {
    view: Arc<RwLock<QuoteListView>>,
    session: LiveSession,
}

impl QuoteListHandler {
    pub fn new(view: Arc<RwLock<QuoteListView>>, session: LiveSession) -> Self {
        Self { view, session }
    }

    /// Render from the store through an already-open `session`, then apply
    /// the messages queued on it since it was opened.
    ///
    /// The session must be opened before calling this. A quote committed
    /// after the snapshot is then still delivered, and one committed before
    /// it is already listed.
    pub fn follow<S: QuoteHierarchyApi>(
        store: &S,
        scope: TenantScope,
        mut session: LiveSession,
    ) -> QuoteResult<Self> {
        let mut view = QuoteListView::load(store, scope)?;
        let mut replayed = 0;
        while let Ok(Some(message)) = session.try_recv() {
            view.apply(&message);
            replayed += 1;
        }
        debug!(channel = %session.channel(), quotes = view.len(), replayed, "Quote list loaded");
        Ok(Self::new(Arc::new(RwLock::new(view)), session))
    }

    /// The view this handler keeps current.
    pub fn view(&self) -> Arc<RwLock<QuoteListView>> {
        Arc::clone(&self.view)
    }

    /// Apply messages until shutdown is signalled or the session closes.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!(channel = %self.session.channel(), "Quote list handler started");
        loop {
            tokio::select! {
                message = self.session.recv() => {
                    let Some(message) = message else { break };
                    let changed = self.view.write().apply(&message);
                    debug!(
                        channel = %message.channel,
                        sequence = message.sequence,
                        kind = message.event.kind().as_str(),
                        changed,
                        "Quote list event"
                    );
                }
                _ = shutdown.changed() => {
                    info!(channel = %self.session.channel(), "Shutdown signal received");
                    break;
                }
            }
        }
    }
}
