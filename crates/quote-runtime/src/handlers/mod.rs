//! # Event Handlers
//!
//! Consumers of broadcaster events running inside the runtime.

pub mod quote_list;

pub use quote_list::{QuoteListHandler, QuoteListView};
