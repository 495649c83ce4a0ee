//! # Substrate Errors
//!
//! Errors raised by the key-value substrate, and their mapping onto the
//! workspace-wide `QuoteError`.

use shared_types::errors::QuoteError;
use thiserror::Error;

/// Key-value store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    IOError { message: String },

    /// Data corruption in the store.
    #[error("KV store corruption: {message}")]
    CorruptionError { message: String },

    /// A `PutIfAbsent` found its key already present. Nothing was written.
    #[error("Key already exists: {}", String::from_utf8_lossy(.key))]
    KeyExists { key: Vec<u8> },
}

impl From<KVStoreError> for QuoteError {
    fn from(err: KVStoreError) -> Self {
        QuoteError::Storage(err.to_string())
    }
}

/// Record codec failure, reported as a storage error.
pub(crate) fn codec_error(err: serde_json::Error) -> QuoteError {
    QuoteError::Storage(format!("record codec: {err}"))
}
