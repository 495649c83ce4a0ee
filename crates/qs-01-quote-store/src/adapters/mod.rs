//! # Adapters
//!
//! In-process implementations of the outbound ports.

pub mod memory;
pub mod time;

pub use memory::InMemoryKVStore;
pub use time::{ManualTimeSource, SystemTimeSource};
