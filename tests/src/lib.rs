//! # Quote-Stream Test Suite
//!
//! Unified test crate for behavior that spans crates.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/
//! │   ├── flows.rs      # Store + pricing: tenancy, cascades, totals
//! │   └── broadcast.rs  # Gateway + broadcaster: live quote lists
//! └── benches/          # Criterion benchmarks
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p qs-tests
//! cargo test -p qs-tests integration::broadcast
//! cargo bench -p qs-tests
//! ```

pub mod integration;
