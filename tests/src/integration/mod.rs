//! # Integration Tests
//!
//! Full write and read paths wired the way the runtime wires them.

pub mod broadcast;
pub mod flows;
