//! # Domain Layer

pub mod outcome;

pub use outcome::{notice, GatewayResult, Mutation, MutationAction, Rejected};
