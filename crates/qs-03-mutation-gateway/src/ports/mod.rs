//! # Ports Layer
//!
//! - `inbound` - The write API offered to the presentation layer
//! - `outbound` - Where committed changes are reported

pub mod inbound;
pub mod outbound;
