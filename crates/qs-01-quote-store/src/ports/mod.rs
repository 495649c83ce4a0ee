//! # Ports Layer
//!
//! - `inbound` - APIs the store exposes (driving ports)
//! - `outbound` - Substrate and clock it needs (driven ports)

pub mod inbound;
pub mod outbound;
