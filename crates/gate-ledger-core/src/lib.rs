//! Gate Ledger Core Library
//!
//! This crate provides the types, normalization rules, token issuance and
//! the in-memory ledger behind the market hub gate terminal.
//!
//! # Modules
//!
//! - [`types`]: Record types (GateRecord, VehicleClass, RecordStatus, etc.)
//! - [`normalize`]: Plate and token-input normalization
//! - [`token`]: Token and record-id generation
//! - [`fees`]: Fee table and regular-visitor rule
//! - [`visits`]: Per-plate visit registry
//! - [`ledger`]: The gate ledger (check-in, verify-and-exit, manual exit)
//! - [`occupancy`]: Derived lot occupancy
//! - [`chit`]: Printable chit rendering
//! - [`clock`]: Time source abstraction
//! - [`error`]: Error types

pub mod chit;
pub mod clock;
pub mod error;
pub mod fees;
pub mod ledger;
pub mod normalize;
pub mod occupancy;
pub mod token;
pub mod types;
pub mod visits;

#[cfg(test)]
mod test_vectors;

pub use error::{Error, Result};
pub use ledger::{GateLedger, LedgerConfig};
pub use types::*;
