//! Trade Journal Core - Domain entities, services, and traits.
//!
//! This crate contains the trade ledger models and the P&L aggregation
//! engine. It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod pnl;
pub mod trades;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
