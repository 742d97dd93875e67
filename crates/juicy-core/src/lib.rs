//! # juicy-core
//! Foundation types and traits for the Juicy ledger.

pub mod address;
pub mod amount;
pub mod constants;
pub mod error;
pub mod traits;
pub mod types;
