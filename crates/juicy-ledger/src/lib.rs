//! Accruing token ledger for Juicy.
//!
//! [`Ledger`] owns the global totals and account records and is the only
//! writer of either. Every transfer realizes pending accrual on both sides
//! before moving principal, then re-derives the shared multiplier.
//!
//! Code detection and time are injected through the
//! [`AccountClassifier`](juicy_core::traits::AccountClassifier) and
//! [`Clock`](juicy_core::traits::Clock) traits.

pub mod audit;
pub mod classifier;
pub mod clock;
pub mod config;
pub mod holder;
pub mod ledger;
pub mod snapshot;

pub use classifier::{CodeRegistry, NoCode};
pub use clock::{ManualClock, SystemClock};
pub use config::LedgerConfig;
pub use holder::ProgrammaticHolder;
pub use ledger::{GlobalState, Ledger};
pub use snapshot::LedgerSnapshot;
