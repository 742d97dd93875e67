//! # juicy-accrual — Supply-capped balance accrual.
//!
//! All calculations use integer arithmetic only for determinism.
//!
//! This crate implements the accrual side of the ledger:
//! - **Multiplier decay**: the global annual growth multiplier falls linearly
//!   from its initial value to 1.0× as realized rewards consume the pool
//!   between initial and maximum supply.
//! - **Continuous compounding**: a wallet's pending balance is
//!   `principal * multiplier^(elapsed / year)`, evaluated with fixed-point
//!   `ln`/`exp` series.
//! - **Pool clamp**: realizable accrual never exceeds what is left of the pool.

pub mod engine;
pub mod fixed;
pub mod multiplier;

pub use engine::AccrualEngine;
pub use fixed::{growth_factor, mul_div};
pub use multiplier::decayed_multiplier;
