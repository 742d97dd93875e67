//! Integration test suite for the Juicy ledger.
//!
//! Scenario tests drive a ledger through simulated years of activity and
//! check the cached totals against independently recomputed sums after
//! every step. Property tests do the same under random operation sequences.

pub mod helpers;
