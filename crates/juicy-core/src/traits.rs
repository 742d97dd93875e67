//! Trait interfaces for the Juicy ledger.
//!
//! These traits define the seams between crates:
//! - [`AccountClassifier`]: "does this address have deployed code" capability
//! - [`Clock`]: source of the current timestamp
//! - [`AccrualCalculator`]: multiplier decay and pending-balance math (juicy-accrual implements)

use crate::address::Address;
use crate::amount::Amount;
use crate::error::MathError;
use crate::types::{Account, AccountKind};

/// Decides whether an address accrues.
///
/// The underlying code-detection mechanism is host specific, so the ledger
/// only sees this capability query. It is consulted at every touch and never
/// cached permanently: an address that gains code stops accruing from that
/// point forward.
pub trait AccountClassifier: Send + Sync {
    /// Whether executable code is deployed at `address` right now.
    fn has_code(&self, address: &Address) -> bool;

    /// Classification derived from [`has_code`](Self::has_code).
    fn classify(&self, address: &Address) -> AccountKind {
        if self.has_code(address) {
            AccountKind::Contract
        } else {
            AccountKind::Wallet
        }
    }
}

/// Source of the current time in unix seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

/// Accrual math over integer fixed-point amounts.
///
/// Multipliers are scaled by `BPS_PRECISION` (10_000 = 1.0×) and express the
/// annual growth factor: 15_000 grows a balance by 50% over a year if held
/// constant.
pub trait AccrualCalculator: Send + Sync {
    /// Current multiplier after `distributed` base units of accrual have been
    /// realized since genesis. Non-increasing in `distributed`.
    fn multiplier(&self, distributed: Amount) -> u64;

    /// Size of the distributable pool (`maximum - initial` supply).
    fn pool(&self) -> Amount;

    /// Unclamped accrual on `principal` held for `elapsed` seconds at
    /// `multiplier`. Truncates toward zero.
    fn compute_gain(
        &self,
        principal: Amount,
        elapsed: u64,
        multiplier: u64,
    ) -> Result<Amount, MathError>;

    /// Undistributed remainder of the pool.
    ///
    /// Default implementation: `pool() - distributed`, floored at zero.
    fn remaining_pool(&self, distributed: Amount) -> Amount {
        self.pool().saturating_sub(distributed)
    }

    /// Accrual an account would realize if touched at `now`, bounded by what
    /// is left of the pool. Zero unless both the stored kind and the live
    /// `kind` accrue.
    ///
    /// Default implementation clamps [`compute_gain`](Self::compute_gain) to
    /// `remaining_pool`.
    fn realizable_gain(
        &self,
        account: &Account,
        kind: AccountKind,
        now: u64,
        multiplier: u64,
        remaining_pool: Amount,
    ) -> Result<Amount, MathError> {
        if !kind.accrues() || !account.kind.accrues() || remaining_pool == 0 {
            return Ok(0);
        }
        let gain = self.compute_gain(account.principal, account.elapsed(now), multiplier)?;
        Ok(gain.min(remaining_pool))
    }

    /// Projected effective balance: principal plus realizable gain.
    fn pending_balance(
        &self,
        account: &Account,
        kind: AccountKind,
        now: u64,
        multiplier: u64,
        remaining_pool: Amount,
    ) -> Result<Amount, MathError> {
        let gain = self.realizable_gain(account, kind, now, multiplier, remaining_pool)?;
        account
            .principal
            .checked_add(gain)
            .ok_or(MathError::ArithmeticOverflow)
    }
}
