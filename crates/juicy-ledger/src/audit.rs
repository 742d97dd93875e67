//! Ledger reconciliation.
//!
//! Recomputes the cached totals from the account records and checks them
//! against [`GlobalState`]. The transfer path keeps the totals incrementally;
//! this is the independent cross-check used by tests, debug builds and
//! snapshot restore.

use juicy_core::amount::Amount;
use juicy_core::constants::BPS_PRECISION;
use juicy_core::error::InvariantViolation;
use juicy_core::traits::AccrualCalculator;
use juicy_core::types::Account;

use crate::config::LedgerConfig;
use crate::ledger::{GlobalState, Ledger};

/// Check `state` against `accounts` and the genesis parameters.
///
/// Sums saturate, so an overflowing sum reports as drift rather than
/// panicking.
pub fn reconcile<'a>(
    config: &LedgerConfig,
    state: &GlobalState,
    accounts: impl IntoIterator<Item = &'a Account>,
    multiplier: u64,
) -> Result<(), InvariantViolation> {
    if state.total_supply > config.maximum_total_supply {
        return Err(InvariantViolation::SupplyAboveCap {
            total: state.total_supply,
            maximum: config.maximum_total_supply,
        });
    }

    let (total, wallets) = accounts
        .into_iter()
        .fold((0 as Amount, 0 as Amount), |(total, wallets), a| {
            let wallets = if a.kind.accrues() {
                wallets.saturating_add(a.principal)
            } else {
                wallets
            };
            (total.saturating_add(a.principal), wallets)
        });

    if total != state.total_supply {
        return Err(InvariantViolation::TotalSupplyDrift {
            cached: state.total_supply,
            actual: total,
        });
    }
    if wallets != state.wallet_balances_sum {
        return Err(InvariantViolation::WalletSumDrift {
            cached: state.wallet_balances_sum,
            actual: wallets,
        });
    }

    let pool = config.pool();
    if state.distributed_rewards > pool {
        return Err(InvariantViolation::RewardsAbovePool {
            distributed: state.distributed_rewards,
            pool,
        });
    }
    if config.initial_supply.checked_add(state.distributed_rewards) != Some(state.total_supply) {
        return Err(InvariantViolation::RewardsDrift {
            total: state.total_supply,
            initial: config.initial_supply,
            distributed: state.distributed_rewards,
        });
    }

    if multiplier < BPS_PRECISION || multiplier > config.initial_multiplier {
        return Err(InvariantViolation::MultiplierOutOfRange(multiplier));
    }
    Ok(())
}

impl Ledger {
    /// Recompute every ledger invariant from the account records.
    pub fn audit(&self) -> Result<(), InvariantViolation> {
        reconcile(
            &self.config,
            &self.state,
            self.accounts.values(),
            self.engine.multiplier(self.state.distributed_rewards),
        )
    }
}
