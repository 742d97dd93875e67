//! Shared test helpers for scenario and property tests.

use std::sync::Arc;

use juicy_core::address::Address;
use juicy_core::amount::Amount;
use juicy_core::error::LedgerError;
use juicy_core::types::TransferReceipt;
use juicy_ledger::{CodeRegistry, Ledger, LedgerConfig, ManualClock, ProgrammaticHolder};

/// Genesis timestamp used by every harness.
pub const GENESIS_TIME: u64 = 1_700_000_000;

/// Deterministic address from a seed byte.
pub fn addr(seed: u8) -> Address {
    Address::from_seed(seed)
}

/// The creator address used by [`Harness::new`].
pub fn owner() -> Address {
    addr(0x01)
}

/// A ledger wired to a manual clock and a code registry.
pub struct Harness {
    pub ledger: Ledger,
    pub clock: Arc<ManualClock>,
    pub registry: Arc<CodeRegistry>,
}

impl Harness {
    /// Genesis with `config`, crediting [`owner`] at [`GENESIS_TIME`].
    pub fn new(config: LedgerConfig) -> Self {
        let clock = Arc::new(ManualClock::new(GENESIS_TIME));
        let registry = Arc::new(CodeRegistry::new());
        let ledger = Ledger::genesis(config, owner(), registry.clone(), clock.clone())
            .expect("genesis");
        Self {
            ledger,
            clock,
            registry,
        }
    }

    /// Mainnet preset parameters.
    pub fn mainnet() -> Self {
        Self::new(LedgerConfig::default())
    }

    pub fn advance(&self, seconds: u64) {
        self.clock.advance(seconds);
    }

    pub fn deploy_holder(&self, seed: u8) -> ProgrammaticHolder {
        ProgrammaticHolder::deploy(addr(seed), &self.registry)
    }

    /// Transfer and then check every cached total against a recomputation.
    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<TransferReceipt, LedgerError> {
        let result = self.ledger.transfer(from, to, amount);
        assert_reconciled(&self.ledger);
        result
    }
}

/// Sum of every stored principal.
pub fn principal_sum(ledger: &Ledger) -> Amount {
    ledger.accounts().map(|(_, a)| a.principal).sum()
}

/// Sum of stored principal on wallet-classified records.
pub fn wallet_principal_sum(ledger: &Ledger) -> Amount {
    ledger
        .accounts()
        .filter(|(_, a)| a.kind.accrues())
        .map(|(_, a)| a.principal)
        .sum()
}

/// Panic with details unless the cached totals match the account records.
pub fn assert_reconciled(ledger: &Ledger) {
    assert_eq!(
        ledger.total_supply(),
        principal_sum(ledger),
        "total supply drifted from the sum of principals"
    );
    assert_eq!(
        ledger.wallet_balances_sum(),
        wallet_principal_sum(ledger),
        "wallet balances sum drifted from the sum of wallet principals"
    );
    assert!(ledger.total_supply() <= ledger.maximum_total_supply());
    assert_eq!(
        ledger.total_supply(),
        ledger.initial_supply() + ledger.distributed_rewards()
    );
    if let Err(e) = ledger.audit() {
        panic!("audit failed: {e}");
    }
}

/// `|a - b| <= tolerance`.
pub fn close_to(a: Amount, b: Amount, tolerance: Amount) -> bool {
    a.abs_diff(b) <= tolerance
}
