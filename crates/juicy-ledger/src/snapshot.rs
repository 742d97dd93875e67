//! Ledger snapshots.
//!
//! A [`LedgerSnapshot`] holds everything needed to rebuild a [`Ledger`]:
//! genesis parameters, cached totals, account records and allowances.
//! The event journal and the injected classifier/clock are not part of it.
//!
//! Records are sorted by address so equal ledgers produce equal bytes.

use std::collections::HashMap;
use std::sync::Arc;

use juicy_accrual::AccrualEngine;
use juicy_core::address::Address;
use juicy_core::amount::Amount;
use juicy_core::error::SnapshotError;
use juicy_core::traits::{AccountClassifier, Clock};
use juicy_core::types::Account;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LedgerConfig;
use crate::ledger::{GlobalState, Ledger};

#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize,
    bincode::Encode, bincode::Decode,
)]
pub struct LedgerSnapshot {
    pub config: LedgerConfig,
    pub state: GlobalState,
    pub accounts: Vec<(Address, Account)>,
    /// `(owner, spender, amount)`
    pub allowances: Vec<(Address, Address, Amount)>,
}

impl LedgerSnapshot {
    /// Encode with the standard bincode configuration.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let (snapshot, _) = bincode::decode_from_slice(bytes, bincode::config::standard())
            .map_err(|e| SnapshotError::Decode(e.to_string()))?;
        Ok(snapshot)
    }
}

impl Ledger {
    /// Capture the current ledger state.
    pub fn snapshot(&self) -> LedgerSnapshot {
        let mut accounts: Vec<(Address, Account)> =
            self.accounts.iter().map(|(a, acct)| (*a, *acct)).collect();
        accounts.sort_by_key(|(a, _)| *a);

        let mut allowances: Vec<(Address, Address, Amount)> = self
            .allowances
            .iter()
            .map(|((owner, spender), amount)| (*owner, *spender, *amount))
            .collect();
        allowances.sort_by_key(|(owner, spender, _)| (*owner, *spender));

        LedgerSnapshot {
            config: self.config.clone(),
            state: self.state,
            accounts,
            allowances,
        }
    }

    /// Rebuild a ledger from a snapshot.
    ///
    /// The configuration is re-validated and the totals re-audited against
    /// the account records before the ledger is returned.
    ///
    /// # Errors
    ///
    /// - [`SnapshotError::Config`] for invalid genesis parameters
    /// - [`SnapshotError::DuplicateAccount`] if an address appears twice
    /// - [`SnapshotError::Invariant`] if the totals do not reconcile
    pub fn restore(
        snapshot: LedgerSnapshot,
        classifier: Arc<dyn AccountClassifier>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, SnapshotError> {
        let LedgerSnapshot {
            config,
            state,
            accounts: records,
            allowances: approvals,
        } = snapshot;

        config.validate()?;
        let engine = AccrualEngine::new(
            config.initial_supply,
            config.maximum_total_supply,
            config.initial_multiplier,
        )?;

        let mut accounts = HashMap::with_capacity(records.len());
        for (address, account) in records {
            if accounts.insert(address, account).is_some() {
                return Err(SnapshotError::DuplicateAccount(address));
            }
        }
        let allowances: HashMap<(Address, Address), Amount> = approvals
            .into_iter()
            .map(|(owner, spender, amount)| ((owner, spender), amount))
            .collect();

        let ledger =
            Ledger::from_parts(config, engine, state, accounts, allowances, classifier, clock);
        ledger.audit()?;
        debug!(accounts = ledger.account_count(), "ledger restored from snapshot");
        Ok(ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use juicy_core::amount::tokens;
    use juicy_core::constants::SECONDS_PER_YEAR;
    use juicy_core::error::{ConfigError, InvariantViolation};

    use crate::classifier::NoCode;
    use crate::clock::ManualClock;

    fn busy_ledger() -> (Ledger, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000));
        let mut ledger = Ledger::genesis(
            LedgerConfig::default(),
            Address::from_seed(1),
            Arc::new(NoCode),
            clock.clone(),
        )
        .unwrap();
        clock.advance(SECONDS_PER_YEAR);
        ledger
            .transfer(Address::from_seed(1), Address::from_seed(2), tokens(300))
            .unwrap();
        ledger
            .approve(Address::from_seed(2), Address::from_seed(3), tokens(5))
            .unwrap();
        (ledger, clock)
    }

    #[test]
    fn restore_reproduces_ledger() {
        let (ledger, clock) = busy_ledger();
        let snap = ledger.snapshot();
        let restored = Ledger::restore(snap.clone(), Arc::new(NoCode), clock).unwrap();

        assert_eq!(restored.snapshot(), snap);
        assert_eq!(restored.total_supply(), ledger.total_supply());
        assert_eq!(restored.current_multiplier(), ledger.current_multiplier());
        assert_eq!(
            restored.allowance(&Address::from_seed(2), &Address::from_seed(3)),
            tokens(5)
        );
        assert!(restored.events().is_empty());
    }

    #[test]
    fn bincode_bytes_decode_to_same_snapshot() {
        let (ledger, _) = busy_ledger();
        let snap = ledger.snapshot();
        let bytes = snap.to_bytes().unwrap();
        assert_eq!(LedgerSnapshot::from_bytes(&bytes).unwrap(), snap);
    }

    #[test]
    fn json_form_is_readable() {
        let (ledger, _) = busy_ledger();
        let json = serde_json::to_string(&ledger.snapshot()).unwrap();
        assert!(json.contains("\"symbol\":\"JUICY\""));
        assert!(json.contains(&Address::from_seed(2).to_string()));
        let back: LedgerSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ledger.snapshot());
    }

    #[test]
    fn truncated_bytes_fail_to_decode() {
        let (ledger, _) = busy_ledger();
        let bytes = ledger.snapshot().to_bytes().unwrap();
        assert!(matches!(
            LedgerSnapshot::from_bytes(&bytes[..bytes.len() / 2]),
            Err(SnapshotError::Decode(_))
        ));
    }

    #[test]
    fn restore_rejects_tampered_balance() {
        let (ledger, clock) = busy_ledger();
        let mut snap = ledger.snapshot();
        snap.accounts[0].1.principal += 1;
        assert!(matches!(
            Ledger::restore(snap, Arc::new(NoCode), clock),
            Err(SnapshotError::Invariant(InvariantViolation::TotalSupplyDrift { .. }))
        ));
    }

    #[test]
    fn restore_rejects_duplicate_account() {
        let (ledger, clock) = busy_ledger();
        let mut snap = ledger.snapshot();
        let dup = snap.accounts[0];
        snap.accounts.push(dup);
        assert_eq!(
            Ledger::restore(snap, Arc::new(NoCode), clock).unwrap_err(),
            SnapshotError::DuplicateAccount(dup.0)
        );
    }

    #[test]
    fn restore_rejects_invalid_config() {
        let (ledger, clock) = busy_ledger();
        let mut snap = ledger.snapshot();
        snap.config.initial_multiplier = 5_000;
        assert_eq!(
            Ledger::restore(snap, Arc::new(NoCode), clock).unwrap_err(),
            SnapshotError::Config(ConfigError::MultiplierBelowUnity(5_000))
        );
    }
}
