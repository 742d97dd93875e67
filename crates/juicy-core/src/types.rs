//! Ledger record types: account classification, account records, events.
//!
//! All monetary values are in base units (1 JUICY = 10^18 base units).
//! Timestamps are unix seconds.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::amount::Amount;

/// Accrual eligibility of an address.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default,
    bincode::Encode, bincode::Decode,
)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    /// Externally controlled address. Accrues over elapsed time.
    #[default]
    Wallet,
    /// Address with deployed code. Never accrues.
    Contract,
}

impl AccountKind {
    pub fn accrues(&self) -> bool {
        matches!(self, Self::Wallet)
    }
}

/// Stored state of one address.
///
/// Created lazily on first credit and never removed; a zero-principal record
/// is inert.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default,
    bincode::Encode, bincode::Decode,
)]
pub struct Account {
    /// Last checkpointed balance, excluding unrealized accrual.
    pub principal: Amount,
    /// Timestamp at which `principal` was last realized.
    pub last_checkpoint: u64,
    /// Classification observed at the last touch.
    pub kind: AccountKind,
}

impl Account {
    /// A fresh zero-principal record checkpointed at `now`.
    pub fn empty(kind: AccountKind, now: u64) -> Self {
        Self {
            principal: 0,
            last_checkpoint: now,
            kind,
        }
    }

    /// Seconds of accrual since the last checkpoint. A clock that reads
    /// earlier than the checkpoint yields zero.
    pub fn elapsed(&self, now: u64) -> u64 {
        now.saturating_sub(self.last_checkpoint)
    }
}

/// Observable ledger event, journaled in commit order.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// Principal moved between accounts. Genesis minting uses `from = ZERO`.
    Transfer {
        from: Address,
        to: Address,
        amount: Amount,
    },
    /// An allowance was set.
    Approval {
        owner: Address,
        spender: Address,
        amount: Amount,
    },
    /// Pending accrual was realized into principal.
    RewardsRealized { account: Address, amount: Amount },
}

/// Outcome of a committed transfer.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TransferReceipt {
    /// Accrual realized into the sender's principal.
    pub realized_from: Amount,
    /// Accrual realized into the recipient's principal.
    pub realized_to: Amount,
    /// Multiplier in effect before the transfer.
    pub multiplier_before: u64,
    /// Multiplier re-derived after realization.
    pub multiplier_after: u64,
}

impl TransferReceipt {
    pub fn total_realized(&self) -> Amount {
        self.realized_from + self.realized_to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_wallets_accrue() {
        assert!(AccountKind::Wallet.accrues());
        assert!(!AccountKind::Contract.accrues());
        assert_eq!(AccountKind::default(), AccountKind::Wallet);
    }

    #[test]
    fn empty_account_is_checkpointed_now() {
        let acct = Account::empty(AccountKind::Contract, 42);
        assert_eq!(acct.principal, 0);
        assert_eq!(acct.last_checkpoint, 42);
        assert_eq!(acct.kind, AccountKind::Contract);
    }

    #[test]
    fn elapsed_never_negative() {
        let acct = Account::empty(AccountKind::Wallet, 100);
        assert_eq!(acct.elapsed(150), 50);
        assert_eq!(acct.elapsed(100), 0);
        assert_eq!(acct.elapsed(10), 0);
    }

    #[test]
    fn event_json_is_tagged() {
        let ev = LedgerEvent::RewardsRealized {
            account: Address::from_seed(1),
            amount: 5,
        };
        let json = serde_json::to_string(&ev).unwrap();
        assert!(json.contains("\"type\":\"rewards_realized\""), "{json}");
    }

    #[test]
    fn receipt_total() {
        let r = TransferReceipt {
            realized_from: 3,
            realized_to: 4,
            ..TransferReceipt::default()
        };
        assert_eq!(r.total_realized(), 7);
    }
}
