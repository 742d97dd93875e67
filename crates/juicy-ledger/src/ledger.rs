//! The accruing ledger.
//!
//! Holds the global totals and every account record. Mutations go through
//! [`Ledger::transfer`] (and [`Ledger::transfer_from`], which wraps it),
//! which runs the realization pipeline:
//!
//! 1. Settle the sender: fold its realizable accrual into principal.
//! 2. Settle the recipient the same way, bounded by what the sender's
//!    realization left of the pool.
//! 3. Check the sender's settled principal covers the amount.
//! 4. Move principal, adjust the cached totals, commit.
//!
//! Steps 1 to 3 only read ledger state. Nothing is written until every check
//! has passed, so a failed transfer leaves the ledger exactly as it was.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use juicy_accrual::AccrualEngine;
use juicy_core::address::Address;
use juicy_core::amount::{Amount, format_amount};
use juicy_core::constants::DECIMALS;
use juicy_core::error::{ConfigError, LedgerError, MathError};
use juicy_core::traits::{AccountClassifier, AccrualCalculator, Clock};
use juicy_core::types::{Account, AccountKind, LedgerEvent, TransferReceipt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::LedgerConfig;

/// Cached ledger-wide totals.
///
/// `current_multiplier` is not stored; it is derived from
/// `distributed_rewards` on demand.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
    bincode::Encode, bincode::Decode,
)]
pub struct GlobalState {
    /// Sum of all realized principal.
    pub total_supply: Amount,
    /// Sum of realized principal held by wallet-classified accounts.
    pub wallet_balances_sum: Amount,
    /// Accrual realized into principal since genesis.
    pub distributed_rewards: Amount,
}

/// One side of a transfer, settled but not yet committed.
#[derive(Debug, Clone, Copy)]
struct Settlement {
    previous: Option<Account>,
    account: Account,
    realized: Amount,
}

impl Settlement {
    /// Contribution of this account to `wallet_balances_sum` before the touch.
    fn previous_wallet_principal(&self) -> Amount {
        match self.previous {
            Some(a) if a.kind.accrues() => a.principal,
            _ => 0,
        }
    }

    /// Contribution after the touch.
    fn wallet_principal(&self) -> Amount {
        if self.account.kind.accrues() {
            self.account.principal
        } else {
            0
        }
    }
}

/// The token ledger.
pub struct Ledger {
    pub(crate) config: LedgerConfig,
    pub(crate) engine: AccrualEngine,
    pub(crate) state: GlobalState,
    pub(crate) accounts: HashMap<Address, Account>,
    pub(crate) allowances: HashMap<(Address, Address), Amount>,
    events: Vec<LedgerEvent>,
    classifier: Arc<dyn AccountClassifier>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("symbol", &self.config.symbol)
            .field("state", &self.state)
            .field("accounts", &self.accounts.len())
            .finish_non_exhaustive()
    }
}

impl Ledger {
    /// Create a ledger and credit the whole initial supply to `creator`.
    ///
    /// The creator starts wallet-classified with its checkpoint at the
    /// clock's current time.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidCreator`] if `creator` is the zero address
    /// - Any [`LedgerConfig::validate`] failure
    pub fn genesis(
        config: LedgerConfig,
        creator: Address,
        classifier: Arc<dyn AccountClassifier>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        if creator.is_zero() {
            return Err(ConfigError::InvalidCreator);
        }
        config.validate()?;
        let engine = AccrualEngine::new(
            config.initial_supply,
            config.maximum_total_supply,
            config.initial_multiplier,
        )?;

        let now = clock.now();
        let supply = config.initial_supply;
        let mut accounts = HashMap::new();
        accounts.insert(
            creator,
            Account {
                principal: supply,
                last_checkpoint: now,
                kind: AccountKind::Wallet,
            },
        );

        info!(
            symbol = %config.symbol,
            %creator,
            initial_supply = %format_amount(supply),
            maximum_total_supply = %format_amount(config.maximum_total_supply),
            initial_multiplier = config.initial_multiplier,
            "genesis"
        );

        Ok(Self {
            engine,
            state: GlobalState {
                total_supply: supply,
                wallet_balances_sum: supply,
                distributed_rewards: 0,
            },
            accounts,
            allowances: HashMap::new(),
            events: vec![LedgerEvent::Transfer {
                from: Address::ZERO,
                to: creator,
                amount: supply,
            }],
            config,
            classifier,
            clock,
        })
    }

    /// Reassemble a ledger from already-validated parts. Used by snapshot
    /// restore, which audits the result.
    pub(crate) fn from_parts(
        config: LedgerConfig,
        engine: AccrualEngine,
        state: GlobalState,
        accounts: HashMap<Address, Account>,
        allowances: HashMap<(Address, Address), Amount>,
        classifier: Arc<dyn AccountClassifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            engine,
            state,
            accounts,
            allowances,
            events: Vec::new(),
            classifier,
            clock,
        }
    }

    // --- metadata ---

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn symbol(&self) -> &str {
        &self.config.symbol
    }

    pub fn decimals(&self) -> u8 {
        DECIMALS
    }

    pub fn initial_supply(&self) -> Amount {
        self.config.initial_supply
    }

    pub fn maximum_total_supply(&self) -> Amount {
        self.config.maximum_total_supply
    }

    pub fn initial_multiplier(&self) -> u64 {
        self.config.initial_multiplier
    }

    // --- queries ---

    /// Current time according to the injected clock.
    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    pub fn state(&self) -> GlobalState {
        self.state
    }

    pub fn total_supply(&self) -> Amount {
        self.state.total_supply
    }

    pub fn wallet_balances_sum(&self) -> Amount {
        self.state.wallet_balances_sum
    }

    pub fn distributed_rewards(&self) -> Amount {
        self.state.distributed_rewards
    }

    /// Multiplier derived from the rewards realized so far.
    pub fn current_multiplier(&self) -> u64 {
        self.engine.multiplier(self.state.distributed_rewards)
    }

    /// Part of the distributable pool not yet realized.
    pub fn remaining_pool(&self) -> Amount {
        self.engine.remaining_pool(self.state.distributed_rewards)
    }

    /// Realized principal. Excludes pending accrual.
    pub fn balance_of(&self, address: &Address) -> Amount {
        self.accounts.get(address).map_or(0, |a| a.principal)
    }

    /// Projected effective balance at the current time.
    ///
    /// Uses the multiplier in effect now. Accrues only if the address is a
    /// wallet both now and at its last touch. Never mutates.
    pub fn pending_balance_of(&self, address: &Address) -> Result<Amount, LedgerError> {
        let Some(account) = self.accounts.get(address) else {
            return Ok(0);
        };
        let kind = self.classifier.classify(address);
        let pending = self.engine.pending_balance(
            account,
            kind,
            self.clock.now(),
            self.current_multiplier(),
            self.remaining_pool(),
        )?;
        Ok(pending)
    }

    pub fn account(&self, address: &Address) -> Option<&Account> {
        self.accounts.get(address)
    }

    pub fn accounts(&self) -> impl Iterator<Item = (&Address, &Account)> {
        self.accounts.iter()
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Events journaled since the last [`take_events`](Self::take_events).
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Drain the event journal.
    pub fn take_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    // --- transfers ---

    /// Move `amount` of principal from `from` to `to`, realizing pending
    /// accrual on both accounts first.
    ///
    /// A zero amount or a self transfer succeeds without touching state.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidRecipient`] if `to` is the zero address
    /// - [`LedgerError::InsufficientRealizedBalance`] if the sender's settled
    ///   principal is below `amount`
    ///
    /// On error no state has changed.
    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<TransferReceipt, LedgerError> {
        if to.is_zero() {
            warn!(%from, "transfer rejected: zero recipient");
            return Err(LedgerError::InvalidRecipient(to));
        }

        let multiplier_before = self.current_multiplier();
        if amount == 0 || from == to {
            return Ok(TransferReceipt {
                multiplier_before,
                multiplier_after: multiplier_before,
                ..TransferReceipt::default()
            });
        }

        let now = self.clock.now();
        let mut distributed = self.state.distributed_rewards;

        let mut sender = self.settle(&from, now, multiplier_before, distributed)?;
        distributed = distributed
            .checked_add(sender.realized)
            .ok_or(MathError::ArithmeticOverflow)?;
        let mut recipient = self.settle(&to, now, multiplier_before, distributed)?;
        distributed = distributed
            .checked_add(recipient.realized)
            .ok_or(MathError::ArithmeticOverflow)?;

        if sender.account.principal < amount {
            warn!(
                %from,
                have = %format_amount(sender.account.principal),
                need = %format_amount(amount),
                "transfer rejected: insufficient realized balance"
            );
            return Err(LedgerError::InsufficientRealizedBalance {
                have: sender.account.principal,
                need: amount,
            });
        }

        sender.account.principal -= amount;
        recipient.account.principal = recipient
            .account
            .principal
            .checked_add(amount)
            .ok_or(MathError::ArithmeticOverflow)?;

        let realized = sender.realized + recipient.realized;
        let total_supply = self
            .state
            .total_supply
            .checked_add(realized)
            .ok_or(MathError::ArithmeticOverflow)?;
        let wallet_balances_sum = self
            .state
            .wallet_balances_sum
            .checked_sub(sender.previous_wallet_principal() + recipient.previous_wallet_principal())
            .and_then(|s| s.checked_add(sender.wallet_principal()))
            .and_then(|s| s.checked_add(recipient.wallet_principal()))
            .ok_or(MathError::ArithmeticOverflow)?;

        // Commit.
        let was_exhausted = self.remaining_pool() == 0;
        self.accounts.insert(from, sender.account);
        self.accounts.insert(to, recipient.account);
        self.state = GlobalState {
            total_supply,
            wallet_balances_sum,
            distributed_rewards: distributed,
        };

        for (address, settled) in [(from, &sender), (to, &recipient)] {
            if settled.realized > 0 {
                debug!(
                    account = %address,
                    amount = %format_amount(settled.realized),
                    "realized accrual"
                );
                self.events.push(LedgerEvent::RewardsRealized {
                    account: address,
                    amount: settled.realized,
                });
            }
        }
        self.events.push(LedgerEvent::Transfer { from, to, amount });

        let multiplier_after = self.current_multiplier();
        debug!(
            %from,
            %to,
            amount = %format_amount(amount),
            multiplier = multiplier_after,
            "transfer committed"
        );
        if !was_exhausted && self.remaining_pool() == 0 && self.engine.pool() > 0 {
            info!(
                total_supply = %format_amount(self.state.total_supply),
                "distributable pool exhausted; accrual has stopped"
            );
        }
        debug_assert!(self.audit().is_ok(), "{:?}", self.audit());

        Ok(TransferReceipt {
            realized_from: sender.realized,
            realized_to: recipient.realized,
            multiplier_before,
            multiplier_after,
        })
    }

    /// Settle `address` at `now` without writing anything.
    ///
    /// The classification is read live. An account stored as a contract
    /// realizes nothing and restarts its checkpoint at `now`. A missing
    /// record is treated as a fresh zero-principal account. A clock that reads earlier than the
    /// stored checkpoint leaves the checkpoint where it was.
    fn settle(
        &self,
        address: &Address,
        now: u64,
        multiplier: u64,
        distributed: Amount,
    ) -> Result<Settlement, MathError> {
        let previous = self.accounts.get(address).copied();
        let kind = self.classifier.classify(address);
        let base = previous.unwrap_or_else(|| Account::empty(kind, now));

        let remaining = self.engine.remaining_pool(distributed);
        let realized = self
            .engine
            .realizable_gain(&base, kind, now, multiplier, remaining)?;

        Ok(Settlement {
            previous,
            account: Account {
                principal: base
                    .principal
                    .checked_add(realized)
                    .ok_or(MathError::ArithmeticOverflow)?,
                last_checkpoint: now.max(base.last_checkpoint),
                kind,
            },
            realized,
        })
    }

    // --- allowances ---

    /// Let `spender` move up to `amount` of `owner`'s principal.
    /// `Amount::MAX` is an unlimited allowance.
    pub fn approve(
        &mut self,
        owner: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        if spender.is_zero() {
            warn!(%owner, "approve rejected: zero spender");
            return Err(LedgerError::InvalidSpender(spender));
        }
        self.allowances.insert((owner, spender), amount);
        self.events.push(LedgerEvent::Approval {
            owner,
            spender,
            amount,
        });
        debug!(%owner, %spender, amount = %format_amount(amount), "allowance set");
        Ok(())
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    /// [`transfer`](Self::transfer) on behalf of `from`, spending `spender`'s
    /// allowance. The allowance is only reduced if the transfer commits.
    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<TransferReceipt, LedgerError> {
        let allowed = self.allowance(&from, &spender);
        if allowed < amount {
            warn!(
                %spender,
                %from,
                have = %format_amount(allowed),
                need = %format_amount(amount),
                "transfer rejected: insufficient allowance"
            );
            return Err(LedgerError::InsufficientAllowance {
                have: allowed,
                need: amount,
            });
        }

        let receipt = self.transfer(from, to, amount)?;
        if allowed != Amount::MAX && amount > 0 {
            self.allowances.insert((from, spender), allowed - amount);
        }
        Ok(receipt)
    }
}
