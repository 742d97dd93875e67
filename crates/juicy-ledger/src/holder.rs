//! Minimal programmatic holder.
//!
//! Stands in for an address with deployed code that holds tokens and can
//! forward them. It has no accrual logic of its own; registering it in a
//! [`CodeRegistry`] is what makes the ledger classify it as a contract.

use juicy_core::address::Address;
use juicy_core::amount::Amount;
use juicy_core::error::LedgerError;
use juicy_core::types::TransferReceipt;

use crate::classifier::CodeRegistry;
use crate::ledger::Ledger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgrammaticHolder {
    address: Address,
}

impl ProgrammaticHolder {
    /// Register code at `address` and return a handle to it.
    pub fn deploy(address: Address, registry: &CodeRegistry) -> Self {
        registry.deploy(address);
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Send `amount` of this holder's tokens to `to`.
    pub fn transfer_token(
        &self,
        ledger: &mut Ledger,
        to: Address,
        amount: Amount,
    ) -> Result<TransferReceipt, LedgerError> {
        ledger.transfer(self.address, to, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use juicy_core::amount::tokens;
    use juicy_core::constants::SECONDS_PER_YEAR;
    use juicy_core::types::AccountKind;

    use crate::clock::ManualClock;
    use crate::config::LedgerConfig;

    #[test]
    fn holder_is_classified_as_contract_and_can_forward() {
        let creator = Address::from_seed(1);
        let user = Address::from_seed(2);
        let clock = Arc::new(ManualClock::new(1_000));
        let registry = Arc::new(CodeRegistry::new());
        let mut ledger = Ledger::genesis(
            LedgerConfig::default(),
            creator,
            registry.clone(),
            clock.clone(),
        )
        .unwrap();

        let holder = ProgrammaticHolder::deploy(Address::from_seed(9), &registry);
        ledger.transfer(creator, holder.address(), tokens(10)).unwrap();
        assert_eq!(
            ledger.account(&holder.address()).unwrap().kind,
            AccountKind::Contract
        );

        clock.advance(SECONDS_PER_YEAR);
        let receipt = holder.transfer_token(&mut ledger, user, tokens(4)).unwrap();
        assert_eq!(receipt.realized_from, 0);
        assert_eq!(ledger.balance_of(&holder.address()), tokens(6));
        assert_eq!(ledger.balance_of(&user), tokens(4));
    }

    #[test]
    fn holder_cannot_overspend() {
        let creator = Address::from_seed(1);
        let clock = Arc::new(ManualClock::new(0));
        let registry = Arc::new(CodeRegistry::new());
        let mut ledger = Ledger::genesis(
            LedgerConfig::default(),
            creator,
            registry.clone(),
            clock.clone(),
        )
        .unwrap();
        let holder = ProgrammaticHolder::deploy(Address::from_seed(9), &registry);
        ledger.transfer(creator, holder.address(), tokens(10)).unwrap();

        // A contract sender cannot lean on accrual it never earns.
        clock.advance(SECONDS_PER_YEAR);
        let before = ledger.snapshot();
        assert_eq!(
            holder.transfer_token(&mut ledger, creator, tokens(11)),
            Err(LedgerError::InsufficientRealizedBalance {
                have: tokens(10),
                need: tokens(11),
            })
        );
        assert_eq!(ledger.snapshot(), before);
        assert_eq!(
            ledger.account(&holder.address()).unwrap().kind,
            AccountKind::Contract
        );
    }
}
