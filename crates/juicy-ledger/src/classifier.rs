//! [`AccountClassifier`] implementations.
//!
//! Code detection is host specific; the ledger only needs the capability
//! query. [`NoCode`] treats every address as a wallet. [`CodeRegistry`]
//! keeps an explicit set of addresses that have code deployed and can be
//! shared with whatever deploys programmatic holders.

use std::collections::HashSet;

use juicy_core::address::Address;
use juicy_core::traits::AccountClassifier;
use parking_lot::RwLock;

/// Every address is an externally controlled wallet.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCode;

impl AccountClassifier for NoCode {
    fn has_code(&self, _address: &Address) -> bool {
        false
    }
}

/// Thread-safe registry of addresses with deployed code.
#[derive(Debug, Default)]
pub struct CodeRegistry {
    deployed: RwLock<HashSet<Address>>,
}

impl CodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record code at `address`. Returns `false` if it was already present.
    pub fn deploy(&self, address: Address) -> bool {
        self.deployed.write().insert(address)
    }

    /// Remove code from `address`. Returns `false` if none was recorded.
    pub fn destroy(&self, address: &Address) -> bool {
        self.deployed.write().remove(address)
    }

    pub fn len(&self) -> usize {
        self.deployed.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.deployed.read().is_empty()
    }

    /// Registered addresses in ascending order.
    pub fn addresses(&self) -> Vec<Address> {
        let mut all: Vec<Address> = self.deployed.read().iter().copied().collect();
        all.sort();
        all
    }
}

impl FromIterator<Address> for CodeRegistry {
    fn from_iter<I: IntoIterator<Item = Address>>(iter: I) -> Self {
        Self {
            deployed: RwLock::new(iter.into_iter().collect()),
        }
    }
}

impl AccountClassifier for CodeRegistry {
    fn has_code(&self, address: &Address) -> bool {
        self.deployed.read().contains(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use juicy_core::types::AccountKind;

    #[test]
    fn no_code_classifies_everything_as_wallet() {
        assert_eq!(NoCode.classify(&Address::from_seed(1)), AccountKind::Wallet);
        assert_eq!(NoCode.classify(&Address::ZERO), AccountKind::Wallet);
    }

    #[test]
    fn registry_deploy_and_destroy() {
        let reg = CodeRegistry::new();
        let addr = Address::from_seed(7);
        assert!(reg.is_empty());
        assert!(reg.deploy(addr));
        assert!(!reg.deploy(addr));
        assert_eq!(reg.classify(&addr), AccountKind::Contract);
        assert_eq!(reg.len(), 1);

        assert!(reg.destroy(&addr));
        assert!(!reg.destroy(&addr));
        assert_eq!(reg.classify(&addr), AccountKind::Wallet);
    }

    #[test]
    fn registry_addresses_sorted() {
        let reg: CodeRegistry = [Address::from_seed(9), Address::from_seed(2)]
            .into_iter()
            .collect();
        assert_eq!(
            reg.addresses(),
            vec![Address::from_seed(2), Address::from_seed(9)]
        );
    }
}
