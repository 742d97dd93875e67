//! Error types for the Juicy ledger.
use thiserror::Error;

use crate::address::Address;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    #[error("arithmetic overflow")] ArithmeticOverflow,
    #[error("logarithm of a value below one")] DomainError,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("maximum total supply {maximum} is below initial supply {initial}")] SupplyAboveMaximum { initial: u128, maximum: u128 },
    #[error("initial multiplier {0} is below 1.0x (10000)")] MultiplierBelowUnity(u64),
    #[error("creator must not be the zero address")] InvalidCreator,
    #[error("config source: {0}")] Load(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid length: expected 20 bytes, got {0}")] InvalidLength(usize),
    #[error("invalid hex: {0}")] InvalidHex(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("empty amount")] Empty,
    #[error("invalid character: {0}")] InvalidCharacter(char),
    #[error("too many fractional digits: {0} > 18")] TooPrecise(usize),
    #[error("amount overflows u128")] Overflow,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient realized balance: have {have}, need {need}")] InsufficientRealizedBalance { have: u128, need: u128 },
    #[error("invalid recipient: {0}")] InvalidRecipient(Address),
    #[error("invalid spender: {0}")] InvalidSpender(Address),
    #[error("insufficient allowance: have {have}, need {need}")] InsufficientAllowance { have: u128, need: u128 },
    #[error(transparent)] Math(#[from] MathError),
    #[error(transparent)] Config(#[from] ConfigError),
}

/// A ledger total drifted from the value recomputed from account records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("total supply {total} exceeds maximum {maximum}")] SupplyAboveCap { total: u128, maximum: u128 },
    #[error("total supply {cached} != sum of principals {actual}")] TotalSupplyDrift { cached: u128, actual: u128 },
    #[error("wallet balances sum {cached} != sum of wallet principals {actual}")] WalletSumDrift { cached: u128, actual: u128 },
    #[error("distributed rewards {distributed} exceed pool {pool}")] RewardsAbovePool { distributed: u128, pool: u128 },
    #[error("total supply {total} != initial supply {initial} + distributed rewards {distributed}")] RewardsDrift { total: u128, initial: u128, distributed: u128 },
    #[error("multiplier {0} out of range")] MultiplierOutOfRange(u64),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("encode: {0}")] Encode(String),
    #[error("decode: {0}")] Decode(String),
    #[error("duplicate account: {0}")] DuplicateAccount(Address),
    #[error(transparent)] Config(#[from] ConfigError),
    #[error(transparent)] Invariant(#[from] InvariantViolation),
}
