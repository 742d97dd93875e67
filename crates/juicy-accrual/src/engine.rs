//! Accrual engine implementing the [`AccrualCalculator`] trait.
//!
//! Combines the multiplier decay schedule with continuous annual compounding.
//! The pending projection uses the multiplier in effect at query time rather
//! than integrating over its trajectory since the account's checkpoint, which
//! keeps every query O(1).

use juicy_core::amount::Amount;
use juicy_core::constants::{BPS_PRECISION, WAD};
use juicy_core::error::{ConfigError, MathError};
use juicy_core::traits::AccrualCalculator;

use crate::fixed::{growth_factor, mul_div};
use crate::multiplier::decayed_multiplier;

/// The production accrual calculator.
///
/// Implements [`AccrualCalculator`] with:
/// - Linear multiplier decay over the distributable pool
/// - `(multiplier)^(elapsed / year)` growth in 18-decimal fixed point
/// - Saturating gains when growth overflows (callers clamp to the pool)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccrualEngine {
    initial_multiplier: u64,
    pool: Amount,
}

impl AccrualEngine {
    /// Build an engine for a ledger with the given supply bounds.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::SupplyAboveMaximum`] if `maximum_total_supply < initial_supply`
    /// - [`ConfigError::MultiplierBelowUnity`] if `initial_multiplier < 10_000`
    pub fn new(
        initial_supply: Amount,
        maximum_total_supply: Amount,
        initial_multiplier: u64,
    ) -> Result<Self, ConfigError> {
        if maximum_total_supply < initial_supply {
            return Err(ConfigError::SupplyAboveMaximum {
                initial: initial_supply,
                maximum: maximum_total_supply,
            });
        }
        if initial_multiplier < BPS_PRECISION {
            return Err(ConfigError::MultiplierBelowUnity(initial_multiplier));
        }
        Ok(Self {
            initial_multiplier,
            pool: maximum_total_supply - initial_supply,
        })
    }

    pub fn initial_multiplier(&self) -> u64 {
        self.initial_multiplier
    }
}

impl AccrualCalculator for AccrualEngine {
    fn multiplier(&self, distributed: Amount) -> u64 {
        decayed_multiplier(self.initial_multiplier, distributed, self.pool)
    }

    fn pool(&self) -> Amount {
        self.pool
    }

    fn compute_gain(
        &self,
        principal: Amount,
        elapsed: u64,
        multiplier: u64,
    ) -> Result<Amount, MathError> {
        if principal == 0 || elapsed == 0 || multiplier <= BPS_PRECISION {
            return Ok(0);
        }

        let growth = match growth_factor(elapsed, multiplier) {
            Ok(g) => g,
            // Growth beyond u128 means the gain exceeds any pool.
            Err(MathError::ArithmeticOverflow) => return Ok(Amount::MAX),
            Err(e) => return Err(e),
        };

        // gain = principal * (growth - 1), truncated.
        Ok(mul_div(principal, growth - WAD, WAD).unwrap_or(Amount::MAX))
    }
}
