//! Ledger constants. All monetary values in base units (1 JUICY = 10^18 base units).

use serde::{Deserialize, Serialize};

/// Base units per whole token (18-decimal fixed point).
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// Number of fractional digits of the amount type.
pub const DECIMALS: u8 = 18;

/// Multiplier scale: `10_000` is a 1.0× (no-growth) rate.
pub const BPS_PRECISION: u64 = 10_000;

/// Length of the accrual year in seconds (365 days).
pub const SECONDS_PER_YEAR: u64 = 365 * 24 * 60 * 60;

pub const DEFAULT_NAME: &str = "Juicy Token";
pub const DEFAULT_SYMBOL: &str = "JUICY";

/// Initial supply credited to the creator at genesis, in whole tokens.
pub const DEFAULT_INITIAL_SUPPLY_TOKENS: u128 = 1_000_000;

/// Hard supply cap, in whole tokens.
pub const DEFAULT_MAXIMUM_SUPPLY_TOKENS: u128 = 5_000_000;

/// Mainnet starting multiplier: 150% per year (x1.5).
pub const MAINNET_INITIAL_MULTIPLIER: u64 = 15_000;

/// Testnet starting multiplier: 300% per year (x3), so accrual is visible quickly.
pub const TESTNET_INITIAL_MULTIPLIER: u64 = 30_000;

/// Deployment target. Selects the default accrual parameters.
///
/// # Examples
///
/// ```
/// use juicy_core::constants::NetworkType;
/// assert_eq!(NetworkType::default(), NetworkType::Mainnet);
/// assert_eq!(NetworkType::Testnet.initial_multiplier(), 30_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    /// Production parameters.
    #[default]
    Mainnet,
    /// Public test deployment with an accelerated multiplier.
    Testnet,
}

impl NetworkType {
    /// Starting multiplier for a fresh ledger on this network.
    pub fn initial_multiplier(&self) -> u64 {
        match self {
            Self::Mainnet => MAINNET_INITIAL_MULTIPLIER,
            Self::Testnet => TESTNET_INITIAL_MULTIPLIER,
        }
    }

    /// Subdirectory name appended to the base data directory path.
    pub fn data_dir_suffix(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_per_year() {
        assert_eq!(SECONDS_PER_YEAR, 31_536_000);
    }

    #[test]
    fn wad_matches_decimals() {
        assert_eq!(WAD, 10u128.pow(DECIMALS as u32));
    }

    #[test]
    fn default_supply_fits_pool() {
        assert!(DEFAULT_MAXIMUM_SUPPLY_TOKENS > DEFAULT_INITIAL_SUPPLY_TOKENS);
    }

    #[test]
    fn network_multipliers_above_unity() {
        assert!(NetworkType::Mainnet.initial_multiplier() > BPS_PRECISION);
        assert!(NetworkType::Testnet.initial_multiplier() > NetworkType::Mainnet.initial_multiplier());
    }

    #[test]
    fn network_data_dirs_distinct() {
        assert_ne!(
            NetworkType::Mainnet.data_dir_suffix(),
            NetworkType::Testnet.data_dir_suffix()
        );
    }
}
