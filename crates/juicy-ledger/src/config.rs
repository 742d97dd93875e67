//! Ledger configuration.
//!
//! [`LedgerConfig`] carries the immutable genesis parameters. Defaults come
//! from the [`NetworkType`] preset; [`LedgerConfig::load`] layers an optional
//! TOML file and `JUICY_*` environment variables on top of the preset.
//!
//! Supply values in files and the environment are decimal token strings
//! (`"1000000"`, `"0.5"`) because base-unit amounts exceed TOML's integer
//! range.

use std::path::Path;

use juicy_core::amount::{Amount, parse_amount, tokens};
use juicy_core::constants::{
    BPS_PRECISION, DEFAULT_INITIAL_SUPPLY_TOKENS, DEFAULT_MAXIMUM_SUPPLY_TOKENS, DEFAULT_NAME,
    DEFAULT_SYMBOL, NetworkType,
};
use juicy_core::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Genesis parameters of a ledger. Fixed for the ledger's lifetime.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize,
    bincode::Encode, bincode::Decode,
)]
pub struct LedgerConfig {
    /// Token name.
    pub name: String,
    /// Token ticker.
    pub symbol: String,
    /// Supply credited to the creator at genesis, in base units.
    pub initial_supply: Amount,
    /// Hard cap on total supply, in base units.
    pub maximum_total_supply: Amount,
    /// Starting annual multiplier (10_000 = 1.0×).
    pub initial_multiplier: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self::for_network(NetworkType::default())
    }
}

impl LedgerConfig {
    /// Preset parameters for a network.
    pub fn for_network(network: NetworkType) -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            symbol: DEFAULT_SYMBOL.to_string(),
            initial_supply: tokens(DEFAULT_INITIAL_SUPPLY_TOKENS),
            maximum_total_supply: tokens(DEFAULT_MAXIMUM_SUPPLY_TOKENS),
            initial_multiplier: network.initial_multiplier(),
        }
    }

    /// Distributable pool: `maximum_total_supply - initial_supply`.
    pub fn pool(&self) -> Amount {
        self.maximum_total_supply.saturating_sub(self.initial_supply)
    }

    /// Check the genesis rules.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::SupplyAboveMaximum`] if the cap is below the initial supply
    /// - [`ConfigError::MultiplierBelowUnity`] if the multiplier is below 1.0×
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.maximum_total_supply < self.initial_supply {
            return Err(ConfigError::SupplyAboveMaximum {
                initial: self.initial_supply,
                maximum: self.maximum_total_supply,
            });
        }
        if self.initial_multiplier < BPS_PRECISION {
            return Err(ConfigError::MultiplierBelowUnity(self.initial_multiplier));
        }
        Ok(())
    }

    /// Load configuration: network preset, then `path` (if given), then
    /// `JUICY_*` environment variables. The result is validated.
    pub fn load(path: Option<&Path>, network: NetworkType) -> Result<Self, ConfigError> {
        Self::load_layered(path, network, config::Environment::with_prefix("JUICY"))
    }

    fn load_layered(
        path: Option<&Path>,
        network: NetworkType,
        env: config::Environment,
    ) -> Result<Self, ConfigError> {
        let preset = Self::for_network(network);
        let load_err = |e: config::ConfigError| ConfigError::Load(e.to_string());

        let mut builder = config::Config::builder()
            .set_default("name", preset.name.clone())
            .map_err(load_err)?
            .set_default("symbol", preset.symbol.clone())
            .map_err(load_err)?
            .set_default("initial_supply", DEFAULT_INITIAL_SUPPLY_TOKENS.to_string())
            .map_err(load_err)?
            .set_default("maximum_total_supply", DEFAULT_MAXIMUM_SUPPLY_TOKENS.to_string())
            .map_err(load_err)?
            .set_default("initial_multiplier", preset.initial_multiplier as i64)
            .map_err(load_err)?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(env);

        let settings: LedgerSettings = builder
            .build()
            .map_err(load_err)?
            .try_deserialize()
            .map_err(load_err)?;

        let cfg = Self::try_from(settings)?;
        cfg.validate()?;
        Ok(cfg)
    }
}

/// On-disk / environment form of [`LedgerConfig`], with token-denominated
/// supply strings.
#[derive(Debug, Clone, Deserialize)]
struct LedgerSettings {
    name: String,
    symbol: String,
    initial_supply: String,
    maximum_total_supply: String,
    initial_multiplier: u64,
}

impl TryFrom<LedgerSettings> for LedgerConfig {
    type Error = ConfigError;

    fn try_from(s: LedgerSettings) -> Result<Self, Self::Error> {
        let amount = |field: &str, value: &str| {
            parse_amount(value).map_err(|e| ConfigError::Load(format!("{field}: {e}")))
        };
        Ok(Self {
            initial_supply: amount("initial_supply", &s.initial_supply)?,
            maximum_total_supply: amount("maximum_total_supply", &s.maximum_total_supply)?,
            initial_multiplier: s.initial_multiplier,
            name: s.name,
            symbol: s.symbol,
        })
    }
}
