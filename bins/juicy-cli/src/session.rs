//! Persistent simulator session.
//!
//! A session is a ledger snapshot plus the simulated clock reading and the
//! set of addresses marked as having code, stored as one bincode file.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use juicy_core::address::Address;
use juicy_ledger::{CodeRegistry, Ledger, LedgerSnapshot, ManualClock};
use serde::{Deserialize, Serialize};

/// On-disk form of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
struct SessionFile {
    snapshot: LedgerSnapshot,
    now: u64,
    contracts: Vec<Address>,
}

/// A live ledger with the clock and registry it was built against.
pub struct Session {
    pub ledger: Ledger,
    pub clock: Arc<ManualClock>,
    pub registry: Arc<CodeRegistry>,
}

impl Session {
    /// Wrap a freshly created ledger.
    pub fn new(ledger: Ledger, clock: Arc<ManualClock>, registry: Arc<CodeRegistry>) -> Self {
        Self {
            ledger,
            clock,
            registry,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read state file: {}", path.display()))?;
        let (file, _): (SessionFile, usize) =
            bincode::decode_from_slice(&bytes, bincode::config::standard())
                .with_context(|| format!("Corrupt state file: {}", path.display()))?;

        let clock = Arc::new(ManualClock::new(file.now));
        let registry: Arc<CodeRegistry> = Arc::new(file.contracts.into_iter().collect());
        let ledger = Ledger::restore(file.snapshot, registry.clone(), clock.clone())
            .context("State file failed validation")?;
        Ok(Self::new(ledger, clock, registry))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = SessionFile {
            snapshot: self.ledger.snapshot(),
            now: self.ledger.now(),
            contracts: self.registry.addresses(),
        };
        let bytes = bincode::encode_to_vec(&file, bincode::config::standard())
            .context("Failed to encode state")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        std::fs::write(path, bytes)
            .with_context(|| format!("Failed to write state file: {}", path.display()))?;
        Ok(())
    }
}
