//! Runtime configuration
//!
//! Settings are plain serde structs persisted as JSON. A missing file means
//! defaults; a malformed file is a startup error, not a silent fallback.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::CacheTier;
use crate::{Error, Result};

/// Default per-call timeout in seconds
const DEFAULT_CALL_TIMEOUT_SECS: u64 = 30;

/// Default maximum entries per cache tier
const DEFAULT_MAX_ENTRIES_PER_TIER: usize = 256;

/// Top-level PlantPulse settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PulseSettings {
    /// Response cache settings
    pub cache: CacheSettings,

    /// Per-call timeout for tool execution, in seconds
    pub call_timeout_secs: u64,
}

impl Default for PulseSettings {
    fn default() -> Self {
        Self {
            cache: CacheSettings::default(),
            call_timeout_secs: DEFAULT_CALL_TIMEOUT_SECS,
        }
    }
}

impl PulseSettings {
    /// Load settings from a JSON file.
    ///
    /// A missing file yields defaults. Unknown fields are ignored so older
    /// config files keep working.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}

/// Response cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheSettings {
    /// Globally enable/disable caching. Disabled means every lookup misses
    /// and writes are dropped.
    pub enabled: bool,

    /// Maximum entries held per tier before LRU eviction
    pub max_entries_per_tier: usize,

    /// Optional TTL overrides per tier, in seconds. Tiers not listed keep
    /// their built-in TTL.
    pub ttl_overrides: HashMap<CacheTier, u64>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries_per_tier: DEFAULT_MAX_ENTRIES_PER_TIER,
            ttl_overrides: HashMap::new(),
        }
    }
}

impl CacheSettings {
    /// Effective TTL for a tier, override-aware. `None` for the uncached tier.
    pub fn ttl_for(&self, tier: CacheTier) -> Option<Duration> {
        if tier == CacheTier::None {
            return None;
        }
        match self.ttl_overrides.get(&tier) {
            Some(secs) => Some(Duration::from_secs(*secs)),
            None => tier.ttl(),
        }
    }
}
