//! Cache tiers
//!
//! A tier is a named caching policy class with a fixed TTL. Tools declare
//! their tier at registration and every cached result for that tool uses
//! exactly that tier.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// TTL for fast-moving plant-floor state
const LIVE_TTL_SECS: u64 = 60;

/// TTL for shift-scoped aggregates
const DAILY_TTL_SECS: u64 = 900;

/// TTL for master data that rarely changes
const STATIC_TTL_SECS: u64 = 3600;

/// Caching policy class declared per tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheTier {
    /// Current machine/line state (60s)
    Live,
    /// Shift- and day-scoped reports (15 minutes)
    Daily,
    /// Master data: assets, schedules (1 hour)
    Static,
    /// Never cached
    None,
}

impl CacheTier {
    /// Built-in TTL for this tier. `None` for the uncached tier.
    pub fn ttl(&self) -> Option<Duration> {
        match self {
            CacheTier::Live => Some(Duration::from_secs(LIVE_TTL_SECS)),
            CacheTier::Daily => Some(Duration::from_secs(DAILY_TTL_SECS)),
            CacheTier::Static => Some(Duration::from_secs(STATIC_TTL_SECS)),
            CacheTier::None => None,
        }
    }

    /// Whether results in this tier are stored at all
    pub fn is_cacheable(&self) -> bool {
        !matches!(self, CacheTier::None)
    }

    /// The tiers that hold entries, in display order
    pub const fn partitions() -> [CacheTier; 3] {
        [CacheTier::Live, CacheTier::Daily, CacheTier::Static]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheTier::Live => "live",
            CacheTier::Daily => "daily",
            CacheTier::Static => "static",
            CacheTier::None => "none",
        }
    }
}

impl fmt::Display for CacheTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
