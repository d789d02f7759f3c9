//! # PlantPulse Response Cache
//!
//! Tier-partitioned TTL cache for tool call results:
//!
//! - [`tier`] - Caching policy classes (live/daily/static/none)
//! - [`key`] - Deterministic cache key generation
//! - [`store`] - The tier-partitioned store with LRU eviction and stats
//!
//! Results are cached by call identity - (tool, caller, canonical params) -
//! and are opaque to the cache itself. Contents do not survive restart.

pub mod key;
pub mod store;
pub mod tier;

pub use key::{cache_key, params_digest};
pub use store::{CacheStats, CachedResponse, InvalidationScope, ResponseCache};
pub use tier::CacheTier;
