//! Tier-partitioned TTL response cache
//!
//! One `ResponseCache` instance is process-wide shared mutable state: each
//! tier is an independent partition behind its own lock with its own entry
//! cap and LRU eviction, so no tier can exhaust memory. Statistics counters
//! are atomic.
//!
//! Known race: per-key population is not atomic across concurrent identical
//! requests. Two simultaneous misses for the same key may both execute the
//! handler and both write back; last write wins. Accepted — handlers are
//! read-only and idempotent and TTLs are short. Do not rely on this cache
//! for single-flight de-duplication.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use super::tier::CacheTier;
use crate::config::CacheSettings;

/// A cached response as handed back to callers.
///
/// `key`, `tier` and `stored_at` are stamped at write time and surfaced for
/// display and citation.
#[derive(Debug, Clone, Serialize)]
pub struct CachedResponse {
    pub key: String,
    pub tier: CacheTier,
    pub payload: Value,
    pub stored_at: DateTime<Utc>,
}

#[derive(Debug)]
struct StoredEntry {
    response: CachedResponse,
    expires_at: Instant,
    last_access: u64,
}

impl StoredEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at <= now
    }
}

/// Selector for explicit invalidation. The three modes are mutually
/// exclusive by construction.
#[derive(Debug, Clone)]
pub enum InvalidationScope {
    /// Clear one entire tier
    Tier(CacheTier),
    /// Clear entries whose key contains the substring, across all tiers
    Pattern(String),
    /// Clear every entry belonging to one tool name
    Tool(String),
}

impl fmt::Display for InvalidationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidationScope::Tier(tier) => write!(f, "tier={}", tier),
            InvalidationScope::Pattern(p) => write!(f, "pattern={}", p),
            InvalidationScope::Tool(t) => write!(f, "tool={}", t),
        }
    }
}

/// Cache statistics snapshot
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
    /// Percentage of lookups served from cache; 0 before any lookup
    pub hit_rate: f64,
    pub live_entries: usize,
    pub daily_entries: usize,
    pub static_entries: usize,
}

// ----------------------------------------------------------------------------
// TierShard
// ----------------------------------------------------------------------------

/// One tier partition: a bounded map with access-counter LRU eviction.
#[derive(Debug)]
struct TierShard {
    entries: HashMap<String, StoredEntry>,
    access_counter: u64,
    max_entries: usize,
    ttl: Duration,
}

impl TierShard {
    fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            access_counter: 0,
            max_entries,
            ttl,
        }
    }

    /// Look up an entry; expired entries behave exactly like absent ones
    /// and are dropped on the way out.
    fn lookup(&mut self, key: &str, now: Instant) -> Option<CachedResponse> {
        match self.entries.get_mut(key) {
            Some(entry) if !entry.is_expired(now) => {
                self.access_counter += 1;
                entry.last_access = self.access_counter;
                Some(entry.response.clone())
            }
            Some(_) => {
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Insert or overwrite; evicts least-recently-used entries when the
    /// partition is at capacity.
    fn insert(&mut self, response: CachedResponse, now: Instant) {
        self.access_counter += 1;

        if !self.entries.contains_key(&response.key) {
            while self.entries.len() >= self.max_entries {
                self.evict_lru();
            }
        }

        let key = response.key.clone();
        self.entries.insert(
            key,
            StoredEntry {
                response,
                expires_at: now + self.ttl,
                last_access: self.access_counter,
            },
        );
    }

    fn evict_lru(&mut self) {
        let lru_key = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.last_access)
            .map(|(k, _)| k.clone());
        if let Some(key) = lru_key {
            self.entries.remove(&key);
        }
    }

    /// Remove entries matching a predicate, returning how many went away.
    fn remove_matching<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(&str) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|k, _| !pred(k));
        before - self.entries.len()
    }

    fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

// ----------------------------------------------------------------------------
// ResponseCache
// ----------------------------------------------------------------------------

/// Tier-partitioned TTL response cache.
///
/// Construct one instance at startup and inject it where it is needed;
/// `clear()` gives tests a clean slate.
#[derive(Debug)]
pub struct ResponseCache {
    shards: HashMap<CacheTier, Mutex<TierShard>>,
    enabled: bool,
    hits: AtomicU64,
    misses: AtomicU64,
    invalidations: AtomicU64,
}

impl ResponseCache {
    pub fn new(settings: &CacheSettings) -> Self {
        let mut shards = HashMap::new();
        for tier in CacheTier::partitions() {
            let ttl = settings
                .ttl_for(tier)
                .unwrap_or_else(|| Duration::from_secs(0));
            shards.insert(
                tier,
                Mutex::new(TierShard::new(settings.max_entries_per_tier, ttl)),
            );
        }

        Self {
            shards,
            enabled: settings.enabled,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            invalidations: AtomicU64::new(0),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(&CacheSettings::default())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Get a cached payload if present and unexpired.
    ///
    /// Always a miss when the tier is `None` or caching is disabled. Every
    /// call moves the hit/miss counters.
    pub fn get(&self, key: &str, tier: CacheTier) -> Option<CachedResponse> {
        self.get_at(key, tier, Instant::now())
    }

    fn get_at(&self, key: &str, tier: CacheTier, now: Instant) -> Option<CachedResponse> {
        if !self.enabled || !tier.is_cacheable() {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        let shard = self.shards.get(&tier)?;
        match shard.lock().lookup(key, now) {
            Some(response) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key, tier = %tier, "cache hit");
                Some(response)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(key, tier = %tier, "cache miss");
                None
            }
        }
    }

    /// Store a payload, overwriting any entry under the same key.
    ///
    /// Returns `false` when the write was dropped (tier `None` or caching
    /// disabled).
    pub fn set(&self, key: &str, tier: CacheTier, payload: Value) -> bool {
        if !self.enabled || !tier.is_cacheable() {
            return false;
        }

        let Some(shard) = self.shards.get(&tier) else {
            return false;
        };

        let response = CachedResponse {
            key: key.to_string(),
            tier,
            payload,
            stored_at: Utc::now(),
        };
        shard.lock().insert(response, Instant::now());
        debug!(key, tier = %tier, "cached response");
        true
    }

    /// Invalidate entries by tier, key pattern, or tool name.
    ///
    /// Returns the number of entries removed. Every invalidation is logged
    /// with its count and trigger.
    pub fn invalidate(&self, scope: &InvalidationScope) -> usize {
        let count = match scope {
            InvalidationScope::Tier(tier) => match self.shards.get(tier) {
                Some(shard) => shard.lock().clear(),
                None => 0,
            },
            InvalidationScope::Pattern(pattern) => self
                .shards
                .values()
                .map(|shard| shard.lock().remove_matching(|k| k.contains(pattern.as_str())))
                .sum(),
            InvalidationScope::Tool(tool) => {
                let prefix = format!("{}:", tool);
                self.shards
                    .values()
                    .map(|shard| shard.lock().remove_matching(|k| k.starts_with(&prefix)))
                    .sum()
            }
        };

        self.invalidations.fetch_add(count as u64, Ordering::Relaxed);
        info!(count, trigger = %scope, "cache invalidated");
        count
    }

    /// Drop entries whose TTL has elapsed. Maintenance only; lookups already
    /// treat expired entries as absent.
    pub fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        for shard in self.shards.values() {
            let mut shard = shard.lock();
            let before = shard.entries.len();
            shard.entries.retain(|_, e| !e.is_expired(now));
            removed += before - shard.entries.len();
        }
        if removed > 0 {
            debug!(removed, "expired cache entries swept");
        }
        removed
    }

    /// Statistics snapshot
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);

        let count_for = |tier: CacheTier| -> usize {
            self.shards
                .get(&tier)
                .map(|shard| shard.lock().len())
                .unwrap_or(0)
        };

        let live_entries = count_for(CacheTier::Live);
        let daily_entries = count_for(CacheTier::Daily);
        let static_entries = count_for(CacheTier::Static);

        CacheStats {
            entries: live_entries + daily_entries + static_entries,
            hits,
            misses,
            invalidations: self.invalidations.load(Ordering::Relaxed),
            hit_rate: hit_rate_percent(hits, misses),
            live_entries,
            daily_entries,
            static_entries,
        }
    }

    /// Drop all entries and reset counters. Test/bootstrap only.
    pub fn clear(&self) {
        for shard in self.shards.values() {
            shard.lock().clear();
        }
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.invalidations.store(0, Ordering::Relaxed);
    }
}

/// hits / (hits + misses) as a percentage, 0 when there were no lookups.
fn hit_rate_percent(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::key::cache_key;
    use serde_json::json;

    fn small_cache(max_entries: usize) -> ResponseCache {
        let settings = CacheSettings {
            max_entries_per_tier: max_entries,
            ..Default::default()
        };
        ResponseCache::new(&settings)
    }

    #[test]
    fn set_get_round_trip() {
        let cache = ResponseCache::with_defaults();
        let before = Utc::now();

        cache.set("asset_lookup:u1:abc", CacheTier::Static, json!({"asset": "Grinder 5"}));
        let hit = cache.get("asset_lookup:u1:abc", CacheTier::Static).unwrap();

        assert_eq!(hit.payload, json!({"asset": "Grinder 5"}));
        assert_eq!(hit.tier, CacheTier::Static);
        assert_eq!(hit.key, "asset_lookup:u1:abc");
        assert!(hit.stored_at >= before);
    }

    #[test]
    fn ttl_boundary_live_tier() {
        let cache = ResponseCache::with_defaults();
        let t0 = Instant::now();

        cache.set("production_status:u1:k", CacheTier::Live, json!({"state": "running"}));

        // Hit just inside the 60s window, miss just outside it
        assert!(cache
            .get_at("production_status:u1:k", CacheTier::Live, t0 + Duration::from_secs(59))
            .is_some());
        assert!(cache
            .get_at("production_status:u1:k", CacheTier::Live, t0 + Duration::from_secs(61))
            .is_none());

        // Expired entry is gone for good; no path restores it
        assert!(cache.get("production_status:u1:k", CacheTier::Live).is_none());
    }

    #[test]
    fn overwrite_keeps_single_entry() {
        let cache = ResponseCache::with_defaults();
        cache.set("t:u:1", CacheTier::Daily, json!(1));
        cache.set("t:u:1", CacheTier::Daily, json!(2));

        assert_eq!(cache.stats().daily_entries, 1);
        assert_eq!(cache.get("t:u:1", CacheTier::Daily).unwrap().payload, json!(2));
    }

    #[test]
    fn lru_eviction_at_tier_capacity() {
        let cache = small_cache(2);
        cache.set("a:u:1", CacheTier::Static, json!(1));
        cache.set("b:u:2", CacheTier::Static, json!(2));

        // Touch "a" so "b" becomes least recently used
        cache.get("a:u:1", CacheTier::Static);
        cache.set("c:u:3", CacheTier::Static, json!(3));

        assert!(cache.get("a:u:1", CacheTier::Static).is_some());
        assert!(cache.get("b:u:2", CacheTier::Static).is_none());
        assert!(cache.get("c:u:3", CacheTier::Static).is_some());
        assert_eq!(cache.stats().static_entries, 2);
    }

    #[test]
    fn tiers_evict_independently() {
        let cache = small_cache(1);
        cache.set("a:u:1", CacheTier::Live, json!(1));
        cache.set("b:u:2", CacheTier::Daily, json!(2));

        // Filling one tier does not displace another tier's entry
        assert!(cache.get("a:u:1", CacheTier::Live).is_some());
        assert!(cache.get("b:u:2", CacheTier::Daily).is_some());
    }

    #[test]
    fn tier_invalidation_is_idempotent() {
        let cache = ResponseCache::with_defaults();
        cache.set("a:u:1", CacheTier::Daily, json!(1));
        cache.set("b:u:2", CacheTier::Daily, json!(2));
        cache.set("c:u:3", CacheTier::Daily, json!(3));

        let scope = InvalidationScope::Tier(CacheTier::Daily);
        assert_eq!(cache.invalidate(&scope), 3);
        assert_eq!(cache.invalidate(&scope), 0);
        assert!(cache.get("a:u:1", CacheTier::Daily).is_none());
    }

    #[test]
    fn pattern_invalidation_spans_tiers() {
        let cache = ResponseCache::with_defaults();
        cache.set("asset_lookup:u1:x", CacheTier::Static, json!(1));
        cache.set("downtime_events:u1:y", CacheTier::Daily, json!(2));
        cache.set("asset_lookup:u2:z", CacheTier::Static, json!(3));

        let removed = cache.invalidate(&InvalidationScope::Pattern(":u1:".to_string()));
        assert_eq!(removed, 2);
        assert!(cache.get("asset_lookup:u2:z", CacheTier::Static).is_some());
    }

    #[test]
    fn tool_invalidation_only_hits_that_tool() {
        let cache = ResponseCache::with_defaults();
        let a = cache_key("asset_lookup", "u1", &json!({"name": "Grinder 5"}));
        let b = cache_key("asset_lookup", "u2", &json!({"name": "Grinder 5"}));
        let c = cache_key("shift_schedule", "u1", &json!({}));
        cache.set(&a, CacheTier::Static, json!(1));
        cache.set(&b, CacheTier::Static, json!(2));
        cache.set(&c, CacheTier::Static, json!(3));

        let removed = cache.invalidate(&InvalidationScope::Tool("asset_lookup".to_string()));
        assert_eq!(removed, 2);
        assert!(cache.get(&c, CacheTier::Static).is_some());
    }

    #[test]
    fn disabled_cache_never_hits() {
        let settings = CacheSettings {
            enabled: false,
            ..Default::default()
        };
        let cache = ResponseCache::new(&settings);

        assert!(!cache.set("a:u:1", CacheTier::Static, json!(1)));
        assert!(cache.get("a:u:1", CacheTier::Static).is_none());

        let stats = cache.stats();
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn none_tier_is_a_no_op() {
        let cache = ResponseCache::with_defaults();
        assert!(!cache.set("a:u:1", CacheTier::None, json!(1)));
        assert!(cache.get("a:u:1", CacheTier::None).is_none());
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn hit_rate_is_a_percentage_and_defined_at_zero() {
        let cache = ResponseCache::with_defaults();
        assert_eq!(cache.stats().hit_rate, 0.0);

        cache.get("a:u:1", CacheTier::Live); // miss
        cache.set("a:u:1", CacheTier::Live, json!(1));
        cache.get("a:u:1", CacheTier::Live); // hit
        cache.get("a:u:1", CacheTier::Live); // hit

        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate - 66.666).abs() < 0.01);
    }

    #[test]
    fn ttl_override_shortens_tier() {
        let mut settings = CacheSettings::default();
        settings.ttl_overrides.insert(CacheTier::Live, 10);
        let cache = ResponseCache::new(&settings);
        let t0 = Instant::now();

        cache.set("a:u:1", CacheTier::Live, json!(1));
        assert!(cache.get_at("a:u:1", CacheTier::Live, t0 + Duration::from_secs(9)).is_some());
        assert!(cache.get_at("a:u:1", CacheTier::Live, t0 + Duration::from_secs(11)).is_none());
    }

    #[test]
    fn cleanup_sweeps_only_expired() {
        let mut settings = CacheSettings::default();
        settings.ttl_overrides.insert(CacheTier::Live, 0);
        let cache = ResponseCache::new(&settings);

        cache.set("a:u:1", CacheTier::Live, json!(1)); // expires immediately
        cache.set("b:u:2", CacheTier::Daily, json!(2));

        assert_eq!(cache.cleanup_expired(), 1);
        assert_eq!(cache.stats().daily_entries, 1);
    }

    #[test]
    fn clear_resets_entries_and_counters() {
        let cache = ResponseCache::with_defaults();
        cache.set("a:u:1", CacheTier::Static, json!(1));
        cache.get("a:u:1", CacheTier::Static);
        cache.clear();

        let stats = cache.stats();
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
    }
}
