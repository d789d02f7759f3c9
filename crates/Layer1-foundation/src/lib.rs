//! # pulse-foundation
//!
//! Foundation layer for PlantPulse:
//! - Error: central error enum shared by every layer
//! - Config: JSON-backed runtime settings
//! - Cache: tier-partitioned TTL response cache with deterministic keys

pub mod cache;
pub mod config;
pub mod error;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Config
// ============================================================================
pub use config::{CacheSettings, PulseSettings};

// ============================================================================
// Cache
// ============================================================================
pub use cache::{
    cache_key, params_digest, CacheStats, CacheTier, CachedResponse, InvalidationScope,
    ResponseCache,
};
