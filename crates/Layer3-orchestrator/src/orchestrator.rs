//! Execution orchestrator
//!
//! The single entry point: resolves the tool, wraps execution in the
//! response cache, bounds it with a per-call timeout, and translates every
//! failure into a user-safe structured result. Raw internal errors never
//! reach the caller.
//!
//! Cache population is not single-flight: two concurrent identical misses
//! both execute and both write back, last write wins. See `ResponseCache`.

use std::sync::Arc;

use serde_json::Value;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use pulse_data::DataSource;
use pulse_foundation::{
    cache_key, CacheStats, InvalidationScope, PulseSettings, ResponseCache,
};
use pulse_tool::{ToolContext, ToolOutput, ToolRegistry};

use crate::result::StructuredResult;

/// Orchestrates tool invocation over the registry, cache and data layer.
///
/// All collaborators are injected; nothing here is a global.
pub struct Orchestrator {
    registry: ToolRegistry,
    cache: Arc<ResponseCache>,
    data: Arc<dyn DataSource>,
    settings: PulseSettings,
}

impl Orchestrator {
    pub fn new(
        registry: ToolRegistry,
        cache: Arc<ResponseCache>,
        data: Arc<dyn DataSource>,
        settings: PulseSettings,
    ) -> Self {
        Self {
            registry,
            cache,
            data,
            settings,
        }
    }

    /// Invoke a tool on behalf of a caller.
    ///
    /// `force_refresh` bypasses the cache lookup, always re-executes, and
    /// rewrites the cache so it stays warm.
    pub async fn invoke(
        &self,
        tool_name: &str,
        params: Value,
        caller_id: &str,
        force_refresh: bool,
    ) -> StructuredResult {
        let invocation = Uuid::new_v4();

        let Some(tool) = self.registry.get(tool_name) else {
            info!(%invocation, tool = tool_name, caller = caller_id, "unknown tool requested");
            return StructuredResult::cannot_help(tool_name);
        };
        let def = tool.definition();

        let key = cache_key(tool_name, caller_id, &params);

        if !force_refresh {
            if let Some(hit) = self.cache.get(&key, def.cache_tier) {
                match serde_json::from_value::<ToolOutput>(hit.payload) {
                    Ok(output) => {
                        debug!(%invocation, tool = tool_name, caller = caller_id, key = %key, "served from cache");
                        return StructuredResult::answered(
                            output.summary,
                            output.payload,
                            output.citations,
                        )
                        .served_from_cache()
                        .with_cache_key(key);
                    }
                    Err(e) => {
                        // Unreadable entry; drop it and fall through to execution
                        warn!(%invocation, key = %key, error = %e, "discarding malformed cache entry");
                        self.cache.invalidate(&InvalidationScope::Pattern(key.clone()));
                    }
                }
            }
        }

        let ctx = ToolContext::new(caller_id, self.data.clone())
            .with_force_refresh(force_refresh)
            .with_timeout(self.settings.call_timeout());

        let output = match timeout(ctx.timeout, tool.execute(&ctx, params.clone())).await {
            Err(_) => {
                // Timed out: treated as a query failure, result never cached
                error!(
                    %invocation,
                    tool = tool_name,
                    caller = caller_id,
                    params = %params,
                    timeout_secs = self.settings.call_timeout_secs,
                    "tool execution timed out"
                );
                return StructuredResult::retrieval_failed();
            }
            Ok(Err(err)) => {
                error!(
                    %invocation,
                    tool = tool_name,
                    caller = caller_id,
                    params = %params,
                    error = %err,
                    retryable = err.is_retryable(),
                    "tool execution failed"
                );
                return StructuredResult::retrieval_failed();
            }
            Ok(Ok(output)) => output,
        };

        if def.requires_citation && output.citations.is_empty() {
            warn!(%invocation, tool = tool_name, "tool requires citations but produced none");
        }

        match serde_json::to_value(&output) {
            Ok(payload) => {
                self.cache.set(&key, def.cache_tier, payload);
            }
            Err(e) => {
                warn!(%invocation, tool = tool_name, error = %e, "result not cacheable");
            }
        }

        debug!(%invocation, tool = tool_name, caller = caller_id, key = %key, "answered fresh");
        StructuredResult::answered(output.summary, output.payload, output.citations)
            .with_cache_key(key)
    }

    /// Cache statistics. Privileged introspection; gate upstream.
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Administrative invalidation. Privileged; gate upstream.
    pub fn invalidate(&self, scope: &InvalidationScope) -> usize {
        self.cache.invalidate(scope)
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }
}
