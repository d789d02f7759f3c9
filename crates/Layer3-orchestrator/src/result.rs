//! Structured results
//!
//! Every invocation returns the same shape, success or not. Failure results
//! carry a clear message and no fabricated data fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use pulse_data::Citation;

/// Result of one orchestrated tool invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredResult {
    /// Whether the invocation produced an answer
    pub success: bool,

    /// Human-readable summary or failure message
    pub message: String,

    /// Structured result content; absent on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Provenance of every data result touched during execution
    pub citations: Vec<Citation>,

    /// Whether the answer was served from cache
    pub from_cache: bool,

    /// Cache key for this call, surfaced for display and administration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_key: Option<String>,
}

impl StructuredResult {
    /// Successful answer
    pub fn answered(message: impl Into<String>, data: Value, citations: Vec<Citation>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            citations,
            from_cache: false,
            cache_key: None,
        }
    }

    /// Honest reply for a tool this system does not have
    pub fn cannot_help(tool_name: &str) -> Self {
        Self {
            success: false,
            message: format!("I can't help with '{}' - no such capability.", tool_name),
            data: None,
            citations: vec![],
            from_cache: false,
            cache_key: None,
        }
    }

    /// User-safe failure after a data-source or handler error
    pub fn retrieval_failed() -> Self {
        Self {
            success: false,
            message: "Unable to retrieve the requested data right now. Please try again."
                .to_string(),
            data: None,
            citations: vec![],
            from_cache: false,
            cache_key: None,
        }
    }

    pub fn with_cache_key(mut self, key: impl Into<String>) -> Self {
        self.cache_key = Some(key.into());
        self
    }

    pub fn served_from_cache(mut self) -> Self {
        self.from_cache = true;
        self
    }
}
