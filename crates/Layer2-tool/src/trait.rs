//! Tool trait and related types

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use pulse_data::{Citation, DataResult, DataSource};
use pulse_foundation::{CacheTier, Result};

/// Default per-call timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Definition of a named query handler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDef {
    /// Tool name (unique identifier)
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// JSON Schema for parameters
    pub parameters: ToolParameters,

    /// Cache tier declared at registration; fixed for the tool's lifetime
    pub cache_tier: CacheTier,

    /// Whether answers from this tool must carry provenance
    pub requires_citation: bool,
}

/// Parameters schema for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameters {
    /// Type (usually "object")
    #[serde(rename = "type")]
    pub schema_type: String,

    /// Properties (parameter definitions)
    pub properties: Value,

    /// Required parameters
    #[serde(default)]
    pub required: Vec<String>,
}

impl ToolDef {
    /// Create a new tool definition builder
    pub fn builder(name: impl Into<String>, description: impl Into<String>) -> ToolDefBuilder {
        ToolDefBuilder::new(name, description)
    }
}

/// Builder for ToolDef
pub struct ToolDefBuilder {
    name: String,
    description: String,
    properties: serde_json::Map<String, Value>,
    required: Vec<String>,
    cache_tier: CacheTier,
    requires_citation: bool,
}

impl ToolDefBuilder {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            properties: serde_json::Map::new(),
            required: vec![],
            cache_tier: CacheTier::None,
            requires_citation: false,
        }
    }

    /// Add a string parameter
    pub fn string_param(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        let name = name.into();
        self.properties.insert(
            name.clone(),
            serde_json::json!({
                "type": "string",
                "description": description.into()
            }),
        );
        if required {
            self.required.push(name);
        }
        self
    }

    /// Add an integer parameter
    pub fn integer_param(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        let name = name.into();
        self.properties.insert(
            name.clone(),
            serde_json::json!({
                "type": "integer",
                "description": description.into()
            }),
        );
        if required {
            self.required.push(name);
        }
        self
    }

    /// Declare the cache tier (defaults to uncached)
    pub fn cache_tier(mut self, tier: CacheTier) -> Self {
        self.cache_tier = tier;
        self
    }

    /// Require provenance on this tool's answers
    pub fn require_citation(mut self) -> Self {
        self.requires_citation = true;
        self
    }

    /// Build the ToolDef
    pub fn build(self) -> ToolDef {
        ToolDef {
            name: self.name,
            description: self.description,
            parameters: ToolParameters {
                schema_type: "object".to_string(),
                properties: Value::Object(self.properties),
                required: self.required,
            },
            cache_tier: self.cache_tier,
            requires_citation: self.requires_citation,
        }
    }
}

/// Context provided to tools during execution.
///
/// Per-call control values ride here, not in the parameter schema: the
/// layer invoking handlers cannot be relied on to forward arbitrary extra
/// parameters, so the bypass flag is ambient state.
pub struct ToolContext {
    /// Who is asking; part of the cache key
    pub caller_id: String,

    /// Data access for this call
    pub data: Arc<dyn DataSource>,

    /// Bypass the cache and repopulate with fresh data
    pub force_refresh: bool,

    /// Upper bound on handler execution
    pub timeout: Duration,
}

impl ToolContext {
    pub fn new(caller_id: impl Into<String>, data: Arc<dyn DataSource>) -> Self {
        Self {
            caller_id: caller_id.into(),
            data,
            force_refresh: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_force_refresh(mut self, force_refresh: bool) -> Self {
        self.force_refresh = force_refresh;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Result of a successful tool execution.
///
/// Serializable as a whole so cached results keep the provenance captured
/// at write time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    /// One-line, human-readable summary
    pub summary: String,

    /// Structured result content
    pub payload: Value,

    /// Provenance of every data result touched during execution
    #[serde(default)]
    pub citations: Vec<Citation>,
}

impl ToolOutput {
    pub fn new(summary: impl Into<String>, payload: Value) -> Self {
        Self {
            summary: summary.into(),
            payload,
            citations: vec![],
        }
    }

    /// Record the provenance of a data result
    pub fn cite(mut self, result: &DataResult) -> Self {
        self.citations.push(result.citation());
        self
    }

    /// Record an already-projected citation
    pub fn with_citation(mut self, citation: Citation) -> Self {
        self.citations.push(citation);
        self
    }
}

/// Tool trait - implement this to create a new query handler
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool definition
    fn definition(&self) -> ToolDef;

    /// Execute the tool with given parameters
    async fn execute(&self, ctx: &ToolContext, params: Value) -> Result<ToolOutput>;

    /// Get the tool name (convenience method)
    fn name(&self) -> String {
        self.definition().name
    }
}
