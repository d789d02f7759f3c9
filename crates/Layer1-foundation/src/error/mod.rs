//! Error types for PlantPulse
//!
//! All errors are defined centrally and shared across layers.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// PlantPulse error type
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // Data sources
    // ========================================================================
    #[error("Connection error: {source_id} - {message}")]
    Connection { source_id: String, message: String },

    #[error("Query error: {source_id} - {message}")]
    Query { source_id: String, message: String },

    #[error("Data source not found: {0}")]
    SourceNotFound(String),

    // ========================================================================
    // Tools
    // ========================================================================
    #[error("Duplicate tool registration: {0}")]
    DuplicateTool(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid parameters for {tool}: {message}")]
    InvalidParams { tool: String, message: String },

    // ========================================================================
    // Execution
    // ========================================================================
    #[error("Timeout: {0}")]
    Timeout(String),

    // ========================================================================
    // External conversions
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ========================================================================
    // Catch-all
    // ========================================================================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the caller may reasonably retry the failed call.
    ///
    /// Connection failures and timeouts fail fast inside the data layer;
    /// retry policy belongs to whoever invoked us.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Connection { .. } | Error::Timeout(_))
    }

    /// Connection error helper
    pub fn connection(source_id: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Connection {
            source_id: source_id.into(),
            message: message.into(),
        }
    }

    /// Query error helper
    pub fn query(source_id: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Query {
            source_id: source_id.into(),
            message: message.into(),
        }
    }

    /// Invalid parameter helper
    pub fn invalid_params(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidParams {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// From implementations (additional conversions)
// ============================================================================

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Internal(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Internal(s.to_string())
    }
}
