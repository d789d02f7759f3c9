//! Data source abstraction
//!
//! Every read goes through the [`DataSource`] trait and comes back as a
//! [`DataResult`]: rows plus the provenance needed to cite where they came
//! from. Zero rows is a valid, citable outcome - never an error and never
//! papered over with fabricated data.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use pulse_foundation::Result;

use crate::fuzzy::NameMatch;

/// Routing dimension for the composite source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationCategory {
    /// Asset master data
    Assets,
    /// Production run state
    Production,
    /// Downtime event history
    Downtime,
    /// Shift and crew schedules
    Schedule,
}

impl OperationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationCategory::Assets => "assets",
            OperationCategory::Production => "production",
            OperationCategory::Downtime => "downtime",
            OperationCategory::Schedule => "schedule",
        }
    }
}

impl std::fmt::Display for OperationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collection that holds the named records for a category.
///
/// Used by name resolution and by handlers that query a category's
/// primary collection.
pub fn default_collection(category: OperationCategory) -> &'static str {
    match category {
        OperationCategory::Assets => "assets",
        OperationCategory::Production => "production_runs",
        OperationCategory::Downtime => "downtime_events",
        OperationCategory::Schedule => "shifts",
    }
}

/// A read request against one collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataRequest {
    pub category: OperationCategory,
    pub collection: String,

    /// Equality filter: field name to expected value
    #[serde(default)]
    pub filter: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl DataRequest {
    pub fn new(category: OperationCategory, collection: impl Into<String>) -> Self {
        Self {
            category,
            collection: collection.into(),
            filter: Map::new(),
            limit: None,
        }
    }

    /// Request against the category's default collection
    pub fn for_category(category: OperationCategory) -> Self {
        Self::new(category, default_collection(category))
    }

    pub fn with_filter(mut self, field: impl Into<String>, value: Value) -> Self {
        self.filter.insert(field.into(), value);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Rows plus provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResult {
    pub rows: Vec<Value>,
    pub source_id: String,
    pub collection: String,
    pub queried_at: DateTime<Utc>,
    pub row_count: usize,
}

impl DataResult {
    pub fn new(rows: Vec<Value>, source_id: impl Into<String>, collection: impl Into<String>) -> Self {
        let row_count = rows.len();
        Self {
            rows,
            source_id: source_id.into(),
            collection: collection.into(),
            queried_at: Utc::now(),
            row_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Project the provenance for the citation list
    pub fn citation(&self) -> Citation {
        Citation {
            source_id: self.source_id.clone(),
            collection: self.collection.clone(),
            queried_at: self.queried_at,
            row_count: self.row_count,
        }
    }
}

/// Provenance surfaced to end callers for trust/audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub source_id: String,
    pub collection: String,
    pub queried_at: DateTime<Utc>,
    pub row_count: usize,
}

/// Uniform, strictly read-only interface over a backing store.
///
/// Connection failures fail fast; this layer never retries. Retry policy
/// belongs to the caller.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Stable identifier used in provenance
    fn id(&self) -> &str;

    /// Read matching rows from one collection
    async fn fetch(&self, request: &DataRequest) -> Result<DataResult>;

    /// Resolve a human-entered name to the best-matching record, with
    /// ranked alternates. No match means `best: None` and no alternates -
    /// a best match is never fabricated.
    async fn resolve_name(&self, category: OperationCategory, name: &str) -> Result<NameMatch>;
}

/// Equality check of one row against a request filter.
///
/// Shared by in-memory matching; missing fields never match.
pub fn row_matches(row: &Value, filter: &Map<String, Value>) -> bool {
    filter
        .iter()
        .all(|(field, expected)| row.get(field) == Some(expected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn zero_rows_is_valid_and_citable() {
        let result = DataResult::new(vec![], "mes", "downtime_events");
        assert!(result.is_empty());
        assert_eq!(result.row_count, 0);

        let citation = result.citation();
        assert_eq!(citation.source_id, "mes");
        assert_eq!(citation.row_count, 0);
    }

    #[test]
    fn row_count_tracks_rows() {
        let result = DataResult::new(vec![json!({"id": "A-1"}), json!({"id": "A-2"})], "mes", "assets");
        assert_eq!(result.row_count, 2);
    }

    #[test]
    fn filter_matching() {
        let row = json!({"asset_id": "A-12", "state": "running"});
        let mut filter = Map::new();
        filter.insert("asset_id".to_string(), json!("A-12"));
        assert!(row_matches(&row, &filter));

        filter.insert("state".to_string(), json!("down"));
        assert!(!row_matches(&row, &filter));

        let mut missing = Map::new();
        missing.insert("line".to_string(), json!("L1"));
        assert!(!row_matches(&row, &missing));
    }

    #[test]
    fn request_builder() {
        let request = DataRequest::for_category(OperationCategory::Downtime)
            .with_filter("asset_id", json!("A-12"))
            .with_limit(10);
        assert_eq!(request.collection, "downtime_events");
        assert_eq!(request.filter.len(), 1);
        assert_eq!(request.limit, Some(10));
    }
}
