//! In-memory data source
//!
//! Collections are plain JSON arrays held in memory. This is the fixture
//! source for tests and the demo CLI, and the reference implementation of
//! the `DataSource` contract.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use pulse_foundation::{Error, Result};

use crate::fuzzy::{rank_candidates, NameMatch};
use crate::source::{
    default_collection, row_matches, DataRequest, DataResult, DataSource, OperationCategory,
};

/// JSON-collection data source
#[derive(Debug, Default)]
pub struct MemorySource {
    id: String,
    collections: HashMap<String, Vec<Value>>,
}

impl MemorySource {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            collections: HashMap::new(),
        }
    }

    pub fn with_collection(mut self, name: impl Into<String>, rows: Vec<Value>) -> Self {
        self.collections.insert(name.into(), rows);
        self
    }

    /// Load collections from a JSON document of the form
    /// `{"assets": [...], "shifts": [...]}`.
    pub fn from_json_str(id: impl Into<String>, raw: &str) -> Result<Self> {
        let id = id.into();
        let doc: Value = serde_json::from_str(raw)?;
        let Value::Object(map) = doc else {
            return Err(Error::query(&id, "fixture document must be a JSON object"));
        };

        let mut source = Self::new(&id);
        for (name, rows) in map {
            match rows {
                Value::Array(rows) => {
                    source.collections.insert(name, rows);
                }
                _ => {
                    return Err(Error::query(
                        &id,
                        format!("collection '{}' must be a JSON array", name),
                    ));
                }
            }
        }
        Ok(source)
    }
}

#[async_trait]
impl DataSource for MemorySource {
    fn id(&self) -> &str {
        &self.id
    }

    async fn fetch(&self, request: &DataRequest) -> Result<DataResult> {
        let rows = self.collections.get(&request.collection).ok_or_else(|| {
            Error::query(
                &self.id,
                format!("unknown collection: {}", request.collection),
            )
        })?;

        let mut matched: Vec<Value> = rows
            .iter()
            .filter(|row| row_matches(row, &request.filter))
            .cloned()
            .collect();
        if let Some(limit) = request.limit {
            matched.truncate(limit);
        }

        debug!(
            source = %self.id,
            collection = %request.collection,
            rows = matched.len(),
            "memory fetch"
        );
        Ok(DataResult::new(matched, &self.id, &request.collection))
    }

    async fn resolve_name(&self, category: OperationCategory, name: &str) -> Result<NameMatch> {
        let collection = default_collection(category);
        let rows = self.collections.get(collection).ok_or_else(|| {
            Error::query(&self.id, format!("unknown collection: {}", collection))
        })?;

        let candidates = rows
            .iter()
            .filter_map(|row| row.get("name").and_then(Value::as_str).map(|n| (n, row)));
        Ok(rank_candidates(name, candidates))
    }
}
