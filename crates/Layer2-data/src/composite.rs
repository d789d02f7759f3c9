//! Composite source
//!
//! Routes each operation category to one of several configured concrete
//! sources. With nothing routed, everything goes to the default source -
//! the single-store deployment is just a composite with no routes.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use pulse_foundation::Result;

use crate::fuzzy::NameMatch;
use crate::source::{DataRequest, DataResult, DataSource, OperationCategory};

/// Category-routing data source
pub struct CompositeSource {
    default: Arc<dyn DataSource>,
    routes: HashMap<OperationCategory, Arc<dyn DataSource>>,
}

impl CompositeSource {
    pub fn new(default: Arc<dyn DataSource>) -> Self {
        Self {
            default,
            routes: HashMap::new(),
        }
    }

    /// Send one category to a specific source
    pub fn route(mut self, category: OperationCategory, source: Arc<dyn DataSource>) -> Self {
        self.routes.insert(category, source);
        self
    }

    fn source_for(&self, category: OperationCategory) -> &Arc<dyn DataSource> {
        self.routes.get(&category).unwrap_or(&self.default)
    }
}

#[async_trait]
impl DataSource for CompositeSource {
    fn id(&self) -> &str {
        "composite"
    }

    async fn fetch(&self, request: &DataRequest) -> Result<DataResult> {
        let source = self.source_for(request.category);
        debug!(category = %request.category, source = %source.id(), "routing fetch");
        source.fetch(request).await
    }

    async fn resolve_name(&self, category: OperationCategory, name: &str) -> Result<NameMatch> {
        self.source_for(category).resolve_name(category, name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemorySource;
    use serde_json::json;

    fn source_with(id: &str, collection: &str, rows: Vec<serde_json::Value>) -> Arc<MemorySource> {
        Arc::new(MemorySource::new(id).with_collection(collection, rows))
    }

    #[tokio::test]
    async fn routes_by_category() {
        let assets = source_with("asset-db", "assets", vec![json!({"id": "A-1"})]);
        let runs = source_with(
            "mes-live",
            "production_runs",
            vec![json!({"id": "R-1"}), json!({"id": "R-2"})],
        );

        let composite = CompositeSource::new(assets)
            .route(OperationCategory::Production, runs);

        let result = composite
            .fetch(&DataRequest::for_category(OperationCategory::Production))
            .await
            .unwrap();
        assert_eq!(result.source_id, "mes-live");
        assert_eq!(result.row_count, 2);
    }

    #[tokio::test]
    async fn unrouted_category_falls_back_to_default() {
        let assets = source_with("asset-db", "assets", vec![json!({"id": "A-1"})]);
        let composite = CompositeSource::new(assets);

        let result = composite
            .fetch(&DataRequest::for_category(OperationCategory::Assets))
            .await
            .unwrap();
        assert_eq!(result.source_id, "asset-db");
    }

    #[tokio::test]
    async fn provenance_names_the_concrete_source() {
        let assets = source_with(
            "asset-db",
            "assets",
            vec![json!({"id": "A-1", "name": "Press 1"})],
        );
        let composite = CompositeSource::new(assets);

        let matched = composite
            .resolve_name(OperationCategory::Assets, "press 1")
            .await
            .unwrap();
        assert!(matched.is_match());

        let result = composite
            .fetch(&DataRequest::for_category(OperationCategory::Assets))
            .await
            .unwrap();
        // Citations carry the backing store's id, not "composite"
        assert_eq!(result.citation().source_id, "asset-db");
    }
}
