//! Production status tool - current run state for an asset

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use pulse_data::{DataRequest, OperationCategory};
use pulse_foundation::{CacheTier, Error, Result};

use crate::{Tool, ToolContext, ToolDef, ToolOutput};

/// Live production run state
pub struct ProductionStatusTool;

#[derive(Debug, Deserialize)]
struct ProductionStatusParams {
    asset_id: String,
}

impl ProductionStatusTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProductionStatusTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for ProductionStatusTool {
    fn definition(&self) -> ToolDef {
        ToolDef::builder(
            "production_status",
            "Current production run state for an asset: what is running, at what rate.",
        )
        .string_param("asset_id", "Asset identifier, e.g. A-12", true)
        .cache_tier(CacheTier::Live)
        .require_citation()
        .build()
    }

    async fn execute(&self, ctx: &ToolContext, params: Value) -> Result<ToolOutput> {
        let params: ProductionStatusParams = serde_json::from_value(params)
            .map_err(|e| Error::invalid_params("production_status", e.to_string()))?;

        let request = DataRequest::for_category(OperationCategory::Production)
            .with_filter("asset_id", json!(params.asset_id));
        let result = ctx.data.fetch(&request).await?;

        let summary = if result.is_empty() {
            format!("No production runs recorded for asset {}.", params.asset_id)
        } else {
            format!(
                "{} production run(s) for asset {}.",
                result.row_count, params.asset_id
            )
        };

        let citation = result.citation();
        Ok(ToolOutput::new(
            summary,
            json!({"asset_id": params.asset_id, "runs": result.rows, "count": result.row_count}),
        )
        .with_citation(citation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_data::MemorySource;
    use std::sync::Arc;

    fn ctx() -> ToolContext {
        let source = MemorySource::new("mes-live").with_collection(
            "production_runs",
            vec![
                json!({"id": "R-1", "asset_id": "A-12", "state": "running", "rate_per_hour": 420.0}),
            ],
        );
        ToolContext::new("u1", Arc::new(source))
    }

    #[tokio::test]
    async fn reports_runs_with_citation() {
        let tool = ProductionStatusTool::new();
        let output = tool
            .execute(&ctx(), json!({"asset_id": "A-12"}))
            .await
            .unwrap();

        assert_eq!(output.payload["count"], json!(1));
        assert_eq!(output.citations[0].collection, "production_runs");
    }

    #[tokio::test]
    async fn empty_state_is_reported_not_invented() {
        let tool = ProductionStatusTool::new();
        let output = tool
            .execute(&ctx(), json!({"asset_id": "A-99"}))
            .await
            .unwrap();

        assert_eq!(output.payload["count"], json!(0));
        assert!(output.summary.contains("No production runs"));
        // Zero rows still cite the queried store
        assert_eq!(output.citations.len(), 1);
        assert_eq!(output.citations[0].row_count, 0);
    }

    #[test]
    fn declares_live_tier() {
        assert_eq!(
            ProductionStatusTool::new().definition().cache_tier,
            CacheTier::Live
        );
    }
}
