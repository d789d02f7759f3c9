//! Asset lookup tool - resolve an asset by (approximate) name

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use pulse_data::{DataRequest, OperationCategory};
use pulse_foundation::{CacheTier, Error, Result};

use crate::{Tool, ToolContext, ToolDef, ToolOutput};

/// Asset master-data lookup with fuzzy name resolution
pub struct AssetLookupTool;

#[derive(Debug, Deserialize)]
struct AssetLookupParams {
    name: String,
}

impl AssetLookupTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AssetLookupTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for AssetLookupTool {
    fn definition(&self) -> ToolDef {
        ToolDef::builder(
            "asset_lookup",
            "Look up a plant asset by name. Accepts approximate names and returns the best match plus close alternatives.",
        )
        .string_param("name", "Asset name as entered by the operator", true)
        .cache_tier(CacheTier::Static)
        .require_citation()
        .build()
    }

    async fn execute(&self, ctx: &ToolContext, params: Value) -> Result<ToolOutput> {
        let params: AssetLookupParams = serde_json::from_value(params)
            .map_err(|e| Error::invalid_params("asset_lookup", e.to_string()))?;
        if params.name.trim().is_empty() {
            return Err(Error::invalid_params("asset_lookup", "name must not be empty"));
        }

        let matched = ctx
            .data
            .resolve_name(OperationCategory::Assets, &params.name)
            .await?;

        let Some(best) = matched.best else {
            return Ok(ToolOutput::new(
                format!("No asset matching '{}' was found.", params.name),
                json!({"asset": null, "alternates": []}),
            ));
        };

        // Re-fetch the matched record so the answer carries provenance
        let mut request = DataRequest::for_category(OperationCategory::Assets);
        request = match best.record.get("id") {
            Some(id) => request.with_filter("id", id.clone()),
            None => request.with_filter("name", Value::String(best.name.clone())),
        };
        let result = ctx.data.fetch(&request).await?;

        let asset = result.rows.first().cloned().unwrap_or(best.record);
        let alternates: Vec<Value> = matched
            .alternates
            .iter()
            .map(|a| json!({"name": a.name, "score": a.score}))
            .collect();

        Ok(ToolOutput::new(
            format!("Found asset '{}'.", best.name),
            json!({"asset": asset, "alternates": alternates}),
        )
        .cite(&result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_data::MemorySource;
    use std::sync::Arc;

    fn ctx() -> ToolContext {
        let source = MemorySource::new("asset-db").with_collection(
            "assets",
            vec![
                json!({"id": "A-12", "name": "Grinder 5", "area": "milling"}),
                json!({"id": "A-13", "name": "Grinder 7", "area": "milling"}),
            ],
        );
        ToolContext::new("u1", Arc::new(source))
    }

    #[tokio::test]
    async fn resolves_and_cites() {
        let tool = AssetLookupTool::new();
        let output = tool
            .execute(&ctx(), json!({"name": "grinder 5"}))
            .await
            .unwrap();

        assert_eq!(output.payload["asset"]["id"], json!("A-12"));
        assert_eq!(output.citations.len(), 1);
        assert_eq!(output.citations[0].source_id, "asset-db");
    }

    #[tokio::test]
    async fn lists_alternates() {
        let tool = AssetLookupTool::new();
        let output = tool
            .execute(&ctx(), json!({"name": "grinder"}))
            .await
            .unwrap();
        assert!(!output.payload["alternates"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn honest_no_match() {
        let tool = AssetLookupTool::new();
        let output = tool
            .execute(&ctx(), json!({"name": "boiler 9"}))
            .await
            .unwrap();

        assert_eq!(output.payload["asset"], Value::Null);
        assert!(output.citations.is_empty());
        assert!(output.summary.contains("No asset"));
    }

    #[tokio::test]
    async fn rejects_missing_name() {
        let tool = AssetLookupTool::new();
        let err = tool.execute(&ctx(), json!({})).await.unwrap_err();
        assert!(matches!(err, Error::InvalidParams { .. }));
    }
}
