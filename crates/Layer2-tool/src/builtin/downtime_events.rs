//! Downtime events tool - recent downtime history for an asset

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use pulse_data::{DataRequest, OperationCategory};
use pulse_foundation::{CacheTier, Error, Result};

use crate::{Tool, ToolContext, ToolDef, ToolOutput};

/// Default cap on returned events
const DEFAULT_LIMIT: usize = 50;

/// Downtime event history
pub struct DowntimeEventsTool;

#[derive(Debug, Deserialize)]
struct DowntimeEventsParams {
    asset_id: String,
    #[serde(default)]
    limit: Option<usize>,
}

impl DowntimeEventsTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DowntimeEventsTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for DowntimeEventsTool {
    fn definition(&self) -> ToolDef {
        ToolDef::builder(
            "downtime_events",
            "Downtime events recorded for an asset, most useful over the current shift or day.",
        )
        .string_param("asset_id", "Asset identifier, e.g. A-12", true)
        .integer_param("limit", "Maximum number of events to return (default: 50)", false)
        .cache_tier(CacheTier::Daily)
        .require_citation()
        .build()
    }

    async fn execute(&self, ctx: &ToolContext, params: Value) -> Result<ToolOutput> {
        let params: DowntimeEventsParams = serde_json::from_value(params)
            .map_err(|e| Error::invalid_params("downtime_events", e.to_string()))?;

        let request = DataRequest::for_category(OperationCategory::Downtime)
            .with_filter("asset_id", json!(params.asset_id))
            .with_limit(params.limit.unwrap_or(DEFAULT_LIMIT));
        let result = ctx.data.fetch(&request).await?;

        let summary = if result.is_empty() {
            format!("No downtime recorded for asset {}.", params.asset_id)
        } else {
            format!(
                "{} downtime event(s) for asset {}.",
                result.row_count, params.asset_id
            )
        };

        let citation = result.citation();
        Ok(ToolOutput::new(
            summary,
            json!({"asset_id": params.asset_id, "events": result.rows, "count": result.row_count}),
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
        let source = MemorySource::new("mes-history").with_collection(
            "downtime_events",
            vec![
                json!({"id": "D-1", "asset_id": "A-12", "reason": "jam", "minutes": 14.0}),
                json!({"id": "D-2", "asset_id": "A-12", "reason": "changeover", "minutes": 30.0}),
                json!({"id": "D-3", "asset_id": "A-20", "reason": "tooling", "minutes": 8.0}),
            ],
        );
        ToolContext::new("u1", Arc::new(source))
    }

    #[tokio::test]
    async fn filters_by_asset() {
        let tool = DowntimeEventsTool::new();
        let output = tool
            .execute(&ctx(), json!({"asset_id": "A-12"}))
            .await
            .unwrap();
        assert_eq!(output.payload["count"], json!(2));
    }

    #[tokio::test]
    async fn limit_caps_events() {
        let tool = DowntimeEventsTool::new();
        let output = tool
            .execute(&ctx(), json!({"asset_id": "A-12", "limit": 1}))
            .await
            .unwrap();
        assert_eq!(output.payload["count"], json!(1));
    }

    #[tokio::test]
    async fn quiet_asset_reports_zero_events() {
        let tool = DowntimeEventsTool::new();
        let output = tool
            .execute(&ctx(), json!({"asset_id": "A-77"}))
            .await
            .unwrap();
        assert_eq!(output.payload["count"], json!(0));
        assert_eq!(output.citations.len(), 1);
    }
}
