//! Shift schedule tool - shift and crew schedule lookup

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use pulse_data::{DataRequest, OperationCategory};
use pulse_foundation::{CacheTier, Error, Result};

use crate::{Tool, ToolContext, ToolDef, ToolOutput};

/// Shift schedule lookup
pub struct ShiftScheduleTool;

#[derive(Debug, Deserialize)]
struct ShiftScheduleParams {
    #[serde(default)]
    crew: Option<String>,
}

impl ShiftScheduleTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ShiftScheduleTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for ShiftScheduleTool {
    fn definition(&self) -> ToolDef {
        ToolDef::builder(
            "shift_schedule",
            "Shift schedule, optionally narrowed to one crew.",
        )
        .string_param("crew", "Crew name to filter by", false)
        .cache_tier(CacheTier::Static)
        .require_citation()
        .build()
    }

    async fn execute(&self, ctx: &ToolContext, params: Value) -> Result<ToolOutput> {
        let params: ShiftScheduleParams = serde_json::from_value(params)
            .map_err(|e| Error::invalid_params("shift_schedule", e.to_string()))?;

        let mut request = DataRequest::for_category(OperationCategory::Schedule);
        if let Some(crew) = &params.crew {
            request = request.with_filter("crew", json!(crew));
        }
        let result = ctx.data.fetch(&request).await?;

        let summary = match (&params.crew, result.is_empty()) {
            (Some(crew), true) => format!("No shifts scheduled for crew {}.", crew),
            (Some(crew), false) => format!("{} shift(s) for crew {}.", result.row_count, crew),
            (None, true) => "No shifts on the schedule.".to_string(),
            (None, false) => format!("{} shift(s) on the schedule.", result.row_count),
        };

        let citation = result.citation();
        Ok(ToolOutput::new(
            summary,
            json!({"shifts": result.rows, "count": result.row_count}),
        )
        .with_citation(citation))
    }
}
